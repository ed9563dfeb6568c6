//! The exercise registry and the harness that runs exercises against a
//! dataset.
mod reports;

use crate::common::constants::UNKNOWN_SAMPLE_MSG;
use crate::common::Result;
use crate::config::Settings;
use crate::errinput;
use crate::storage::DataSource;
use std::io::Write;

/// A report routine: runs its queries and writes the result to `out`.
pub type Routine = fn(&DataSource, &Settings, &mut dyn Write) -> Result<()>;

/// A registered exercise.
pub struct Sample {
    pub name: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    routine: Routine,
}

impl Sample {
    const fn new(
        name: &'static str,
        category: &'static str,
        title: &'static str,
        description: &'static str,
        routine: Routine,
    ) -> Self {
        Self {
            name,
            category,
            title,
            description,
            routine,
        }
    }

    pub fn run(&self, source: &DataSource, settings: &Settings, out: &mut dyn Write) -> Result<()> {
        log::debug!("running sample {}", self.name);
        (self.routine)(source, settings, out)
    }
}

/// Every exercise, in presentation order.
pub fn registry() -> Vec<Sample> {
    vec![
        Sample::new(
            "linq1",
            "Restriction operators",
            "Where - Task 1",
            "List of all customers whose total turnover exceeds some value X",
            reports::turnover,
        ),
        Sample::new(
            "linq2",
            "Join operators",
            "Join - Task 1",
            "Customers and the suppliers located in the same city, then grouped per customer",
            reports::suppliers_by_city,
        ),
        Sample::new(
            "linq3",
            "Join operators",
            "Join - Task 2",
            "Customers and the suppliers located in the same city and country",
            reports::suppliers_by_city_and_country,
        ),
        Sample::new(
            "linq4",
            "Restriction operators",
            "Any - Task 1",
            "Customers who placed an order above some value X, with the first such order",
            reports::large_orders,
        ),
        Sample::new(
            "linq5",
            "Ordering operators",
            "OrderBy - Task 1",
            "Customers with the month and year they became customers, ordered by year, \
             month, turnover (descending) and id",
            reports::first_orders,
        ),
        Sample::new(
            "linq6",
            "Restriction operators",
            "Where - Task 2",
            "Customers with a non-numeric postal code, a blank region or a phone \
             without an operator code",
            reports::invalid_customers,
        ),
        Sample::new(
            "linq7",
            "Grouping operators",
            "GroupBy - Task 1",
            "Products grouped by category, then by units in stock, ordered by price",
            reports::product_groups,
        ),
        Sample::new(
            "linq8",
            "Grouping operators",
            "GroupBy - Task 2",
            "Products grouped into cheap, normal and costy by unit price",
            reports::price_buckets,
        ),
        Sample::new(
            "linq9",
            "Aggregate operators",
            "Average - Task 1",
            "Average profitability and intensity of each city",
            reports::city_statistics,
        ),
        Sample::new(
            "linq10",
            "Aggregate operators",
            "Count - Task 1",
            "Customer activity by month, by year, and by year and month",
            reports::order_activity,
        ),
    ]
}

/// Runs registered samples against one dataset and settings.
pub struct Harness {
    samples: Vec<Sample>,
    source: DataSource,
    settings: Settings,
}

impl Harness {
    pub fn new(source: DataSource, settings: Settings) -> Self {
        Self {
            samples: registry(),
            source,
            settings,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Looks up a sample by name, case-insensitively.
    pub fn find(&self, name: &str) -> Result<&Sample> {
        self.samples
            .iter()
            .find(|sample| sample.name.eq_ignore_ascii_case(name))
            .map_or_else(|| errinput!("{name}: {UNKNOWN_SAMPLE_MSG}"), Ok)
    }

    /// Runs the named sample, preceded by its title and description.
    pub fn run(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        let sample = self.find(name)?;
        writeln!(out, "== {} [{}]: {}", sample.title, sample.category, sample.name)?;
        writeln!(out, "{}", sample.description)?;
        writeln!(out)?;
        sample.run(&self.source, &self.settings, out)
    }

    /// Runs every sample in registry order.
    pub fn run_all(&self, out: &mut dyn Write) -> Result<()> {
        for sample in &self.samples {
            self.run(sample.name, out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Writes one line per registered sample.
    pub fn list(&self, out: &mut dyn Write) -> Result<()> {
        for sample in &self.samples {
            writeln!(out, "{:<8} {:<22} {}", sample.name, sample.category, sample.title)?;
        }
        Ok(())
    }
}
