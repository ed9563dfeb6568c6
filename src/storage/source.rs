use crate::common::constants::{NEGATIVE_PRICE_MSG, NEGATIVE_TOTAL_MSG, SAMPLE_DATASET};
use crate::common::Result;
use crate::config::Settings;
use crate::errdata;
use crate::types::{Customer, Product, Supplier};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The in-memory dataset every query runs against. Loaded and validated once,
/// then only ever borrowed immutably.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl DataSource {
    /// Creates a dataset from already-built collections, validating it.
    pub fn new(
        customers: Vec<Customer>,
        suppliers: Vec<Supplier>,
        products: Vec<Product>,
    ) -> Result<Self> {
        let source = Self {
            customers,
            suppliers,
            products,
        };
        source.validate()?;
        Ok(source)
    }

    /// Loads the dataset named by the settings, or the embedded sample.
    pub fn load(settings: &Settings) -> Result<Self> {
        let source = match &settings.dataset {
            Some(path) => Self::from_file(path)?,
            None => Self::sample()?,
        };
        log::info!(
            "loaded {} customers ({} orders), {} suppliers, {} products",
            source.customers.len(),
            source.customers.iter().map(|c| c.orders.len()).sum::<usize>(),
            source.suppliers.len(),
            source.products.len()
        );
        Ok(source)
    }

    /// The sample dataset compiled into the binary.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_DATASET)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let source: DataSource = serde_json::from_str(json)?;
        source.validate()?;
        Ok(source)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let source: DataSource = serde_json::from_reader(reader)?;
        source.validate()?;
        Ok(source)
    }

    /// Rejects datasets that violate the data model. Blank or absent optional
    /// strings are data, not violations.
    pub fn validate(&self) -> Result<()> {
        let mut customer_ids = HashSet::new();
        for customer in &self.customers {
            if !customer_ids.insert(customer.id.as_str()) {
                return errdata!("duplicate customer id {}", customer.id);
            }
            let mut order_ids = HashSet::new();
            for order in &customer.orders {
                if !order_ids.insert(order.id) {
                    return errdata!("customer {} has duplicate order id {}", customer.id, order.id);
                }
                if !(order.total >= 0.0) {
                    return errdata!(
                        "{NEGATIVE_TOTAL_MSG}: customer {} order {} has total {}",
                        customer.id,
                        order.id,
                        order.total
                    );
                }
            }
        }
        for product in &self.products {
            if !(product.unit_price >= 0.0) {
                return errdata!(
                    "{NEGATIVE_PRICE_MSG}: product {} ({}) has price {}",
                    product.id,
                    product.name,
                    product.unit_price
                );
            }
        }
        Ok(())
    }
}
