//! Report routines. Each one runs its queries and writes the result as text;
//! the values and their order come from the query layer.
use crate::common::Result;
use crate::config::Settings;
use crate::query;
use crate::storage::DataSource;
use itertools::Itertools as _;
use std::io::Write;

pub(super) fn turnover(source: &DataSource, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    for (i, threshold) in settings.turnover_thresholds.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "Customers with total > {threshold}")?;
        for customer in query::turnover_above(&source.customers, *threshold) {
            writeln!(
                out,
                "Customer ID: {}; Total: {:.2}",
                customer.id,
                customer.turnover()
            )?;
        }
    }
    Ok(())
}

pub(super) fn suppliers_by_city(
    source: &DataSource,
    _: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    for row in query::join_by_city(&source.customers, &source.suppliers) {
        writeln!(
            out,
            "{} - {} - {} - {}",
            row.customer_id, row.customer_city, row.supplier_city, row.supplier_name
        )?;
    }
    writeln!(out)?;
    for row in query::group_join_by_city(&source.customers, &source.suppliers) {
        writeln!(out, "{} - {}:", row.customer_id, row.customer_city)?;
        for supplier in row.suppliers {
            writeln!(out, " {} - {}", supplier.city, supplier.name)?;
        }
    }
    Ok(())
}

pub(super) fn suppliers_by_city_and_country(
    source: &DataSource,
    _: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    for row in query::join_by_city_and_country(&source.customers, &source.suppliers) {
        writeln!(
            out,
            "{} - {}, {} - {}",
            row.customer_id, row.customer_city, row.customer_country, row.supplier_name
        )?;
    }
    Ok(())
}

pub(super) fn large_orders(
    source: &DataSource,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    let threshold = settings.order_threshold;
    writeln!(out, "Customers with an order > {threshold}")?;
    for (customer, order) in query::first_order_above(&source.customers, threshold) {
        writeln!(
            out,
            "Customer ID: {}; Order: {} on {}; Total: {:.2}",
            customer.id, order.id, order.date, order.total
        )?;
    }
    Ok(())
}

pub(super) fn first_orders(source: &DataSource, _: &Settings, out: &mut dyn Write) -> Result<()> {
    for customer in query::order_by_first_order(&source.customers)? {
        let since = match query::first_order(customer) {
            Some(order) => order.date.format("%m/%Y").to_string(),
            None => "no orders".to_string(),
        };
        writeln!(
            out,
            "Customer ID: {}; Since: {}; Total: {:.2}",
            customer.id,
            since,
            customer.turnover()
        )?;
    }
    Ok(())
}

pub(super) fn invalid_customers(
    source: &DataSource,
    _: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    for customer in query::invalid_customers(&source.customers) {
        let reasons = query::violations(customer).iter().join(", ");
        writeln!(out, "Customer ID: {}; {}", customer.id, reasons)?;
    }
    Ok(())
}

pub(super) fn product_groups(source: &DataSource, _: &Settings, out: &mut dyn Write) -> Result<()> {
    for group in query::group_by_category_and_stock(&source.products) {
        writeln!(out, "{}:", group.category)?;
        for level in group.stock_levels {
            writeln!(out, "  In stock: {}", level.units_in_stock)?;
            for product in level.products {
                writeln!(out, "    {} - {:.2}", product.name, product.unit_price)?;
            }
        }
    }
    Ok(())
}

pub(super) fn price_buckets(
    source: &DataSource,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    for (bucket, products) in query::classify_by_price(&source.products, &settings.price_buckets) {
        writeln!(out, "{bucket}:")?;
        for product in products {
            writeln!(out, "  {} - {:.2}", product.name, product.unit_price)?;
        }
    }
    Ok(())
}

pub(super) fn city_statistics(
    source: &DataSource,
    _: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    for (city, statistics) in query::city_statistics(&source.customers)? {
        let profitability = match statistics.average_total {
            Some(average) => format!("{average:.2}"),
            None => "-".to_string(),
        };
        writeln!(
            out,
            "{city}: Profitability: {profitability}; Intensity: {:.2}",
            statistics.intensity
        )?;
    }
    Ok(())
}

pub(super) fn order_activity(
    source: &DataSource,
    _: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "By month:")?;
    for (month, count) in query::orders_by_month(&source.customers) {
        writeln!(out, "  {month:02}: {count}")?;
    }
    writeln!(out, "By year:")?;
    for (year, count) in query::orders_by_year(&source.customers) {
        writeln!(out, "  {year}: {count}")?;
    }
    writeln!(out, "By year and month:")?;
    for (year, months) in query::orders_by_year_and_month(&source.customers) {
        writeln!(out, "  {year}:")?;
        for (month, count) in months {
            writeln!(out, "    {month:02}: {count}")?;
        }
    }
    Ok(())
}
