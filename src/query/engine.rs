//! The domain queries over customers, suppliers and products. Every function is
//! a pure transformation of borrowed records.
use crate::common::Result;
use crate::config::PriceBuckets;
use crate::errdata;
use crate::query::execution::{
    aggregate, column, filter, group_by, group_join, hash, nest, nested_loop, order, Aggregate,
    Direction, Expression,
};
use crate::types::{Category, Customer, Field, Order, Product, Supplier};
use itertools::Itertools as _;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").expect("valid regex");
}

/// Customers whose order totals sum to strictly more than `threshold`.
pub fn turnover_above(customers: &[Customer], threshold: f64) -> Vec<&Customer> {
    let result = filter(customers, |customer| customer.turnover() > threshold);
    log::debug!("{} customers with turnover above {threshold}", result.len());
    result
}

/// Customers with at least one order above `threshold`, paired with the first
/// such order in sequence order.
pub fn first_order_above(customers: &[Customer], threshold: f64) -> Vec<(&Customer, &Order)> {
    let result = customers
        .iter()
        .filter_map(|customer| {
            customer
                .orders
                .iter()
                .find(|order| order.total > threshold)
                .map(|order| (customer, order))
        })
        .collect_vec();
    log::debug!("{} customers with an order above {threshold}", result.len());
    result
}

/// A rule a customer's contact data can break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Violation {
    /// The postal code contains a non-digit character.
    PostalCode,
    /// The region is present but blank.
    Region,
    /// The phone number does not start with an opening parenthesis.
    Phone,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PostalCode => f.write_str("postal code is not numeric"),
            Violation::Region => f.write_str("region is blank"),
            Violation::Phone => f.write_str("phone has no operator code"),
        }
    }
}

/// The rules `customer` breaks. Absent postal codes and regions are tolerated;
/// a present but blank region is not.
pub fn violations(customer: &Customer) -> Vec<Violation> {
    let mut violations = Vec::new();
    if matches!(&customer.postal_code, Some(code) if NON_DIGIT.is_match(code)) {
        violations.push(Violation::PostalCode);
    }
    if matches!(&customer.region, Some(region) if region.trim().is_empty()) {
        violations.push(Violation::Region);
    }
    if !customer.phone.starts_with('(') {
        violations.push(Violation::Phone);
    }
    violations
}

/// Customers breaking at least one contact data rule.
pub fn invalid_customers(customers: &[Customer]) -> Vec<&Customer> {
    let result = filter(customers, |customer| !violations(customer).is_empty());
    log::debug!("{} of {} customers are invalid", result.len(), customers.len());
    result
}

/// A customer paired with a supplier from the same place.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SupplierMatch<'a> {
    pub customer_id: &'a str,
    pub customer_city: &'a str,
    pub customer_country: &'a str,
    pub supplier_name: &'a str,
    pub supplier_city: &'a str,
    pub supplier_country: &'a str,
}

impl<'a> From<(&'a Customer, &'a Supplier)> for SupplierMatch<'a> {
    fn from((customer, supplier): (&'a Customer, &'a Supplier)) -> Self {
        Self {
            customer_id: &customer.id,
            customer_city: &customer.city,
            customer_country: &customer.country,
            supplier_name: &supplier.name,
            supplier_city: &supplier.city,
            supplier_country: &supplier.country,
        }
    }
}

/// Inner join of customers and suppliers located in the same city.
pub fn join_by_city<'a>(
    customers: &'a [Customer],
    suppliers: &'a [Supplier],
) -> Vec<SupplierMatch<'a>> {
    let result = nested_loop(customers, suppliers, |customer, supplier| {
        customer.city == supplier.city
    })
    .into_iter()
    .map(SupplierMatch::from)
    .collect_vec();
    log::debug!("{} customer/supplier pairs share a city", result.len());
    result
}

/// Inner join of customers and suppliers located in the same city and country.
pub fn join_by_city_and_country<'a>(
    customers: &'a [Customer],
    suppliers: &'a [Supplier],
) -> Vec<SupplierMatch<'a>> {
    let result = hash(
        customers,
        |customer| (customer.city.as_str(), customer.country.as_str()),
        suppliers,
        |supplier| (supplier.city.as_str(), supplier.country.as_str()),
    )
    .into_iter()
    .map(SupplierMatch::from)
    .collect_vec();
    log::debug!("{} customer/supplier pairs share a city and country", result.len());
    result
}

/// A customer with every supplier in its city.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CitySuppliers<'a> {
    pub customer_id: &'a str,
    pub customer_city: &'a str,
    pub suppliers: Vec<&'a Supplier>,
}

/// Group join of customers with the suppliers of their city. Emits one row per
/// customer, with no suppliers when none share the city.
pub fn group_join_by_city<'a>(
    customers: &'a [Customer],
    suppliers: &'a [Supplier],
) -> Vec<CitySuppliers<'a>> {
    group_join(
        customers,
        |customer| customer.city.as_str(),
        suppliers,
        |supplier| supplier.city.as_str(),
    )
    .into_iter()
    .map(|(customer, suppliers)| CitySuppliers {
        customer_id: &customer.id,
        customer_city: &customer.city,
        suppliers,
    })
    .collect()
}

/// The customer's earliest order by date. Among orders on the same date the
/// one listed first wins. None when the customer has no orders.
pub fn first_order(customer: &Customer) -> Option<&Order> {
    customer.orders.iter().min_by_key(|order| order.date)
}

/// Orders customers by the year, then month, of their first order, then by
/// turnover descending, then by id. Customers without orders come first.
pub fn order_by_first_order(customers: &[Customer]) -> Result<Vec<&Customer>> {
    let turnover: Expression<'_, Customer> = Box::new(|c: &Customer| -> Result<Field> {
        let turnover = c.turnover();
        match turnover.is_finite() {
            true => Ok(Field::Float(turnover)),
            false => errdata!("customer {} has a non-finite turnover", c.id),
        }
    });
    order(
        customers,
        &[
            (
                column(|c: &Customer| Field::from(first_order(c).map(Order::year))),
                Direction::Ascending,
            ),
            (
                column(|c: &Customer| Field::from(first_order(c).map(Order::month))),
                Direction::Ascending,
            ),
            (turnover, Direction::Descending),
            (
                column(|c: &Customer| Field::from(c.id.as_str())),
                Direction::Ascending,
            ),
        ],
    )
}

/// Products of one category sharing a stock level, ordered by unit price.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockGroup<'a> {
    pub units_in_stock: u32,
    pub products: Vec<&'a Product>,
}

/// A category's stock level groups, in ascending stock order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub stock_levels: Vec<StockGroup<'a>>,
}

/// Groups products by (category, units in stock), then regroups those buckets
/// by category: category → stock level → products, every level ordered.
pub fn group_by_category_and_stock(products: &[Product]) -> Vec<CategoryGroup<'_>> {
    let buckets = group_by(products, |product| (product.category, product.units_in_stock));

    // Buckets iterate by (category, stock), so each category is one run.
    buckets
        .into_iter()
        .chunk_by(|((category, _), _)| *category)
        .into_iter()
        .map(|(category, run)| CategoryGroup {
            category,
            stock_levels: run
                .map(|((_, units_in_stock), mut products)| {
                    products.sort_by(|a, b| {
                        a.unit_price
                            .total_cmp(&b.unit_price)
                            .then_with(|| a.name.cmp(&b.name))
                    });
                    StockGroup {
                        units_in_stock,
                        products,
                    }
                })
                .collect(),
        })
        .collect()
}

/// A named unit price range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PriceBucket {
    Cheap,
    Normal,
    Costy,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 3] = [PriceBucket::Cheap, PriceBucket::Normal, PriceBucket::Costy];

    /// The bucket for `price`: below `cheap_below` is cheap, below
    /// `normal_below` normal, anything else costy.
    pub fn classify(price: f64, bounds: &PriceBuckets) -> Self {
        if price < bounds.cheap_below {
            PriceBucket::Cheap
        } else if price < bounds.normal_below {
            PriceBucket::Normal
        } else {
            PriceBucket::Costy
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceBucket::Cheap => f.write_str("cheap"),
            PriceBucket::Normal => f.write_str("normal"),
            PriceBucket::Costy => f.write_str("costy"),
        }
    }
}

/// Partitions products into price buckets. Every bucket is present, possibly
/// empty; products keep their input order.
pub fn classify_by_price<'a>(
    products: &'a [Product],
    bounds: &PriceBuckets,
) -> BTreeMap<PriceBucket, Vec<&'a Product>> {
    let mut buckets: BTreeMap<PriceBucket, Vec<&Product>> =
        PriceBucket::ALL.into_iter().map(|bucket| (bucket, Vec::new())).collect();
    buckets.extend(group_by(products, |product| {
        PriceBucket::classify(product.unit_price, bounds)
    }));
    buckets
}

/// Order statistics for the customers of one city.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CityStatistics {
    pub customers: usize,
    pub orders: usize,
    /// Average order total, None when the city's customers placed no orders.
    pub average_total: Option<f64>,
    /// Orders per customer.
    pub intensity: f64,
}

/// Per-city profitability (average order total) and intensity (orders per
/// customer). One entry per distinct customer city.
pub fn city_statistics(customers: &[Customer]) -> Result<BTreeMap<String, CityStatistics>> {
    let orders = customers
        .iter()
        .flat_map(|customer| customer.orders.iter().map(move |order| (customer, order)))
        .collect_vec();
    let mut per_city = aggregate(
        &orders,
        vec![column(|(customer, _): &(&Customer, &Order)| {
            Field::from(customer.city.as_str())
        })],
        vec![
            Aggregate::Average(column(|(_, order): &(&Customer, &Order)| {
                Field::from(order.total)
            })),
            Aggregate::Count(column(|(_, order): &(&Customer, &Order)| Field::from(order.id))),
        ],
    )?;

    let mut statistics = BTreeMap::new();
    for (city, members) in group_by(customers, |customer| customer.city.clone()) {
        let (average, count) = match per_city.remove(&vec![Field::from(city.as_str())]) {
            Some(values) => match values.as_slice() {
                [average, count] => (average.clone(), count.clone()),
                _ => return errdata!("unexpected aggregate shape for {city}: {values:?}"),
            },
            None => (Field::Null, Field::Integer(0)),
        };
        let entry = city_entry(&city, members.len(), average, count)?;
        statistics.insert(city, entry);
    }
    log::debug!("statistics for {} cities", statistics.len());
    Ok(statistics)
}

/// Converts a city's aggregate values into statistics, rejecting aggregate
/// values of an unexpected type.
pub(super) fn city_entry(
    city: &str,
    customers: usize,
    average: Field,
    count: Field,
) -> Result<CityStatistics> {
    if customers == 0 {
        return errdata!("city {city} has no customers");
    }
    let Some(orders) = count.as_i64().and_then(|n| usize::try_from(n).ok()) else {
        return errdata!("unexpected order count for {city}: {count:?}");
    };
    let Some(intensity) = count.checked_div(&Field::from(customers as i64))?.as_f64() else {
        return errdata!("non-numeric intensity for {city}");
    };
    let average_total = match average {
        Field::Null => None,
        average => match average.as_f64() {
            Some(value) => Some(value),
            None => return errdata!("non-numeric average for {city}: {average:?}"),
        },
    };
    Ok(CityStatistics {
        customers,
        orders,
        average_total,
        intensity,
    })
}

fn all_orders(customers: &[Customer]) -> impl Iterator<Item = &Order> {
    customers.iter().flat_map(|customer| customer.orders.iter())
}

/// Order counts per month of the year (1-12), across all years.
pub fn orders_by_month(customers: &[Customer]) -> BTreeMap<u32, usize> {
    group_by(all_orders(customers), Order::month)
        .into_iter()
        .map(|(month, orders)| (month, orders.len()))
        .collect()
}

/// Order counts per year.
pub fn orders_by_year(customers: &[Customer]) -> BTreeMap<i32, usize> {
    group_by(all_orders(customers), Order::year)
        .into_iter()
        .map(|(year, orders)| (year, orders.len()))
        .collect()
}

/// Order counts per year, then per month within the year. Both levels iterate
/// in ascending order.
pub fn orders_by_year_and_month(customers: &[Customer]) -> BTreeMap<i32, BTreeMap<u32, usize>> {
    nest(all_orders(customers), Order::year, Order::month)
        .into_iter()
        .map(|(year, months)| {
            let counts = months
                .into_iter()
                .map(|(month, orders)| (month, orders.len()))
                .collect();
            (year, counts)
        })
        .collect()
}
