mod engine;
pub mod execution;
#[cfg(test)]
mod tests;

pub use engine::{
    city_statistics, classify_by_price, first_order, first_order_above, group_by_category_and_stock,
    group_join_by_city, invalid_customers, join_by_city, join_by_city_and_country,
    order_by_first_order, orders_by_month, orders_by_year, orders_by_year_and_month,
    turnover_above, violations, CategoryGroup, CityStatistics, CitySuppliers, PriceBucket,
    StockGroup, SupplierMatch, Violation,
};
