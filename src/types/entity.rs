use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer and the orders they placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub country: String,
    pub phone: String,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Customer {
    /// Sum of all order totals. Zero for a customer without orders.
    pub fn turnover(&self) -> f64 {
        self.orders.iter().fold(0.0, |sum, order| sum + order.total)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub date: NaiveDate,
    pub total: f64,
}

impl Order {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub unit_price: f64,
    pub units_in_stock: u32,
}

/// Product categories. Declared alphabetically so the derived ordering matches
/// the ordering of their names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Beverages,
    Condiments,
    Confections,
    #[serde(rename = "Dairy Products")]
    DairyProducts,
    #[serde(rename = "Grains/Cereals")]
    GrainsCereals,
    #[serde(rename = "Meat/Poultry")]
    MeatPoultry,
    Produce,
    Seafood,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Beverages => "Beverages",
            Category::Condiments => "Condiments",
            Category::Confections => "Confections",
            Category::DairyProducts => "Dairy Products",
            Category::GrainsCereals => "Grains/Cereals",
            Category::MeatPoultry => "Meat/Poultry",
            Category::Produce => "Produce",
            Category::Seafood => "Seafood",
        })
    }
}
