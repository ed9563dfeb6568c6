mod entity;
pub mod field;

pub use entity::{Category, Customer, Order, Product, Supplier};
pub use field::Field;
