//! Generic, record-agnostic query operators. The domain queries are built by
//! composing these.
mod aggregate;
mod join;
mod transform;

pub use aggregate::{aggregate, group_by, nest, Aggregate};
pub use join::{group_join, hash, nested_loop};
pub use transform::{column, filter, order, project, Direction, Expression};
