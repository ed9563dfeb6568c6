pub mod config;

pub use self::config::{PriceBuckets, Settings};
