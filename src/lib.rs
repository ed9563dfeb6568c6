#![crate_type = "lib"]
#![crate_name = "rustyquery"]

pub mod common;
pub mod config;
pub mod query;
pub mod samples;
pub mod storage;
pub mod types;
