mod source;

pub use source::DataSource;
