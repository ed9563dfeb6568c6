// Settings defaults
pub const DEFAULT_TURNOVER_THRESHOLDS: [f64; 3] = [10000.0, 50000.0, 100000.0];
pub const DEFAULT_ORDER_THRESHOLD: f64 = 5000.0;
pub const DEFAULT_CHEAP_BELOW: f64 = 10.0;
pub const DEFAULT_NORMAL_BELOW: f64 = 20.0;

// Settings sources
pub const SETTINGS_FILE: &str = "rustyquery";
pub const SETTINGS_ENV_PREFIX: &str = "RUSTYQUERY";

// DataSource
pub const SAMPLE_DATASET: &str = include_str!("../../data/sample.json");
pub const NEGATIVE_TOTAL_MSG: &str = "order total must not be negative";
pub const NEGATIVE_PRICE_MSG: &str = "unit price must not be negative";

// Samples
pub const UNKNOWN_SAMPLE_MSG: &str = "no sample with that name; try `list`";
