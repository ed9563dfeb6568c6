use crate::common::constants::{
    DEFAULT_CHEAP_BELOW, DEFAULT_NORMAL_BELOW, DEFAULT_ORDER_THRESHOLD,
    DEFAULT_TURNOVER_THRESHOLDS, SETTINGS_ENV_PREFIX, SETTINGS_FILE,
};
use crate::common::Result;
use crate::errinput;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime settings for the sample reports.
///
/// Sources are layered: built-in defaults, then an optional TOML file, then
/// `RUSTYQUERY_*` environment variables (`__` separates nested keys, e.g.
/// `RUSTYQUERY_PRICE_BUCKETS__CHEAP_BELOW=12`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Turnover thresholds X for the aggregate threshold filter, reported in order.
    pub turnover_thresholds: Vec<f64>,
    /// Threshold for the any-match order filter.
    pub order_threshold: f64,
    /// Unit price bounds for product classification.
    pub price_buckets: PriceBuckets,
    /// JSON dataset to load instead of the embedded sample.
    pub dataset: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            turnover_thresholds: DEFAULT_TURNOVER_THRESHOLDS.to_vec(),
            order_threshold: DEFAULT_ORDER_THRESHOLD,
            price_buckets: PriceBuckets::default(),
            dataset: None,
        }
    }
}

/// Upper (exclusive) price bounds of the cheap and normal buckets. Anything at
/// or above `normal_below` is costy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBuckets {
    pub cheap_below: f64,
    pub normal_below: f64,
}

impl Default for PriceBuckets {
    fn default() -> Self {
        Self {
            cheap_below: DEFAULT_CHEAP_BELOW,
            normal_below: DEFAULT_NORMAL_BELOW,
        }
    }
}

impl Settings {
    /// Loads settings. An explicit `path` must exist; otherwise `rustyquery.toml`
    /// in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("turnover_thresholds"),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        log::info!("loaded settings: {settings:?}");
        Ok(settings)
    }

    /// Checks the settings for internal consistency.
    pub fn validate(&self) -> Result<()> {
        let PriceBuckets {
            cheap_below,
            normal_below,
        } = self.price_buckets;
        if !(cheap_below.is_finite() && normal_below.is_finite()) {
            return errinput!("price bucket bounds must be finite");
        }
        if cheap_below > normal_below {
            return errinput!(
                "cheap_below ({cheap_below}) must not exceed normal_below ({normal_below})"
            );
        }
        if self.order_threshold.is_nan() || self.turnover_thresholds.iter().any(|x| x.is_nan()) {
            return errinput!("thresholds must be numbers");
        }
        Ok(())
    }
}
