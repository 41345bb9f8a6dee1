use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

use crate::models::{BiddingParams, ScoreNormalization};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub bidding: BiddingSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Reject preference tables whose sides differ in size
    #[serde(default)]
    pub require_balanced_sides: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BiddingSettings {
    #[serde(default = "default_budget_max")]
    #[validate(range(min = 1.0))]
    pub budget_max: f64,
    #[serde(default = "default_capacity_max")]
    #[validate(range(min = 1.0))]
    pub capacity_max: f64,
    /// Maximum number of awards; unset means the size of the smaller side
    #[serde(default)]
    #[validate(range(min = 1))]
    pub round_cap: Option<usize>,
}

impl Default for BiddingSettings {
    fn default() -> Self {
        Self {
            budget_max: default_budget_max(),
            capacity_max: default_capacity_max(),
            round_cap: None,
        }
    }
}

impl BiddingSettings {
    pub fn params(&self) -> BiddingParams {
        BiddingParams {
            normalization: ScoreNormalization {
                budget_max: self.budget_max,
                capacity_max: self.capacity_max,
            },
            round_cap: self.round_cap,
        }
    }
}

fn default_budget_max() -> f64 { 1500.0 }
fn default_capacity_max() -> f64 { 100.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    /// JSON or TOML dataset to load instead of generating one
    pub path: Option<String>,
    /// Seed for generated datasets
    pub seed: Option<u64>,
    /// Participants per side in generated datasets
    #[serde(default = "default_dataset_size")]
    pub size: usize,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: None,
            seed: None,
            size: default_dataset_size(),
        }
    }
}

fn default_dataset_size() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAIRING__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAIRING__BIDDING__ROUND_CAP -> bidding.round_cap
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings
            .bidding
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid bidding settings: {}", e)))?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PAIRING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
