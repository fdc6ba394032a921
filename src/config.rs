use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::models::{ScoringBounds, ScoringWeights};
use crate::services::DEFAULT_MIN_INTERVAL;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub routing: RoutingSettings,
    pub input: InputSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoutingSettings {
    #[serde(default = "default_endpoint")]
    #[validate(url)]
    pub endpoint: String,
    #[validate(length(min = 1, message = "set MAPS_API_KEY or routing.api_key"))]
    pub api_key: String,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl RoutingSettings {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_endpoint() -> String { crate::services::DEFAULT_ENDPOINT.to_string() }
fn default_min_interval_ms() -> u64 { DEFAULT_MIN_INTERVAL.as_millis() as u64 }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InputSettings {
    pub resorts: PathBuf,
    pub desirability: PathBuf,
    #[validate(length(min = 1, message = "at least one listing feed is required"))]
    pub listings: Vec<PathBuf>,
    /// Workaway feed of hosts accepting couples
    #[serde(default)]
    pub couple_feed: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { dir: default_output_dir() }
    }
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_candidate_radius_km")]
    #[validate(range(min = 0.0))]
    pub candidate_radius_km: f64,
    #[serde(default = "default_drive_full_score_min")]
    pub drive_full_score_min: f64,
    #[serde(default = "default_drive_zero_score_min")]
    pub drive_zero_score_min: f64,
    #[serde(default = "default_price_floor")]
    pub price_floor: f64,
    #[serde(default = "default_price_ceiling")]
    pub price_ceiling: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            candidate_radius_km: default_candidate_radius_km(),
            drive_full_score_min: default_drive_full_score_min(),
            drive_zero_score_min: default_drive_zero_score_min(),
            price_floor: default_price_floor(),
            price_ceiling: default_price_ceiling(),
        }
    }
}

impl ScoringSettings {
    pub fn bounds(&self) -> ScoringBounds {
        ScoringBounds {
            drive_full_score_min: self.drive_full_score_min,
            drive_zero_score_min: self.drive_zero_score_min,
            price_floor: self.price_floor,
            price_ceiling: self.price_ceiling,
        }
    }
}

fn validate_bounds(settings: &ScoringSettings) -> Result<(), ValidationError> {
    if settings.drive_full_score_min >= settings.drive_zero_score_min {
        return Err(ValidationError::new("drive_bounds_out_of_order"));
    }
    if settings.price_floor >= settings.price_ceiling {
        return Err(ValidationError::new("price_bounds_out_of_order"));
    }
    Ok(())
}

fn default_candidate_radius_km() -> f64 { 150.0 }
fn default_drive_full_score_min() -> f64 { 20.0 }
fn default_drive_zero_score_min() -> f64 { 120.0 }
fn default_price_floor() -> f64 { 900.0 }
fn default_price_ceiling() -> f64 { 3777.90 }

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct WeightsConfig {
    #[serde(default = "default_drive_time_weight")]
    #[validate(range(min = 0.0))]
    pub drive_time: f64,
    #[serde(default = "default_desirability_weight")]
    #[validate(range(min = 0.0))]
    pub desirability: f64,
    #[serde(default = "default_price_weight")]
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default = "default_best_weight")]
    #[validate(range(min = 0.0))]
    pub best: f64,
    #[serde(default = "default_rest_weight")]
    #[validate(range(min = 0.0))]
    pub rest: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            drive_time: default_drive_time_weight(),
            desirability: default_desirability_weight(),
            price: default_price_weight(),
            best: default_best_weight(),
            rest: default_rest_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(w: WeightsConfig) -> Self {
        Self {
            drive_time: w.drive_time,
            desirability: w.desirability,
            price: w.price,
            best: w.best,
            rest: w.rest,
        }
    }
}

fn default_drive_time_weight() -> f64 { 0.4 }
fn default_desirability_weight() -> f64 { 0.4 }
fn default_price_weight() -> f64 { 0.2 }
fn default_best_weight() -> f64 { 0.85 }
fn default_rest_weight() -> f64 { 0.15 }

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
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SKISTAY__)
    /// 5. MAPS_API_KEY for the routing credential
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SKISTAY__ROUTING__MIN_INTERVAL_MS -> routing.min_interval_ms
            .add_source(environment());

        Self::finish(with_api_key(builder)?.build()?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment());

        Self::finish(with_api_key(builder)?.build()?)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            self.routing.validate(),
            self.input.validate(),
            self.scoring.validate(),
            self.scoring.weights.validate(),
        ];

        for check in checks {
            check.map_err(|e| ConfigError::Message(e.to_string()))?;
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SKISTAY")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("input.listings")
        .try_parsing(true)
}

/// The routing credential conventionally lives in MAPS_API_KEY
fn with_api_key(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    match std::env::var("MAPS_API_KEY") {
        Ok(key) if !key.is_empty() => builder.set_override("routing.api_key", key),
        _ => Ok(builder.set_default("routing.api_key", "")?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.drive_time, 0.4);
        assert_eq!(weights.desirability, 0.4);
        assert_eq!(weights.price, 0.2);
        assert_eq!(weights.best, 0.85);
        assert_eq!(weights.rest, 0.15);
        assert_eq!(ScoringWeights::from(weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_routing_spacing() {
        let routing: RoutingSettings = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(routing.min_interval(), Duration::from_millis(3000));
        assert_eq!(routing.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_bounds() {
        assert_eq!(ScoringSettings::default().bounds(), ScoringBounds::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_out_of_order_bounds_rejected() {
        let scoring = ScoringSettings {
            price_floor: 4000.0,
            ..Default::default()
        };
        assert!(scoring.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[routing]
api_key = "file-key"
min_interval_ms = 10

[input]
resorts = "resorts.json"
desirability = "desirability.json"
listings = ["helpx.json", "woof.json"]

[scoring.weights]
price = 0.3
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.routing.min_interval(), Duration::from_millis(10));
        assert_eq!(settings.routing.timeout(), Duration::from_secs(30));
        assert_eq!(settings.input.listings.len(), 2);
        assert_eq!(settings.scoring.weights.price, 0.3);
        assert_eq!(settings.scoring.weights.best, 0.85);
        assert_eq!(settings.scoring.candidate_radius_km, 150.0);
        assert_eq!(settings.output.dir, PathBuf::from("."));
    }
}
