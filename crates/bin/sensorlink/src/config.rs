//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `sensorlink.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Value delivery channel settings.
    pub delivery: DeliveryConfig,
    /// Virtual device settings.
    pub simulation: SimulationConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Value delivery channel configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Sensor updates buffered between the transport and the registry.
    pub capacity: usize,
}

/// Virtual device configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Milliseconds between two rounds of readings.
    pub interval_ms: u64,
    /// Rounds of readings before stopping; `0` runs until interrupted.
    pub ticks: u64,
}

impl Config {
    /// Load configuration from `sensorlink.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("sensorlink.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SENSORLINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("SENSORLINK_CHANNEL_CAPACITY")
            && let Ok(capacity) = val.parse()
        {
            self.delivery.capacity = capacity;
        }
        if let Ok(val) = std::env::var("SENSORLINK_INTERVAL_MS")
            && let Ok(interval) = val.parse()
        {
            self.simulation.interval_ms = interval;
        }
        if let Ok(val) = std::env::var("SENSORLINK_TICKS")
            && let Ok(ticks) = val.parse()
        {
            self.simulation.ticks = ticks;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery.capacity == 0 {
            return Err(ConfigError::Validation(
                "delivery capacity must be non-zero".to_string(),
            ));
        }
        if self.simulation.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "simulation interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The tick limit, `None` when running until interrupted.
    #[must_use]
    pub fn tick_limit(&self) -> Option<u64> {
        (self.ticks > 0).then_some(self.ticks)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sensorlink=info,sensorlink_app=info,sensorlink_adapter_virtual=info".to_string(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            ticks: 0,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
