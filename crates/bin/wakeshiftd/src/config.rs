//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `wakeshift.toml` in the working directory (or the file named by
//! `WAKESHIFT_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use serde::Deserialize;
use wakeshift_domain::aggregation::AdjustmentCeiling;
use wakeshift_domain::effectiveness::{EffectivenessScore, LearningFactor, ReviewPolicy};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Adjustment and learning parameters.
    pub engine: EngineConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Raw engine parameters, checked by [`Config::engine`].
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest total shift of a wake time, in minutes.
    pub ceiling_minutes: u32,
    /// Weight of the newest outcome in the effectiveness average.
    pub learning_factor: f64,
    /// Scores below this are flagged once enough samples exist.
    pub review_threshold: f64,
    pub review_min_samples: u32,
    /// Pending outcomes the single writer buffers before callers wait.
    pub outcome_queue_capacity: usize,
}

/// Engine parameters converted to domain types.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub ceiling: AdjustmentCeiling,
    pub learning_factor: LearningFactor,
    pub review_policy: ReviewPolicy,
    pub outcome_queue_capacity: usize,
}

impl Config {
    /// Load configuration from `wakeshift.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WAKESHIFT_CONFIG").unwrap_or_else(|_| "wakeshift.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
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

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("WAKESHIFT_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("WAKESHIFT_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("WAKESHIFT_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("WAKESHIFT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("WAKESHIFT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(minutes) = var("WAKESHIFT_CEILING_MINUTES").and_then(|val| val.parse().ok()) {
            self.engine.ceiling_minutes = minutes;
        }
        if let Some(factor) = var("WAKESHIFT_LEARNING_FACTOR").and_then(|val| val.parse().ok()) {
            self.engine.learning_factor = factor;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.engine().map(|_| ())
    }

    /// Convert the `[engine]` section into domain values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a learning factor outside
    /// `(0, 1]`, a review threshold outside `[0, 1]` or an empty queue.
    pub fn engine(&self) -> Result<EngineSettings, ConfigError> {
        let learning_factor = LearningFactor::new(self.engine.learning_factor)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        let threshold = EffectivenessScore::new(self.engine.review_threshold)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        if self.engine.outcome_queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "outcome queue capacity must be non-zero".to_string(),
            ));
        }
        Ok(EngineSettings {
            ceiling: AdjustmentCeiling::new(self.engine.ceiling_minutes),
            learning_factor,
            review_policy: ReviewPolicy {
                threshold,
                min_samples: self.engine.review_min_samples,
            },
            outcome_queue_capacity: self.engine.outcome_queue_capacity,
        })
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:wakeshift.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "wakeshiftd=info,wakeshift_app=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ceiling_minutes: 120,
            learning_factor: 0.3,
            review_threshold: 0.5,
            review_min_samples: 5,
            outcome_queue_capacity: 64,
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
