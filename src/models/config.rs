//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Blizzard Game Data API settings
    #[serde(default)]
    pub blizzard: BlizzardConfig,

    /// Hydration pipeline settings
    #[serde(default)]
    pub hydration: HydrationConfig,

    /// File paths
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment variable overrides (`PORT`, `FRONTEND_URL`,
    /// `BLIZZARD_REGION`).
    pub fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }
        if let Ok(url) = std::env::var("FRONTEND_URL")
            && !url.is_empty()
        {
            self.server.frontend_url = Some(url);
        }
        if let Ok(region) = std::env::var("BLIZZARD_REGION")
            && !region.is_empty()
        {
            self.blizzard.region = region;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::validation("server.port must be > 0"));
        }
        if let Some(frontend_url) = &self.server.frontend_url {
            url::Url::parse(frontend_url)?;
        }
        if !matches!(self.blizzard.region.as_str(), "us" | "eu" | "kr" | "tw") {
            return Err(AppError::validation(format!(
                "blizzard.region must be one of us/eu/kr/tw, got '{}'",
                self.blizzard.region
            )));
        }
        if self.blizzard.timeout_secs == 0 {
            return Err(AppError::validation("blizzard.timeout_secs must be > 0"));
        }
        if self.blizzard.requests_per_second <= 0.0 {
            return Err(AppError::validation(
                "blizzard.requests_per_second must be > 0",
            ));
        }
        if self.hydration.batch_size == 0 {
            return Err(AppError::validation("hydration.batch_size must be > 0"));
        }
        if self.hydration.save_every_batches == 0 {
            return Err(AppError::validation(
                "hydration.save_every_batches must be > 0",
            ));
        }
        if self.paths.data_file.trim().is_empty() {
            return Err(AppError::validation("paths.data_file is empty"));
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Allowed CORS origin; permissive when unset
    #[serde(default)]
    pub frontend_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::port(),
            frontend_url: None,
        }
    }
}

/// Blizzard Game Data API settings. Credentials come from the environment,
/// never from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlizzardConfig {
    /// API region (us, eu, kr, tw)
    #[serde(default = "defaults::region")]
    pub region: String,

    /// Response locale
    #[serde(default = "defaults::locale")]
    pub locale: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Token-bucket refill rate for upstream calls
    #[serde(default = "defaults::requests_per_second")]
    pub requests_per_second: f64,

    /// Token-bucket burst capacity
    #[serde(default = "defaults::burst")]
    pub burst: u32,
}

impl Default for BlizzardConfig {
    fn default() -> Self {
        Self {
            region: defaults::region(),
            locale: defaults::locale(),
            timeout_secs: defaults::timeout(),
            requests_per_second: defaults::requests_per_second(),
            burst: defaults::burst(),
        }
    }
}

/// Hydration pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationConfig {
    /// Sets fetched concurrently per batch
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Fixed delay between batches in milliseconds
    #[serde(default = "defaults::batch_delay")]
    pub batch_delay_ms: u64,

    /// Persist the cache every N batches (and once at the end of a run)
    #[serde(default = "defaults::save_every_batches")]
    pub save_every_batches: usize,

    /// Start a hydration run when the server boots
    #[serde(default = "defaults::run_on_start")]
    pub run_on_start: bool,

    /// Re-run hydration on this interval; disabled when unset
    #[serde(default)]
    pub interval_mins: Option<u64>,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            batch_delay_ms: defaults::batch_delay(),
            save_every_batches: defaults::save_every_batches(),
            run_on_start: defaults::run_on_start(),
            interval_mins: None,
        }
    }
}

/// File path settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON file holding the cached set array
    #[serde(default = "defaults::data_file")]
    pub data_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: defaults::data_file(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn port() -> u16 {
        5001
    }
    pub fn region() -> String {
        "eu".into()
    }
    pub fn locale() -> String {
        "en_US".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn requests_per_second() -> f64 {
        8.0
    }
    pub fn burst() -> u32 {
        4
    }
    pub fn batch_size() -> usize {
        4
    }
    pub fn batch_delay() -> u64 {
        750
    }
    pub fn save_every_batches() -> usize {
        5
    }
    pub fn run_on_start() -> bool {
        true
    }
    pub fn data_file() -> String {
        "data/transmogs.json".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
