//! Configuration management for flightinfo.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "flightinfo";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "FLIGHTINFO_";

/// Default local backend serving flight details and airports.
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/api/openai";

/// Default live flight API host.
const DEFAULT_LIVE_HOST: &str = "aerodatabox.p.rapidapi.com";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTINFO_`, sections split by `__`)
/// 2. TOML config file at `~/.config/flightinfo/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Query behaviour.
    pub query: QueryConfig,
    /// Structured flight lookup.
    pub schedule: ScheduleConfig,
    /// Live flight position API.
    pub live: LiveConfig,
    /// Airport metadata lookup.
    pub airports: AirportsConfig,
}

/// Per-flight data sources, as named in `query.precedence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightSourceKind {
    /// Live flight position API.
    Live,
    /// Structured lookup (HTTP service or timetable file).
    Schedule,
}

impl std::fmt::Display for FlightSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Schedule => write!(f, "schedule"),
        }
    }
}

/// Query-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Upper bound for a single source call in milliseconds.
    pub timeout_ms: u64,
    /// Source order for merging; earlier sources win on overlapping fields.
    pub precedence: Vec<FlightSourceKind>,
}

/// Structured-lookup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Enable the structured-lookup source.
    pub enabled: bool,
    /// Base URL of the lookup service.
    pub base_url: String,
    /// Local timetable JSON file. Replaces the HTTP service when set.
    pub timetable_path: Option<PathBuf>,
}

/// Live API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Enable the live source.
    pub enabled: bool,
    /// API base URL.
    pub base_url: String,
    /// API host header value.
    pub host: String,
    /// API key. The live source is skipped without one.
    pub api_key: Option<String>,
}

/// Airport metadata configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirportsConfig {
    /// Enable airport lookups.
    pub enabled: bool,
    /// Base URL of the airport service.
    pub base_url: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            precedence: vec![FlightSourceKind::Live, FlightSourceKind::Schedule],
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timetable_path: None,
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: format!("https://{DEFAULT_LIVE_HOST}"),
            host: DEFAULT_LIVE_HOST.to_string(),
            api_key: None,
        }
    }
}

impl Default for AirportsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

fn check_url(section: &str, url: &str) -> Result<()> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|e| Error::ConfigValidation {
            message: format!("{section}.base_url '{url}' is not a valid URL: {e}"),
        })
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FLIGHTINFO_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.query.timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for kind in &self.query.precedence {
            if !seen.insert(kind) {
                return Err(Error::ConfigValidation {
                    message: format!("source '{kind}' appears more than once in precedence"),
                });
            }
        }

        if self.schedule.enabled && self.schedule.timetable_path.is_none() {
            check_url("schedule", &self.schedule.base_url)?;
        }
        if self.live.enabled {
            check_url("live", &self.live.base_url)?;
        }
        if self.airports.enabled {
            check_url("airports", &self.airports.base_url)?;
        }

        Ok(())
    }

    /// Get the per-source timeout as a Duration.
    #[must_use]
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.query.timeout_ms)
    }

    /// The live API key, if one is configured and not blank.
    #[must_use]
    pub fn live_api_key(&self) -> Option<&str> {
        self.live
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
