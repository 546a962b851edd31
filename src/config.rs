//! Service configuration loaded from `ludo.toml`.
//!
//! Lookup order: the path in `LUDO_CONFIG`, then `ludo.toml`,
//! `../ludo.toml` and `/etc/ludo/ludo.toml`, else built-in defaults.
//! A handful of values can be overridden through environment variables
//! after the file is read:
//!
//! | Variable               | Field                      |
//! |------------------------|----------------------------|
//! | `LUDO_LOG_LEVEL`       | `logging.level`            |
//! | `LUDO_BOT_THINK_SCALE` | `session.bot_think_scale`  |
//! | `LUDO_STARTING_RATING` | `rating.starting_rating`   |
//!
//! Board geometry and scoring are rules, not configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::rating::elo::K_FACTOR;

/// Errors reading an explicit config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration matching `ludo.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub rating: RatingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Multiplier on bot thinking pauses. `0.0` makes bots instant.
    #[serde(default = "default_think_scale")]
    pub bot_think_scale: f64,

    /// Capacity of each session's event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Base seed for dice and bots. Entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bot_think_scale: default_think_scale(),
            event_buffer: default_event_buffer(),
            seed: None,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_bot_think_scale(mut self, scale: f64) -> Self {
        self.bot_think_scale = scale;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Rating given to players with no record.
    #[serde(default = "default_starting_rating")]
    pub starting_rating: i32,

    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            starting_rating: default_starting_rating(),
            k_factor: default_k_factor(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_think_scale() -> f64 {
    1.0
}
fn default_event_buffer() -> usize {
    64
}
fn default_starting_rating() -> i32 {
    1000
}
fn default_k_factor() -> f64 {
    K_FACTOR
}

/// Standard locations to search for ludo.toml
const CONFIG_SEARCH_PATHS: &[&str] = &["ludo.toml", "../ludo.toml", "/etc/ludo/ludo.toml"];

impl ServiceConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse a specific file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Search the standard locations, then apply environment overrides.
    ///
    /// Never fails: unreadable or malformed files are logged and skipped.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    fn load_file() -> Self {
        if let Ok(path) = std::env::var("LUDO_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                info!("Loading config from LUDO_CONFIG: {}", path.display());
                return Self::from_path_or_default(&path);
            }
            warn!("LUDO_CONFIG={} not found, searching defaults", path.display());
        }

        for path_str in CONFIG_SEARCH_PATHS {
            let path = Path::new(path_str);
            if path.exists() {
                info!("Loading config from {}", path.display());
                return Self::from_path_or_default(path);
            }
        }

        debug!("No ludo.toml found, using built-in defaults");
        Self::default()
    }

    fn from_path_or_default(path: &Path) -> Self {
        Self::from_path(path).unwrap_or_else(|e| {
            warn!("{e}, using defaults");
            Self::default()
        })
    }

    /// Apply overrides from a variable lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("LUDO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(raw) = lookup("LUDO_BOT_THINK_SCALE") {
            match raw.parse() {
                Ok(scale) => self.session.bot_think_scale = scale,
                Err(_) => warn!("ignoring LUDO_BOT_THINK_SCALE={raw}: not a number"),
            }
        }
        if let Some(raw) = lookup("LUDO_STARTING_RATING") {
            match raw.parse() {
                Ok(rating) => self.rating.starting_rating = rating,
                Err(_) => warn!("ignoring LUDO_STARTING_RATING={raw}: not an integer"),
            }
        }
    }
}
