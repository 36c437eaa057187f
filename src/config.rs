//! Configuration from `~/.arrastools/config.toml`.
//!
//! Every key is optional. Command-line flags override the file, and the file
//! overrides the built-in defaults.
//!
//! ```toml
//! step = 8
//! rate_limit = 150
//! max_commands = 576
//! seed = 42
//! start_delay_ms = 500
//! char_delay_us = 1000
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_START_DELAY_MS: u64 = 500;
const DEFAULT_CHAR_DELAY_US: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Bounce step for arena types 2 and 3.
    pub step: Option<i32>,
    /// Arena commands per second; 0 is unlimited.
    pub rate_limit: Option<u32>,
    /// Arena commands before stopping; 0 is unlimited.
    pub max_commands: Option<u64>,
    /// Seed for the random arena variant.
    pub seed: Option<u64>,
    /// Pause before the first event so the game window can take focus.
    pub start_delay_ms: Option<u64>,
    /// Pause after each character typed by a macro.
    pub char_delay_us: Option<u64>,
}

impl Config {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms.unwrap_or(DEFAULT_START_DELAY_MS))
    }

    pub fn char_delay(&self) -> Duration {
        Duration::from_micros(self.char_delay_us.unwrap_or(DEFAULT_CHAR_DELAY_US))
    }
}

/// `~/.arrastools/config.toml`, if a home directory exists.
pub fn default_path() -> Option<PathBuf> {
    home::home_dir().map(|mut p| {
        p.push(".arrastools");
        p.push("config.toml");
        p
    })
}

/// Load the default config file, falling back to defaults when it is missing
/// or unreadable.
pub fn load_config() -> Config {
    let Some(path) = default_path().filter(|p| p.exists()) else {
        return Config::default();
    };
    match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

/// Load a specific config file. Errors are reported, not swallowed.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
