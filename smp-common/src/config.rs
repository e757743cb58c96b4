//! Configuration loading
//!
//! Player settings come from an optional TOML file. A missing default
//! config file is not an error; compiled defaults apply. An explicitly
//! named file that cannot be read or parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Playback controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Interval between progress ticks while playing, in milliseconds
    pub tick_interval_ms: u64,

    /// Capacity of the event broadcast channel
    pub event_channel_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            event_channel_capacity: 100,
        }
    }
}

/// Load player configuration.
///
/// Priority order:
/// 1. Explicit path argument (must exist and parse)
/// 2. Platform config directory (`<config_dir>/smp/config.toml`), if present
/// 3. Compiled defaults
pub fn load_player_config(path: Option<&Path>) -> Result<PlayerConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("no config file found, using defaults");
                return Ok(PlayerConfig::default());
            }
        },
    };

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("smp").join("config.toml"))
}
