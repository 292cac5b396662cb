// src/config.rs

//! Defines the configuration structures for the simulator.
//!
//! Settings can be deserialized from a JSON file. Every field has a default,
//! so a file only needs to name what it changes. The defaults describe a
//! 172x320 portrait panel driven with landscape 320x172 images, shown at 2x
//! in a 640x344 window and refreshed at 60 Hz.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming a JSON config file to load at startup.
pub const CONFIG_ENV_VAR: &str = "FBSIM_CONFIG";

/// Configuration loaded once from `$FBSIM_CONFIG`, or defaults if unset.
///
/// Holds the load error for a file that is unreadable, malformed or invalid.
pub static CONFIG: Lazy<Result<Config, ConfigError>> = Lazy::new(Config::from_env);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Panel geometry and window appearance.
    pub display: DisplayConfig,
    /// Refresh cadence and timeouts.
    pub timing: TimingConfig,
}

// --- Display Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width the driver draws at, before rotation.
    pub logical_width: u32,
    /// Height the driver draws at, before rotation.
    pub logical_height: u32,
    /// Integer upscale factor from panel pixels to window pixels.
    pub scale: u32,
    /// Window title prefix. The driver name is appended.
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            logical_width: 320,
            logical_height: 172,
            scale: 2,
            title: "Simulator".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Framebuffer size as the hardware addresses it: the logical size transposed.
    pub fn physical_size(&self) -> (u32, u32) {
        (self.logical_height, self.logical_width)
    }

    /// Window size in pixels. The window shows the logical orientation.
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.logical_width * self.scale,
            self.logical_height * self.scale,
        )
    }

    pub fn window_title(&self, driver_name: &str) -> String {
        format!("{} - {}", self.title, driver_name)
    }
}

// --- Timing Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Presentation cycles per second.
    pub target_fps: u32,
    /// How often to check whether the driver has opened its display.
    pub discovery_poll_interval_ms: u64,
    /// Give up if the driver has not opened its display within this time.
    pub discovery_timeout_ms: u64,
    /// Stop on our own after this many seconds. `None` or `0` runs until closed.
    pub run_timeout_secs: Option<u64>,
    /// How long to wait for the driver thread to notice shutdown before
    /// leaving it behind.
    pub driver_shutdown_grace_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            target_fps: 60,
            discovery_poll_interval_ms: 100,
            discovery_timeout_ms: 5_000,
            run_timeout_secs: None,
            driver_shutdown_grace_ms: 250,
        }
    }
}

impl TimingConfig {
    /// Length of one presentation slot.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    pub fn discovery_poll_interval(&self) -> Duration {
        Duration::from_millis(self.discovery_poll_interval_ms)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    pub fn driver_shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.driver_shutdown_grace_ms)
    }
}

impl Config {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `$FBSIM_CONFIG`, or returns defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.logical_width == 0 || d.logical_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size must be non-zero, got {}x{}",
                d.logical_width, d.logical_height
            )));
        }
        if d.scale == 0 {
            return Err(ConfigError::Invalid("scale must be at least 1".to_string()));
        }
        if d.logical_width.checked_mul(d.scale).is_none()
            || d.logical_height.checked_mul(d.scale).is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "window size overflows at scale {}",
                d.scale
            )));
        }
        if self.timing.target_fps == 0 {
            return Err(ConfigError::Invalid(
                "target_fps must be at least 1".to_string(),
            ));
        }
        if self.timing.discovery_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "discovery_poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
