//! Application configuration, persisted as JSON in the host config dir.
//!
//! Missing file means defaults; a present-but-corrupt file is an error the
//! app layer decides how to handle. Saves are atomic (temp file + rename).

use crate::error::config::ConfigError;
use crate::{DEFAULT_PORT, LOOPBACK_HOST};

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host. Loopback only; the bridge is not a network service.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port; 0 requests an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline for one bridged invocation.
    #[serde(default = "default_invoke_timeout_ms")]
    pub invoke_timeout_ms: u64,
}

impl ServerConfig {
    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_millis(self.invoke_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            invoke_timeout_ms: default_invoke_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_host() -> String {
    LOOPBACK_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_invoke_timeout_ms() -> u64 {
    5_000
}
fn default_canvas_width() -> u32 {
    800
}
fn default_canvas_height() -> u32 {
    600
}

impl AppConfig {
    /// Load config from `{config_dir}/config.json`, or defaults when the
    /// file does not exist.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            })?;

        let config: AppConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config atomically (temp file + rename).
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }
        if self.server.invoke_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: String::from("invoke_timeout_ms must be non-zero"),
            });
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "canvas size must be non-zero, got {}x{}",
                    self.canvas.width, self.canvas.height
                ),
            });
        }
        Ok(())
    }
}
