//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default capture-loop settings.
    pub capture: CaptureDefaults,

    /// Default document assembly settings.
    pub assemble: AssembleDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default capture-loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Directory captured pages are written to.
    pub output_dir: PathBuf,

    /// Filename stem for captured pages (`{base}_{page:04}.{ext}`).
    pub base_name: String,

    /// First page number of a run.
    pub start_page: u32,

    /// Seconds between iterations.
    pub interval_secs: f64,

    /// Seconds to wait before the first capture.
    pub start_delay_secs: f64,

    /// Symbolic key sent to advance the reader.
    pub advance_key: String,

    /// Extension (and encoding) of captured pages.
    pub image_extension: String,
}

/// Default document assembly parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleDefaults {
    /// Extension of the source images to collect.
    pub image_extension: String,

    /// Resolution recorded for each page.
    pub dpi: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pageshot=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture: CaptureDefaults::default(),
            assemble: AssembleDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            output_dir: default_pictures_dir(),
            base_name: "capture".to_string(),
            start_page: 1,
            interval_secs: 1.0,
            start_delay_secs: 5.0,
            advance_key: "right".to_string(),
            image_extension: "png".to_string(),
        }
    }
}

impl Default for AssembleDefaults {
    fn default() -> Self {
        Self {
            image_extension: "png".to_string(),
            dpi: 300.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("pageshot").join("config.json")
}

/// Default directory for captured pages.
fn default_pictures_dir() -> PathBuf {
    home_dir().join("Pictures")
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
}
