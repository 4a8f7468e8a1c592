//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default analysis parameters. CLI flags override these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Frame sampling interval (1 = every frame).
    pub stride: usize,

    /// Binarization threshold for the bright-object detector (0-255).
    pub threshold: u8,

    /// Minimum region area in pixels for a detection to count.
    pub min_area: usize,

    /// Normalized displacement above which a frame is classified off-object.
    pub event_threshold: f64,

    /// Event classification policy ("one_way" or "toggle").
    pub event_policy: String,

    /// Landmark whose position drives event and zone classification.
    pub tracked_joint: String,

    /// Body side used for hip/knee/ankle in posture analysis ("left" or "right").
    pub body_side: String,

    /// Landmarks reported below this visibility (0.0-1.0) are discarded.
    pub min_visibility: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pitchlens=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            stride: 1,
            threshold: 200,
            min_area: 50,
            event_threshold: 0.05,
            event_policy: "one_way".to_string(),
            tracked_joint: "left_hip".to_string(),
            body_side: "left".to_string(),
            min_visibility: 0.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// Runs before logging is initialized, so a read or parse failure is
    /// returned as a message for the caller to log once a subscriber exists.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`. A missing file yields defaults silently.
    pub fn load_from(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => (config, None),
                Err(e) => (
                    Self::default(),
                    Some(format!(
                        "Failed to parse config at {}: {e}; using defaults",
                        path.display()
                    )),
                ),
            },
            Err(e) => (
                Self::default(),
                Some(format!(
                    "Failed to read config at {}: {e}; using defaults",
                    path.display()
                )),
            ),
        }
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("pitchlens").join("config.json")
}
