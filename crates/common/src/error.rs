//! Error types shared across PitchLens crates.

use std::path::PathBuf;

/// Top-level error type for PitchLens operations.
#[derive(Debug, thiserror::Error)]
pub enum PitchlensError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Pose estimation error: {message}")]
    Pose { message: String },

    #[error("Stat aggregation error: {message}")]
    Stats { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Unknown position category: {value:?} (expected forward, midfielder, or defender)")]
    UnknownPositionCategory { value: String },

    #[error("Analysis cancelled after {processed} frame(s)")]
    Cancelled { processed: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PitchlensError.
pub type PitchlensResult<T> = Result<T, PitchlensError>;

impl PitchlensError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn pose(msg: impl Into<String>) -> Self {
        Self::Pose {
            message: msg.into(),
        }
    }

    pub fn stats(msg: impl Into<String>) -> Self {
        Self::Stats {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error means the video resource could not be opened or read.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::Io(_) | Self::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_category() {
        assert!(PitchlensError::FileNotFound {
            path: PathBuf::from("/nope.mp4")
        }
        .is_io());
        assert!(PitchlensError::decode("broken pipe").is_io());
        assert!(!PitchlensError::stats("no sources").is_io());
        assert!(!PitchlensError::Cancelled { processed: 3 }.is_io());
    }

    #[test]
    fn test_unknown_position_message_names_value() {
        let err = PitchlensError::UnknownPositionCategory {
            value: "goalkeeper".to_string(),
        };
        assert!(err.to_string().contains("\"goalkeeper\""));
    }
}
