//! Run report handed to the external report assembler.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pitchlens_analysis_model::event::EventResult;
use pitchlens_analysis_model::motion::TrajectoryResult;
use pitchlens_analysis_model::posture::PostureResult;
use pitchlens_analysis_model::stats::{AggregatedScore, PositionCategory, StatRecord};
use pitchlens_analysis_model::zone::ZoneResult;
use pitchlens_common::error::PitchlensResult;
use serde::{Deserialize, Serialize};

/// Non-fatal conditions worth surfacing next to the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    /// The detector found no qualifying region in any frame.
    NoCentroidsDetected,
    /// The pose estimator produced no usable landmarks in any frame.
    NoLandmarkFrames,
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCentroidsDetected => write!(f, "no object detected in any frame"),
            Self::NoLandmarkFrames => write!(f, "no pose landmarks in any frame"),
        }
    }
}

/// Results of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub video: PathBuf,
    /// Frame source used for decoding.
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub position: PositionCategory,
    pub stride: u64,
    /// Frames in the underlying stream, before striding.
    pub frames_total: u64,
    /// Sampled frames that went through the analyzers.
    pub frames_processed: u64,
    pub elapsed_secs: f64,

    pub trajectory: TrajectoryResult,
    pub posture: PostureResult,
    pub events: EventResult,
    pub zones: ZoneResult,

    /// Present when stat records were supplied.
    pub score: Option<AggregatedScore>,
    pub stat_records: Vec<StatRecord>,

    #[serde(default)]
    pub warnings: Vec<RunWarning>,
}

impl AnalysisReport {
    pub fn to_json_pretty(&self) -> PitchlensResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> PitchlensResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
