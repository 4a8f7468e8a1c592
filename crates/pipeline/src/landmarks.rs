//! Replay of landmarks produced offline by an external pose tool.
//!
//! The file is JSON Lines, one object per frame:
//!
//! ```text
//! {"frame": 12, "landmarks": [{"name": "left_hip", "x": 0.41, "y": 0.62, "visibility": 0.98}]}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Frames missing from
//! the file are gaps.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pitchlens_analysis_model::pose::Landmark;
use pitchlens_common::error::{PitchlensError, PitchlensResult};
use pitchlens_frame_source::Frame;
use pitchlens_processing_core::pose::PoseEstimator;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LandmarkLine {
    frame: u64,
    #[serde(default)]
    landmarks: Vec<Landmark>,
}

/// Pose estimator backed by a landmark file.
#[derive(Debug)]
pub struct ReplayPoseEstimator {
    path: Option<PathBuf>,
    frames: BTreeMap<u64, Vec<Landmark>>,
}

impl ReplayPoseEstimator {
    /// Estimator that loads `path` on `init`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            frames: BTreeMap::new(),
        }
    }

    /// Estimator over already-parsed JSONL text.
    pub fn from_jsonl(text: &str) -> PitchlensResult<Self> {
        Ok(Self {
            path: None,
            frames: parse_landmark_lines(text, "<memory>")?,
        })
    }

    /// Number of frames with landmarks still pending.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl PoseEstimator for ReplayPoseEstimator {
    fn init(&mut self) -> PitchlensResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.frames = load_landmark_file(path)?;
        tracing::info!(
            path = %path.display(),
            frames = self.frame_count(),
            "Loaded landmark replay"
        );
        Ok(())
    }

    fn estimate(&mut self, frame: &Frame) -> PitchlensResult<Vec<Landmark>> {
        // Frames arrive in increasing order, so consumed entries are never needed again.
        Ok(self.frames.remove(&frame.index).unwrap_or_default())
    }

    fn shutdown(&mut self) {
        if self.frame_count() > 0 {
            tracing::debug!(
                frames = self.frame_count(),
                "Landmark frames never reached by the run"
            );
        }
        self.frames.clear();
    }

    fn name(&self) -> &str {
        "replay"
    }
}

fn load_landmark_file(path: &Path) -> PitchlensResult<BTreeMap<u64, Vec<Landmark>>> {
    if !path.exists() {
        return Err(PitchlensError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    parse_landmark_lines(&text, &path.display().to_string())
}

/// Parse JSONL landmark text. Repeated frames keep the last entry.
pub fn parse_landmark_lines(
    text: &str,
    origin: &str,
) -> PitchlensResult<BTreeMap<u64, Vec<Landmark>>> {
    let mut frames = BTreeMap::new();
    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: LandmarkLine = serde_json::from_str(trimmed).map_err(|e| {
            PitchlensError::pose(format!("{origin}:{}: invalid landmark line: {e}", line_no + 1))
        })?;
        frames.insert(parsed.frame, parsed.landmarks);
    }
    Ok(frames)
}
