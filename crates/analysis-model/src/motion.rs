//! Object detection and trajectory results.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Center of the detected bright region in one frame (pixel space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub frame_index: u64,
    pub position: Point2D,
    /// Area of the selected region in pixels.
    pub area: usize,
}

/// Coarse classification of the object path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveClass {
    /// Fast, mostly direct travel.
    Straight,
    /// Slow travel, likely bending.
    SlowCurve,
    /// Fewer than two detections; nothing to classify.
    InsufficientData,
}

impl CurveClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::SlowCurve => "slow curve",
            Self::InsufficientData => "insufficient data",
        }
    }
}

/// Aggregated object trajectory for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    /// Detected positions ordered by frame index.
    pub points: Vec<Point2D>,
    /// Frame index of each point.
    pub frame_indices: Vec<u64>,
    /// Displacement between consecutive points (pixels per analysed frame).
    pub speeds: Vec<f64>,
    /// Mean of `speeds`; `None` when there is insufficient data.
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub total_distance: f64,
    pub curve_class: CurveClass,
}

impl TrajectoryResult {
    /// An empty result for runs without enough detections.
    pub fn insufficient(points: Vec<Point2D>, frame_indices: Vec<u64>) -> Self {
        Self {
            points,
            frame_indices,
            speeds: Vec::new(),
            average_speed: None,
            max_speed: None,
            total_distance: 0.0,
            curve_class: CurveClass::InsufficientData,
        }
    }

    pub fn has_data(&self) -> bool {
        self.curve_class != CurveClass::InsufficientData
    }
}
