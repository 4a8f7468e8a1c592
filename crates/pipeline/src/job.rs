//! Analysis job description.

use std::path::PathBuf;

use pitchlens_analysis_model::event::EventPolicy;
use pitchlens_analysis_model::pose::{BodySide, JointName};
use pitchlens_analysis_model::stats::{PositionCategory, StatRecord};
use pitchlens_common::config::AnalysisDefaults;
use pitchlens_common::error::{PitchlensError, PitchlensResult};
use pitchlens_processing_core::events::EventConfig;
use pitchlens_processing_core::motion::MotionConfig;

/// Everything needed to run one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    /// Video file or image-sequence directory.
    pub video: PathBuf,

    /// Playing position used to weight stat records.
    pub position: PositionCategory,

    /// Frame sampling interval (>= 1).
    pub stride: usize,

    /// Frame rate for image sequences, which carry none of their own.
    pub fps_hint: Option<f64>,

    pub motion: MotionConfig,

    pub events: EventConfig,

    /// Body side for hip/knee/ankle angles.
    pub body_side: BodySide,

    /// Landmarks below this visibility are discarded.
    pub min_visibility: f64,

    /// External stat tables; the first is the primary source.
    pub stat_records: Vec<StatRecord>,
}

impl AnalysisJob {
    /// Create a job with default parameters.
    ///
    /// The position is parsed here, before anything is opened, so an unknown
    /// category fails the run up front.
    pub fn new(video: impl Into<PathBuf>, position: &str) -> PitchlensResult<Self> {
        Ok(Self {
            video: video.into(),
            position: position.parse()?,
            stride: 1,
            fps_hint: None,
            motion: MotionConfig::default(),
            events: EventConfig::default(),
            body_side: BodySide::default(),
            min_visibility: 0.0,
            stat_records: Vec::new(),
        })
    }

    /// Create a job whose parameters come from configured defaults.
    pub fn from_defaults(
        video: impl Into<PathBuf>,
        position: &str,
        defaults: &AnalysisDefaults,
    ) -> PitchlensResult<Self> {
        let mut job = Self::new(video, position)?;
        job.stride = defaults.stride;
        job.motion = MotionConfig {
            threshold: defaults.threshold,
            min_area: defaults.min_area,
        };
        job.events = EventConfig {
            threshold: defaults.event_threshold,
            policy: parse_policy(&defaults.event_policy)?,
            tracked_joint: parse_joint(&defaults.tracked_joint)?,
        };
        job.body_side = defaults
            .body_side
            .parse()
            .map_err(PitchlensError::config)?;
        job.min_visibility = defaults.min_visibility;
        Ok(job)
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_stat_records(mut self, records: Vec<StatRecord>) -> Self {
        self.stat_records = records;
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_events(mut self, events: EventConfig) -> Self {
        self.events = events;
        self
    }

    /// Check parameters that can be wrong without touching the input.
    pub fn validate(&self) -> PitchlensResult<()> {
        if self.stride == 0 {
            return Err(PitchlensError::config("stride must be at least 1"));
        }
        if !self.events.threshold.is_finite() || self.events.threshold < 0.0 {
            return Err(PitchlensError::config(format!(
                "event threshold must be a non-negative number, got {}",
                self.events.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(PitchlensError::config(format!(
                "min visibility must be within 0.0-1.0, got {}",
                self.min_visibility
            )));
        }
        Ok(())
    }
}

pub fn parse_policy(raw: &str) -> PitchlensResult<EventPolicy> {
    raw.parse().map_err(PitchlensError::config)
}

pub fn parse_joint(raw: &str) -> PitchlensResult<JointName> {
    raw.parse::<JointName>()
        .map_err(|e| PitchlensError::config(e.to_string()))
}
