//! PitchLens Processing Core
//!
//! Per-frame analyzers and end-of-run aggregation:
//! - **Motion:** Locate the bright object and build its trajectory
//! - **Pose:** Own the pose estimator and normalize its landmarks
//! - **Posture / Events / Zones:** Derive telemetry from pose snapshots
//! - **Aggregate:** Merge external stat tables into a weighted score
//!
//! This crate is pure computation: frames and records in, results out.
//! Decoding and file access live in `pitchlens-frame-source` and the pipeline.

pub mod aggregate;
pub mod events;
pub mod motion;
pub mod pose;
pub mod posture;
pub mod trajectory;
pub mod zones;

pub use aggregate::StatAggregator;
pub use events::{EventClassifier, EventConfig};
pub use motion::{MotionConfig, MotionDetector};
pub use pose::{NullPoseEstimator, PoseAdapter, PoseEstimator};
pub use posture::PostureAnalyzer;
pub use trajectory::TrajectoryAnalyzer;
pub use zones::ZoneClassifier;
