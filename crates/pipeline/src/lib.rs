//! PitchLens Pipeline
//!
//! Runs one analysis end to end: opens the frame source, drives the
//! processing-core analyzers frame by frame, aggregates stat records, and
//! returns an [`AnalysisReport`].

pub mod job;
pub mod landmarks;
pub mod records;
pub mod report;
pub mod run;

pub use job::AnalysisJob;
pub use landmarks::ReplayPoseEstimator;
pub use records::{load_stat_record, load_stat_records};
pub use report::{AnalysisReport, RunWarning};
pub use run::{analyze_source, run_analysis, AnalysisProgress, ProgressCallback, RunControl};
