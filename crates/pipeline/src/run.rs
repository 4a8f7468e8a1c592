//! The per-run frame loop.
//!
//! One run is strictly sequential: decode a frame, feed it to every
//! analyzer, report progress, check for cancellation, repeat. The frame
//! source is released on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use pitchlens_analysis_model::stats::AggregatedScore;
use pitchlens_common::clock::StrideSampler;
use pitchlens_common::error::{PitchlensError, PitchlensResult};
use pitchlens_frame_source::{open_source, Frame, FrameSource};
use pitchlens_processing_core::{
    EventClassifier, MotionDetector, PoseAdapter, PoseEstimator, PostureAnalyzer,
    StatAggregator, TrajectoryAnalyzer, ZoneClassifier,
};

use crate::job::AnalysisJob;
use crate::report::{AnalysisReport, RunWarning};

/// Progress callback, invoked after every processed frame.
pub type ProgressCallback = Box<dyn Fn(AnalysisProgress) + Send>;

/// Progress of a running analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisProgress {
    /// Sampled frames processed so far.
    pub processed: u64,
    /// Expected sampled frames; 0 when the source cannot tell.
    pub total: u64,
}

impl AnalysisProgress {
    /// Completion in `[0, 1]`, if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        (self.total > 0).then(|| (self.processed as f64 / self.total as f64).min(1.0))
    }
}

/// Optional hooks for a run.
#[derive(Default)]
pub struct RunControl {
    pub progress: Option<ProgressCallback>,
    /// Checked between frames; setting it aborts the run with `Cancelled`.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RunControl {
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Releases the wrapped source when dropped.
struct SourceGuard {
    source: Box<dyn FrameSource>,
}

impl Deref for SourceGuard {
    type Target = dyn FrameSource;

    fn deref(&self) -> &Self::Target {
        self.source.as_ref()
    }
}

impl DerefMut for SourceGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.source.as_mut()
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.source.release();
    }
}

/// Per-frame analyzers of one run.
struct FrameAnalyzers {
    motion: MotionDetector,
    pose: PoseAdapter,
    trajectory: TrajectoryAnalyzer,
    posture: PostureAnalyzer,
    events: EventClassifier,
    zones: ZoneClassifier,
    pose_frames: u64,
}

impl FrameAnalyzers {
    fn new(job: &AnalysisJob, estimator: Box<dyn PoseEstimator>) -> PitchlensResult<Self> {
        Ok(Self {
            motion: MotionDetector::new(job.motion),
            pose: PoseAdapter::new(estimator)?.with_min_visibility(job.min_visibility),
            trajectory: TrajectoryAnalyzer::new(),
            posture: PostureAnalyzer::new(job.body_side),
            events: EventClassifier::new(job.events),
            zones: ZoneClassifier::new(job.events.tracked_joint),
            pose_frames: 0,
        })
    }

    fn process(&mut self, frame: &Frame) {
        if let Some(centroid) = self.motion.detect_frame(frame) {
            self.trajectory.push(&centroid);
        }

        if let Some(snapshot) = self.pose.snapshot(frame) {
            self.pose_frames += 1;
            self.posture.observe(&snapshot);
            self.events.observe(&snapshot);
            self.zones.observe(&snapshot);
        }
    }
}

/// Open the job's video and analyze it.
///
/// The video is opened before the pose estimator is initialized, so an
/// unreadable input fails without running any analyzer.
pub fn run_analysis(
    job: &AnalysisJob,
    estimator: Box<dyn PoseEstimator>,
    control: RunControl,
) -> PitchlensResult<AnalysisReport> {
    job.validate()?;
    let source = open_source(&job.video, job.stride, job.fps_hint)?;
    analyze_source(job, source, estimator, control)
}

/// Analyze an already-open frame source.
///
/// The source is released before this returns, whatever the outcome.
pub fn analyze_source(
    job: &AnalysisJob,
    source: Box<dyn FrameSource>,
    estimator: Box<dyn PoseEstimator>,
    control: RunControl,
) -> PitchlensResult<AnalysisReport> {
    let mut source = SourceGuard { source };
    let started_at = Utc::now();
    let clock = Instant::now();

    let stride = source.stride();
    let frames_total = source.total_frames();
    let total = StrideSampler::new(stride as usize)?.expected_samples(frames_total);

    tracing::info!(
        video = %job.video.display(),
        source = source.name(),
        stride,
        frames_total,
        position = %job.position,
        "Starting analysis"
    );

    let mut analyzers = FrameAnalyzers::new(job, estimator)?;
    let mut processed = 0u64;

    loop {
        if control.is_cancelled() {
            source.release();
            tracing::info!(processed, "Analysis cancelled");
            return Err(PitchlensError::Cancelled { processed });
        }

        let Some(frame) = source.next_frame()? else {
            break;
        };
        analyzers.process(&frame);
        processed += 1;

        if let Some(cb) = &control.progress {
            cb(AnalysisProgress { processed, total });
        }
    }

    source.release();
    analyzers.pose.dispose();

    let score = aggregate_records(job)?;
    let FrameAnalyzers {
        trajectory,
        posture,
        events,
        zones,
        pose_frames,
        ..
    } = analyzers;

    let trajectory = trajectory.finish();
    let mut warnings = Vec::new();
    if trajectory.points.is_empty() {
        warnings.push(RunWarning::NoCentroidsDetected);
    }
    if pose_frames == 0 {
        warnings.push(RunWarning::NoLandmarkFrames);
    }
    for warning in &warnings {
        tracing::warn!(%warning, "Run finished without signal");
    }

    let report = AnalysisReport {
        video: job.video.clone(),
        source: source.name().to_string(),
        started_at,
        position: job.position,
        stride,
        frames_total,
        frames_processed: processed,
        elapsed_secs: clock.elapsed().as_secs_f64(),
        trajectory,
        posture: posture.finish(),
        events: events.finish(),
        zones: zones.finish(),
        score,
        stat_records: job.stat_records.clone(),
        warnings,
    };

    tracing::info!(
        frames_processed = report.frames_processed,
        elapsed_secs = report.elapsed_secs,
        curve_class = report.trajectory.curve_class.as_str(),
        events = report.events.events.len(),
        "Analysis complete"
    );

    Ok(report)
}

fn aggregate_records(job: &AnalysisJob) -> PitchlensResult<Option<AggregatedScore>> {
    if job.stat_records.is_empty() {
        return Ok(None);
    }
    let score = StatAggregator::for_position(job.position).aggregate(&job.stat_records)?;
    Ok(Some(score))
}
