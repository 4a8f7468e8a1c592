//! Pose-estimation boundary.
//!
//! A [`PoseEstimator`] is whatever produces raw landmarks for a frame (a
//! model runtime, a replay file, ...). [`PoseAdapter`] owns one estimator
//! for the duration of a run and turns its output into [`PoseSnapshot`]s.

use pitchlens_analysis_model::geometry::Point2D;
use pitchlens_analysis_model::pose::{JointName, Landmark, PoseSnapshot};
use pitchlens_common::error::PitchlensResult;
use pitchlens_frame_source::Frame;

/// External pose-estimation capability.
pub trait PoseEstimator: Send {
    /// Acquire model resources. Called once before the first frame.
    fn init(&mut self) -> PitchlensResult<()> {
        Ok(())
    }

    /// Landmarks found in `frame`; empty when no person was found.
    fn estimate(&mut self, frame: &Frame) -> PitchlensResult<Vec<Landmark>>;

    /// Release model resources. Called at most once.
    fn shutdown(&mut self) {}

    fn name(&self) -> &str;
}

/// Estimator used when no pose source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPoseEstimator;

impl PoseEstimator for NullPoseEstimator {
    fn estimate(&mut self, _frame: &Frame) -> PitchlensResult<Vec<Landmark>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Per-run owner of a pose estimator.
pub struct PoseAdapter {
    estimator: Box<dyn PoseEstimator>,
    min_visibility: f64,
    disposed: bool,
}

impl PoseAdapter {
    /// Initialize `estimator` and take ownership of it.
    pub fn new(mut estimator: Box<dyn PoseEstimator>) -> PitchlensResult<Self> {
        estimator.init()?;
        tracing::debug!(estimator = estimator.name(), "Pose estimator initialized");
        Ok(Self {
            estimator,
            min_visibility: 0.0,
            disposed: false,
        })
    }

    /// Drop landmarks whose reported visibility is below `min_visibility`.
    pub fn with_min_visibility(mut self, min_visibility: f64) -> Self {
        self.min_visibility = min_visibility;
        self
    }

    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    /// Joints recognised in `frame`, or `None` for a gap.
    ///
    /// Estimator failures are logged and treated as gaps so one bad frame
    /// does not end the run.
    pub fn snapshot(&mut self, frame: &Frame) -> Option<PoseSnapshot> {
        if self.disposed {
            return None;
        }
        match self.estimator.estimate(frame) {
            Ok(landmarks) => to_snapshot(frame.index, &landmarks, self.min_visibility),
            Err(e) => {
                tracing::warn!(
                    frame = frame.index,
                    estimator = self.estimator.name(),
                    error = %e,
                    "Pose estimation failed; treating frame as a gap"
                );
                None
            }
        }
    }

    /// Shut the estimator down. Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.estimator.shutdown();
            tracing::debug!(estimator = self.estimator.name(), "Pose estimator disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for PoseAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Convert raw landmarks into a snapshot.
///
/// Unknown names, non-finite coordinates and low-visibility landmarks are
/// dropped. Returns `None` when nothing usable remains.
pub fn to_snapshot(
    frame_index: u64,
    landmarks: &[Landmark],
    min_visibility: f64,
) -> Option<PoseSnapshot> {
    let mut snapshot = PoseSnapshot::new(frame_index);
    for landmark in landmarks {
        let Ok(joint) = landmark.name.parse::<JointName>() else {
            continue;
        };
        let point = Point2D::new(landmark.x, landmark.y);
        if !point.is_finite() {
            continue;
        }
        if landmark.visibility.is_some_and(|v| v < min_visibility) {
            continue;
        }
        snapshot.joints.insert(joint, point);
    }

    if snapshot.is_empty() {
        None
    } else {
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use pitchlens_common::error::PitchlensError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedEstimator {
        shutdowns: Arc<AtomicUsize>,
        fail_on: Option<u64>,
    }

    impl PoseEstimator for ScriptedEstimator {
        fn estimate(&mut self, frame: &Frame) -> PitchlensResult<Vec<Landmark>> {
            if self.fail_on == Some(frame.index) {
                return Err(PitchlensError::pose("model crashed"));
            }
            Ok(vec![
                Landmark::new("left_hip", 0.4, 0.6),
                Landmark::new("Left Shoulder", 0.45, 0.3),
                Landmark::new("left_pinky", 0.1, 0.1),
            ])
        }

        fn shutdown(&mut self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn frame(index: u64) -> Frame {
        Frame::new(index, 0.0, RgbImage::new(2, 2))
    }

    #[test]
    fn test_snapshot_keeps_known_joints() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let mut adapter = PoseAdapter::new(Box::new(ScriptedEstimator {
            shutdowns,
            fail_on: None,
        }))
        .unwrap();

        let snapshot = adapter.snapshot(&frame(3)).unwrap();
        assert_eq!(snapshot.frame_index, 3);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.joint(JointName::LeftShoulder).is_some());
    }

    #[test]
    fn test_estimator_error_is_a_gap() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let mut adapter = PoseAdapter::new(Box::new(ScriptedEstimator {
            shutdowns,
            fail_on: Some(1),
        }))
        .unwrap();

        assert!(adapter.snapshot(&frame(0)).is_some());
        assert!(adapter.snapshot(&frame(1)).is_none());
        assert!(adapter.snapshot(&frame(2)).is_some());
    }

    #[test]
    fn test_dispose_runs_once_including_drop() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        {
            let mut adapter = PoseAdapter::new(Box::new(ScriptedEstimator {
                shutdowns: Arc::clone(&shutdowns),
                fail_on: None,
            }))
            .unwrap();
            adapter.dispose();
            adapter.dispose();
            assert!(adapter.is_disposed());
            assert!(adapter.snapshot(&frame(0)).is_none());
        }
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_to_snapshot_filters_bad_landmarks() {
        let landmarks = vec![
            Landmark::new("left_hip", f64::NAN, 0.5),
            Landmark::new("left_knee", 0.4, 0.8).with_visibility(0.2),
            Landmark::new("left_ankle", 0.4, 0.95).with_visibility(0.9),
        ];
        let snapshot = to_snapshot(5, &landmarks, 0.5).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.joint(JointName::LeftAnkle).is_some());

        assert!(to_snapshot(5, &landmarks[..1], 0.0).is_none());
    }

    #[test]
    fn test_null_estimator_yields_gaps() {
        let mut adapter = PoseAdapter::new(Box::new(NullPoseEstimator)).unwrap();
        assert_eq!(adapter.estimator_name(), "none");
        assert!(adapter.snapshot(&frame(0)).is_none());
    }
}
