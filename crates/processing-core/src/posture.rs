//! Joint angles and balance from pose snapshots.

use pitchlens_analysis_model::geometry::Point2D;
use pitchlens_analysis_model::pose::{BodySide, JointName, PoseSnapshot};
use pitchlens_analysis_model::posture::{BalanceSample, JointAngleSample, PostureResult};

/// Angle at vertex `b` formed by `a` and `c`, in degrees within `[0, 180]`.
///
/// Returns `None` if any coordinate is not finite.
pub fn angle(a: Point2D, b: Point2D, c: Point2D) -> Option<f64> {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    Some(degrees.clamp(0.0, 180.0))
}

/// Accumulates posture telemetry over a run.
#[derive(Debug, Clone, Default)]
pub struct PostureAnalyzer {
    side: BodySide,
    angles: Vec<JointAngleSample>,
    balance: Vec<BalanceSample>,
}

impl PostureAnalyzer {
    pub fn new(side: BodySide) -> Self {
        Self {
            side,
            ..Self::default()
        }
    }

    pub fn side(&self) -> BodySide {
        self.side
    }

    /// Record one frame. Returns the sample, or `None` if a required joint
    /// is missing.
    pub fn observe(&mut self, snapshot: &PoseSnapshot) -> Option<JointAngleSample> {
        let sample = measure(snapshot, self.side)?;
        self.angles.push(sample);
        self.balance.push(BalanceSample::from_angles(&sample));
        Some(sample)
    }

    pub fn samples(&self) -> usize {
        self.angles.len()
    }

    pub fn finish(self) -> PostureResult {
        let mean_shoulder_angle = mean(self.angles.iter().map(|s| s.shoulder_angle));
        let mean_knee_angle = mean(self.angles.iter().map(|s| s.knee_angle));
        let mean_balance = mean(self.balance.iter().map(|s| s.balance_score));
        PostureResult {
            angles: self.angles,
            balance: self.balance,
            mean_shoulder_angle,
            mean_knee_angle,
            mean_balance,
        }
    }
}

/// Shoulder and knee angles for one snapshot.
///
/// The shoulder angle is measured at the left shoulder between the hip and
/// the right shoulder; the knee angle at the knee between hip and ankle.
pub fn measure(snapshot: &PoseSnapshot, side: BodySide) -> Option<JointAngleSample> {
    let hip = snapshot.joint(side.hip())?;
    let knee = snapshot.joint(side.knee())?;
    let ankle = snapshot.joint(side.ankle())?;
    let left_shoulder = snapshot.joint(JointName::LeftShoulder)?;
    let right_shoulder = snapshot.joint(JointName::RightShoulder)?;

    Some(JointAngleSample {
        frame_index: snapshot.frame_index,
        shoulder_angle: angle(hip, left_shoulder, right_shoulder)?,
        knee_angle: angle(hip, knee, ankle)?,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
