//! Joint-angle and balance telemetry.

use serde::{Deserialize, Serialize};

/// Shoulder and knee angles for one frame, in degrees within `[0, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSample {
    pub frame_index: u64,
    pub shoulder_angle: f64,
    pub knee_angle: f64,
}

/// Stability metric for one frame: `|shoulder_angle - knee_angle|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSample {
    pub frame_index: u64,
    pub balance_score: f64,
}

impl BalanceSample {
    pub fn from_angles(sample: &JointAngleSample) -> Self {
        Self {
            frame_index: sample.frame_index,
            balance_score: (sample.shoulder_angle - sample.knee_angle).abs(),
        }
    }
}

/// Posture telemetry accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostureResult {
    pub angles: Vec<JointAngleSample>,
    pub balance: Vec<BalanceSample>,
    pub mean_shoulder_angle: Option<f64>,
    pub mean_knee_angle: Option<f64>,
    pub mean_balance: Option<f64>,
}

impl PostureResult {
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_balance_from_angles_is_absolute() {
        let sample = JointAngleSample {
            frame_index: 2,
            shoulder_angle: 40.0,
            knee_angle: 170.0,
        };
        let balance = BalanceSample::from_angles(&sample);
        assert_eq!(balance.frame_index, 2);
        assert!((balance.balance_score - 130.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_balance_is_non_negative(shoulder in 0.0f64..=180.0, knee in 0.0f64..=180.0) {
            let sample = JointAngleSample { frame_index: 0, shoulder_angle: shoulder, knee_angle: knee };
            let balance = BalanceSample::from_angles(&sample);
            prop_assert!(balance.balance_score >= 0.0);
            prop_assert!(balance.balance_score <= 180.0);
        }
    }
}
