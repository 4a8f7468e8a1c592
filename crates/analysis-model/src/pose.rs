//! Pose landmarks and per-frame joint snapshots.
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! frame, matching what common pose-estimation tools emit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Anatomical joints the analyzers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointName {
    pub const ALL: [JointName; 13] = [
        JointName::Nose,
        JointName::LeftShoulder,
        JointName::RightShoulder,
        JointName::LeftElbow,
        JointName::RightElbow,
        JointName::LeftWrist,
        JointName::RightWrist,
        JointName::LeftHip,
        JointName::RightHip,
        JointName::LeftKnee,
        JointName::RightKnee,
        JointName::LeftAnkle,
        JointName::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A landmark name that does not map to any [`JointName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown joint name: {0:?}")]
pub struct UnknownJoint(pub String);

impl FromStr for JointName {
    type Err = UnknownJoint;

    /// Accepts `left_shoulder`, `Left Shoulder`, `LEFT-SHOULDER`, and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' | '.' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        JointName::ALL
            .iter()
            .copied()
            .find(|joint| joint.as_str() == key)
            .ok_or_else(|| UnknownJoint(s.to_string()))
    }
}

/// Which side of the body posture angles are measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    #[default]
    Left,
    Right,
}

impl BodySide {
    pub fn hip(&self) -> JointName {
        match self {
            Self::Left => JointName::LeftHip,
            Self::Right => JointName::RightHip,
        }
    }

    pub fn knee(&self) -> JointName {
        match self {
            Self::Left => JointName::LeftKnee,
            Self::Right => JointName::RightKnee,
        }
    }

    pub fn ankle(&self) -> JointName {
        match self {
            Self::Left => JointName::LeftAnkle,
            Self::Right => JointName::RightAnkle,
        }
    }
}

impl FromStr for BodySide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(format!("unknown body side {other:?} (expected left or right)")),
        }
    }
}

/// One raw landmark as produced by a pose-estimation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Estimator-specific landmark name (e.g., "left_shoulder").
    pub name: String,
    /// Normalized X coordinate.
    pub x: f64,
    /// Normalized Y coordinate.
    pub y: f64,
    /// Detection confidence in [0, 1], when the estimator reports one.
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Joint positions recognised in a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub frame_index: u64,
    pub joints: BTreeMap<JointName, Point2D>,
}

impl PoseSnapshot {
    pub fn new(frame_index: u64) -> Self {
        Self {
            frame_index,
            joints: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with_joint(mut self, joint: JointName, x: f64, y: f64) -> Self {
        self.joints.insert(joint, Point2D::new(x, y));
        self
    }

    pub fn joint(&self, joint: JointName) -> Option<Point2D> {
        self.joints.get(&joint).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_name_parsing_variants() {
        assert_eq!(
            "left_shoulder".parse::<JointName>(),
            Ok(JointName::LeftShoulder)
        );
        assert_eq!(
            "Left Shoulder".parse::<JointName>(),
            Ok(JointName::LeftShoulder)
        );
        assert_eq!("RIGHT-ANKLE".parse::<JointName>(), Ok(JointName::RightAnkle));
        assert!("left_pinky".parse::<JointName>().is_err());
    }

    #[test]
    fn test_joint_name_serializes_snake_case() {
        let json = serde_json::to_string(&JointName::RightKnee).unwrap();
        assert_eq!(json, "\"right_knee\"");
    }

    #[test]
    fn test_snapshot_joint_lookup() {
        let snapshot = PoseSnapshot::new(4).with_joint(JointName::LeftHip, 0.4, 0.6);
        assert_eq!(
            snapshot.joint(JointName::LeftHip),
            Some(Point2D::new(0.4, 0.6))
        );
        assert_eq!(snapshot.joint(JointName::RightHip), None);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_body_side_joints() {
        assert_eq!(BodySide::Right.knee(), JointName::RightKnee);
        assert_eq!("left".parse::<BodySide>(), Ok(BodySide::Left));
    }

    #[test]
    fn test_landmark_visibility_is_optional() {
        let raw = r#"{"name":"nose","x":0.5,"y":0.1}"#;
        let landmark: Landmark = serde_json::from_str(raw).unwrap();
        assert_eq!(landmark.visibility, None);
    }
}
