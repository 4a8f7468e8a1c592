//! On-object / off-object movement classification.
//!
//! Tracks one joint across frames and turns its frame-to-frame displacement
//! into [`MovementEvent`]s according to an [`EventPolicy`].

use pitchlens_analysis_model::event::{EventPolicy, EventResult, MovementEvent, MovementKind};
use pitchlens_analysis_model::geometry::Point2D;
use pitchlens_analysis_model::pose::{JointName, PoseSnapshot};

/// Normalized displacement above which the subject has left the ball.
pub const DEFAULT_DISPLACEMENT_THRESHOLD: f64 = 0.05;

/// Configuration for [`EventClassifier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventConfig {
    pub threshold: f64,
    pub policy: EventPolicy,
    pub tracked_joint: JointName,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DISPLACEMENT_THRESHOLD,
            policy: EventPolicy::OneWay,
            tracked_joint: JointName::LeftHip,
        }
    }
}

/// Event state machine.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    config: EventConfig,
    previous: Option<Point2D>,
    state: Option<MovementKind>,
    events: Vec<MovementEvent>,
}

impl EventClassifier {
    pub fn new(config: EventConfig) -> Self {
        Self {
            config,
            previous: None,
            state: None,
            events: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EventConfig::default())
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Classify the tracked joint of a snapshot.
    pub fn observe(&mut self, snapshot: &PoseSnapshot) -> Option<MovementEvent> {
        let position = snapshot.joint(self.config.tracked_joint);
        self.observe_position(snapshot.frame_index, position)
    }

    /// Classify a tracked position. `None` or non-finite positions are gaps:
    /// no event, and the previous position is kept.
    pub fn observe_position(
        &mut self,
        frame_index: u64,
        position: Option<Point2D>,
    ) -> Option<MovementEvent> {
        let current = position.filter(Point2D::is_finite)?;

        let kind = match self.previous {
            None => Some(MovementKind::OnObject),
            Some(prev) => {
                let moved = prev.distance_to(&current) > self.config.threshold;
                self.transition(moved)
            }
        };
        self.previous = Some(current);

        let kind = kind?;
        self.state = Some(kind);
        let event = MovementEvent { frame_index, kind };
        self.events.push(event);
        Some(event)
    }

    fn transition(&self, moved: bool) -> Option<MovementKind> {
        match self.config.policy {
            EventPolicy::OneWay => moved.then_some(MovementKind::OffObject),
            EventPolicy::Toggle => match (self.state, moved) {
                (Some(MovementKind::OnObject), true) => Some(MovementKind::OffObject),
                (Some(MovementKind::OffObject), false) => Some(MovementKind::OnObject),
                _ => None,
            },
        }
    }

    pub fn events(&self) -> &[MovementEvent] {
        &self.events
    }

    pub fn finish(self) -> EventResult {
        EventResult::from_events(self.events)
    }
}
