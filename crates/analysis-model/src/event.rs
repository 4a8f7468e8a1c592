//! On-object / off-object movement events.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of classified movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// The subject is on the ball.
    OnObject,
    /// The subject moved away from the ball.
    OffObject,
}

/// A classified movement at a specific frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    pub frame_index: u64,
    pub kind: MovementKind,
}

/// State machine used to turn displacements into events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPolicy {
    /// First valid frame is on-object; later large moves are flagged
    /// off-object and nothing ever returns to on-object.
    #[default]
    OneWay,
    /// Emits an event on each transition between on- and off-object.
    Toggle,
}

impl FromStr for EventPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "one_way" | "oneway" => Ok(Self::OneWay),
            "toggle" => Ok(Self::Toggle),
            other => Err(format!(
                "unknown event policy {other:?} (expected one-way or toggle)"
            )),
        }
    }
}

/// All movement events of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub events: Vec<MovementEvent>,
    pub on_object_count: usize,
    pub off_object_count: usize,
}

impl EventResult {
    pub fn from_events(events: Vec<MovementEvent>) -> Self {
        let on_object_count = events
            .iter()
            .filter(|e| e.kind == MovementKind::OnObject)
            .count();
        let off_object_count = events.len() - on_object_count;
        Self {
            events,
            on_object_count,
            off_object_count,
        }
    }
}
