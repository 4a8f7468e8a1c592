//! PitchLens Analysis Model
//!
//! Defines the data contracts shared by every stage of an analysis run:
//! - **Geometry:** 2D points in pixel or normalized space
//! - **Pose:** Named joints and per-frame landmark snapshots
//! - **Results:** Trajectory, posture, event, and zone outputs
//! - **Stats:** Per-source stat records, position weight profiles, composite scores
//!
//! Everything here is plain data. All types serialize with serde so a run
//! report can be handed to an external report assembler as JSON.

pub mod event;
pub mod geometry;
pub mod motion;
pub mod pose;
pub mod posture;
pub mod stats;
pub mod zone;

pub use event::*;
pub use geometry::*;
pub use motion::*;
pub use pose::*;
pub use posture::*;
pub use stats::*;
pub use zone::*;
