//! PitchLens Common Utilities
//!
//! Shared infrastructure for all PitchLens crates:
//! - Error types and result aliases
//! - Frame clock and stride sampling
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
