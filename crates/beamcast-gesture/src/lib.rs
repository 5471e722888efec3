//! BEAMCAST Gesture - Charge-and-fire state machine
//!
//! This crate implements the gesture core:
//! - Phases: idle -> positioning -> charging -> firing, cyclic
//! - `step`: a pure reducer over an explicit `DetectorState`
//! - Transition events returned as data instead of callbacks
//! - `GestureDetector`: owns the state and queues events for the caller
//! - Rolling hand position history

pub mod config;
pub mod detector;
pub mod history;
pub mod machine;
pub mod phase;
pub mod state;

pub use config::*;
pub use detector::*;
pub use history::*;
pub use machine::*;
pub use phase::*;
pub use state::*;
