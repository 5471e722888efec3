//! BEAMCAST Test Harness - Gesture validation
//!
//! This crate provides:
//! - Synthetic charging, firing and neutral hand poses
//! - Tracking jitter and dropout simulation
//! - Scripted play sessions driving a `GestureDetector`
//! - End-to-end scenario tests

pub mod fixtures;
pub mod jitter;
pub mod scenarios;
pub mod session;

pub use fixtures::*;
pub use jitter::*;
pub use scenarios::*;
pub use session::*;
