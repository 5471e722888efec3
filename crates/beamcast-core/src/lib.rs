//! BEAMCAST Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the gesture pipeline:
//! - Keypoint vocabulary and hand detections
//! - 2D/3D vector math with zero-safe normalization
//! - Frame time primitives
//! - Error types

pub mod error;
pub mod geometry;
pub mod hand;
pub mod keypoint;
pub mod time;

pub use error::*;
pub use geometry::*;
pub use hand::*;
pub use keypoint::*;
pub use time::*;
