//! BEAMCAST Aim - Beam direction estimation
//!
//! Two independent estimators over a labeled hand pair:
//! - Lock-in: computed once when a charge is released, trying finger
//!   convergence, then palm facing, then a perpendicular-to-wrists floor
//! - Continuous: recomputed every firing frame from wrists to fingertips
//!
//! Neither estimator produces NaN; degenerate geometry yields a default
//! unit vector.

pub mod config;
pub mod direction;
pub mod estimate;

pub use config::*;
pub use direction::*;
pub use estimate::*;
