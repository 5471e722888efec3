//! BEAMCAST Pose - Hand roles and pose scoring
//!
//! Pure functions over a labeled hand pair:
//! - Left/right role resolution for an unlabeled two-hand detection
//! - Energy sphere center and energy funnel geometry
//! - Finger spread measurement
//! - Charging pose score (six criteria) and firing pose score (four criteria)
//!
//! Missing keypoints never fail a call; they fail the criterion that needs them.

pub mod charging;
pub mod config;
pub mod firing;
pub mod roles;
pub mod score;
pub mod sphere;
pub mod spread;

pub use charging::*;
pub use config::*;
pub use firing::*;
pub use roles::*;
pub use score::*;
pub use sphere::*;
pub use spread::*;
