//! Direction estimator configuration

use beamcast_core::{BeamcastError, BeamcastResult, Vec2};
use serde::{Deserialize, Serialize};

/// Direction estimator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionConfig {
    /// Body-relative "away" direction in image space
    pub forward: Vec2,
    /// Minimum combined wrist->fingertip magnitude for finger convergence
    pub finger_convergence_min_magnitude: f32,
    /// Map results into a horizontally mirrored frame
    pub mirror_output: bool,
    /// Frame width used when mirroring origins
    pub frame_width: f32,
    /// Keypoints scored below this are treated as missing
    pub min_keypoint_score: f32,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        DirectionConfig {
            forward: Vec2::RIGHT,
            finger_convergence_min_magnitude: 10.0,
            mirror_output: false,
            frame_width: 640.0,
            min_keypoint_score: 0.0,
        }
    }
}

impl DirectionConfig {
    /// Output in the coordinates of a mirrored preview of the given width
    pub fn mirrored(frame_width: f32) -> Self {
        DirectionConfig {
            mirror_output: true,
            frame_width,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> BeamcastResult<()> {
        if !self.forward.is_finite() || self.forward.try_normalize().is_none() {
            return Err(BeamcastError::invalid_config(
                "direction.forward",
                "must be a non-zero finite vector",
            ));
        }
        let min = self.finger_convergence_min_magnitude;
        if !min.is_finite() || min < 0.0 {
            return Err(BeamcastError::invalid_config(
                "direction.finger_convergence_min_magnitude",
                "must be non-negative",
            ));
        }
        if self.mirror_output && !(self.frame_width.is_finite() && self.frame_width > 0.0) {
            return Err(BeamcastError::invalid_config(
                "direction.frame_width",
                "must be positive when mirroring",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_keypoint_score) {
            return Err(BeamcastError::invalid_config(
                "direction.min_keypoint_score",
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}
