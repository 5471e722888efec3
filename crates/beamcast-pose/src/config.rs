//! Pose scoring thresholds
//!
//! Distances are in image pixels, angles in degrees.

use beamcast_core::{BeamcastError, BeamcastResult};
use serde::{Deserialize, Serialize};

/// Thresholds for the six charging criteria
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargingThresholds {
    /// Wrist-to-wrist distance range (inclusive)
    pub wrist_distance_min: f32,
    pub wrist_distance_max: f32,
    /// Angle between the wrists' vectors to the sphere center (inclusive)
    pub v_angle_min_deg: f32,
    pub v_angle_max_deg: f32,
    /// Max angle between wrist->index tip and wrist->sphere center
    pub palm_angle_max_deg: f32,
    /// Left thumb heading range (inclusive)
    pub left_thumb_min_deg: f32,
    pub left_thumb_max_deg: f32,
    /// Right thumb heading range (inclusive)
    pub right_thumb_min_deg: f32,
    pub right_thumb_max_deg: f32,
    /// Average per-hand fingertip chain length must exceed this
    pub spread_min_px: f32,
    /// Average spread intensity must exceed this
    pub spread_intensity_min: f32,
    /// Spread length that saturates the spread term
    pub spread_normalizer_px: f32,
    /// Average extension that saturates the extension term
    pub extension_normalizer_px: f32,
    /// Fingertip-to-center must stay below this multiple of wrist-to-center
    pub funnel_distance_ratio: f32,
    /// Max convergence angle per hand for a valid funnel
    pub funnel_angle_max_deg: f32,
    /// Mean convergence angle below which a funnel is excellent
    pub funnel_excellent_deg: f32,
    /// Mean convergence angle below which a funnel is good
    pub funnel_good_deg: f32,
    /// Satisfied criteria needed for a valid charging pose
    pub pass_threshold: u8,
}

impl Default for ChargingThresholds {
    fn default() -> Self {
        ChargingThresholds {
            wrist_distance_min: 30.0,
            wrist_distance_max: 120.0,
            v_angle_min_deg: 120.0,
            v_angle_max_deg: 180.0,
            palm_angle_max_deg: 45.0,
            left_thumb_min_deg: 90.0,
            left_thumb_max_deg: 150.0,
            right_thumb_min_deg: 30.0,
            right_thumb_max_deg: 90.0,
            spread_min_px: 100.0,
            spread_intensity_min: 0.7,
            spread_normalizer_px: 150.0,
            extension_normalizer_px: 80.0,
            funnel_distance_ratio: 1.2,
            funnel_angle_max_deg: 45.0,
            funnel_excellent_deg: 20.0,
            funnel_good_deg: 35.0,
            pass_threshold: 2,
        }
    }
}

/// Thresholds for the four firing criteria
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiringThresholds {
    /// Expected average tip-to-MCP distance of a curved finger
    pub curl_expected_px: f32,
    pub curl_tolerance_px: f32,
    /// Max vertical wrist offset of aligned hands (exclusive)
    pub aligned_max_vertical_px: f32,
    /// Wrist distance range of aligned hands (exclusive)
    pub aligned_distance_min: f32,
    pub aligned_distance_max: f32,
    /// Left thumb heading must lie strictly inside ±this
    pub left_thumb_max_abs_deg: f32,
    /// Right thumb heading magnitude must exceed this
    pub right_thumb_min_abs_deg: f32,
    /// Each fingertip-to-center distance must lie within this of the mean
    pub sphere_spread_tolerance_px: f32,
    /// Mean fingertip-to-center distance range (exclusive)
    pub sphere_radius_min: f32,
    pub sphere_radius_max: f32,
    /// Satisfied criteria needed for a valid firing pose
    pub pass_threshold: u8,
}

impl Default for FiringThresholds {
    fn default() -> Self {
        FiringThresholds {
            curl_expected_px: 40.0,
            curl_tolerance_px: 20.0,
            aligned_max_vertical_px: 30.0,
            aligned_distance_min: 80.0,
            aligned_distance_max: 200.0,
            left_thumb_max_abs_deg: 45.0,
            right_thumb_min_abs_deg: 135.0,
            sphere_spread_tolerance_px: 20.0,
            sphere_radius_min: 30.0,
            sphere_radius_max: 100.0,
            pass_threshold: 2,
        }
    }
}

/// Complete pose scoring configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    pub charging: ChargingThresholds,
    pub firing: FiringThresholds,
    /// Fraction the fingertip midpoint is pulled toward the wrist midpoint
    pub sphere_wrist_blend: f32,
    /// Keypoints scored below this are treated as missing (0 disables)
    pub min_keypoint_score: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseConfig {
    /// Standard thresholds
    pub fn new() -> Self {
        PoseConfig {
            charging: ChargingThresholds::default(),
            firing: FiringThresholds::default(),
            sphere_wrist_blend: 0.3,
            min_keypoint_score: 0.0,
        }
    }

    /// Ignore landmarks the producer is unsure about
    pub fn with_min_keypoint_score(mut self, min_score: f32) -> Self {
        self.min_keypoint_score = min_score;
        self
    }

    /// Check thresholds for internal consistency
    pub fn validate(&self) -> BeamcastResult<()> {
        let c = &self.charging;
        let f = &self.firing;

        ordered("charging.wrist_distance", c.wrist_distance_min, c.wrist_distance_max)?;
        ordered("charging.v_angle", c.v_angle_min_deg, c.v_angle_max_deg)?;
        ordered("charging.left_thumb", c.left_thumb_min_deg, c.left_thumb_max_deg)?;
        ordered("charging.right_thumb", c.right_thumb_min_deg, c.right_thumb_max_deg)?;
        ordered("charging.funnel_tiers", c.funnel_excellent_deg, c.funnel_good_deg)?;
        positive("charging.spread_normalizer_px", c.spread_normalizer_px)?;
        positive("charging.extension_normalizer_px", c.extension_normalizer_px)?;
        positive("charging.funnel_distance_ratio", c.funnel_distance_ratio)?;
        threshold("charging.pass_threshold", c.pass_threshold, 6)?;

        ordered("firing.aligned_distance", f.aligned_distance_min, f.aligned_distance_max)?;
        ordered("firing.sphere_radius", f.sphere_radius_min, f.sphere_radius_max)?;
        positive("firing.curl_tolerance_px", f.curl_tolerance_px)?;
        positive("firing.aligned_max_vertical_px", f.aligned_max_vertical_px)?;
        threshold("firing.pass_threshold", f.pass_threshold, 4)?;

        if !(0.0..=1.0).contains(&self.sphere_wrist_blend) {
            return Err(BeamcastError::invalid_config(
                "sphere_wrist_blend",
                "must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_keypoint_score) {
            return Err(BeamcastError::invalid_config(
                "min_keypoint_score",
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> BeamcastResult<()> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(BeamcastError::invalid_config(
            field,
            format!("range is empty or inverted ({min} .. {max})"),
        ))
    }
}

fn positive(field: &'static str, value: f32) -> BeamcastResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BeamcastError::invalid_config(field, "must be positive"))
    }
}

fn threshold(field: &'static str, value: u8, criteria: u8) -> BeamcastResult<()> {
    if (1..=criteria).contains(&value) {
        Ok(())
    } else {
        Err(BeamcastError::invalid_config(
            field,
            format!("must be within 1..={criteria}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PoseConfig::new().validate().is_ok());
        assert_eq!(PoseConfig::new().sphere_wrist_blend, 0.3);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = PoseConfig::new();
        config.charging.wrist_distance_min = 200.0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            BeamcastError::InvalidConfig { field: "charging.wrist_distance", .. }
        ));
    }

    #[test]
    fn test_threshold_bounds() {
        let mut config = PoseConfig::new();
        config.firing.pass_threshold = 5;
        assert!(config.validate().is_err());

        config.firing.pass_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blend_bounds() {
        let mut config = PoseConfig::new();
        config.sphere_wrist_blend = 1.5;
        assert!(config.validate().is_err());
    }
}
