//! Beam direction

use beamcast_core::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::DirectionConfig;

/// Strategy that produced a beam direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionMethod {
    /// Averaged wrist->fingertip vectors of both hands
    FingerConvergence,
    /// Opposite of where the palms face
    PalmFacing,
    /// Perpendicular to the wrist-to-wrist axis
    PerpendicularWrist,
    /// Wrist midpoint toward middle fingertip midpoint
    FingertipTracking,
}

/// Aim of the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamDirection {
    /// Heading of `vector` in radians
    pub angle: f32,
    /// Unit vector in image space
    pub vector: Vec2,
    /// Unit vector in world space, when 3D landmarks allowed it
    pub vector_3d: Option<Vec3>,
    pub origin: Vec2,
    pub method: DirectionMethod,
}

impl BeamDirection {
    /// Build from an already normalized vector
    pub fn new(vector: Vec2, origin: Vec2, method: DirectionMethod) -> Self {
        BeamDirection {
            angle: vector.angle_rad(),
            vector,
            vector_3d: None,
            origin,
            method,
        }
    }

    /// Straight up from `origin`
    pub fn straight_up(origin: Vec2, method: DirectionMethod) -> Self {
        Self::new(Vec2::UP, origin, method)
    }

    pub fn with_vector_3d(mut self, vector_3d: Vec3) -> Self {
        self.vector_3d = Some(vector_3d);
        self
    }

    /// Apply output mirroring from the configuration
    pub fn into_output_space(self, config: &DirectionConfig) -> Self {
        if !config.mirror_output {
            return self;
        }
        let vector = Vec2::new(-self.vector.x, self.vector.y);
        BeamDirection {
            angle: vector.angle_rad(),
            vector,
            vector_3d: self.vector_3d.map(|v| Vec3::new(-v.x, v.y, v.z)),
            origin: Vec2::new(config.frame_width - self.origin.x, self.origin.y),
            method: self.method,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.angle.is_finite() && self.vector.is_finite() && self.origin.is_finite()
    }
}

impl Default for BeamDirection {
    fn default() -> Self {
        Self::straight_up(Vec2::zero(), DirectionMethod::FingertipTracking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_points_up() {
        let dir = BeamDirection::default();
        assert_eq!(dir.vector, Vec2::UP);
        assert!((dir.angle + FRAC_PI_2).abs() < 1e-6);
        assert!(dir.vector_3d.is_none());
    }

    #[test]
    fn test_mirroring_flips_x() {
        let origin = Vec2::new(100.0, 50.0);
        let dir = BeamDirection::new(Vec2::RIGHT, origin, DirectionMethod::PalmFacing)
            .with_vector_3d(Vec3::new(1.0, 0.0, 0.0));
        let mirrored = dir.into_output_space(&DirectionConfig::mirrored(640.0));

        assert_eq!(mirrored.origin, Vec2::new(540.0, 50.0));
        assert_eq!(mirrored.vector, Vec2::new(-1.0, 0.0));
        assert_eq!(mirrored.vector_3d, Some(Vec3::new(-1.0, 0.0, 0.0)));
        assert!((mirrored.angle.abs() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_unmirrored_is_identity() {
        let origin = Vec2::new(100.0, 50.0);
        let dir = BeamDirection::new(Vec2::RIGHT, origin, DirectionMethod::PalmFacing);
        assert_eq!(dir.into_output_space(&DirectionConfig::default()), dir);
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let json = serde_json::to_string(&DirectionMethod::PerpendicularWrist).unwrap();
        assert_eq!(json, "\"perpendicular_wrist\"");
    }
}
