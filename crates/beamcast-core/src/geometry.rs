//! Vector math for landmark geometry
//!
//! Image-space coordinates: x grows to the right, y grows downward.
//! All angles are reported in degrees unless a name says otherwise.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Lengths below this are treated as zero when normalizing
pub const LENGTH_EPSILON: f32 = 1e-6;

/// 2D point or vector in image space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Straight up on screen
    pub const UP: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    /// Positive x axis
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Distance to another point
    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Vec2) -> Vec2 {
        self.lerp(other, 0.5)
    }

    /// Linear interpolation
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Unit vector, or `None` for a degenerate (near zero) vector
    pub fn try_normalize(self) -> Option<Vec2> {
        let len = self.length();
        if !len.is_finite() || len < LENGTH_EPSILON {
            return None;
        }
        Some(Vec2::new(self.x / len, self.y / len))
    }

    /// Unit vector, falling back to `default` for a degenerate vector
    pub fn normalize_or(self, default: Vec2) -> Vec2 {
        self.try_normalize().unwrap_or(default)
    }

    /// Heading in radians, `atan2(y, x)`
    #[inline]
    pub fn angle_rad(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Heading in degrees in (-180, 180]
    #[inline]
    pub fn angle_deg(self) -> f32 {
        self.angle_rad().to_degrees()
    }

    /// Unsigned angle to another vector in degrees [0, 180]
    ///
    /// Returns `None` when either vector is degenerate.
    pub fn angle_between_deg(self, other: Vec2) -> Option<f32> {
        let a = self.try_normalize()?;
        let b = other.try_normalize()?;
        Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
    }

    /// Rotate 90° clockwise in the math convention: (x, y) -> (y, -x)
    pub fn rotate_cw90(self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }

    /// Rotate 90° counter-clockwise in the math convention: (x, y) -> (-y, x)
    pub fn rotate_ccw90(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of a set of points
    pub fn mean(points: &[Vec2]) -> Option<Vec2> {
        if points.is_empty() {
            return None;
        }
        let sum = points.iter().fold(Vec2::zero(), |acc, p| acc + *p);
        Some(sum * (1.0 / points.len() as f32))
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// 3D point or vector (producer world space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    pub fn try_normalize(self) -> Option<Vec3> {
        let len = self.length();
        if !len.is_finite() || len < LENGTH_EPSILON {
            return None;
        }
        Some(Vec3::new(self.x / len, self.y / len, self.z / len))
    }

    pub fn normalize_or(self, default: Vec3) -> Vec3 {
        self.try_normalize().unwrap_or(default)
    }

    /// Drop the depth component
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance_and_midpoint() {
        let a = Vec2::new(300.0, 300.0);
        let b = Vec2::new(340.0, 300.0);

        assert!((a.distance(b) - 40.0).abs() < 1e-4);
        assert_eq!(a.midpoint(b), Vec2::new(320.0, 300.0));
    }

    #[test]
    fn test_normalize_degenerate_uses_default() {
        let v = Vec2::zero().normalize_or(Vec2::UP);
        assert_eq!(v, Vec2::UP);
        assert!(Vec2::zero().angle_between_deg(Vec2::RIGHT).is_none());
    }

    #[test]
    fn test_angle_between() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        let angle = a.angle_between_deg(b).unwrap();
        assert!((angle - 90.0).abs() < 1e-3);

        let opposite = a.angle_between_deg(-a).unwrap();
        assert!((opposite - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotations() {
        assert_eq!(Vec2::RIGHT.rotate_cw90(), Vec2::UP);
        assert_eq!(Vec2::new(-1.0, 0.0).rotate_ccw90(), Vec2::UP);
    }

    #[test]
    fn test_heading_uses_image_axes() {
        // y grows downward, so a point below the origin is at +90°
        assert!((Vec2::new(0.0, 10.0).angle_deg() - 90.0).abs() < 1e-4);
        assert!((Vec2::new(-10.0, 0.0).angle_deg() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_mean() {
        assert!(Vec2::mean(&[]).is_none());
        let m = Vec2::mean(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0)]).unwrap();
        assert_eq!(m, Vec2::new(5.0, 10.0));
    }

    #[test]
    fn test_vec3_normalize() {
        let v = Vec3::new(0.0, 3.0, 4.0).normalize_or(Vec3::zero());
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert_eq!(Vec3::zero().normalize_or(Vec3::new(0.0, 0.0, -1.0)).z, -1.0);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_unit_or_default(x in -1e4f32..1e4, y in -1e4f32..1e4) {
            let v = Vec2::new(x, y).normalize_or(Vec2::UP);
            prop_assert!(v.is_finite());
            prop_assert!((v.length() - 1.0).abs() < 1e-3);
        }

        #[test]
        fn prop_angle_between_in_range(ax in -500f32..500.0, ay in -500f32..500.0,
                                       bx in -500f32..500.0, by in -500f32..500.0) {
            if let Some(angle) = Vec2::new(ax, ay).angle_between_deg(Vec2::new(bx, by)) {
                prop_assert!((0.0..=180.0).contains(&angle));
            }
        }
    }
}
