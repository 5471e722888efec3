//! Energy sphere geometry
//!
//! The energy sphere is the focal point between the hands where the charge
//! is anchored. The energy funnel is the pattern of fingertips converging on
//! that point more tightly than the wrists do.

use beamcast_core::{Hand, KeypointName, Vec2};
use serde::{Deserialize, Serialize};

use crate::{LabeledHandPair, PoseConfig};

/// Midpoint of a hand's index and middle fingertips
pub fn finger_midpoint(hand: &Hand, min_score: f32) -> Option<Vec2> {
    let index = hand.locate(KeypointName::IndexFingerTip, min_score)?;
    let middle = hand.locate(KeypointName::MiddleFingerTip, min_score)?;
    Some(index.midpoint(middle))
}

/// Compute the energy sphere center of a hand pair
///
/// Average of both hands' index/middle fingertip midpoints, pulled toward the
/// wrist midpoint by `sphere_wrist_blend`.
pub fn energy_sphere_center(pair: &LabeledHandPair<'_>, config: &PoseConfig) -> Option<Vec2> {
    let min = config.min_keypoint_score;
    let left_tips = finger_midpoint(pair.left, min)?;
    let right_tips = finger_midpoint(pair.right, min)?;
    let left_wrist = pair.left.locate(KeypointName::Wrist, min)?;
    let right_wrist = pair.right.locate(KeypointName::Wrist, min)?;

    let finger_mid = left_tips.midpoint(right_tips);
    let wrist_mid = left_wrist.midpoint(right_wrist);
    Some(finger_mid.lerp(wrist_mid, config.sphere_wrist_blend))
}

/// Quality tier of a valid energy funnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelQuality {
    Excellent,
    Good,
    Fair,
}

/// Per-hand funnel measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandFunnel {
    /// Fingertips sit closer to the center than the wrist allows
    pub converging: bool,
    /// Angle between wrist->index tip and wrist->center
    pub convergence_angle_deg: f32,
}

/// Energy funnel analysis of a hand pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyFunnel {
    pub valid: bool,
    /// Only present when `valid`
    pub quality: Option<FunnelQuality>,
    /// Mean convergence angle across both hands
    pub mean_angle_deg: Option<f32>,
    pub left: Option<HandFunnel>,
    pub right: Option<HandFunnel>,
}

impl EnergyFunnel {
    fn invalid() -> Self {
        EnergyFunnel {
            valid: false,
            quality: None,
            mean_angle_deg: None,
            left: None,
            right: None,
        }
    }
}

fn measure_hand(hand: &Hand, center: Vec2, config: &PoseConfig) -> Option<HandFunnel> {
    let min = config.min_keypoint_score;
    let wrist = hand.locate(KeypointName::Wrist, min)?;
    let index = hand.locate(KeypointName::IndexFingerTip, min)?;
    let middle = hand.locate(KeypointName::MiddleFingerTip, min)?;

    let reach = wrist.distance(center) * config.charging.funnel_distance_ratio;
    let converging = index.distance(center) < reach && middle.distance(center) < reach;
    let convergence_angle_deg = (index - wrist).angle_between_deg(center - wrist)?;

    Some(HandFunnel {
        converging,
        convergence_angle_deg,
    })
}

/// Analyze the energy funnel around a sphere center
pub fn analyze_funnel(
    pair: &LabeledHandPair<'_>,
    center: Vec2,
    config: &PoseConfig,
) -> EnergyFunnel {
    let thresholds = &config.charging;
    let left = measure_hand(pair.left, center, config);
    let right = measure_hand(pair.right, center, config);

    let (l, r) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            return EnergyFunnel {
                left,
                right,
                ..EnergyFunnel::invalid()
            }
        }
    };

    let aligned = |h: &HandFunnel| h.convergence_angle_deg < thresholds.funnel_angle_max_deg;
    let valid = l.converging && r.converging && aligned(&l) && aligned(&r);
    let mean = (l.convergence_angle_deg + r.convergence_angle_deg) / 2.0;

    let quality = valid.then(|| {
        if mean < thresholds.funnel_excellent_deg {
            FunnelQuality::Excellent
        } else if mean < thresholds.funnel_good_deg {
            FunnelQuality::Good
        } else {
            FunnelQuality::Fair
        }
    });

    EnergyFunnel {
        valid,
        quality,
        mean_angle_deg: Some(mean),
        left,
        right,
    }
}
