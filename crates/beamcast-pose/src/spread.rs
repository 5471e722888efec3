//! Finger spread measurement

use beamcast_core::{Finger, Hand, KeypointName, Vec2};
use serde::{Deserialize, Serialize};

use crate::ChargingThresholds;

/// How far a hand's fingers fan out and reach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FingerSpread {
    /// Sum of consecutive fingertip distances, thumb to pinky
    pub total_spread: f32,
    /// Mean wrist-to-fingertip distance over the five digits
    pub avg_extension: f32,
    /// Normalized spread and extension, in [0, 1]
    pub intensity: f32,
}

/// Measure finger spread; needs the wrist and all five fingertips
pub fn measure_spread(
    hand: &Hand,
    thresholds: &ChargingThresholds,
    min_score: f32,
) -> Option<FingerSpread> {
    let wrist = hand.locate(KeypointName::Wrist, min_score)?;
    let mut tips = [Vec2::zero(); 5];
    for (slot, finger) in tips.iter_mut().zip(Finger::DIGITS) {
        *slot = hand.locate(finger.tip(), min_score)?;
    }

    let total_spread: f32 = tips.windows(2).map(|w| w[0].distance(w[1])).sum();
    let avg_extension = tips.iter().map(|t| wrist.distance(*t)).sum::<f32>() / tips.len() as f32;

    let spread_term = (total_spread / thresholds.spread_normalizer_px).min(1.0);
    let extension_term = (avg_extension / thresholds.extension_normalizer_px).min(1.0);

    Some(FingerSpread {
        total_spread,
        avg_extension,
        intensity: (spread_term + extension_term) / 2.0,
    })
}
