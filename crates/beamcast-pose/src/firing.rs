//! Firing pose scoring
//!
//! Four criteria over a labeled hand pair: curved fingers, aligned hands,
//! inward-rotated wrists and a compact energy sphere between the fingertips.
//! The pose counts as firing once `pass_threshold` of them hold.

use beamcast_core::{Finger, Hand, KeypointName, Vec2};
use tracing::trace;

use crate::score::mark;
use crate::{energy_sphere_center, thumb_heading, FiringCriterion, LabeledHandPair, PoseConfig, PoseScore};

/// Mean tip-to-MCP distance over the four fingers
///
/// Needs every finger's tip and MCP joint.
pub fn average_finger_curl(hand: &Hand, min_score: f32) -> Option<f32> {
    let mut total = 0.0;
    for finger in Finger::FINGERS {
        let tip = hand.locate(finger.tip(), min_score)?;
        let mcp = hand.locate(finger.mcp(), min_score)?;
        total += tip.distance(mcp);
    }
    Some(total / Finger::FINGERS.len() as f32)
}

fn sphere_fingertips(pair: &LabeledHandPair<'_>, min_score: f32) -> Option<[Vec2; 4]> {
    Some([
        pair.left.locate(KeypointName::IndexFingerTip, min_score)?,
        pair.left.locate(KeypointName::MiddleFingerTip, min_score)?,
        pair.right.locate(KeypointName::IndexFingerTip, min_score)?,
        pair.right.locate(KeypointName::MiddleFingerTip, min_score)?,
    ])
}

/// Score a hand pair against the firing criteria
pub fn score_firing(pair: &LabeledHandPair<'_>, config: &PoseConfig) -> PoseScore<FiringCriterion> {
    let t = &config.firing;
    let min = config.min_keypoint_score;
    let mut score = PoseScore::new(t.pass_threshold);

    // Fingers curved
    match (
        average_finger_curl(pair.left, min),
        average_finger_curl(pair.right, min),
    ) {
        (Some(l), Some(r)) => {
            let curved = |avg: f32| (avg - t.curl_expected_px).abs() <= t.curl_tolerance_px;
            let ok = curved(l) && curved(r);
            score.record(
                FiringCriterion::FingersCurved,
                ok,
                format!("finger curl L {l:.1}px R {r:.1}px {}", mark(ok)),
            );
        }
        _ => score.record(
            FiringCriterion::FingersCurved,
            false,
            "finger curl: joint missing".to_string(),
        ),
    }

    // Hands aligned
    match (
        pair.left.locate(KeypointName::Wrist, min),
        pair.right.locate(KeypointName::Wrist, min),
    ) {
        (Some(l), Some(r)) => {
            let vertical = (l.y - r.y).abs();
            let d = l.distance(r);
            let ok = vertical < t.aligned_max_vertical_px
                && d > t.aligned_distance_min
                && d < t.aligned_distance_max;
            score.record(
                FiringCriterion::HandsAligned,
                ok,
                format!("alignment dy {vertical:.1}px distance {d:.1}px {}", mark(ok)),
            );
        }
        _ => score.record(
            FiringCriterion::HandsAligned,
            false,
            "alignment: wrist missing".to_string(),
        ),
    }

    // Wrists rotated inward
    match (thumb_heading(pair.left, min), thumb_heading(pair.right, min)) {
        (Some(l), Some(r)) => {
            let ok = l.abs() < t.left_thumb_max_abs_deg && r.abs() > t.right_thumb_min_abs_deg;
            score.record(
                FiringCriterion::WristsRotatedInward,
                ok,
                format!("inward rotation L {l:.1}° R {r:.1}° {}", mark(ok)),
            );
        }
        _ => score.record(
            FiringCriterion::WristsRotatedInward,
            false,
            "inward rotation: thumb missing".to_string(),
        ),
    }

    // Energy sphere formation
    match energy_sphere_center(pair, config).zip(sphere_fingertips(pair, min)) {
        Some((center, tips)) => {
            let distances = tips.map(|tip| tip.distance(center));
            let mean = distances.iter().sum::<f32>() / distances.len() as f32;
            let even = distances
                .iter()
                .all(|d| (d - mean).abs() <= t.sphere_spread_tolerance_px);
            let ok = even && mean > t.sphere_radius_min && mean < t.sphere_radius_max;
            score.record(
                FiringCriterion::SphereFormation,
                ok,
                format!("sphere radius {mean:.1}px {}", mark(ok)),
            );
        }
        None => score.record(
            FiringCriterion::SphereFormation,
            false,
            "sphere formation: fingertip missing".to_string(),
        ),
    }

    trace!(
        score = score.score,
        valid = score.is_valid(),
        "firing pose scored"
    );
    score
}

/// Whether a hand pair holds a valid firing pose
pub fn is_firing_pose(pair: &LabeledHandPair<'_>, config: &PoseConfig) -> bool {
    score_firing(pair, config).is_valid()
}
