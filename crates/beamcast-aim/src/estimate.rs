//! Lock-in and continuous direction estimators

use beamcast_core::{Hand, KeypointName, Vec2, Vec3};
use beamcast_pose::LabeledHandPair;
use tracing::debug;

use crate::{BeamDirection, DirectionConfig, DirectionMethod};

/// Mean of a hand's wrist->index tip and wrist->middle tip vectors
fn reach_2d(hand: &Hand, min_score: f32) -> Option<Vec2> {
    let wrist = hand.locate(KeypointName::Wrist, min_score)?;
    let index = hand.locate(KeypointName::IndexFingerTip, min_score)?;
    let middle = hand.locate(KeypointName::MiddleFingerTip, min_score)?;
    Some(((index - wrist) + (middle - wrist)) * 0.5)
}

fn reach_3d(hand: &Hand) -> Option<Vec3> {
    let wrist = hand.point_3d(KeypointName::Wrist)?;
    let index = hand.point_3d(KeypointName::IndexFingerTip)?;
    let middle = hand.point_3d(KeypointName::MiddleFingerTip)?;
    Some(((index - wrist) + (middle - wrist)) * 0.5)
}

/// Wrist->fingertip vectors of both hands, averaged and pointed away from the body
fn finger_convergence(
    pair: &LabeledHandPair<'_>,
    config: &DirectionConfig,
) -> Option<(Vec2, Option<Vec3>)> {
    let min = config.min_keypoint_score;
    let combined = (reach_2d(pair.left, min)? + reach_2d(pair.right, min)?) * 0.5;
    if combined.length() < config.finger_convergence_min_magnitude {
        return None;
    }
    let mut vector = combined.try_normalize()?;
    let flipped = vector.dot(config.forward) < 0.0;
    if flipped {
        vector = -vector;
    }

    let vector_3d = reach_3d(pair.left)
        .zip(reach_3d(pair.right))
        .and_then(|(l, r)| ((l + r) * 0.5).try_normalize())
        .map(|v| if flipped { -v } else { v });

    Some((vector, vector_3d))
}

/// Beam leaves opposite to where the palms face
fn palm_facing(pair: &LabeledHandPair<'_>, config: &DirectionConfig) -> Option<Vec2> {
    let min = config.min_keypoint_score;
    let facing = -((reach_2d(pair.left, min)? + reach_2d(pair.right, min)?) * 0.5);
    if facing.length() == 0.0 {
        return None;
    }
    let vector = facing.normalize_or(Vec2::UP);
    if vector.dot(config.forward) < 0.0 {
        Some(-vector)
    } else {
        Some(vector)
    }
}

/// Lateral direction perpendicular to the wrist-to-wrist axis
fn perpendicular_wrist(pair: &LabeledHandPair<'_>, config: &DirectionConfig) -> Vec2 {
    let min = config.min_keypoint_score;
    let axis = match (
        pair.left.locate(KeypointName::Wrist, min),
        pair.right.locate(KeypointName::Wrist, min),
    ) {
        (Some(l), Some(r)) => r - l,
        _ => Vec2::zero(),
    };
    let perpendicular = if axis.angle_deg().abs() < 90.0 {
        axis.rotate_cw90()
    } else {
        axis.rotate_ccw90()
    };
    perpendicular.normalize_or(Vec2::UP)
}

/// One-shot direction estimate at the moment a charge is released
///
/// The origin is the energy sphere center when known, else the wrist midpoint.
pub fn estimate_lock_in(
    pair: &LabeledHandPair<'_>,
    sphere_center: Option<Vec2>,
    config: &DirectionConfig,
) -> BeamDirection {
    let origin = sphere_center
        .or_else(|| pair.wrist_midpoint())
        .unwrap_or_default();

    let direction = if let Some((vector, vector_3d)) = finger_convergence(pair, config) {
        let dir = BeamDirection::new(vector, origin, DirectionMethod::FingerConvergence);
        match vector_3d {
            Some(v) => dir.with_vector_3d(v),
            None => dir,
        }
    } else {
        debug!(strategy = "finger_convergence", "lock-in strategy unavailable");
        if let Some(vector) = palm_facing(pair, config) {
            BeamDirection::new(vector, origin, DirectionMethod::PalmFacing)
        } else {
            debug!(strategy = "palm_facing", "lock-in strategy unavailable");
            BeamDirection::new(
                perpendicular_wrist(pair, config),
                origin,
                DirectionMethod::PerpendicularWrist,
            )
        }
    };

    direction.into_output_space(config)
}

/// Per-frame direction estimate while firing
///
/// Aims from the wrist midpoint through the middle fingertip midpoint.
/// Returns `None` when a wrist or middle fingertip is missing.
pub fn estimate_continuous(
    pair: &LabeledHandPair<'_>,
    config: &DirectionConfig,
) -> Option<BeamDirection> {
    let min = config.min_keypoint_score;
    let origin = pair
        .left
        .locate(KeypointName::Wrist, min)?
        .midpoint(pair.right.locate(KeypointName::Wrist, min)?);
    let target = pair
        .left
        .locate(KeypointName::MiddleFingerTip, min)?
        .midpoint(pair.right.locate(KeypointName::MiddleFingerTip, min)?);

    let offset = target - origin;
    let vector = if offset.length() == 0.0 {
        Vec2::UP
    } else {
        offset.normalize_or(Vec2::UP)
    };

    let direction = BeamDirection::new(vector, origin, DirectionMethod::FingertipTracking);
    Some(direction.into_output_space(config))
}
