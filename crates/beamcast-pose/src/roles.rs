//! Hand role resolution
//!
//! The producer reports hands unlabeled. Roles are assigned from wrist
//! geometry alone, so identical input always yields identical roles.

use beamcast_core::{Hand, Vec2};

/// Exactly two hands with resolved roles
#[derive(Debug, Clone, Copy)]
pub struct LabeledHandPair<'a> {
    pub left: &'a Hand,
    pub right: &'a Hand,
}

impl<'a> LabeledHandPair<'a> {
    /// Both wrist positions, left first
    pub fn wrists(&self) -> Option<(Vec2, Vec2)> {
        Some((self.left.wrist()?, self.right.wrist()?))
    }

    /// Midpoint between the wrists
    pub fn wrist_midpoint(&self) -> Option<Vec2> {
        let (left, right) = self.wrists()?;
        Some(left.midpoint(right))
    }
}

/// Label a two-hand detection as left/right
///
/// Returns `None` unless exactly two hands are given and both expose a wrist.
/// World-space wrists are compared when both hands carry them; otherwise
/// image-space wrists are compared. Smaller x is the left hand in both cases
/// (the image feed is mirrored upstream). Ties keep input order.
pub fn identify(hands: &[Hand]) -> Option<LabeledHandPair<'_>> {
    let [first, second] = hands else {
        return None;
    };

    let first_wrist = first.wrist()?;
    let second_wrist = second.wrist()?;

    let first_is_left = match (first.wrist_3d(), second.wrist_3d()) {
        (Some(a), Some(b)) => a.x <= b.x,
        _ => first_wrist.x <= second_wrist.x,
    };

    if first_is_left {
        Some(LabeledHandPair {
            left: first,
            right: second,
        })
    } else {
        Some(LabeledHandPair {
            left: second,
            right: first,
        })
    }
}
