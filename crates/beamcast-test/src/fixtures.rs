//! Synthetic hand poses
//!
//! Image-space coordinates in a 640x480 frame, wrists on the y = 300 line.

use beamcast_core::{Hand, Keypoint, KeypointName, Vec2};

/// A left/right hand pair in a known pose
#[derive(Clone, Debug, PartialEq)]
pub struct PoseFixture {
    pub left: Hand,
    pub right: Hand,
}

/// Mirror a one-sided layout around a wrist: `sign` is +1 for the left hand
fn mirrored_hand(wrist: Vec2, sign: f32, layout: &[(KeypointName, f32, f32)]) -> Hand {
    Hand::new(
        layout
            .iter()
            .map(|&(name, dx, dy)| Keypoint::new(name, wrist.x + sign * dx, wrist.y + dy))
            .collect(),
    )
}

impl PoseFixture {
    /// Cupped hands around the energy sphere
    ///
    /// Satisfies all six charging criteria and none of the firing ones.
    pub fn charging() -> Self {
        use KeypointName::*;
        let layout = [
            (Wrist, 0.0, 0.0),
            (ThumbTip, -30.0, 51.96),
            (IndexFingerTip, 25.0, 0.0),
            (MiddleFingerTip, 25.0, -10.0),
            (RingFingerTip, -10.0, -60.0),
            (PinkyFingerTip, -40.0, -50.0),
        ];
        PoseFixture {
            left: mirrored_hand(Vec2::new(300.0, 300.0), 1.0, &layout),
            right: mirrored_hand(Vec2::new(340.0, 300.0), -1.0, &layout),
        }
    }

    /// Curled fingers wrapped around the sphere, thumbs turned inward
    ///
    /// Satisfies all four firing criteria and none of the charging ones.
    pub fn firing() -> Self {
        use KeypointName::*;
        let layout = [
            (Wrist, 0.0, 0.0),
            (ThumbTip, 30.0, -10.0),
            (IndexFingerTip, 10.0, -70.0),
            (IndexFingerMcp, 10.0, -30.0),
            (MiddleFingerTip, 25.0, -50.0),
            (MiddleFingerMcp, 25.0, -10.0),
            (RingFingerTip, 5.0, 0.0),
            (RingFingerMcp, 5.0, -40.0),
            (PinkyFingerTip, 3.0, 2.0),
            (PinkyFingerMcp, 3.0, -38.0),
        ];
        PoseFixture {
            left: mirrored_hand(Vec2::new(245.0, 300.0), 1.0, &layout),
            right: mirrored_hand(Vec2::new(375.0, 300.0), -1.0, &layout),
        }
    }

    /// Hands resting far apart with only wrists tracked
    pub fn neutral() -> Self {
        PoseFixture {
            left: Hand::new(vec![Keypoint::new(KeypointName::Wrist, 100.0, 300.0)]),
            right: Hand::new(vec![Keypoint::new(KeypointName::Wrist, 540.0, 300.0)]),
        }
    }

    /// Slide each hand horizontally so its wrist sits at the given x
    pub fn with_wrists(mut self, left_x: f32, right_x: f32) -> Self {
        for (hand, x) in [(&mut self.left, left_x), (&mut self.right, right_x)] {
            let Some(wrist) = hand.wrist() else { continue };
            shift(hand, x - wrist.x, 0.0);
        }
        self
    }

    /// Attach world-space landmarks: image pixels scaled to meters at a fixed depth
    pub fn with_world_space(mut self, depth: f32) -> Self {
        for hand in [&mut self.left, &mut self.right] {
            let world = hand
                .keypoints
                .iter()
                .map(|kp| Keypoint::new_3d(kp.name, kp.x / 1000.0, kp.y / 1000.0, depth))
                .collect();
            hand.keypoints_3d = Some(world);
        }
        self
    }

    /// Mark every landmark with a producer confidence
    pub fn with_score(mut self, score: f32) -> Self {
        for hand in [&mut self.left, &mut self.right] {
            for kp in &mut hand.keypoints {
                kp.score = Some(score);
            }
        }
        self
    }

    /// Both hands, left first
    pub fn hands(&self) -> Vec<Hand> {
        vec![self.left.clone(), self.right.clone()]
    }

    /// Both hands, right first
    pub fn swapped(&self) -> Vec<Hand> {
        vec![self.right.clone(), self.left.clone()]
    }
}

fn shift(hand: &mut Hand, dx: f32, dy: f32) {
    for kp in &mut hand.keypoints {
        kp.x += dx;
        kp.y += dy;
    }
}
