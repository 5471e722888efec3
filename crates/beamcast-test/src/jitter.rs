//! Tracking jitter simulation
//!
//! Degrades clean fixture frames the way a hand-pose producer does:
//! - Gaussian positional noise on every landmark
//! - Whole-hand dropouts (a frame with a single hand)
//! - Individual landmarks going missing

use beamcast_core::Hand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Jitter configuration
#[derive(Clone, Debug, PartialEq)]
pub struct JitterConfig {
    /// Standard deviation of positional noise in pixels
    pub noise_px: f32,
    /// Probability that a frame loses one of its hands (0.0 - 1.0)
    pub dropout_rate: f64,
    /// Probability that any single landmark is missing (0.0 - 1.0)
    pub keypoint_loss_rate: f64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        JitterConfig {
            noise_px: 1.5,
            dropout_rate: 0.0,
            keypoint_loss_rate: 0.0,
        }
    }
}

impl JitterConfig {
    /// Good lighting, steady camera
    pub fn steady() -> Self {
        JitterConfig {
            noise_px: 0.5,
            dropout_rate: 0.0,
            keypoint_loss_rate: 0.0,
        }
    }

    /// Noisy landmarks, occasional missing joints
    pub fn noisy() -> Self {
        JitterConfig {
            noise_px: 3.0,
            dropout_rate: 0.0,
            keypoint_loss_rate: 0.02,
        }
    }

    /// Hands regularly leave the frame
    pub fn hostile() -> Self {
        JitterConfig {
            noise_px: 6.0,
            dropout_rate: 0.2,
            keypoint_loss_rate: 0.1,
        }
    }
}

/// Jitter statistics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JitterStats {
    pub frames: u64,
    pub hand_dropouts: u64,
    pub keypoints_lost: u64,
}

/// Seeded jitter source
#[derive(Debug)]
pub struct JitterModel {
    config: JitterConfig,
    rng: StdRng,
    stats: JitterStats,
}

impl JitterModel {
    pub fn new(config: JitterConfig, seed: u64) -> Self {
        JitterModel {
            config,
            rng: StdRng::seed_from_u64(seed),
            stats: JitterStats::default(),
        }
    }

    /// Gaussian sample via Box-Muller
    fn gaussian(&mut self) -> f32 {
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z as f32 * self.config.noise_px
    }

    /// Degrade one frame
    pub fn apply(&mut self, hands: &[Hand]) -> Vec<Hand> {
        self.stats.frames += 1;
        let mut out: Vec<Hand> = hands.to_vec();

        if !out.is_empty() && self.rng.gen::<f64>() < self.config.dropout_rate {
            let lost = self.rng.gen_range(0..out.len());
            out.remove(lost);
            self.stats.hand_dropouts += 1;
        }

        for hand in &mut out {
            let before = hand.keypoints.len();
            let loss_rate = self.config.keypoint_loss_rate;
            hand.keypoints.retain(|_| !self.rng.gen_bool(loss_rate));
            self.stats.keypoints_lost += (before - hand.keypoints.len()) as u64;

            for i in 0..hand.keypoints.len() {
                let (dx, dy) = (self.gaussian(), self.gaussian());
                hand.keypoints[i].x += dx;
                hand.keypoints[i].y += dy;
            }
        }
        out
    }

    pub fn stats(&self) -> &JitterStats {
        &self.stats
    }

    pub fn config(&self) -> &JitterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PoseFixture;

    #[test]
    fn test_same_seed_same_frames() {
        let hands = PoseFixture::charging().hands();
        let mut a = JitterModel::new(JitterConfig::hostile(), 7);
        let mut b = JitterModel::new(JitterConfig::hostile(), 7);

        for _ in 0..50 {
            assert_eq!(a.apply(&hands), b.apply(&hands));
        }
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_noise_is_bounded_in_practice() {
        let hands = PoseFixture::firing().hands();
        let mut model = JitterModel::new(JitterConfig::steady(), 1);

        for _ in 0..100 {
            let noisy = model.apply(&hands);
            assert_eq!(noisy.len(), 2);
            for (clean, noisy) in hands.iter().zip(&noisy) {
                for (c, n) in clean.keypoints.iter().zip(&noisy.keypoints) {
                    assert_eq!(c.name, n.name);
                    assert!((c.x - n.x).abs() < 5.0);
                    assert!((c.y - n.y).abs() < 5.0);
                }
            }
        }
        assert_eq!(model.stats().hand_dropouts, 0);
        assert_eq!(model.stats().keypoints_lost, 0);
    }

    #[test]
    fn test_dropouts_happen_at_roughly_the_configured_rate() {
        let hands = PoseFixture::charging().hands();
        let mut model = JitterModel::new(JitterConfig::hostile(), 42);

        for _ in 0..2000 {
            model.apply(&hands);
        }
        let rate = model.stats().hand_dropouts as f64 / 2000.0;
        assert!((0.15..0.25).contains(&rate), "dropout rate {rate}");
        assert!(model.stats().keypoints_lost > 0);
    }
}
