//! Gesture machine configuration

use beamcast_aim::DirectionConfig;
use beamcast_core::{BeamcastError, BeamcastResult};
use beamcast_pose::PoseConfig;
use serde::{Deserialize, Serialize};

/// Timing and hysteresis parameters of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Consecutive valid frames needed to leave positioning
    pub positioning_frames: u32,
    /// Minimum charge before a release can fire
    pub min_charge_ms: f64,
    /// Charge that counts as full; holding past it aborts the charge
    pub max_charge_ms: f64,
    /// Shortest allowed firing episode
    pub firing_floor_ms: f64,
    /// Firing duration granted by a full charge
    pub firing_ceiling_ms: f64,
    /// Hard cap on frames spent firing
    pub max_firing_frames: u32,
    /// Consecutive invalid firing frames that end the episode
    pub invalid_streak_limit: u32,
    /// Hand position samples kept for smoothing
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            positioning_frames: 15,
            min_charge_ms: 5000.0,
            max_charge_ms: 20000.0,
            firing_floor_ms: 1875.0,
            firing_ceiling_ms: 15000.0,
            max_firing_frames: 120,
            invalid_streak_limit: 5,
            history_capacity: 30,
        }
    }
}

impl MachineConfig {
    /// Short windows for demos and tests
    pub fn quick_charge() -> Self {
        MachineConfig {
            positioning_frames: 5,
            min_charge_ms: 1000.0,
            max_charge_ms: 8000.0,
            firing_floor_ms: 1000.0,
            firing_ceiling_ms: 6000.0,
            ..Default::default()
        }
    }

    /// Firing time granted for a charge
    ///
    /// Scales linearly with the charge up to `max_charge_ms`, never below
    /// `firing_floor_ms`.
    pub fn allowed_firing_duration_ms(&self, charging_ms: f64) -> f64 {
        let ratio = (charging_ms / self.max_charge_ms).clamp(0.0, 1.0);
        (ratio * self.firing_ceiling_ms).max(self.firing_floor_ms)
    }

    /// Charge progress in [0, 1]
    pub fn charging_progress(&self, charging_ms: f64) -> f64 {
        (charging_ms / self.max_charge_ms).clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> BeamcastResult<()> {
        if self.positioning_frames == 0 {
            return Err(BeamcastError::invalid_config(
                "machine.positioning_frames",
                "must be at least 1",
            ));
        }
        if self.max_firing_frames == 0 {
            return Err(BeamcastError::invalid_config(
                "machine.max_firing_frames",
                "must be at least 1",
            ));
        }
        if self.invalid_streak_limit == 0 {
            return Err(BeamcastError::invalid_config(
                "machine.invalid_streak_limit",
                "must be at least 1",
            ));
        }
        if self.history_capacity < 2 {
            return Err(BeamcastError::invalid_config(
                "machine.history_capacity",
                "must hold at least 2 samples",
            ));
        }
        for (field, value) in [
            ("machine.min_charge_ms", self.min_charge_ms),
            ("machine.max_charge_ms", self.max_charge_ms),
            ("machine.firing_floor_ms", self.firing_floor_ms),
            ("machine.firing_ceiling_ms", self.firing_ceiling_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BeamcastError::invalid_config(field, "must be positive"));
            }
        }
        if self.min_charge_ms >= self.max_charge_ms {
            return Err(BeamcastError::invalid_config(
                "machine.min_charge_ms",
                "must be below max_charge_ms",
            ));
        }
        if self.firing_floor_ms > self.firing_ceiling_ms {
            return Err(BeamcastError::invalid_config(
                "machine.firing_floor_ms",
                "must not exceed firing_ceiling_ms",
            ));
        }
        Ok(())
    }
}

/// Complete detector configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub pose: PoseConfig,
    pub direction: DirectionConfig,
    pub machine: MachineConfig,
}

impl DetectorConfig {
    /// Default thresholds with short charge windows
    pub fn quick_charge() -> Self {
        DetectorConfig {
            machine: MachineConfig::quick_charge(),
            ..Default::default()
        }
    }

    /// Treat keypoints scored below `min_score` as missing everywhere
    pub fn with_min_keypoint_score(mut self, min_score: f32) -> Self {
        self.pose.min_keypoint_score = min_score;
        self.direction.min_keypoint_score = min_score;
        self
    }

    pub fn with_direction(mut self, direction: DirectionConfig) -> Self {
        self.direction = direction;
        self
    }

    pub fn validate(&self) -> BeamcastResult<()> {
        self.pose.validate()?;
        self.direction.validate()?;
        self.machine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
        assert!(DetectorConfig::quick_charge().validate().is_ok());
    }

    #[test]
    fn test_allowed_firing_duration() {
        let config = MachineConfig::default();

        assert_eq!(config.allowed_firing_duration_ms(20000.0), 15000.0);
        assert_eq!(config.allowed_firing_duration_ms(10000.0), 7500.0);
        assert_eq!(config.allowed_firing_duration_ms(8000.0), 6000.0);
        assert_eq!(config.allowed_firing_duration_ms(5000.0), 3750.0);
        // Floor and ceiling
        assert_eq!(config.allowed_firing_duration_ms(1000.0), 1875.0);
        assert_eq!(config.allowed_firing_duration_ms(50000.0), 15000.0);
    }

    #[test]
    fn test_charging_progress_saturates() {
        let config = MachineConfig::default();
        assert_eq!(config.charging_progress(0.0), 0.0);
        assert_eq!(config.charging_progress(5000.0), 0.25);
        assert_eq!(config.charging_progress(40000.0), 1.0);
    }

    #[test]
    fn test_invalid_machine_config() {
        let mut config = MachineConfig::default();
        config.firing_floor_ms = 20000.0;
        assert!(matches!(
            config.validate(),
            Err(BeamcastError::InvalidConfig { field: "machine.firing_floor_ms", .. })
        ));

        let config = MachineConfig {
            positioning_frames: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MachineConfig {
            min_charge_ms: 30000.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_keypoint_score_applies_everywhere() {
        let config = DetectorConfig::default().with_min_keypoint_score(0.4);
        assert_eq!(config.pose.min_keypoint_score, 0.4);
        assert_eq!(config.direction.min_keypoint_score, 0.4);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = DetectorConfig::quick_charge();
        let json = serde_json::to_string(&config).unwrap();
        let back: DetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
