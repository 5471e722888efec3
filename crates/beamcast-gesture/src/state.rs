//! Detector state and per-frame output

use beamcast_aim::BeamDirection;
use beamcast_core::{FrameTime, Vec2};
use serde::{Deserialize, Serialize};

use crate::{HandPositionHistory, MachineConfig, Phase, Telemetry};

/// Everything the state machine remembers between frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorState {
    pub phase: Phase,
    pub phase_entered_at: FrameTime,
    /// Charge accumulated in the current charging episode
    pub charging_duration_ms: f64,
    /// Fixed at release for the whole firing episode
    pub allowed_firing_duration_ms: f64,
    pub positioning_frame_count: u32,
    pub firing_frame_count: u32,
    pub firing_invalid_streak: u32,
    pub last_beam_direction: Option<BeamDirection>,
    /// Energy sphere center when charging began
    pub charge_anchor: Option<Vec2>,
    pub history: HandPositionHistory,
    /// Timestamp of the previous frame
    pub last_frame_at: Option<FrameTime>,
}

impl DetectorState {
    pub fn new(config: &MachineConfig) -> Self {
        DetectorState {
            phase: Phase::Idle,
            phase_entered_at: FrameTime::ZERO,
            charging_duration_ms: 0.0,
            allowed_firing_duration_ms: 0.0,
            positioning_frame_count: 0,
            firing_frame_count: 0,
            firing_invalid_streak: 0,
            last_beam_direction: None,
            charge_anchor: None,
            history: HandPositionHistory::new(config.history_capacity),
            last_frame_at: None,
        }
    }

    /// Return to idle and zero every counter and timer
    ///
    /// History and the frame clock survive; hand loss clears history separately.
    pub fn reset_phase(&mut self) {
        self.phase = Phase::Idle;
        self.phase_entered_at = FrameTime::ZERO;
        self.charging_duration_ms = 0.0;
        self.allowed_firing_duration_ms = 0.0;
        self.positioning_frame_count = 0;
        self.firing_frame_count = 0;
        self.firing_invalid_streak = 0;
        self.last_beam_direction = None;
        self.charge_anchor = None;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Time spent firing in this episode
    pub fn current_firing_duration_ms(&self, now: FrameTime) -> f64 {
        match self.phase {
            Phase::Firing => now.millis_since(self.phase_entered_at),
            _ => 0.0,
        }
    }

    pub fn firing_progress(&self, now: FrameTime) -> f64 {
        if self.allowed_firing_duration_ms <= 0.0 {
            return 0.0;
        }
        (self.current_firing_duration_ms(now) / self.allowed_firing_duration_ms).min(1.0)
    }

    /// Snapshot of derived values
    pub fn telemetry(
        &self,
        now: FrameTime,
        config: &MachineConfig,
        sphere_center: Option<Vec2>,
    ) -> Telemetry {
        Telemetry {
            charging_progress: config.charging_progress(self.charging_duration_ms),
            firing_progress: self.firing_progress(now),
            charging_duration_ms: self.charging_duration_ms,
            allowed_firing_duration_ms: self.allowed_firing_duration_ms,
            beam_direction: self.last_beam_direction,
            energy_sphere_center: match self.phase {
                Phase::Charging => sphere_center.or(self.charge_anchor),
                _ => None,
            },
        }
    }
}

/// Per-frame output record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub state: Phase,
    #[serde(rename = "chargingDuration")]
    pub charging_duration_ms: f64,
    pub charging_progress: f64,
    pub firing_frame_count: u32,
    /// Straight up until a direction has been locked
    pub firing_direction: BeamDirection,
    /// Only populated while charging
    pub energy_sphere_center: Option<Vec2>,
    #[serde(rename = "allowedFiringDuration")]
    pub allowed_firing_duration_ms: f64,
    #[serde(rename = "currentFiringDuration")]
    pub current_firing_duration_ms: f64,
    pub firing_progress: f64,
}

impl FrameOutput {
    pub fn from_state(
        state: &DetectorState,
        now: FrameTime,
        config: &MachineConfig,
        sphere_center: Option<Vec2>,
    ) -> Self {
        let telemetry = state.telemetry(now, config, sphere_center);
        FrameOutput {
            state: state.phase,
            charging_duration_ms: state.charging_duration_ms,
            charging_progress: telemetry.charging_progress,
            firing_frame_count: state.firing_frame_count,
            firing_direction: state.last_beam_direction.unwrap_or_default(),
            energy_sphere_center: telemetry.energy_sphere_center,
            allowed_firing_duration_ms: state.allowed_firing_duration_ms,
            current_firing_duration_ms: state.current_firing_duration_ms(now),
            firing_progress: telemetry.firing_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let config = MachineConfig::default();
        let state = DetectorState::new(&config);
        assert!(state.is_idle());
        assert_eq!(state.history.capacity(), 30);

        let output = FrameOutput::from_state(&state, FrameTime::ZERO, &config, None);
        assert_eq!(output.state, Phase::Idle);
        assert_eq!(output.firing_direction, BeamDirection::default());
        assert_eq!(output.firing_progress, 0.0);
        assert!(output.energy_sphere_center.is_none());
    }

    #[test]
    fn test_firing_progress() {
        let mut state = DetectorState::new(&MachineConfig::default());
        state.phase = Phase::Firing;
        state.phase_entered_at = FrameTime::from_millis(1000);
        state.allowed_firing_duration_ms = 2000.0;

        assert_eq!(state.firing_progress(FrameTime::from_millis(2000)), 0.5);
        assert_eq!(state.firing_progress(FrameTime::from_millis(9000)), 1.0);
        // Earlier than entry saturates
        assert_eq!(state.current_firing_duration_ms(FrameTime::from_millis(500)), 0.0);
    }

    #[test]
    fn test_sphere_center_only_while_charging() {
        let config = MachineConfig::default();
        let mut state = DetectorState::new(&config);
        state.charge_anchor = Some(Vec2::new(1.0, 2.0));
        let center = Some(Vec2::new(3.0, 4.0));

        assert!(state.telemetry(FrameTime::ZERO, &config, center).energy_sphere_center.is_none());

        state.phase = Phase::Charging;
        let t = state.telemetry(FrameTime::ZERO, &config, center);
        assert_eq!(t.energy_sphere_center, center);
        let t = state.telemetry(FrameTime::ZERO, &config, None);
        assert_eq!(t.energy_sphere_center, Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_reset_phase_keeps_history() {
        let mut state = DetectorState::new(&MachineConfig::default());
        state.phase = Phase::Firing;
        state.firing_frame_count = 7;
        state.history.push(Vec2::zero(), FrameTime::ZERO);

        state.reset_phase();
        assert!(state.is_idle());
        assert_eq!(state.firing_frame_count, 0);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_output_json_names() {
        let config = MachineConfig::default();
        let state = DetectorState::new(&config);
        let output = FrameOutput::from_state(&state, FrameTime::ZERO, &config, None);
        let json = serde_json::to_value(output).unwrap();

        assert_eq!(json["state"], "idle");
        for key in [
            "chargingDuration",
            "chargingProgress",
            "firingFrameCount",
            "firingDirection",
            "energySphereCenter",
            "allowedFiringDuration",
            "currentFiringDuration",
            "firingProgress",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
