//! Gesture phases and transition events

use std::fmt;

use beamcast_aim::BeamDirection;
use beamcast_core::{FrameTime, Vec2};
use serde::{Deserialize, Serialize};

/// Gesture phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Positioning,
    Charging,
    Firing,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Idle, Phase::Positioning, Phase::Charging, Phase::Firing];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Positioning => "positioning",
            Phase::Charging => "charging",
            Phase::Firing => "firing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transition happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// A charging pose appeared while idle
    PoseDetected,
    /// The charging pose was held through positioning
    PositionHeld,
    /// The required pose was no longer valid
    PoseLost,
    /// The frame did not carry exactly two hands
    HandsLost,
    /// Charging went on past the full-charge limit
    OverCharged,
    /// The charge was released into a firing pose
    Released,
    /// Firing used up its allowed duration
    FiringExpired,
    /// Firing reached its frame cap
    FrameLimit,
    /// Too many consecutive invalid firing frames
    TrackingLost,
    /// Explicit reset by the owner
    Reset,
}

/// Derived values at the moment of a transition
///
/// Exits to idle carry the final values of the phase that ended.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub charging_progress: f64,
    pub firing_progress: f64,
    #[serde(rename = "chargingDuration")]
    pub charging_duration_ms: f64,
    #[serde(rename = "allowedFiringDuration")]
    pub allowed_firing_duration_ms: f64,
    pub beam_direction: Option<BeamDirection>,
    /// Only while charging
    pub energy_sphere_center: Option<Vec2>,
}

/// A phase change, emitted in place of an observer callback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub from: Phase,
    pub to: Phase,
    pub reason: TransitionReason,
    pub at: FrameTime,
    pub telemetry: Telemetry,
}
