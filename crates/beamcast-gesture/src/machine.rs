//! Gesture state machine
//!
//! `step` is a pure reducer: it consumes the previous state, one frame of
//! hands and a timestamp, and returns the next state, the frame output and
//! any transitions that happened. It never fails; anything unusable in the
//! frame degrades to an invalid pose or a reset to idle.
//!
//! Transition table:
//!
//! | From        | Guard                                         | To          |
//! |-------------|-----------------------------------------------|-------------|
//! | any         | not exactly two hands                         | idle        |
//! | idle        | charging pose valid                           | positioning |
//! | positioning | charging pose valid, held `positioning_frames`| charging    |
//! | positioning | charging pose invalid                         | idle        |
//! | charging    | charging pose valid, charge >= `max_charge_ms`| idle        |
//! | charging    | firing pose valid, charge >= `min_charge_ms`  | firing      |
//! | charging    | otherwise, unless charging pose valid         | idle        |
//! | firing      | `invalid_streak_limit` invalid frames in a row| idle        |
//! | firing      | allowed duration or frame cap reached         | idle        |

use beamcast_aim::{estimate_continuous, estimate_lock_in};
use beamcast_core::{FrameTime, Hand, Vec2};
use beamcast_pose::{identify, score_charging, score_firing, LabeledHandPair};
use tracing::{debug, warn};

use crate::{DetectorConfig, DetectorState, FrameOutput, Phase, TransitionEvent, TransitionReason};

/// Result of one reducer step
#[derive(Debug, Clone)]
pub struct Step {
    pub state: DetectorState,
    pub output: FrameOutput,
    /// Transitions taken during this frame, in order
    pub events: Vec<TransitionEvent>,
}

struct Reducer<'a> {
    state: DetectorState,
    events: Vec<TransitionEvent>,
    now: FrameTime,
    config: &'a DetectorConfig,
}

impl Reducer<'_> {
    /// Move into `to`; counters for the new phase must already be set
    fn enter(&mut self, to: Phase, reason: TransitionReason, sphere_center: Option<Vec2>) {
        let from = self.state.phase;
        self.state.phase = to;
        self.state.phase_entered_at = self.now;
        let telemetry = self
            .state
            .telemetry(self.now, &self.config.machine, sphere_center);
        self.record(TransitionEvent {
            from,
            to,
            reason,
            at: self.now,
            telemetry,
        });
    }

    /// Drop back to idle, reporting the final values of the abandoned phase
    fn abandon(&mut self, reason: TransitionReason, sphere_center: Option<Vec2>) {
        let telemetry = self
            .state
            .telemetry(self.now, &self.config.machine, sphere_center);
        let from = self.state.phase;
        self.state.reset_phase();
        self.record(TransitionEvent {
            from,
            to: Phase::Idle,
            reason,
            at: self.now,
            telemetry,
        });
    }

    fn record(&mut self, event: TransitionEvent) {
        debug!(
            from = %event.from,
            to = %event.to,
            reason = ?event.reason,
            charging_ms = event.telemetry.charging_duration_ms,
            allowed_firing_ms = event.telemetry.allowed_firing_duration_ms,
            "gesture transition"
        );
        self.events.push(event);
    }

    fn idle(&mut self, pair: Option<&LabeledHandPair<'_>>) -> Option<Vec2> {
        let analysis = pair.map(|p| score_charging(p, &self.config.pose))?;
        if analysis.is_valid() {
            self.state.positioning_frame_count = 1;
            self.enter(
                Phase::Positioning,
                TransitionReason::PoseDetected,
                analysis.sphere_center,
            );
        }
        analysis.sphere_center
    }

    fn positioning(&mut self, pair: Option<&LabeledHandPair<'_>>) -> Option<Vec2> {
        let analysis = pair.map(|p| score_charging(p, &self.config.pose));
        let center = analysis.as_ref().and_then(|a| a.sphere_center);

        if !analysis.as_ref().is_some_and(|a| a.is_valid()) {
            self.abandon(TransitionReason::PoseLost, center);
            return center;
        }

        self.state.positioning_frame_count += 1;
        if self.state.positioning_frame_count >= self.config.machine.positioning_frames {
            self.state.charging_duration_ms = 0.0;
            self.state.charge_anchor = center;
            self.enter(Phase::Charging, TransitionReason::PositionHeld, center);
        }
        center
    }

    fn charging(&mut self, pair: Option<&LabeledHandPair<'_>>) -> Option<Vec2> {
        let Some(pair) = pair else {
            self.abandon(TransitionReason::PoseLost, None);
            return None;
        };
        let config = self.config;
        let machine = &config.machine;
        let analysis = score_charging(pair, &config.pose);
        let center = analysis.sphere_center;

        if analysis.is_valid() {
            self.state.charging_duration_ms = self.now.millis_since(self.state.phase_entered_at);
            if self.state.charging_duration_ms >= machine.max_charge_ms {
                self.abandon(TransitionReason::OverCharged, center);
            }
            return center;
        }

        let charged = self.state.charging_duration_ms >= machine.min_charge_ms;
        if charged && score_firing(pair, &config.pose).is_valid() {
            self.state.allowed_firing_duration_ms =
                machine.allowed_firing_duration_ms(self.state.charging_duration_ms);
            self.state.last_beam_direction =
                Some(estimate_lock_in(pair, center, &config.direction));
            self.state.firing_frame_count = 1;
            self.state.firing_invalid_streak = 0;
            self.enter(Phase::Firing, TransitionReason::Released, center);
        } else {
            self.abandon(TransitionReason::PoseLost, center);
        }
        center
    }

    fn firing(&mut self, pair: Option<&LabeledHandPair<'_>>) {
        let config = self.config;
        let machine = &config.machine;
        let valid = pair.is_some_and(|p| score_firing(p, &config.pose).is_valid());

        self.state.firing_frame_count += 1;
        if valid {
            self.state.firing_invalid_streak = 0;
            // Keep the previous aim when fingertips drop out
            if let Some(direction) = pair.and_then(|p| estimate_continuous(p, &config.direction)) {
                self.state.last_beam_direction = Some(direction);
            }
        } else {
            self.state.firing_invalid_streak += 1;
            if self.state.firing_invalid_streak >= machine.invalid_streak_limit {
                self.abandon(TransitionReason::TrackingLost, None);
                return;
            }
        }

        let elapsed = self.now.millis_since(self.state.phase_entered_at);
        if elapsed >= self.state.allowed_firing_duration_ms {
            self.abandon(TransitionReason::FiringExpired, None);
        } else if self.state.firing_frame_count >= machine.max_firing_frames {
            self.abandon(TransitionReason::FrameLimit, None);
        }
    }
}

/// Advance the state machine by one frame
pub fn step(
    state: DetectorState,
    hands: &[Hand],
    now: FrameTime,
    config: &DetectorConfig,
) -> Step {
    let mut reducer = Reducer {
        state,
        events: Vec::new(),
        now,
        config,
    };

    if let Some(previous) = reducer.state.last_frame_at {
        if now < previous {
            warn!(?previous, ?now, "frame timestamp went backwards");
        }
    }
    reducer.state.last_frame_at = Some(now);

    if hands.len() != 2 {
        reducer.state.history.clear();
        if reducer.state.is_idle() {
            reducer.state.reset_phase();
        } else {
            reducer.abandon(TransitionReason::HandsLost, None);
        }
        let output = FrameOutput::from_state(&reducer.state, now, &config.machine, None);
        return Step {
            state: reducer.state,
            output,
            events: reducer.events,
        };
    }

    let pair = identify(hands);
    if let Some(center) = pair.as_ref().and_then(|p| p.wrist_midpoint()) {
        reducer.state.history.push(center, now);
    }

    let pair = pair.as_ref();
    let sphere_center = match reducer.state.phase {
        Phase::Idle => reducer.idle(pair),
        Phase::Positioning => reducer.positioning(pair),
        Phase::Charging => reducer.charging(pair),
        Phase::Firing => {
            reducer.firing(pair);
            None
        }
    };

    let output = FrameOutput::from_state(&reducer.state, now, &config.machine, sphere_center);
    Step {
        state: reducer.state,
        output,
        events: reducer.events,
    }
}
