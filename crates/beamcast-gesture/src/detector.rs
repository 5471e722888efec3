//! Gesture detector - owns the state machine for one play session

use std::collections::VecDeque;
use std::mem;

use beamcast_core::{BeamcastResult, FrameTime, Hand, Vec2};

use crate::{
    step, DetectorConfig, DetectorState, FrameOutput, HandPositionHistory, Phase,
    TransitionEvent, TransitionReason,
};

/// Charge-and-fire gesture detector
///
/// Feed it one frame per render tick with [`GestureDetector::process_frame`]
/// and collect phase changes with [`GestureDetector::drain_events`].
#[derive(Debug, Clone)]
pub struct GestureDetector {
    state: DetectorState,
    config: DetectorConfig,
    events: VecDeque<TransitionEvent>,
    last_output: Option<FrameOutput>,
}

impl GestureDetector {
    /// Create a detector, rejecting inconsistent configuration
    pub fn new(config: DetectorConfig) -> BeamcastResult<Self> {
        config.validate()?;
        Ok(GestureDetector {
            state: DetectorState::new(&config.machine),
            config,
            events: VecDeque::new(),
            last_output: None,
        })
    }

    /// Process one frame of detected hands
    pub fn process_frame(&mut self, hands: &[Hand], now: FrameTime) -> FrameOutput {
        let state = mem::replace(&mut self.state, DetectorState::new(&self.config.machine));
        let result = step(state, hands, now, &self.config);

        self.state = result.state;
        self.events.extend(result.events);
        self.last_output = Some(result.output);
        result.output
    }

    /// Return to idle, clearing timers, counters and history
    pub fn reset(&mut self) {
        let now = self.state.last_frame_at.unwrap_or(FrameTime::ZERO);
        if !self.state.is_idle() {
            let telemetry = self.state.telemetry(now, &self.config.machine, None);
            self.events.push_back(TransitionEvent {
                from: self.state.phase,
                to: Phase::Idle,
                reason: TransitionReason::Reset,
                at: now,
                telemetry,
            });
        }
        self.state = DetectorState::new(&self.config.machine);
        self.last_output = None;
    }

    /// Take all transition events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Output of the most recent frame
    pub fn last_output(&self) -> Option<&FrameOutput> {
        self.last_output.as_ref()
    }

    pub fn history(&self) -> &HandPositionHistory {
        &self.state.history
    }

    /// Hand pair velocity in px/s over the history window
    pub fn hand_velocity(&self) -> Option<Vec2> {
        self.state.history.velocity()
    }
}
