//! Scripted play sessions
//!
//! Drives a `GestureDetector` through segments of poses at a fixed frame
//! rate and summarizes what the player would have seen.

use std::collections::HashMap;

use beamcast_core::{BeamcastResult, FrameTime, Hand};
use beamcast_gesture::{
    DetectorConfig, FrameOutput, GestureDetector, Phase, TransitionEvent, TransitionReason,
};
use serde::Serialize;

use crate::{JitterModel, PoseFixture};

/// What the player's hands do during a segment
#[derive(Clone, Debug)]
pub enum SegmentPose {
    Charging,
    Firing,
    Neutral,
    NoHands,
    SingleHand,
    Custom(Vec<Hand>),
}

impl SegmentPose {
    pub fn hands(&self) -> Vec<Hand> {
        match self {
            SegmentPose::Charging => PoseFixture::charging().hands(),
            SegmentPose::Firing => PoseFixture::firing().hands(),
            SegmentPose::Neutral => PoseFixture::neutral().hands(),
            SegmentPose::NoHands => Vec::new(),
            SegmentPose::SingleHand => vec![PoseFixture::charging().left],
            SegmentPose::Custom(hands) => hands.clone(),
        }
    }
}

/// A pose held for a number of frames
#[derive(Clone, Debug)]
pub struct Segment {
    pub pose: SegmentPose,
    pub frames: u32,
}

impl Segment {
    pub fn new(pose: SegmentPose, frames: u32) -> Self {
        Segment { pose, frames }
    }

    /// Hold a pose for a wall-clock duration at the given rate
    pub fn held_for(pose: SegmentPose, millis: u32, fps: f64) -> Self {
        let frames = (f64::from(millis) * fps / 1000.0).ceil() as u32;
        Segment { pose, frames }
    }
}

/// Session summary
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionReport {
    pub frames: u64,
    /// Frames whose output reported each phase
    pub phase_counts: HashMap<Phase, u64>,
    pub transitions: Vec<TransitionEvent>,
    /// Charges released into a beam
    pub fired: u32,
    /// Longest charge observed
    pub max_charging_ms: f64,
    /// Allowed firing duration of each release
    pub firing_budgets_ms: Vec<f64>,
}

impl SessionReport {
    pub fn frames_in(&self, phase: Phase) -> u64 {
        self.phase_counts.get(&phase).copied().unwrap_or(0)
    }

    pub fn count(&self, reason: TransitionReason) -> usize {
        self.transitions.iter().filter(|e| e.reason == reason).count()
    }

    fn observe(&mut self, output: &FrameOutput, events: Vec<TransitionEvent>) {
        self.frames += 1;
        *self.phase_counts.entry(output.state).or_insert(0) += 1;
        self.max_charging_ms = self.max_charging_ms.max(output.charging_duration_ms);
        for event in events {
            if event.reason == TransitionReason::Released {
                self.fired += 1;
                self.firing_budgets_ms
                    .push(event.telemetry.allowed_firing_duration_ms);
            }
            self.transitions.push(event);
        }
    }
}

/// Fixed-rate session driver
pub struct SessionSimulator {
    detector: GestureDetector,
    jitter: Option<JitterModel>,
    fps: f64,
    frame_index: u64,
    outputs: Vec<FrameOutput>,
}

impl SessionSimulator {
    pub fn new(config: DetectorConfig, fps: f64) -> BeamcastResult<Self> {
        Ok(SessionSimulator {
            detector: GestureDetector::new(config)?,
            jitter: None,
            fps: fps.max(1.0),
            frame_index: 0,
            outputs: Vec::new(),
        })
    }

    /// Degrade every frame through a jitter model
    pub fn with_jitter(mut self, jitter: JitterModel) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Timestamp of the next frame
    pub fn now(&self) -> FrameTime {
        self.frame_time(self.frame_index)
    }

    /// Timestamp of the frame at `index`
    pub fn frame_time(&self, index: u64) -> FrameTime {
        FrameTime::from_secs_f64(index as f64 / self.fps)
    }

    /// Feed one frame, returning the detector output and its transitions
    pub fn tick(&mut self, hands: &[Hand]) -> (FrameOutput, Vec<TransitionEvent>) {
        let now = self.now();
        let hands = match self.jitter.as_mut() {
            Some(jitter) => jitter.apply(hands),
            None => hands.to_vec(),
        };
        let output = self.detector.process_frame(&hands, now);
        self.frame_index += 1;
        self.outputs.push(output);
        (output, self.detector.drain_events())
    }

    /// Play segments back to back
    pub fn run(&mut self, segments: &[Segment]) -> SessionReport {
        let mut report = SessionReport::default();
        for segment in segments {
            let hands = segment.pose.hands();
            for _ in 0..segment.frames {
                let (output, events) = self.tick(&hands);
                report.observe(&output, events);
            }
        }
        report
    }

    pub fn detector(&self) -> &GestureDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut GestureDetector {
        &mut self.detector
    }

    /// Every output so far, in frame order
    pub fn outputs(&self) -> &[FrameOutput] {
        &self.outputs
    }

    pub fn jitter(&self) -> Option<&JitterModel> {
        self.jitter.as_ref()
    }
}
