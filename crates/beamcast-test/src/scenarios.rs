//! End-to-end gesture scenarios
//!
//! Scripted charge-and-fire sessions played through the full detector,
//! with every frame checked against the state machine's guarantees:
//! - Progress values stay in [0, 1]
//! - Transitions form an unbroken chain
//! - Phases are only entered from their predecessor
//! - Released charges respect the minimum charge and the firing budget

use beamcast_core::{BeamcastResult, FrameTime};
use beamcast_gesture::{
    DetectorConfig, FrameOutput, MachineConfig, Phase, TransitionEvent, TransitionReason,
};

use crate::{JitterConfig, JitterModel, Segment, SegmentPose, SessionReport, SessionSimulator};

// ============================================================================
// SCRIPTS
// ============================================================================

/// Hold the charging pose for `charge_ms` past positioning, then release
///
/// The charging segment is sized so the last charging frame lands exactly
/// `charge_ms` after the charging phase began. The firing pose is then held
/// for `fire_ms` and the hands drop to a neutral rest for half a second.
pub fn charge_and_release(
    machine: &MachineConfig,
    fps: f64,
    charge_ms: u32,
    fire_ms: u32,
) -> Vec<Segment> {
    let charge_frames = (f64::from(charge_ms) * fps / 1000.0).round() as u32;
    vec![
        Segment::new(SegmentPose::Charging, machine.positioning_frames + charge_frames),
        Segment::held_for(SegmentPose::Firing, fire_ms, fps),
        Segment::held_for(SegmentPose::Neutral, 500, fps),
    ]
}

// ============================================================================
// SCENARIO HARNESS
// ============================================================================

/// Configuration for a scripted scenario
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub detector: DetectorConfig,
    /// Camera frame rate
    pub fps: f64,
    /// Charge held past positioning
    pub charge_ms: u32,
    /// Firing pose hold time
    pub fire_ms: u32,
    /// Tracking degradation, if any
    pub jitter: Option<JitterConfig>,
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            fps: 30.0,
            charge_ms: 8000,
            fire_ms: 5000,
            jitter: None,
            seed: 0,
        }
    }
}

impl ScenarioConfig {
    /// Short charges against the quick-charge tuning
    pub fn quick() -> Self {
        Self {
            detector: DetectorConfig::quick_charge(),
            charge_ms: 2000,
            fire_ms: 3000,
            ..Self::default()
        }
    }

    /// Degrade every frame through a seeded jitter model
    pub fn with_jitter(mut self, jitter: JitterConfig, seed: u64) -> Self {
        self.jitter = Some(jitter);
        self.seed = seed;
        self
    }

    pub fn with_charge_ms(mut self, charge_ms: u32) -> Self {
        self.charge_ms = charge_ms;
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }
}

/// Result of a scenario run
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub report: SessionReport,
    /// Every frame output in order
    pub outputs: Vec<FrameOutput>,
    /// Timestamp of each output
    pub frame_times: Vec<FrameTime>,
    /// Broken guarantees, one line each
    pub violations: Vec<String>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Frame index at which the first transition with `reason` happened
    pub fn frame_of(&self, reason: TransitionReason) -> Option<usize> {
        let at = self.report.transitions.iter().find(|e| e.reason == reason)?.at;
        self.frame_times.iter().position(|&t| t == at)
    }
}

/// Scenario harness
pub struct ScenarioHarness {
    config: ScenarioConfig,
    simulator: SessionSimulator,
}

impl ScenarioHarness {
    pub fn new(config: ScenarioConfig) -> BeamcastResult<Self> {
        let mut simulator = SessionSimulator::new(config.detector.clone(), config.fps)?;
        if let Some(jitter) = config.jitter.clone() {
            simulator = simulator.with_jitter(JitterModel::new(jitter, config.seed));
        }
        Ok(Self { config, simulator })
    }

    /// Play the charge-and-release script
    pub fn run(&mut self) -> ScenarioResult {
        let script = charge_and_release(
            &self.config.detector.machine,
            self.config.fps,
            self.config.charge_ms,
            self.config.fire_ms,
        );
        self.run_script(&script)
    }

    /// Play an arbitrary script and check every frame
    pub fn run_script(&mut self, script: &[Segment]) -> ScenarioResult {
        let start = self.simulator.outputs().len();
        let initial = self.simulator.detector().phase();
        let report = self.simulator.run(script);
        let outputs = self.simulator.outputs()[start..].to_vec();
        let frame_times = (start..start + outputs.len())
            .map(|i| self.simulator.frame_time(i as u64))
            .collect();
        let machine = &self.config.detector.machine;

        let mut violations = Vec::new();
        for (i, output) in outputs.iter().enumerate() {
            check_output(i, output, machine, &mut violations);
        }
        check_transitions(initial, &report.transitions, machine, &mut violations);

        ScenarioResult {
            report,
            outputs,
            frame_times,
            violations,
        }
    }

    pub fn simulator(&self) -> &SessionSimulator {
        &self.simulator
    }
}

fn check_output(
    frame: usize,
    output: &FrameOutput,
    machine: &MachineConfig,
    violations: &mut Vec<String>,
) {
    if !(0.0..=1.0).contains(&output.charging_progress) {
        violations.push(format!(
            "frame {frame}: charging progress {} out of range",
            output.charging_progress
        ));
    }
    if !(0.0..=1.0).contains(&output.firing_progress) {
        violations.push(format!(
            "frame {frame}: firing progress {} out of range",
            output.firing_progress
        ));
    }
    if output.state == Phase::Firing {
        let ceiling = machine.firing_ceiling_ms.max(machine.firing_floor_ms);
        let allowed = output.allowed_firing_duration_ms;
        if allowed < machine.firing_floor_ms || allowed > ceiling {
            violations.push(format!(
                "frame {frame}: firing budget {allowed} ms outside [{}, {ceiling}]",
                machine.firing_floor_ms
            ));
        }
        if output.firing_frame_count >= machine.max_firing_frames {
            violations.push(format!(
                "frame {frame}: still firing after {} frames",
                output.firing_frame_count
            ));
        }
        if !output.firing_direction.is_finite() {
            violations.push(format!("frame {frame}: non-finite beam direction"));
        }
    }
}

fn check_transitions(
    initial: Phase,
    events: &[TransitionEvent],
    machine: &MachineConfig,
    violations: &mut Vec<String>,
) {
    let mut current = initial;
    for event in events {
        if event.from != current {
            violations.push(format!(
                "{:?} left {} but the detector was in {}",
                event.reason, event.from, current
            ));
        }
        let expected_from = match event.to {
            Phase::Idle => None,
            Phase::Positioning => Some(Phase::Idle),
            Phase::Charging => Some(Phase::Positioning),
            Phase::Firing => Some(Phase::Charging),
        };
        if let Some(expected) = expected_from {
            if event.from != expected {
                violations.push(format!("{} entered from {}", event.to, event.from));
            }
        }
        if event.reason == TransitionReason::Released {
            let charged = event.telemetry.charging_duration_ms;
            if charged < machine.min_charge_ms {
                violations.push(format!("released after only {charged} ms of charge"));
            }
            let expected = machine.allowed_firing_duration_ms(charged);
            if (event.telemetry.allowed_firing_duration_ms - expected).abs() > 1e-6 {
                violations.push(format!(
                    "budget {} ms for a {charged} ms charge, expected {expected} ms",
                    event.telemetry.allowed_firing_duration_ms
                ));
            }
        }
        current = event.to;
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

/// Full eight second charge released into a beam
pub fn scenario_full_charge() -> BeamcastResult<ScenarioResult> {
    Ok(ScenarioHarness::new(ScenarioConfig::default())?.run())
}

/// Short charge that burns out on its time budget
pub fn scenario_quick_charge() -> BeamcastResult<ScenarioResult> {
    Ok(ScenarioHarness::new(ScenarioConfig::quick())?.run())
}

/// Full charge under landmark noise
pub fn scenario_with_jitter(jitter: JitterConfig, seed: u64) -> BeamcastResult<ScenarioResult> {
    let config = ScenarioConfig::default().with_jitter(jitter, seed);
    Ok(ScenarioHarness::new(config)?.run())
}
