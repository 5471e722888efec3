//! Multi-criterion pose scores

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Charging pose criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChargingCriterion {
    WristSeparation,
    VFormation,
    PalmOrientation,
    WristRotation,
    FingerSpread,
    EnergyFunnel,
}

impl ChargingCriterion {
    pub const ALL: [ChargingCriterion; 6] = [
        ChargingCriterion::WristSeparation,
        ChargingCriterion::VFormation,
        ChargingCriterion::PalmOrientation,
        ChargingCriterion::WristRotation,
        ChargingCriterion::FingerSpread,
        ChargingCriterion::EnergyFunnel,
    ];
}

/// Firing pose criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FiringCriterion {
    FingersCurved,
    HandsAligned,
    WristsRotatedInward,
    SphereFormation,
}

impl FiringCriterion {
    pub const ALL: [FiringCriterion; 4] = [
        FiringCriterion::FingersCurved,
        FiringCriterion::HandsAligned,
        FiringCriterion::WristsRotatedInward,
        FiringCriterion::SphereFormation,
    ];
}

/// Result of scoring a hand pair against a set of criteria
///
/// `details` holds one human-readable line per evaluated criterion; it is
/// diagnostic data only and never drives control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseScore<C: Ord> {
    /// Number of satisfied criteria
    pub score: u8,
    pub satisfied: BTreeSet<C>,
    pub details: Vec<String>,
    /// Satisfied criteria needed for validity
    pub threshold: u8,
}

impl<C: Ord + Copy> PoseScore<C> {
    pub fn new(threshold: u8) -> Self {
        Self {
            score: 0,
            satisfied: BTreeSet::new(),
            details: Vec::new(),
            threshold,
        }
    }

    /// Record the outcome of one criterion
    pub fn record(&mut self, criterion: C, passed: bool, detail: String) {
        if passed && self.satisfied.insert(criterion) {
            self.score += 1;
        }
        self.details.push(detail);
    }

    pub fn satisfies(&self, criterion: C) -> bool {
        self.satisfied.contains(&criterion)
    }

    pub fn is_valid(&self) -> bool {
        self.score >= self.threshold
    }
}

/// Render a pass/fail marker for detail lines
pub(crate) fn mark(passed: bool) -> &'static str {
    if passed {
        "ok"
    } else {
        "fail"
    }
}
