//! Charging pose scoring
//!
//! Six independent criteria over a labeled hand pair:
//! 1. Wrist separation
//! 2. V-formation of the wrists around the sphere center
//! 3. Palm orientation toward the sphere center
//! 4. Wrist rotation (thumb heading)
//! 5. Finger spread
//! 6. Energy funnel
//!
//! The pose counts as charging once `pass_threshold` criteria hold. The bar
//! is deliberately low so noisy tracking keeps the charge alive.

use beamcast_core::{Hand, KeypointName, Vec2};
use serde::Serialize;
use tracing::trace;

use crate::score::mark;
use crate::{
    analyze_funnel, energy_sphere_center, measure_spread, ChargingCriterion, EnergyFunnel,
    LabeledHandPair, PoseConfig, PoseScore,
};

/// Heading of the wrist->thumb tip vector in degrees
pub fn thumb_heading(hand: &Hand, min_score: f32) -> Option<f32> {
    let wrist = hand.locate(KeypointName::Wrist, min_score)?;
    let thumb = hand.locate(KeypointName::ThumbTip, min_score)?;
    let offset = thumb - wrist;
    offset.try_normalize().map(|_| offset.angle_deg())
}

/// Full charging analysis of a hand pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingAnalysis {
    pub score: PoseScore<ChargingCriterion>,
    pub sphere_center: Option<Vec2>,
    pub funnel: EnergyFunnel,
}

impl ChargingAnalysis {
    pub fn is_valid(&self) -> bool {
        self.score.is_valid()
    }
}

/// Score a hand pair against the charging criteria
pub fn score_charging(pair: &LabeledHandPair<'_>, config: &PoseConfig) -> ChargingAnalysis {
    let t = &config.charging;
    let min = config.min_keypoint_score;
    let mut score = PoseScore::new(t.pass_threshold);

    let wrists = match (
        pair.left.locate(KeypointName::Wrist, min),
        pair.right.locate(KeypointName::Wrist, min),
    ) {
        (Some(l), Some(r)) => Some((l, r)),
        _ => None,
    };
    let center = energy_sphere_center(pair, config);

    // 1. Wrist separation
    match wrists {
        Some((l, r)) => {
            let d = l.distance(r);
            let ok = (t.wrist_distance_min..=t.wrist_distance_max).contains(&d);
            score.record(
                ChargingCriterion::WristSeparation,
                ok,
                format!("wrist separation {d:.1}px {}", mark(ok)),
            );
        }
        None => score.record(
            ChargingCriterion::WristSeparation,
            false,
            "wrist separation: wrist missing".to_string(),
        ),
    }

    // 2. V-formation
    let v_angle = wrists
        .zip(center)
        .and_then(|((l, r), c)| (c - l).angle_between_deg(c - r));
    match v_angle {
        Some(angle) => {
            let ok = (t.v_angle_min_deg..=t.v_angle_max_deg).contains(&angle);
            score.record(
                ChargingCriterion::VFormation,
                ok,
                format!("v-formation {angle:.1}° {}", mark(ok)),
            );
        }
        None => score.record(
            ChargingCriterion::VFormation,
            false,
            "v-formation: geometry unavailable".to_string(),
        ),
    }

    // 3. Palm orientation
    let palm_angles = center.and_then(|c| {
        let angle = |hand: &Hand| {
            let wrist = hand.locate(KeypointName::Wrist, min)?;
            let index = hand.locate(KeypointName::IndexFingerTip, min)?;
            (index - wrist).angle_between_deg(c - wrist)
        };
        Some((angle(pair.left)?, angle(pair.right)?))
    });
    match palm_angles {
        Some((l, r)) => {
            let ok = l < t.palm_angle_max_deg && r < t.palm_angle_max_deg;
            score.record(
                ChargingCriterion::PalmOrientation,
                ok,
                format!("palm orientation L {l:.1}° R {r:.1}° {}", mark(ok)),
            );
        }
        None => score.record(
            ChargingCriterion::PalmOrientation,
            false,
            "palm orientation: geometry unavailable".to_string(),
        ),
    }

    // 4. Wrist rotation
    match (thumb_heading(pair.left, min), thumb_heading(pair.right, min)) {
        (Some(l), Some(r)) => {
            let ok = (t.left_thumb_min_deg..=t.left_thumb_max_deg).contains(&l)
                && (t.right_thumb_min_deg..=t.right_thumb_max_deg).contains(&r);
            score.record(
                ChargingCriterion::WristRotation,
                ok,
                format!("wrist rotation L {l:.1}° R {r:.1}° {}", mark(ok)),
            );
        }
        _ => score.record(
            ChargingCriterion::WristRotation,
            false,
            "wrist rotation: thumb missing".to_string(),
        ),
    }

    // 5. Finger spread
    match (
        measure_spread(pair.left, t, min),
        measure_spread(pair.right, t, min),
    ) {
        (Some(l), Some(r)) => {
            let avg_spread = (l.total_spread + r.total_spread) / 2.0;
            let avg_intensity = (l.intensity + r.intensity) / 2.0;
            let ok = avg_spread > t.spread_min_px && avg_intensity > t.spread_intensity_min;
            score.record(
                ChargingCriterion::FingerSpread,
                ok,
                format!(
                    "finger spread {avg_spread:.1}px intensity {avg_intensity:.2} {}",
                    mark(ok)
                ),
            );
        }
        _ => score.record(
            ChargingCriterion::FingerSpread,
            false,
            "finger spread: fingertip missing".to_string(),
        ),
    }

    // 6. Energy funnel
    let funnel = match center {
        Some(c) => analyze_funnel(pair, c, config),
        None => EnergyFunnel {
            valid: false,
            quality: None,
            mean_angle_deg: None,
            left: None,
            right: None,
        },
    };
    let funnel_detail = match (funnel.quality, funnel.mean_angle_deg) {
        (Some(q), Some(a)) => format!("energy funnel {q:?} ({a:.1}°) ok"),
        (None, Some(a)) => format!("energy funnel ({a:.1}°) fail"),
        _ => "energy funnel: geometry unavailable".to_string(),
    };
    score.record(ChargingCriterion::EnergyFunnel, funnel.valid, funnel_detail);

    trace!(
        score = score.score,
        valid = score.is_valid(),
        "charging pose scored"
    );

    ChargingAnalysis {
        score,
        sphere_center: center,
        funnel,
    }
}

/// Whether a hand pair holds a valid charging pose
pub fn is_in_starting_position(pair: &LabeledHandPair<'_>, config: &PoseConfig) -> bool {
    score_charging(pair, config).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamcast_core::Keypoint;

    fn kp(name: KeypointName, x: f32, y: f32) -> Keypoint {
        Keypoint::new(name, x, y)
    }

    /// Cupped hands, wrists 40px apart, fingertips converging between them
    fn charging_pair() -> (Hand, Hand) {
        use KeypointName::*;
        let left = Hand::new(vec![
            kp(Wrist, 300.0, 300.0),
            kp(ThumbTip, 270.0, 351.96),
            kp(IndexFingerTip, 325.0, 300.0),
            kp(MiddleFingerTip, 325.0, 290.0),
            kp(RingFingerTip, 290.0, 240.0),
            kp(PinkyFingerTip, 260.0, 250.0),
        ]);
        let right = Hand::new(vec![
            kp(Wrist, 340.0, 300.0),
            kp(ThumbTip, 370.0, 351.96),
            kp(IndexFingerTip, 315.0, 300.0),
            kp(MiddleFingerTip, 315.0, 290.0),
            kp(RingFingerTip, 350.0, 240.0),
            kp(PinkyFingerTip, 380.0, 250.0),
        ]);
        (left, right)
    }

    fn shift(hand: &Hand, dx: f32) -> Hand {
        let mut moved = hand.clone();
        for kp in &mut moved.keypoints {
            kp.x += dx;
        }
        moved
    }

    #[test]
    fn test_full_charging_pose_scores_six() {
        let (left, right) = charging_pair();
        let pair = LabeledHandPair { left: &left, right: &right };
        let analysis = score_charging(&pair, &PoseConfig::new());

        assert_eq!(analysis.score.score, 6, "{:?}", analysis.score.details);
        assert!(analysis.is_valid());
        assert_eq!(analysis.score.details.len(), 6);
        assert!(is_in_starting_position(&pair, &PoseConfig::new()));
    }

    #[test]
    fn test_wrists_too_far_apart_fail_separation() {
        let (left, right) = charging_pair();
        let left = shift(&left, -100.0);
        let right = shift(&right, 120.0);
        let pair = LabeledHandPair { left: &left, right: &right };
        let analysis = score_charging(&pair, &PoseConfig::new());

        // Every other criterion still holds, so the pose stays valid
        assert!(!analysis.score.satisfies(ChargingCriterion::WristSeparation));
        assert_eq!(analysis.score.score, 5, "{:?}", analysis.score.details);
        assert!(analysis.is_valid());
    }

    #[test]
    fn test_missing_keypoints_fail_criteria_without_panicking() {
        let left = Hand::new(vec![kp(KeypointName::Wrist, 300.0, 300.0)]);
        let right = Hand::new(vec![kp(KeypointName::Wrist, 340.0, 300.0)]);
        let pair = LabeledHandPair { left: &left, right: &right };
        let analysis = score_charging(&pair, &PoseConfig::new());

        // Only wrist separation can be judged
        assert_eq!(analysis.score.score, 1);
        assert!(!analysis.is_valid());
        assert!(analysis.sphere_center.is_none());
    }

    #[test]
    fn test_low_confidence_keypoints_are_ignored() {
        let (mut left, right) = charging_pair();
        for kp in &mut left.keypoints {
            kp.score = Some(0.1);
        }
        let pair = LabeledHandPair { left: &left, right: &right };
        let config = PoseConfig::new().with_min_keypoint_score(0.5);

        let analysis = score_charging(&pair, &config);
        assert_eq!(analysis.score.score, 0);
    }

    #[test]
    fn test_thumb_heading() {
        let hand = Hand::new(vec![
            kp(KeypointName::Wrist, 0.0, 0.0),
            kp(KeypointName::ThumbTip, 0.0, 10.0),
        ]);
        assert!((thumb_heading(&hand, 0.0).unwrap() - 90.0).abs() < 1e-4);

        let degenerate = Hand::new(vec![
            kp(KeypointName::Wrist, 5.0, 5.0),
            kp(KeypointName::ThumbTip, 5.0, 5.0),
        ]);
        assert!(thumb_heading(&degenerate, 0.0).is_none());
    }

    fn set(hand: &mut Hand, name: KeypointName, x: f32, y: f32) {
        for kp in &mut hand.keypoints {
            if kp.name == name {
                kp.x = x;
                kp.y = y;
            }
        }
    }

    /// Charging pair with both hands' index and middle tips moved together,
    /// `dx` inward from each wrist and `dy` below the wrist line
    fn with_tips(dx: f32, dy: f32) -> (Hand, Hand) {
        let (mut left, mut right) = charging_pair();
        set(&mut left, KeypointName::IndexFingerTip, 300.0 + dx, 300.0 + dy);
        set(&mut left, KeypointName::MiddleFingerTip, 300.0 + dx, 290.0 + dy);
        set(&mut right, KeypointName::IndexFingerTip, 340.0 - dx, 300.0 + dy);
        set(&mut right, KeypointName::MiddleFingerTip, 340.0 - dx, 290.0 + dy);
        (left, right)
    }

    fn failed(analysis: &ChargingAnalysis) -> Vec<ChargingCriterion> {
        ChargingCriterion::ALL
            .into_iter()
            .filter(|c| !analysis.score.satisfies(*c))
            .collect()
    }

    fn wrists_apart(distance: f32) -> (Hand, Hand) {
        (
            Hand::new(vec![kp(KeypointName::Wrist, 300.0, 300.0)]),
            Hand::new(vec![kp(KeypointName::Wrist, 300.0 + distance, 300.0)]),
        )
    }

    #[test]
    fn test_wrist_separation_bounds_are_inclusive() {
        let cases = [
            (29.5, false),
            (30.0, true),
            (75.0, true),
            (120.0, true),
            (120.5, false),
        ];
        for (distance, expected) in cases {
            let (left, right) = wrists_apart(distance);
            let pair = LabeledHandPair { left: &left, right: &right };
            let analysis = score_charging(&pair, &PoseConfig::new());
            assert_eq!(
                analysis.score.satisfies(ChargingCriterion::WristSeparation),
                expected,
                "distance {distance}"
            );
        }
    }

    #[test]
    fn test_v_formation_bounds() {
        // Tips straight above the wrist midpoint; lower tips widen the V
        let cases = [(-12.5, false), (-10.5, true), (5.0, true)];
        for (dy, expected) in cases {
            let (left, right) = with_tips(20.0, dy);
            let pair = LabeledHandPair { left: &left, right: &right };
            let analysis = score_charging(&pair, &PoseConfig::new());
            assert_eq!(
                analysis.score.satisfies(ChargingCriterion::VFormation),
                expected,
                "dy {dy}: {:?}",
                analysis.score.details
            );
        }
    }

    #[test]
    fn test_v_formation_minimum_is_inclusive() {
        let (left, right) = with_tips(20.0, -20.0);
        let pair = LabeledHandPair { left: &left, right: &right };
        let mut config = PoseConfig::new();
        let center = energy_sphere_center(&pair, &config).unwrap();
        let angle = (center - left.wrist().unwrap())
            .angle_between_deg(center - right.wrist().unwrap())
            .unwrap();

        config.charging.v_angle_min_deg = angle;
        let at_min = score_charging(&pair, &config);
        assert!(at_min.score.satisfies(ChargingCriterion::VFormation));

        config.charging.v_angle_min_deg = angle + 0.01;
        let below_min = score_charging(&pair, &config);
        assert!(!below_min.score.satisfies(ChargingCriterion::VFormation));
    }

    #[test]
    fn test_v_formation_fails_alone() {
        let (left, right) = with_tips(20.0, -40.0);
        let pair = LabeledHandPair { left: &left, right: &right };
        let analysis = score_charging(&pair, &PoseConfig::new());

        assert_eq!(failed(&analysis), vec![ChargingCriterion::VFormation]);
        assert!(analysis.is_valid());
    }

    #[test]
    fn test_outward_fingers_fail_palm_and_funnel_angle() {
        // The funnel shares the palm angle, so the two fail together
        let (left, right) = with_tips(-40.0, -10.0);
        let pair = LabeledHandPair { left: &left, right: &right };
        let analysis = score_charging(&pair, &PoseConfig::new());

        assert_eq!(
            failed(&analysis),
            vec![ChargingCriterion::PalmOrientation, ChargingCriterion::EnergyFunnel]
        );
        let left_funnel = analysis.funnel.left.unwrap();
        assert!(left_funnel.convergence_angle_deg > 45.0);
    }

    #[test]
    fn test_overreaching_fingertips_fail_funnel_alone() {
        // Tips cross past the sphere center: still aimed at it, but no narrower
        let (left, right) = with_tips(50.0, -5.0);
        let pair = LabeledHandPair { left: &left, right: &right };
        let analysis = score_charging(&pair, &PoseConfig::new());

        assert_eq!(failed(&analysis), vec![ChargingCriterion::EnergyFunnel]);
        let left_funnel = analysis.funnel.left.unwrap();
        assert!(!left_funnel.converging);
        assert!(left_funnel.convergence_angle_deg < 45.0);
        assert!(analysis.funnel.quality.is_none());
    }

    fn with_thumbs(left_deg: f32, right_deg: f32) -> (Hand, Hand) {
        let (mut left, mut right) = charging_pair();
        let (l, r) = (left_deg.to_radians(), right_deg.to_radians());
        set(&mut left, KeypointName::ThumbTip, 300.0 + 50.0 * l.cos(), 300.0 + 50.0 * l.sin());
        set(&mut right, KeypointName::ThumbTip, 340.0 + 50.0 * r.cos(), 300.0 + 50.0 * r.sin());
        (left, right)
    }

    #[test]
    fn test_thumb_heading_ranges() {
        let cases = [
            ((89.0, 60.0), false),
            ((91.0, 60.0), true),
            ((149.0, 60.0), true),
            ((151.0, 60.0), false),
            ((120.0, 29.0), false),
            ((120.0, 31.0), true),
            ((120.0, 89.0), true),
            ((120.0, 91.0), false),
        ];
        for ((l, r), expected) in cases {
            let (left, right) = with_thumbs(l, r);
            let pair = LabeledHandPair { left: &left, right: &right };
            let analysis = score_charging(&pair, &PoseConfig::new());
            assert_eq!(
                analysis.score.satisfies(ChargingCriterion::WristRotation),
                expected,
                "left {l}° right {r}°"
            );
        }
    }

    #[test]
    fn test_thumb_heading_ranges_are_inclusive() {
        let (left, right) = with_thumbs(120.0, 60.0);
        let pair = LabeledHandPair { left: &left, right: &right };
        let l = thumb_heading(&left, 0.0).unwrap();
        let r = thumb_heading(&right, 0.0).unwrap();

        let mut config = PoseConfig::new();
        config.charging.left_thumb_min_deg = l;
        config.charging.right_thumb_max_deg = r;
        assert!(score_charging(&pair, &config)
            .score
            .satisfies(ChargingCriterion::WristRotation));

        config.charging.left_thumb_min_deg = l + 0.01;
        assert!(!score_charging(&pair, &config)
            .score
            .satisfies(ChargingCriterion::WristRotation));

        config.charging.left_thumb_min_deg = l;
        config.charging.right_thumb_max_deg = r - 0.01;
        assert!(!score_charging(&pair, &config)
            .score
            .satisfies(ChargingCriterion::WristRotation));
    }
}
