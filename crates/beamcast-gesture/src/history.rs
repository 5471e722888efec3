//! Rolling hand position history

use std::collections::VecDeque;

use beamcast_core::{FrameTime, Vec2};
use serde::{Deserialize, Serialize};

/// Hand pair center at one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Wrist midpoint of the labeled pair
    pub center: Vec2,
    pub at: FrameTime,
}

/// Bounded buffer of recent hand centers, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHistory")]
pub struct HandPositionHistory {
    samples: VecDeque<PositionSample>,
    capacity: usize,
}

/// Wire form, bounded on the way in
#[derive(Deserialize)]
struct RawHistory {
    samples: VecDeque<PositionSample>,
    capacity: usize,
}

impl From<RawHistory> for HandPositionHistory {
    fn from(raw: RawHistory) -> Self {
        let mut history = HandPositionHistory {
            samples: raw.samples,
            capacity: raw.capacity.max(1),
        };
        history.evict_to(history.capacity);
        history
    }
}

impl HandPositionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        HandPositionHistory {
            samples: VecDeque::new(),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, center: Vec2, at: FrameTime) {
        self.evict_to(self.capacity.saturating_sub(1));
        self.samples.push_back(PositionSample { center, at });
    }

    fn evict_to(&mut self, len: usize) {
        while self.samples.len() > len {
            self.samples.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&PositionSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionSample> {
        self.samples.iter()
    }

    /// Mean center over the buffer
    pub fn average_center(&self) -> Option<Vec2> {
        if self.samples.is_empty() {
            return None;
        }
        let sum = self
            .samples
            .iter()
            .fold(Vec2::zero(), |acc, s| acc + s.center);
        Some(sum * (1.0 / self.samples.len() as f32))
    }

    /// Velocity between the oldest and newest sample in px/s
    pub fn velocity(&self) -> Option<Vec2> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;
        let secs = last.at.millis_since(first.at) / 1000.0;
        if self.samples.len() < 2 || secs <= 0.0 {
            return None;
        }
        Some((last.center - first.center) * (1.0 / secs as f32))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = HandPositionHistory::new(3);
        for i in 0..5 {
            history.push(Vec2::new(i as f32, 0.0), FrameTime::from_millis(i * 10));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().next().unwrap().center.x, 2.0);
        assert_eq!(history.latest().unwrap().center.x, 4.0);
    }

    #[test]
    fn test_average_center() {
        let mut history = HandPositionHistory::new(10);
        assert!(history.average_center().is_none());

        history.push(Vec2::new(0.0, 0.0), FrameTime::ZERO);
        history.push(Vec2::new(10.0, 20.0), FrameTime::from_millis(33));
        assert_eq!(history.average_center(), Some(Vec2::new(5.0, 10.0)));
    }

    #[test]
    fn test_velocity() {
        let mut history = HandPositionHistory::new(10);
        history.push(Vec2::new(100.0, 100.0), FrameTime::from_millis(1000));
        assert!(history.velocity().is_none());

        history.push(Vec2::new(110.0, 100.0), FrameTime::from_millis(1250));
        history.push(Vec2::new(150.0, 80.0), FrameTime::from_millis(1500));

        let v = history.velocity().unwrap();
        assert!((v.x - 100.0).abs() < 1e-3);
        assert!((v.y + 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_needs_elapsed_time() {
        let mut history = HandPositionHistory::new(10);
        history.push(Vec2::new(0.0, 0.0), FrameTime::from_millis(5));
        history.push(Vec2::new(9.0, 0.0), FrameTime::from_millis(5));
        assert!(history.velocity().is_none());
    }

    #[test]
    fn test_deserialized_capacity_is_clamped() {
        let mut history: HandPositionHistory =
            serde_json::from_str(r#"{"samples":[],"capacity":0}"#).unwrap();
        assert_eq!(history.capacity(), 1);

        for i in 0..1000 {
            history.push(Vec2::new(i as f32, 0.0), FrameTime::from_millis(i));
        }
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().center.x, 999.0);
    }

    #[test]
    fn test_deserialized_overfull_history_keeps_newest() {
        let mut source = HandPositionHistory::new(5);
        for i in 0..5 {
            source.push(Vec2::new(i as f32, 0.0), FrameTime::from_millis(i * 10));
        }
        let json = serde_json::to_string(&source)
            .unwrap()
            .replace(r#""capacity":5"#, r#""capacity":2"#);

        let mut history: HandPositionHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().next().unwrap().center.x, 3.0);

        history.push(Vec2::new(9.0, 0.0), FrameTime::from_millis(90));
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().next().unwrap().center.x, 4.0);
    }

    #[test]
    fn test_clear() {
        let mut history = HandPositionHistory::new(0);
        assert_eq!(history.capacity(), 1);
        history.push(Vec2::new(1.0, 1.0), FrameTime::ZERO);
        history.push(Vec2::new(2.0, 2.0), FrameTime::ZERO);
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
