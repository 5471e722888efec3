//! Keypoint vocabulary
//!
//! Names follow the 21-landmark hand model of the upstream pose producer.
//! Landmarks are addressed by name, never by index: detections may arrive
//! unordered or with landmarks missing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BeamcastError, Vec2, Vec3};

/// Named hand landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointName {
    Wrist,

    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,

    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,

    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,

    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,

    #[serde(alias = "pinky_mcp")]
    PinkyFingerMcp,
    #[serde(alias = "pinky_pip")]
    PinkyFingerPip,
    #[serde(alias = "pinky_dip")]
    PinkyFingerDip,
    #[serde(alias = "pinky_tip")]
    PinkyFingerTip,
}

impl KeypointName {
    /// All landmarks in producer order
    pub fn all() -> &'static [KeypointName] {
        use KeypointName::*;
        &[
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyFingerMcp,
            PinkyFingerPip,
            PinkyFingerDip,
            PinkyFingerTip,
        ]
    }

    /// Canonical producer name
    pub fn as_str(self) -> &'static str {
        use KeypointName::*;
        match self {
            Wrist => "wrist",
            ThumbCmc => "thumb_cmc",
            ThumbMcp => "thumb_mcp",
            ThumbIp => "thumb_ip",
            ThumbTip => "thumb_tip",
            IndexFingerMcp => "index_finger_mcp",
            IndexFingerPip => "index_finger_pip",
            IndexFingerDip => "index_finger_dip",
            IndexFingerTip => "index_finger_tip",
            MiddleFingerMcp => "middle_finger_mcp",
            MiddleFingerPip => "middle_finger_pip",
            MiddleFingerDip => "middle_finger_dip",
            MiddleFingerTip => "middle_finger_tip",
            RingFingerMcp => "ring_finger_mcp",
            RingFingerPip => "ring_finger_pip",
            RingFingerDip => "ring_finger_dip",
            RingFingerTip => "ring_finger_tip",
            PinkyFingerMcp => "pinky_finger_mcp",
            PinkyFingerPip => "pinky_finger_pip",
            PinkyFingerDip => "pinky_finger_dip",
            PinkyFingerTip => "pinky_finger_tip",
        }
    }
}

impl fmt::Display for KeypointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeypointName {
    type Err = BeamcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = match s {
            "pinky_mcp" => "pinky_finger_mcp",
            "pinky_pip" => "pinky_finger_pip",
            "pinky_dip" => "pinky_finger_dip",
            "pinky_tip" => "pinky_finger_tip",
            other => other,
        };
        KeypointName::all()
            .iter()
            .copied()
            .find(|name| name.as_str() == canonical)
            .ok_or_else(|| BeamcastError::UnknownKeypoint(s.to_string()))
    }
}

/// A digit of the hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All five digits, thumb to pinky
    pub const DIGITS: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// The four non-thumb fingers
    pub const FINGERS: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> KeypointName {
        match self {
            Finger::Thumb => KeypointName::ThumbTip,
            Finger::Index => KeypointName::IndexFingerTip,
            Finger::Middle => KeypointName::MiddleFingerTip,
            Finger::Ring => KeypointName::RingFingerTip,
            Finger::Pinky => KeypointName::PinkyFingerTip,
        }
    }

    pub fn mcp(self) -> KeypointName {
        match self {
            Finger::Thumb => KeypointName::ThumbMcp,
            Finger::Index => KeypointName::IndexFingerMcp,
            Finger::Middle => KeypointName::MiddleFingerMcp,
            Finger::Ring => KeypointName::RingFingerMcp,
            Finger::Pinky => KeypointName::PinkyFingerMcp,
        }
    }
}

/// A single detected landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: KeypointName,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Keypoint {
    /// 2D keypoint without depth or confidence
    pub fn new(name: KeypointName, x: f32, y: f32) -> Self {
        Self {
            name,
            x,
            y,
            z: None,
            score: None,
        }
    }

    /// 3D keypoint
    pub fn new_3d(name: KeypointName, x: f32, y: f32, z: f32) -> Self {
        Self {
            name,
            x,
            y,
            z: Some(z),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// World position; a missing depth reads as zero
    #[inline]
    pub fn position_3d(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z.unwrap_or(0.0))
    }

    /// Whether this keypoint clears a confidence floor
    ///
    /// Keypoints without a score always pass.
    pub fn is_confident(&self, min_score: f32) -> bool {
        self.score.map_or(true, |s| s >= min_score)
    }
}
