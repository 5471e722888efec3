//! Hand detections
//!
//! A `Hand` is one unlabeled detection from the pose producer. Handedness is
//! not intrinsic; it is resolved later from the geometry of a hand pair.

use serde::{Deserialize, Serialize};

use crate::{BeamcastResult, Keypoint, KeypointName, Vec2, Vec3};

/// One detected hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    /// 2D image-space landmarks
    pub keypoints: Vec<Keypoint>,

    /// Optional world-space landmarks, parallel to `keypoints`
    #[serde(
        rename = "keypoints3D",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub keypoints_3d: Option<Vec<Keypoint>>,
}

impl Hand {
    /// Create a hand from 2D landmarks
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            keypoints_3d: None,
        }
    }

    /// Attach world-space landmarks
    pub fn with_keypoints_3d(mut self, keypoints_3d: Vec<Keypoint>) -> Self {
        self.keypoints_3d = Some(keypoints_3d);
        self
    }

    /// First keypoint with the given name
    pub fn keypoint(&self, name: KeypointName) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// 2D position of a landmark
    pub fn point(&self, name: KeypointName) -> Option<Vec2> {
        self.keypoint(name).map(Keypoint::position)
    }

    /// 2D position of a landmark, treating low-confidence detections as missing
    pub fn locate(&self, name: KeypointName, min_score: f32) -> Option<Vec2> {
        self.keypoint(name)
            .filter(|kp| kp.is_confident(min_score))
            .map(Keypoint::position)
    }

    /// World-space position of a landmark, if 3D data is present
    pub fn point_3d(&self, name: KeypointName) -> Option<Vec3> {
        self.keypoints_3d
            .as_ref()?
            .iter()
            .find(|kp| kp.name == name)
            .map(Keypoint::position_3d)
    }

    pub fn wrist(&self) -> Option<Vec2> {
        self.point(KeypointName::Wrist)
    }

    pub fn wrist_3d(&self) -> Option<Vec3> {
        self.point_3d(KeypointName::Wrist)
    }

    /// Number of 2D landmarks
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Decode one producer frame: a JSON array of hands
pub fn parse_hands(json: &str) -> BeamcastResult<Vec<Hand>> {
    Ok(serde_json::from_str(json)?)
}
