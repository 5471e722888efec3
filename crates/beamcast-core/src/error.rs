//! Error types for BEAMCAST
//!
//! Errors only surface at the edges of the pipeline: keypoint name parsing,
//! producer frame decoding and configuration validation. Per-frame processing
//! never fails.

use thiserror::Error;

/// Core BEAMCAST errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeamcastError {
    #[error("Unknown keypoint name: {0}")]
    UnknownKeypoint(String),

    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}

impl BeamcastError {
    /// Shorthand for a configuration error
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        BeamcastError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BeamcastError {
    fn from(err: serde_json::Error) -> Self {
        BeamcastError::MalformedFrame(err.to_string())
    }
}

/// Result type for BEAMCAST operations
pub type BeamcastResult<T> = Result<T, BeamcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = BeamcastError::invalid_config("positioning_frames", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: positioning_frames must be at least 1"
        );
    }

    #[test]
    fn test_json_error_maps_to_malformed_frame() {
        let err: BeamcastError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, BeamcastError::MalformedFrame(_)));
    }
}
