use thiserror::Error;

/// Tracking core errors.
///
/// Track loss, detector hiccups, and empty frames are never errors: a round
/// that produces fewer confirmed tracks is a valid, silently degraded
/// outcome. The variants here cover the cases where the caller genuinely
/// needs to know something went wrong.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is outside its accepted range. Raised once at
    /// manager construction, never per frame.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The appearance metric could not be initialized for a camera. This is
    /// consumed internally by the fallback decision and logged once; it is
    /// never returned from frame processing.
    #[error("appearance metric unavailable: {0}")]
    AppearanceUnavailable(String),

    /// The association outcome did not form an exact partition of tracks
    /// and detections. The round was aborted before mutating the registry,
    /// so the camera keeps its pre-round state; the frame was not processed.
    #[error("registry inconsistency on camera {camera_id}: {detail}; frame not processed")]
    RegistryInconsistency { camera_id: String, detail: String },
}
