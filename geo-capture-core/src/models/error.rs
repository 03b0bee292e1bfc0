use thiserror::Error;

use super::permission::PermissionKind;

/// Errors that can occur while driving a capture session.
///
/// None of these are fatal to the session: the controller handles each one by
/// degrading the affected feature, logging, and notifying the delegate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("{0} permission denied")]
    PermissionDenied(PermissionKind),

    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("save failed: {0}")]
    SaveFailed(String),

    #[error("camera failed: {0}")]
    CameraFailed(String),

    #[error("map viewer failed: {0}")]
    MapViewerFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}
