use super::geo::GeoFix;
use super::image::{CameraFacing, CapturedPhoto};
use super::permission::PermissionKind;

/// Why the live preview is not running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    /// Camera permission was denied when requested.
    PermissionDenied,
    /// The host reported a permission revocation after the preview started.
    Revoked(PermissionKind),
    /// Permission was granted but the camera could not start a preview.
    CameraUnavailable,
    /// The screen was unmounted.
    Unmounted,
}

/// Preview lifecycle state machine.
///
/// State transitions:
/// ```text
/// uninitialized → permission-pending → preview-active
///                                    ↘        ↓
///                                     preview-disabled
/// ```
/// There is no way back to `PermissionPending` without a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Uninitialized,
    PermissionPending,
    Active,
    Disabled(DisabledReason),
}

impl PreviewState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_unmounted(&self) -> bool {
        matches!(self, Self::Disabled(DisabledReason::Unmounted))
    }
}

/// Snapshot of the per-screen session fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureSession {
    pub camera_facing: CameraFacing,
    pub is_preview_enabled: bool,
    pub last_known_location: Option<GeoFix>,
    pub captured_photo: Option<CapturedPhoto>,
}

impl CaptureSession {
    /// URI of the displayed photo, if one has been captured.
    pub fn captured_image_ref(&self) -> Option<&str> {
        self.captured_photo.as_ref().map(|p| p.image.uri.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_counts_as_active() {
        assert!(PreviewState::Active.is_active());
        assert!(!PreviewState::PermissionPending.is_active());
        assert!(!PreviewState::Disabled(DisabledReason::PermissionDenied).is_active());
        assert!(PreviewState::Disabled(DisabledReason::Unmounted).is_unmounted());
    }
}
