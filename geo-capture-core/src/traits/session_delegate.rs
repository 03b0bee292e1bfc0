use crate::models::error::CaptureError;
use crate::models::geo::GeoFix;
use crate::models::image::{CapturedPhoto, ImageHandle};
use crate::models::state::PreviewState;

/// Event delegate for capture session notifications.
///
/// Completion events may arrive from platform callback threads, not the UI
/// thread. Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called when the preview lifecycle state changes.
    fn on_preview_state_changed(&self, state: &PreviewState);

    /// Called when a location fix lands on the session.
    fn on_location_updated(&self, fix: &GeoFix);

    /// Called when a capture completes and replaces the displayed photo.
    fn on_photo_captured(&self, photo: &CapturedPhoto);

    /// Called when a photo has been written to the media library.
    fn on_photo_saved(&self, image: &ImageHandle);

    /// Called when a feature is skipped or degraded. Never fatal.
    fn on_degraded(&self, error: &CaptureError);
}
