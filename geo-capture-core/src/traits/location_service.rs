use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::geo::GeoFix;
use crate::models::permission::PermissionStatus;

/// Callback invoked when a position request settles.
pub type LocationCallback =
    Arc<dyn Fn(Result<GeoFix, CaptureError>) + Send + Sync + 'static>;

/// Interface for the platform location provider.
pub trait LocationService: Send + Sync {
    /// Prompt for foreground location access.
    fn request_foreground_permission(&self) -> PermissionStatus;

    /// Request the current position. Best-effort: the callback may report
    /// `LocationUnavailable`, arrive late, or never arrive at all.
    fn current_position(&self, on_fix: LocationCallback);
}
