use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::image::{CameraFacing, CaptureOptions, ImageHandle};

/// Callback invoked once the platform has written a still capture.
///
/// May fire on any thread, including synchronously from `capture_still`.
pub type CaptureCallback =
    Arc<dyn Fn(Result<ImageHandle, CaptureError>) + Send + Sync + 'static>;

/// Interface for a platform camera with a live preview surface.
///
/// The preview is an exclusive hardware resource: only the session controller
/// starts and stops it.
pub trait CameraService: Send {
    /// Whether a camera device is attached and can deliver frames.
    fn is_available(&self) -> bool;

    /// Start rendering the live preview from the camera facing `facing`.
    fn start_preview(&mut self, facing: CameraFacing) -> Result<(), CaptureError>;

    /// Stop the preview and release the camera handle.
    fn stop_preview(&mut self) -> Result<(), CaptureError>;

    /// Switch cameras. Takes effect on the next preview frame.
    fn set_facing(&mut self, facing: CameraFacing) -> Result<(), CaptureError>;

    /// Take a still picture, delivering the saved image via `on_saved`.
    ///
    /// An `Err` return means the capture was never issued and `on_saved`
    /// will not be called.
    fn capture_still(
        &mut self,
        options: CaptureOptions,
        on_saved: CaptureCallback,
    ) -> Result<(), CaptureError>;
}
