use crate::models::error::CaptureError;
use crate::models::image::ImageHandle;

/// Interface for the device's shared photo library.
pub trait MediaStorage: Send + Sync {
    /// Copy the image at `image.uri` into the user-visible library.
    fn save_to_library(&self, image: &ImageHandle) -> Result<(), CaptureError>;
}
