use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use geo_capture_core::models::error::CaptureError;
use geo_capture_core::models::image::{CameraFacing, CaptureOptions, ImageExif, ImageHandle};
use geo_capture_core::storage::metadata;
use geo_capture_core::traits::camera_service::{CameraService, CaptureCallback};

/// A still camera that "captures" by copying a source image into a capture folder.
///
/// Each capture gets a unique file name. When metadata embedding is requested
/// the embedded payload is written as a JSON sidecar and mirrored into the
/// handle's EXIF fields, the way a phone camera reports GPS tags back.
pub struct FileCamera {
    source: PathBuf,
    capture_dir: PathBuf,
    preview: Option<CameraFacing>,
}

impl FileCamera {
    pub fn new(source: impl Into<PathBuf>, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            capture_dir: capture_dir.into(),
            preview: None,
        }
    }

    /// Facing of the running preview, if any.
    pub fn preview_facing(&self) -> Option<CameraFacing> {
        self.preview
    }

    fn write_capture(
        source: &Path,
        capture_dir: &Path,
        options: &CaptureOptions,
    ) -> Result<ImageHandle, CaptureError> {
        fs::create_dir_all(capture_dir)
            .map_err(|e| CaptureError::CameraFailed(format!("failed to create capture dir: {}", e)))?;

        let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("jpg");
        let path = capture_dir.join(format!("capture_{}.{}", uuid::Uuid::new_v4(), ext));
        fs::copy(source, &path)
            .map_err(|e| CaptureError::CameraFailed(format!("failed to write capture: {}", e)))?;

        let mut image = ImageHandle::new(path.to_string_lossy());
        if options.embed_metadata {
            let sidecar = metadata::write_metadata(&options.metadata, &path)?;
            log::debug!("Wrote capture metadata to {}", sidecar.display());

            let mut exif = ImageExif::default();
            if let Some(fix) = options.metadata.location {
                exif.gps_latitude = Some(fix.coordinate.latitude);
                exif.gps_longitude = Some(fix.coordinate.longitude);
            }
            exif.other.insert(
                "DateTimeOriginal".into(),
                chrono::Local::now().format("%Y:%m:%d %H:%M:%S").to_string().into(),
            );
            exif.other.insert("ImageDescription".into(), options.metadata.tag.clone().into());
            image = image.with_exif(exif);
        }
        Ok(image)
    }
}

impl CameraService for FileCamera {
    fn is_available(&self) -> bool {
        self.source.is_file()
    }

    fn start_preview(&mut self, facing: CameraFacing) -> Result<(), CaptureError> {
        if !self.is_available() {
            return Err(CaptureError::CameraFailed(format!(
                "source image not found: {}",
                self.source.display()
            )));
        }
        log::debug!("Preview started ({:?})", facing);
        self.preview = Some(facing);
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CaptureError> {
        if self.preview.take().is_some() {
            log::debug!("Preview stopped");
        }
        Ok(())
    }

    fn set_facing(&mut self, facing: CameraFacing) -> Result<(), CaptureError> {
        if self.preview.is_none() {
            return Err(CaptureError::CameraFailed("preview not running".into()));
        }
        self.preview = Some(facing);
        Ok(())
    }

    fn capture_still(
        &mut self,
        options: CaptureOptions,
        on_saved: CaptureCallback,
    ) -> Result<(), CaptureError> {
        if self.preview.is_none() {
            return Err(CaptureError::CaptureUnavailable("preview not running".into()));
        }

        let source = self.source.clone();
        let capture_dir = self.capture_dir.clone();

        thread::Builder::new()
            .name("still-capture".into())
            .spawn(move || on_saved(Self::write_capture(&source, &capture_dir, &options)))
            .map_err(|e| CaptureError::CameraFailed(format!("failed to spawn capture thread: {}", e)))?;
        Ok(())
    }
}
