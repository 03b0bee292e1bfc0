use std::fs;
use std::path::{Path, PathBuf};

use geo_capture_core::models::error::CaptureError;
use geo_capture_core::models::image::ImageHandle;
use geo_capture_core::storage::metadata;
use geo_capture_core::traits::media_storage::MediaStorage;

use crate::uri_to_path;

/// Media library backed by a user-visible folder (e.g. `~/Pictures/GeoCapture`).
///
/// Saved images keep their file name; a metadata sidecar next to the source
/// is copied along with it.
pub struct FolderMediaLibrary {
    root: PathBuf,
}

impl FolderMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStorage for FolderMediaLibrary {
    fn save_to_library(&self, image: &ImageHandle) -> Result<(), CaptureError> {
        let source = uri_to_path(&image.uri);
        let file_name = source
            .file_name()
            .ok_or_else(|| CaptureError::SaveFailed(format!("not a file: {}", image.uri)))?;

        fs::create_dir_all(&self.root)
            .map_err(|e| CaptureError::SaveFailed(format!("failed to create library folder: {}", e)))?;

        let target = self.root.join(file_name);
        fs::copy(&source, &target)
            .map_err(|e| CaptureError::SaveFailed(format!("failed to copy {}: {}", source.display(), e)))?;

        let sidecar = metadata::sidecar_path(&source);
        if sidecar.is_file() {
            if let Err(e) = fs::copy(&sidecar, metadata::sidecar_path(&target)) {
                log::warn!("Failed to copy metadata sidecar {}: {}", sidecar.display(), e);
            }
        }

        log::debug!("Copied {} into {}", source.display(), self.root.display());
        Ok(())
    }
}
