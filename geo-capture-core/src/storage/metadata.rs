use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::CaptureError;
use crate::models::image::CaptureMetadata;

/// Sidecar path for an image: `photo.jpg` → `photo.metadata.json`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("metadata.json")
}

/// Write the metadata embedded in a capture as a JSON sidecar file.
///
/// Returns the path of the sidecar that was written.
pub fn write_metadata(metadata: &CaptureMetadata, image_path: &Path) -> Result<PathBuf, CaptureError> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    let path = sidecar_path(image_path);
    fs::write(&path, json)
        .map_err(|e| CaptureError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read capture metadata from a JSON sidecar file.
pub fn read_metadata(image_path: &Path) -> Result<CaptureMetadata, CaptureError> {
    let json = fs::read_to_string(sidecar_path(image_path))
        .map_err(|e| CaptureError::StorageError(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| CaptureError::StorageError(format!("failed to parse metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geo::{Coordinate, GeoFix};

    fn temp_image_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("geo_capture_test_{}_{}.jpg", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn sidecar_sits_next_to_image() {
        let path = Path::new("/photos/IMG_0001.jpg");
        assert_eq!(sidecar_path(path), PathBuf::from("/photos/IMG_0001.metadata.json"));
    }

    #[test]
    fn write_then_read_preserves_location_and_tag() {
        let path = temp_image_path("sidecar");
        let metadata = CaptureMetadata {
            location: Some(GeoFix::now(Coordinate::new(37.0, -122.0))),
            tag: "unit-test".into(),
        };

        let written = write_metadata(&metadata, &path).unwrap();
        assert_eq!(written, sidecar_path(&path));
        assert!(written.is_file());

        let read = read_metadata(&path).unwrap();
        assert_eq!(read, metadata);

        fs::remove_file(written).ok();
    }

    #[test]
    fn missing_sidecar_is_a_storage_error() {
        let path = temp_image_path("missing");
        assert!(matches!(read_metadata(&path), Err(CaptureError::StorageError(_))));
    }
}
