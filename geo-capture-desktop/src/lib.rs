//! # geo-capture-desktop
//!
//! Desktop backend for geo-capture-kit.
//!
//! Provides:
//! - `FileCamera` : Still "camera" that captures a configured source image into a capture folder
//! - `FixedLocation` : Location provider reporting a configured coordinate
//! - `StaticPermissions` : Permission table with no consent dialogs
//! - `FolderMediaLibrary` : Media library backed by a user-visible folder
//! - `SystemBrowser` : Opens map links with the platform URL handler
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use geo_capture_core::{CaptureSessionController, ControllerConfig, Coordinate, PlatformServices};
//! use geo_capture_desktop::{FileCamera, FixedLocation, FolderMediaLibrary, StaticPermissions, SystemBrowser};
//!
//! let camera = FileCamera::new("still.jpg", "/tmp/captures");
//! let location = FixedLocation::new(Some(Coordinate::new(37.0, -122.0)));
//! let services = PlatformServices {
//!     permissions: Arc::new(StaticPermissions::grant_all()),
//!     media: Arc::new(FolderMediaLibrary::new("/home/me/Pictures/GeoCapture")),
//!     map_viewer: Arc::new(SystemBrowser),
//! };
//! let mut controller = CaptureSessionController::new(camera, location, services, ControllerConfig::default())?;
//! controller.initialize();
//! ```

pub mod file_camera;
pub mod location;
pub mod map_viewer;
pub mod media_library;
pub mod permissions;

pub use file_camera::FileCamera;
pub use location::FixedLocation;
pub use map_viewer::SystemBrowser;
pub use media_library::FolderMediaLibrary;
pub use permissions::StaticPermissions;

/// Filesystem path behind an image URI (`file://` prefix optional).
pub(crate) fn uri_to_path(uri: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use parking_lot::Mutex;

    use geo_capture_core::{
        CaptureError, CaptureSessionController, ControllerConfig, Coordinate, MapViewer,
        PlatformServices,
    };

    #[derive(Default)]
    struct RecordingMapViewer {
        opened: Mutex<Vec<String>>,
    }

    impl MapViewer for RecordingMapViewer {
        fn open_url(&self, url: &str) -> Result<(), CaptureError> {
            self.opened.lock().push(url.to_string());
            Ok(())
        }
    }

    fn wait_until(mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        done()
    }

    #[test]
    fn session_completes_on_backend_threads() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("still.jpg");
        fs::write(&source, b"\xFF\xD8\xFFstill").unwrap();

        let camera = FileCamera::new(&source, dir.path().join("captures"));
        let location = FixedLocation::new(Some(Coordinate::new(37.0, -122.0)))
            .with_delay(Duration::from_millis(500));
        let library = Arc::new(FolderMediaLibrary::new(dir.path().join("Library")));
        let maps = Arc::new(RecordingMapViewer::default());
        let services = PlatformServices {
            permissions: Arc::new(StaticPermissions::grant_all()),
            media: library.clone(),
            map_viewer: maps.clone(),
        };

        let mut controller =
            CaptureSessionController::new(camera, location, services, ControllerConfig::default())
                .unwrap();
        controller.initialize();
        assert!(controller.is_preview_enabled());

        assert!(controller.capture());
        assert!(wait_until(|| !controller.is_capture_in_flight()));

        // The still lands well before the delayed fix.
        let photo = controller.session().captured_photo.unwrap();
        assert_eq!(photo.location, None);
        let file_name = uri_to_path(&photo.image.uri).file_name().unwrap().to_owned();
        assert_eq!(fs::read(library.root().join(&file_name)).unwrap(), b"\xFF\xD8\xFFstill");

        assert!(wait_until(|| controller.can_open_location()));
        assert!(controller.open_location_in_map());
        assert_eq!(
            *maps.opened.lock(),
            vec!["https://www.google.com/maps/search/?api=1&query=37,-122".to_string()]
        );

        controller.teardown();
        assert!(!controller.is_preview_enabled());
        controller.teardown();
        assert!(!controller.is_preview_enabled());
    }
}
