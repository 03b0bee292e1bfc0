//! # geo-capture-core
//!
//! Platform-agnostic core for a geotagged photo capture screen.
//!
//! Owns the permission → preview → capture → save → map-link workflow.
//! Platform backends implement the collaborator traits and plug into the
//! generic `CaptureSessionController`.
//!
//! ## Architecture
//!
//! ```text
//! geo-capture-core (this crate)
//! ├── traits/   ← CameraService, LocationService, PermissionService, MediaStorage, MapViewer, SessionDelegate
//! ├── models/   ← CaptureError, PreviewState, ControllerConfig, Coordinate, ImageHandle, etc.
//! ├── session/  ← CaptureSessionController (workflow orchestrator)
//! └── storage/  ← JSON metadata sidecars
//! ```

pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{ControllerConfig, LocationJoin, DEFAULT_DIAGNOSTIC_TAG, DEFAULT_MAP_PROVIDER};
pub use models::error::CaptureError;
pub use models::geo::{Coordinate, GeoFix};
pub use models::image::{CameraFacing, CaptureMetadata, CaptureOptions, CapturedPhoto, ImageExif, ImageHandle};
pub use models::permission::{PermissionKind, PermissionSet, PermissionStatus};
pub use models::state::{CaptureSession, DisabledReason, PreviewState};
pub use session::controller::{CaptureSessionController, PlatformServices};
pub use traits::camera_service::{CameraService, CaptureCallback};
pub use traits::location_service::{LocationCallback, LocationService};
pub use traits::map_viewer::MapViewer;
pub use traits::media_storage::MediaStorage;
pub use traits::permission_service::PermissionService;
pub use traits::session_delegate::SessionDelegate;
