pub mod camera_service;
pub mod location_service;
pub mod map_viewer;
pub mod media_storage;
pub mod permission_service;
pub mod session_delegate;
