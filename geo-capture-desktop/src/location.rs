use std::thread;
use std::time::Duration;

use geo_capture_core::models::error::CaptureError;
use geo_capture_core::models::geo::{Coordinate, GeoFix};
use geo_capture_core::models::permission::PermissionStatus;
use geo_capture_core::traits::location_service::{LocationCallback, LocationService};

/// Location provider for machines without a GPS receiver.
///
/// Reports a configured coordinate after `delay` on a dedicated thread, or
/// `LocationUnavailable` when no coordinate is configured.
pub struct FixedLocation {
    coordinate: Option<Coordinate>,
    delay: Duration,
    permission: PermissionStatus,
}

impl FixedLocation {
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        Self {
            coordinate,
            delay: Duration::ZERO,
            permission: PermissionStatus::Granted,
        }
    }

    /// Simulate a slow fix.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_permission(mut self, permission: PermissionStatus) -> Self {
        self.permission = permission;
        self
    }
}

impl LocationService for FixedLocation {
    fn request_foreground_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn current_position(&self, on_fix: LocationCallback) {
        let coordinate = self.coordinate;
        let delay = self.delay;

        let spawned = thread::Builder::new()
            .name("location-fix".into())
            .spawn({
                let on_fix = on_fix.clone();
                move || {
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    let result = match coordinate {
                        Some(c) if c.is_valid() => Ok(GeoFix::now(c)),
                        Some(c) => Err(CaptureError::LocationUnavailable(format!(
                            "configured coordinate out of range: {}, {}",
                            c.latitude, c.longitude
                        ))),
                        None => Err(CaptureError::LocationUnavailable("no position configured".into())),
                    };
                    on_fix(result);
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn location thread: {}", e);
            on_fix(Err(CaptureError::LocationUnavailable(e.to_string())));
        }
    }
}
