use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::config::{ControllerConfig, LocationJoin};
use crate::models::error::CaptureError;
use crate::models::geo::GeoFix;
use crate::models::image::{CameraFacing, CaptureMetadata, CaptureOptions, CapturedPhoto, ImageHandle};
use crate::models::permission::{PermissionKind, PermissionSet, PermissionStatus};
use crate::models::state::{CaptureSession, DisabledReason, PreviewState};
use crate::traits::camera_service::{CameraService, CaptureCallback};
use crate::traits::location_service::{LocationCallback, LocationService};
use crate::traits::map_viewer::MapViewer;
use crate::traits::media_storage::MediaStorage;
use crate::traits::permission_service::PermissionService;
use crate::traits::session_delegate::SessionDelegate;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionState {
    preview: PreviewState,
    permissions: PermissionSet,
    facing: CameraFacing,
    last_known_location: Option<GeoFix>,
    captured_photo: Option<CapturedPhoto>,
}

impl SessionState {
    fn new(facing: CameraFacing) -> Self {
        Self {
            preview: PreviewState::Uninitialized,
            permissions: PermissionSet::default(),
            facing,
            last_known_location: None,
            captured_photo: None,
        }
    }
}

/// Platform collaborators that are shared with completion callbacks.
#[derive(Clone)]
pub struct PlatformServices {
    pub permissions: Arc<dyn PermissionService>,
    pub media: Arc<dyn MediaStorage>,
    pub map_viewer: Arc<dyn MapViewer>,
}

/// Everything a platform completion callback needs, cloneable into closures.
#[derive(Clone)]
struct CallbackContext {
    session_state: Arc<Mutex<SessionState>>,
    media: Arc<dyn MediaStorage>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    capture_in_flight: Arc<AtomicBool>,
    /// Generation of the capture whose completion is still expected; 0 when none.
    pending_capture: Arc<AtomicU64>,
}

impl CallbackContext {
    fn report(&self, error: &CaptureError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_degraded(error);
        }
    }

    fn apply_location(&self, result: Result<GeoFix, CaptureError>) {
        match result {
            Ok(fix) => {
                log::debug!(
                    "Location fix: {}, {}",
                    fix.coordinate.latitude,
                    fix.coordinate.longitude
                );
                self.session_state.lock().last_known_location = Some(fix);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_location_updated(&fix);
                }
            }
            Err(e) => {
                log::warn!("Location fetch failed: {}", e);
                let error = match e {
                    CaptureError::LocationUnavailable(_) => e,
                    other => CaptureError::LocationUnavailable(other.to_string()),
                };
                self.report(&error);
            }
        }
    }

    fn finish_capture(&self, generation: u64, result: Result<ImageHandle, CaptureError>) {
        // Claim the completion; duplicates and callbacks from earlier captures lose.
        if self
            .pending_capture
            .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("Ignoring stale completion for capture #{}", generation);
            return;
        }

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                self.capture_in_flight.store(false, Ordering::SeqCst);
                log::error!("Still capture failed: {}", e);
                self.report(&e);
                return;
            }
        };

        log::info!("Photo captured: {}", image.uri);

        let photo = {
            let mut s = self.session_state.lock();
            let photo = CapturedPhoto {
                image: image.clone(),
                location: s.last_known_location,
                captured_at: chrono::Utc::now(),
            };
            s.captured_photo = Some(photo.clone());
            photo
        };

        let saved = self.save(&image);

        if let Some(gps) = image.exif.as_ref().and_then(|exif| exif.gps_coordinate()) {
            log::info!("Latitude: {}, Longitude: {}", gps.latitude, gps.longitude);
        }

        // Held through the save; released before listeners hear about it.
        self.capture_in_flight.store(false, Ordering::SeqCst);

        if let Some(ref delegate) = self.delegate {
            delegate.on_photo_captured(&photo);
        }
        self.notify_saved(&image, &saved);
    }

    fn persist(&self, image: &ImageHandle) -> bool {
        let saved = self.save(image);
        self.notify_saved(image, &saved);
        saved.is_ok()
    }

    fn save(&self, image: &ImageHandle) -> Result<(), CaptureError> {
        let granted = self
            .session_state
            .lock()
            .permissions
            .is_granted(PermissionKind::MediaLibrary);
        if !granted {
            log::info!("Permission denied to save photo to device: {}", image.uri);
            return Err(CaptureError::PermissionDenied(PermissionKind::MediaLibrary));
        }

        match self.media.save_to_library(image) {
            Ok(()) => {
                log::info!("Saved {} to media library", image.uri);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save {} to media library: {}", image.uri, e);
                Err(match e {
                    CaptureError::SaveFailed(_) => e,
                    other => CaptureError::SaveFailed(other.to_string()),
                })
            }
        }
    }

    fn notify_saved(&self, image: &ImageHandle, saved: &Result<(), CaptureError>) {
        match saved {
            Ok(()) => {
                if let Some(ref delegate) = self.delegate {
                    delegate.on_photo_saved(image);
                }
            }
            Err(e) => self.report(e),
        }
    }
}

/// Drives the capture screen: permissions → preview → capture → save → map link.
///
/// Generic over the camera and location backends, with the remaining platform
/// services behind trait objects so capture callbacks can reach them:
/// ```text
/// initialize ─→ [PermissionService] + [LocationService permission] ─→ preview on/off
/// capture ───→ [LocationService fix] ┐
///            └→ [CameraService still] ─→ on_saved ─→ session ─→ [MediaStorage]
/// open_location_in_map ─→ [MapViewer]
/// ```
///
/// Session operations never return errors: every failure disables or skips the affected
/// feature, is logged, and is reported through `SessionDelegate::on_degraded`.
pub struct CaptureSessionController<C: CameraService, L: LocationService> {
    camera: C,
    location: L,
    services: PlatformServices,
    config: ControllerConfig,
    session_state: Arc<Mutex<SessionState>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    capture_in_flight: Arc<AtomicBool>,
    pending_capture: Arc<AtomicU64>,
    capture_generation: u64,
}

impl<C: CameraService, L: LocationService> CaptureSessionController<C, L> {
    /// Create a controller for a freshly mounted screen.
    pub fn new(
        camera: C,
        location: L,
        services: PlatformServices,
        config: ControllerConfig,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(Self {
            camera,
            location,
            services,
            session_state: Arc::new(Mutex::new(SessionState::new(config.initial_facing))),
            config,
            delegate: None,
            capture_in_flight: Arc::new(AtomicBool::new(false)),
            pending_capture: Arc::new(AtomicU64::new(0)),
            capture_generation: 0,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn preview_state(&self) -> PreviewState {
        self.session_state.lock().preview
    }

    pub fn permissions(&self) -> PermissionSet {
        self.session_state.lock().permissions
    }

    pub fn is_preview_enabled(&self) -> bool {
        self.session_state.lock().preview.is_active()
    }

    /// Whether a capture is waiting on its completion callback or save.
    pub fn is_capture_in_flight(&self) -> bool {
        self.capture_in_flight.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> CaptureSession {
        let s = self.session_state.lock();
        CaptureSession {
            camera_facing: s.facing,
            is_preview_enabled: s.preview.is_active(),
            last_known_location: s.last_known_location,
            captured_photo: s.captured_photo.clone(),
        }
    }

    /// Whether the "view location" action has a coordinate to show.
    pub fn can_open_location(&self) -> bool {
        self.session_state.lock().last_known_location.is_some()
    }

    /// Request permissions and start the preview if the camera is allowed.
    /// Transitions: uninitialized → permission-pending → active/disabled.
    pub fn initialize(&mut self) {
        if self.preview_state() != PreviewState::Uninitialized {
            log::warn!("initialize() ignored: session already initialized");
            return;
        }
        self.set_state(PreviewState::PermissionPending);

        let permissions = Arc::clone(&self.services.permissions);
        let media = Self::request_if_needed(permissions.as_ref(), PermissionKind::MediaLibrary);
        let camera = Self::request_if_needed(permissions.as_ref(), PermissionKind::Camera);
        let location = self.location.request_foreground_permission();

        {
            let mut s = self.session_state.lock();
            s.permissions.set(PermissionKind::MediaLibrary, media);
            s.permissions.set(PermissionKind::Camera, camera);
            s.permissions.set(PermissionKind::Location, location);
        }

        if !media.is_granted() {
            log::info!("Media library permission denied; photos will not be saved");
            self.report(&CaptureError::PermissionDenied(PermissionKind::MediaLibrary));
        }
        if !location.is_granted() {
            log::info!("Permission to access location was denied");
            self.report(&CaptureError::PermissionDenied(PermissionKind::Location));
        }

        if camera.is_granted() {
            self.start_preview();
        } else {
            log::info!("Camera permission denied; preview disabled");
            self.set_state(PreviewState::Disabled(DisabledReason::PermissionDenied));
            self.report(&CaptureError::PermissionDenied(PermissionKind::Camera));
        }
    }

    /// Ask again for camera and location access if either is not granted.
    ///
    /// A newly granted camera restarts the preview only while the session is
    /// still mounted and the preview was disabled for lack of permission.
    pub fn rerequest_permissions(&mut self) {
        let state = self.preview_state();
        if matches!(state, PreviewState::Uninitialized | PreviewState::PermissionPending)
            || state.is_unmounted()
        {
            log::debug!("rerequest_permissions() ignored in state {:?}", state);
            return;
        }

        let current = self.permissions();

        if !current.is_granted(PermissionKind::Location) {
            let status = self.location.request_foreground_permission();
            self.session_state.lock().permissions.set(PermissionKind::Location, status);
            if !status.is_granted() {
                log::info!("Permission to access location was denied");
            }
        }

        if !current.is_granted(PermissionKind::Camera) {
            let status = self.services.permissions.request(PermissionKind::Camera);
            self.session_state.lock().permissions.set(PermissionKind::Camera, status);

            let disabled_for_permission = matches!(
                self.preview_state(),
                PreviewState::Disabled(DisabledReason::PermissionDenied)
                    | PreviewState::Disabled(DisabledReason::Revoked(PermissionKind::Camera))
            );
            if status.is_granted() && disabled_for_permission {
                self.start_preview();
            }
        }
    }

    /// Host-reported revocation of a permission after initialization.
    pub fn permission_revoked(&mut self, kind: PermissionKind) {
        self.session_state
            .lock()
            .permissions
            .set(kind, PermissionStatus::Denied);
        log::info!("{} permission revoked", kind);

        if kind == PermissionKind::Camera && self.is_preview_enabled() {
            if let Err(e) = self.camera.stop_preview() {
                log::warn!("Failed to stop preview after revocation: {}", e);
            }
            self.set_state(PreviewState::Disabled(DisabledReason::Revoked(kind)));
        }
        self.report(&CaptureError::PermissionDenied(kind));
    }

    /// Release the preview on unmount. Safe to call any number of times.
    pub fn teardown(&mut self) {
        let state = self.preview_state();
        if state.is_unmounted() {
            return;
        }
        if state.is_active() {
            if let Err(e) = self.camera.stop_preview() {
                log::warn!("Failed to stop preview on teardown: {}", e);
            }
        }
        self.set_state(PreviewState::Disabled(DisabledReason::Unmounted));
    }

    /// Flip between front and back cameras. Returns whether the flip happened.
    pub fn toggle_facing(&mut self) -> bool {
        if !self.is_preview_enabled() {
            return false;
        }
        let next = self.session_state.lock().facing.flipped();
        if let Err(e) = self.camera.set_facing(next) {
            log::warn!("Failed to switch camera to {:?}: {}", next, e);
            self.report(&e);
            return false;
        }
        self.session_state.lock().facing = next;
        true
    }

    /// Fetch the location and take a geotagged still.
    ///
    /// Returns whether a capture was issued. The photo lands on the session
    /// when the camera's completion callback fires.
    pub fn capture(&mut self) -> bool {
        if !self.is_preview_enabled() || !self.camera.is_available() {
            log::debug!("capture() ignored: preview disabled or camera unavailable");
            self.report(&CaptureError::CaptureUnavailable(
                "preview disabled or no camera handle".into(),
            ));
            return false;
        }
        if self.capture_in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("capture() ignored: a capture is already in progress");
            self.report(&CaptureError::CaptureUnavailable(
                "a capture is already in progress".into(),
            ));
            return false;
        }

        let embedded = match self.config.location_join {
            LocationJoin::Race => {
                let known = self.session_state.lock().last_known_location;
                self.request_location();
                known
            }
            LocationJoin::AwaitFix { timeout } => self.await_location(timeout),
        };

        let options = CaptureOptions {
            embed_metadata: self.config.embed_metadata,
            metadata: CaptureMetadata {
                location: embedded,
                tag: self.config.diagnostic_tag.clone(),
            },
        };

        self.capture_generation += 1;
        let generation = self.capture_generation;
        self.pending_capture.store(generation, Ordering::SeqCst);

        let context = self.callback_context();
        let on_saved: CaptureCallback =
            Arc::new(move |result| context.finish_capture(generation, result));

        if let Err(e) = self.camera.capture_still(options, on_saved) {
            self.pending_capture.store(0, Ordering::SeqCst);
            self.capture_in_flight.store(false, Ordering::SeqCst);
            log::error!("Failed to issue still capture: {}", e);
            self.report(&e);
            return false;
        }
        true
    }

    /// Save `image` to the media library if permitted. Returns whether it was saved.
    pub fn persist(&self, image: &ImageHandle) -> bool {
        self.callback_context().persist(image)
    }

    /// Open the session's last known location in the configured map service.
    /// Returns whether an open was requested.
    pub fn open_location_in_map(&self) -> bool {
        let Some(fix) = self.session_state.lock().last_known_location else {
            log::debug!("open_location_in_map() ignored: no location known");
            return false;
        };
        if !fix.coordinate.is_valid() {
            log::warn!("Refusing to open invalid coordinate {:?}", fix.coordinate);
            return false;
        }

        let url = fix.coordinate.map_search_url(&self.config.map_provider);
        match self.services.map_viewer.open_url(&url) {
            Ok(()) => {
                log::info!("Opened {}", url);
                true
            }
            Err(e) => {
                log::warn!("Failed to open {}: {}", url, e);
                let error = match e {
                    CaptureError::MapViewerFailed(_) => e,
                    other => CaptureError::MapViewerFailed(other.to_string()),
                };
                self.report(&error);
                false
            }
        }
    }

    // --- Internal helpers ---

    fn request_if_needed(
        permissions: &dyn PermissionService,
        kind: PermissionKind,
    ) -> PermissionStatus {
        match permissions.status(kind) {
            PermissionStatus::Granted => PermissionStatus::Granted,
            _ => permissions.request(kind),
        }
    }

    fn start_preview(&mut self) {
        let facing = self.session_state.lock().facing;
        match self.camera.start_preview(facing) {
            Ok(()) => self.set_state(PreviewState::Active),
            Err(e) => {
                log::warn!("Camera preview failed to start: {}", e);
                self.set_state(PreviewState::Disabled(DisabledReason::CameraUnavailable));
                self.report(&CaptureError::CaptureUnavailable(e.to_string()));
            }
        }
    }

    fn location_allowed(&self) -> bool {
        let allowed = self.permissions().is_granted(PermissionKind::Location);
        if !allowed {
            log::debug!("Skipping location fetch: permission not granted");
        }
        allowed
    }

    /// Issue a fix request whose result lands on the session whenever it arrives.
    fn request_location(&self) {
        if !self.location_allowed() {
            return;
        }
        let context = self.callback_context();
        let on_fix: LocationCallback = Arc::new(move |result| context.apply_location(result));
        self.location.current_position(on_fix);
    }

    /// Issue a fix request and wait for it, up to `timeout`. Returns the best
    /// fix known afterwards, which may be stale or absent.
    fn await_location(&self, timeout: Option<Duration>) -> Option<GeoFix> {
        if self.location_allowed() {
            let (tx, rx) = mpsc::channel::<()>();
            let tx = Mutex::new(tx);
            let context = self.callback_context();
            let on_fix: LocationCallback = Arc::new(move |result| {
                context.apply_location(result);
                let _ = tx.lock().send(());
            });
            self.location.current_position(on_fix);

            let settled = match timeout {
                Some(timeout) => rx.recv_timeout(timeout).is_ok(),
                None => rx.recv().is_ok(),
            };
            if !settled {
                log::warn!("Location fetch did not settle; capturing without a fresh fix");
                self.report(&CaptureError::LocationUnavailable("timed out".into()));
            }
        }
        self.session_state.lock().last_known_location
    }

    fn callback_context(&self) -> CallbackContext {
        CallbackContext {
            session_state: Arc::clone(&self.session_state),
            media: Arc::clone(&self.services.media),
            delegate: self.delegate.clone(),
            capture_in_flight: Arc::clone(&self.capture_in_flight),
            pending_capture: Arc::clone(&self.pending_capture),
        }
    }

    fn report(&self, error: &CaptureError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_degraded(error);
        }
    }

    fn set_state(&self, new_state: PreviewState) {
        {
            let mut s = self.session_state.lock();
            log::debug!("Preview state {:?} -> {:?}", s.preview, new_state);
            s.preview = new_state;
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_preview_state_changed(&new_state);
        }
    }
}

impl<C: CameraService, L: LocationService> Drop for CaptureSessionController<C, L> {
    fn drop(&mut self) {
        self.teardown();
    }
}
