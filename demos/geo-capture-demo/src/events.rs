use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};

use parking_lot::Mutex;
use serde::Serialize;

use geo_capture_core::{
    CaptureError, CapturedPhoto, DisabledReason, GeoFix, ImageHandle, PermissionKind, PreviewState, SessionDelegate,
};

/// How a capture ended, as far as the app waiting on it is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    Saved,
    NotSaved(String),
    Failed(String),
}

/// SessionDelegate that prints each event as a JSON line on stdout and
/// signals capture outcomes on a channel.
pub struct JsonLinesDelegate {
    settled: Mutex<Sender<Settled>>,
}

impl JsonLinesDelegate {
    pub fn new() -> (Self, Receiver<Settled>) {
        let (tx, rx) = mpsc::channel();
        (Self { settled: Mutex::new(tx) }, rx)
    }

    fn settle(&self, outcome: Settled) {
        // The receiver may already be gone on shutdown.
        let _ = self.settled.lock().send(outcome);
    }
}

fn settled_for(error: &CaptureError) -> Option<Settled> {
    match error {
        CaptureError::SaveFailed(_) | CaptureError::PermissionDenied(PermissionKind::MediaLibrary) => {
            Some(Settled::NotSaved(error.to_string()))
        }
        CaptureError::CameraFailed(_) | CaptureError::StorageError(_) => Some(Settled::Failed(error.to_string())),
        _ => None,
    }
}

// -- Event payloads --

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum Event<'a> {
    PreviewStateChanged { state: &'a str, reason: Option<String> },
    LocationUpdated { latitude: f64, longitude: f64, timestamp: String },
    PhotoCaptured { uri: &'a str, latitude: Option<f64>, longitude: Option<f64> },
    PhotoSaved { uri: &'a str },
    Degraded { message: String },
}

fn emit(event: &Event<'_>) {
    match serde_json::to_string(event) {
        Ok(line) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", line) {
                log::warn!("Failed to write event to stdout: {}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize event: {}", e),
    }
}

impl SessionDelegate for JsonLinesDelegate {
    fn on_preview_state_changed(&self, state: &PreviewState) {
        let (name, reason) = match state {
            PreviewState::Uninitialized => ("uninitialized", None),
            PreviewState::PermissionPending => ("permission-pending", None),
            PreviewState::Active => ("active", None),
            PreviewState::Disabled(reason) => {
                let reason = match reason {
                    DisabledReason::PermissionDenied => "permission-denied".to_string(),
                    DisabledReason::Revoked(kind) => format!("{}-revoked", kind),
                    DisabledReason::CameraUnavailable => "camera-unavailable".to_string(),
                    DisabledReason::Unmounted => "unmounted".to_string(),
                };
                ("disabled", Some(reason))
            }
        };
        emit(&Event::PreviewStateChanged { state: name, reason });
    }

    fn on_location_updated(&self, fix: &GeoFix) {
        emit(&Event::LocationUpdated {
            latitude: fix.coordinate.latitude,
            longitude: fix.coordinate.longitude,
            timestamp: fix.timestamp.to_rfc3339(),
        });
    }

    fn on_photo_captured(&self, photo: &CapturedPhoto) {
        let coordinate = photo.location.map(|fix| fix.coordinate);
        emit(&Event::PhotoCaptured {
            uri: &photo.image.uri,
            latitude: coordinate.map(|c| c.latitude),
            longitude: coordinate.map(|c| c.longitude),
        });
    }

    fn on_photo_saved(&self, image: &ImageHandle) {
        emit(&Event::PhotoSaved { uri: &image.uri });
        self.settle(Settled::Saved);
    }

    fn on_degraded(&self, error: &CaptureError) {
        emit(&Event::Degraded {
            message: error.to_string(),
        });
        if let Some(outcome) = settled_for(error) {
            self.settle(outcome);
        }
    }
}
