mod cli;
mod events;

use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use geo_capture_core::{
    CaptureSessionController, PermissionKind, PermissionStatus, PlatformServices,
};
use geo_capture_desktop::{FileCamera, FixedLocation, FolderMediaLibrary, StaticPermissions, SystemBrowser};

use cli::Cli;
use events::{JsonLinesDelegate, Settled};

const CAPTURE_WAIT: Duration = Duration::from_secs(10);

fn library_dir() -> PathBuf {
    dirs_next::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("GeoCapture")
}

fn status_for(cli: &Cli, kind: PermissionKind) -> PermissionStatus {
    if cli.is_denied(kind) {
        PermissionStatus::Denied
    } else {
        PermissionStatus::Granted
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let capture_dir = cli
        .capture_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("geo-capture"));
    let camera = FileCamera::new(cli.source.clone(), capture_dir);

    let location = FixedLocation::new(cli.coordinate())
        .with_delay(Duration::from_millis(cli.fix_delay_ms))
        .with_permission(status_for(&cli, PermissionKind::Location));

    let permissions = StaticPermissions::grant_all()
        .with(PermissionKind::Camera, status_for(&cli, PermissionKind::Camera))
        .with(PermissionKind::MediaLibrary, status_for(&cli, PermissionKind::MediaLibrary));

    let media = FolderMediaLibrary::new(cli.library_dir.clone().unwrap_or_else(library_dir));

    let services = PlatformServices {
        permissions: Arc::new(permissions),
        media: Arc::new(media),
        map_viewer: Arc::new(SystemBrowser),
    };

    let mut controller = CaptureSessionController::new(camera, location, services, cli.controller_config())
        .map_err(|e| e.to_string())?;
    let (delegate, settled) = JsonLinesDelegate::new();
    controller.set_delegate(Arc::new(delegate));

    controller.initialize();

    if cli.front {
        controller.toggle_facing();
    }

    for n in 1..=cli.captures {
        while settled.try_recv().is_ok() {}

        if !controller.capture() {
            log::info!("Capture {} skipped", n);
            continue;
        }
        match settled.recv_timeout(CAPTURE_WAIT) {
            Ok(Settled::Saved) => log::info!("Capture {} saved", n),
            Ok(Settled::NotSaved(reason)) => log::info!("Capture {} not saved: {}", n, reason),
            Ok(Settled::Failed(reason)) => log::warn!("Capture {} failed: {}", n, reason),
            Err(RecvTimeoutError::Timeout) => {
                return Err(format!("capture {} did not complete within {:?}", n, CAPTURE_WAIT));
            }
            Err(RecvTimeoutError::Disconnected) => return Err("session delegate went away".into()),
        }
    }

    if cli.open_map && !controller.open_location_in_map() {
        log::info!("No location to show");
    }

    controller.teardown();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
