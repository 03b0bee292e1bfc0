use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use geo_capture_core::{ControllerConfig, Coordinate, LocationJoin, PermissionKind, DEFAULT_MAP_PROVIDER};

/// Run a geotagged capture session against the desktop backend.
#[derive(Debug, Parser)]
#[command(name = "geo-capture-demo", version)]
pub struct Cli {
    /// Still image the file-backed camera "captures".
    #[arg(long)]
    pub source: PathBuf,

    /// Latitude reported by the location provider.
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude reported by the location provider.
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Simulated delay before a location fix arrives, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub fix_delay_ms: u64,

    /// Wait up to this many milliseconds for a fix before each capture
    /// instead of racing the capture against the fetch.
    #[arg(long)]
    pub await_fix_ms: Option<u64>,

    /// Permissions to deny (repeatable).
    #[arg(long = "deny", value_enum)]
    pub denied: Vec<Scope>,

    /// Number of photos to take.
    #[arg(long, default_value_t = 1)]
    pub captures: u32,

    /// Flip to the front camera before capturing.
    #[arg(long)]
    pub front: bool,

    /// Open the last known location in the browser when done.
    #[arg(long)]
    pub open_map: bool,

    /// Map service host and path.
    #[arg(long, default_value = DEFAULT_MAP_PROVIDER)]
    pub map_provider: String,

    /// Folder for raw captures (default: system temp dir).
    #[arg(long)]
    pub capture_dir: Option<PathBuf>,

    /// Media library folder (default: ~/Pictures/GeoCapture).
    #[arg(long)]
    pub library_dir: Option<PathBuf>,
}

/// Permission scopes that can be denied from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    Camera,
    Location,
    MediaLibrary,
}

impl From<Scope> for PermissionKind {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Camera => PermissionKind::Camera,
            Scope::Location => PermissionKind::Location,
            Scope::MediaLibrary => PermissionKind::MediaLibrary,
        }
    }
}

impl Cli {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn is_denied(&self, kind: PermissionKind) -> bool {
        self.denied.iter().any(|s| PermissionKind::from(*s) == kind)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        let location_join = match self.await_fix_ms {
            Some(ms) => LocationJoin::AwaitFix {
                timeout: Some(Duration::from_millis(ms)),
            },
            None => LocationJoin::Race,
        };
        ControllerConfig {
            map_provider: self.map_provider.clone(),
            location_join,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_coordinates_and_denials() {
        let cli = Cli::try_parse_from([
            "geo-capture-demo",
            "--source",
            "still.jpg",
            "--latitude",
            "37",
            "--longitude",
            "-122",
            "--deny",
            "media-library",
            "--await-fix-ms",
            "250",
        ])
        .unwrap();

        assert_eq!(cli.coordinate(), Some(Coordinate::new(37.0, -122.0)));
        assert!(cli.is_denied(PermissionKind::MediaLibrary));
        assert!(!cli.is_denied(PermissionKind::Camera));
        assert_eq!(
            cli.controller_config().location_join,
            LocationJoin::AwaitFix {
                timeout: Some(Duration::from_millis(250))
            }
        );
    }

    #[test]
    fn latitude_requires_longitude() {
        let result = Cli::try_parse_from(["geo-capture-demo", "--source", "a.jpg", "--latitude", "1"]);
        assert!(result.is_err());
    }
}
