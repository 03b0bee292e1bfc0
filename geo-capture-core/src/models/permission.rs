use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform permission scope the capture screen depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionKind {
    Camera,
    /// Foreground ("while in use") location.
    Location,
    MediaLibrary,
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Camera => "camera",
            Self::Location => "location",
            Self::MediaLibrary => "media-library",
        };
        f.write_str(name)
    }
}

/// Outcome of a permission prompt or status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Permission state for every scope used by a session.
///
/// A scope never moves back to `Unknown` once it has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionSet {
    pub camera: PermissionStatus,
    pub location: PermissionStatus,
    pub media_library: PermissionStatus,
}

impl PermissionSet {
    pub fn get(&self, kind: PermissionKind) -> PermissionStatus {
        match kind {
            PermissionKind::Camera => self.camera,
            PermissionKind::Location => self.location,
            PermissionKind::MediaLibrary => self.media_library,
        }
    }

    /// Record an answer for `kind`. `Unknown` answers are ignored.
    pub fn set(&mut self, kind: PermissionKind, status: PermissionStatus) {
        if status == PermissionStatus::Unknown {
            return;
        }
        let slot = match kind {
            PermissionKind::Camera => &mut self.camera,
            PermissionKind::Location => &mut self.location,
            PermissionKind::MediaLibrary => &mut self.media_library,
        };
        *slot = status;
    }

    pub fn is_granted(&self, kind: PermissionKind) -> bool {
        self.get(kind).is_granted()
    }
}
