use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::{Coordinate, GeoFix};

/// Which physical camera feeds the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// EXIF-like metadata the platform embedded in a saved image.
///
/// Only the GPS fields are interpreted; every other tag is carried through
/// untouched in `other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageExif {
    #[serde(rename = "GPSLatitude", default, skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,
    #[serde(rename = "GPSLongitude", default, skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl ImageExif {
    /// The embedded GPS position, if both latitude and longitude are present.
    pub fn gps_coordinate(&self) -> Option<Coordinate> {
        match (self.gps_latitude, self.gps_longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

/// Opaque reference to an image the camera service saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHandle {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<ImageExif>,
}

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            exif: None,
        }
    }

    pub fn with_exif(mut self, exif: ImageExif) -> Self {
        self.exif = Some(exif);
        self
    }
}

/// Extra metadata the controller asks the camera to embed in a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    /// Last location fix known when the capture was issued.
    pub location: Option<GeoFix>,
    /// Fixed diagnostic tag identifying captures made by this controller.
    pub tag: String,
}

/// Options passed to the camera service for a still capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Ask the platform to embed EXIF data, including `metadata`.
    pub embed_metadata: bool,
    pub metadata: CaptureMetadata,
}

/// The photo a session currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub image: ImageHandle,
    /// Location known when the capture completion fired, if any.
    pub location: Option<GeoFix>,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_fields_parse_from_platform_exif() {
        let exif: ImageExif = serde_json::from_str(
            r#"{"GPSLatitude": 37.5, "GPSLongitude": -122.25, "Make": "Pixel"}"#,
        )
        .unwrap();
        assert_eq!(exif.gps_coordinate(), Some(Coordinate::new(37.5, -122.25)));
        assert_eq!(exif.other.get("Make"), Some(&serde_json::json!("Pixel")));
    }

    #[test]
    fn partial_gps_is_not_a_coordinate() {
        let exif = ImageExif {
            gps_latitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(exif.gps_coordinate(), None);
    }

    #[test]
    fn facing_flips_both_ways() {
        assert_eq!(CameraFacing::Back.flipped(), CameraFacing::Front);
        assert_eq!(CameraFacing::Front.flipped(), CameraFacing::Back);
    }
}
