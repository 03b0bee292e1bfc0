use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Whether both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Search URL for this coordinate on `map_provider` (host plus optional path,
    /// e.g. `www.google.com/maps`).
    ///
    /// Components use the shortest decimal form, so `37.0` renders as `37`.
    pub fn map_search_url(&self, map_provider: &str) -> String {
        let provider = map_provider
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!(
            "https://{}/search/?api=1&query={},{}",
            provider, self.latitude, self.longitude
        )
    }
}

/// A position reported by the location service, with the time it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    /// Horizontal accuracy radius in meters, when the platform reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
}

impl GeoFix {
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            timestamp: Utc::now(),
            accuracy_m: None,
        }
    }
}
