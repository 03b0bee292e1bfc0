use std::time::Duration;

use super::image::CameraFacing;

/// Default map service host and path used for "view location" links.
pub const DEFAULT_MAP_PROVIDER: &str = "www.google.com/maps";

/// Default diagnostic tag embedded in every capture.
pub const DEFAULT_DIAGNOSTIC_TAG: &str = "geo-capture-kit";

/// How a capture relates to the location fetch issued just before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationJoin {
    /// Issue the fetch and capture immediately. The capture embeds whatever
    /// fix was already known; the new fix lands on the session whenever it
    /// arrives.
    Race,
    /// Wait for the fetch before capturing. `None` waits as long as the
    /// platform does; on timeout or failure the capture proceeds without it.
    AwaitFix { timeout: Option<Duration> },
}

/// Configuration for a capture session controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Map service host plus path, without scheme (default: Google Maps).
    pub map_provider: String,

    /// Tag embedded alongside the location in each capture.
    pub diagnostic_tag: String,

    /// Ask the camera to embed EXIF metadata (default: true).
    pub embed_metadata: bool,

    /// Facing used when the session is created (default: back).
    pub initial_facing: CameraFacing,

    /// Location/capture ordering (default: race).
    pub location_join: LocationJoin,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), String> {
        let provider = self.map_provider.trim();
        if provider.is_empty() {
            return Err("map provider must not be empty".into());
        }
        if provider.contains(char::is_whitespace) {
            return Err(format!("invalid map provider: {:?}", self.map_provider));
        }
        if self.diagnostic_tag.is_empty() {
            return Err("diagnostic tag must not be empty".into());
        }
        if let LocationJoin::AwaitFix {
            timeout: Some(timeout),
        } = self.location_join
        {
            if timeout.is_zero() {
                return Err("location timeout must be positive".into());
            }
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            map_provider: DEFAULT_MAP_PROVIDER.to_string(),
            diagnostic_tag: DEFAULT_DIAGNOSTIC_TAG.to_string(),
            embed_metadata: true,
            initial_facing: CameraFacing::Back,
            location_join: LocationJoin::Race,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_provider_and_zero_timeout() {
        let config = ControllerConfig {
            map_provider: "maps example".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            location_join: LocationJoin::AwaitFix {
                timeout: Some(Duration::ZERO),
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err("location timeout must be positive".to_string())
        );
    }
}
