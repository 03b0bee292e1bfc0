use crate::models::error::CaptureError;

/// Host capability to open a URL in an external viewer or browser.
pub trait MapViewer: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), CaptureError>;
}
