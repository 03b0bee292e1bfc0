//! Opening map links with the desktop's URL handler.

use std::process::Command;

use geo_capture_core::models::error::CaptureError;
use geo_capture_core::traits::map_viewer::MapViewer;

/// Opens URLs in the user's default browser.
pub struct SystemBrowser;

/// Program and arguments that hand `url` to the platform URL handler.
pub fn open_command(url: &str) -> (&'static str, Vec<String>) {
    #[cfg(target_os = "windows")]
    {
        // `start` treats the first quoted argument as a window title.
        ("cmd", vec!["/C".into(), "start".into(), "".into(), url.to_string()])
    }
    #[cfg(target_os = "macos")]
    {
        ("open", vec![url.to_string()])
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        ("xdg-open", vec![url.to_string()])
    }
}

impl MapViewer for SystemBrowser {
    fn open_url(&self, url: &str) -> Result<(), CaptureError> {
        if !url.starts_with("https://") {
            return Err(CaptureError::MapViewerFailed(format!("refusing non-https url: {}", url)));
        }
        let (program, args) = open_command(url);
        Command::new(program)
            .args(&args)
            .spawn()
            .map_err(|e| CaptureError::MapViewerFailed(format!("failed to launch {}: {}", program, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_passed_as_last_argument() {
        let url = "https://www.google.com/maps/search/?api=1&query=37,-122";
        let (_, args) = open_command(url);
        assert_eq!(args.last().map(String::as_str), Some(url));
    }

    #[test]
    fn non_https_urls_are_rejected() {
        let result = SystemBrowser.open_url("file:///etc/passwd");
        assert!(matches!(result, Err(CaptureError::MapViewerFailed(_))));
    }
}
