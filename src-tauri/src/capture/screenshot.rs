//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS.

use image::DynamicImage;
use xcap::Monitor;

/// Captures the primary monitor's screen as a `DynamicImage`.
///
/// Falls back to the first reported monitor when none claims to be primary.
/// Returns `NoScreens` when the OS reports no capturable monitor at all.
pub fn capture_primary_monitor() -> Result<DynamicImage, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    if monitors.is_empty() {
        return Err(CaptureError::NoScreens);
    }

    let index = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);
    let monitor = monitors
        .into_iter()
        .nth(index)
        .ok_or(CaptureError::NoScreens)?;

    let image = monitor
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(CaptureError::EmptyFrame);
    }

    Ok(DynamicImage::ImageRgba8(image))
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No screens found")]
    NoScreens,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Screen capture returned an empty frame")]
    EmptyFrame,

    #[error("Capture worker failed: {0}")]
    Worker(String),
}
