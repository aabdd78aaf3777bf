//! Screen capture domain — public API.
//!
//! Grabbing the screen, fitting it to the upload resolution, encoding it as a
//! data URI and placing it on the clipboard. The orchestrator only talks to
//! the functions exported here.

mod clipboard;
mod codec;
mod screenshot;

pub use clipboard::{write_image_to_clipboard, ClipboardError};
pub use codec::{encode_data_uri, fit_to_capture_bounds, CodecError};
pub use screenshot::{capture_primary_monitor, CaptureError};

use image::DynamicImage;

/// Captures the primary screen and fits it to the fixed upload resolution.
///
/// Blocking: call from a blocking worker, not from an async task.
pub fn capture_screen(max_width: u32, max_height: u32) -> Result<DynamicImage, CaptureError> {
    let start = std::time::Instant::now();
    let screenshot = capture_primary_monitor()?;
    let (raw_w, raw_h) = (screenshot.width(), screenshot.height());

    let fitted = fit_to_capture_bounds(screenshot, max_width, max_height);

    log::info!(
        "[CAPTURE] Screen captured in {}ms ({}x{} -> {}x{})",
        start.elapsed().as_millis(),
        raw_w,
        raw_h,
        fitted.width(),
        fitted.height()
    );

    Ok(fitted)
}
