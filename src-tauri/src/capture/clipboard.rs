//! System clipboard write using the `arboard` crate.

use arboard::{Clipboard, ImageData};
use image::DynamicImage;
use std::borrow::Cow;

/// Places the capture on the system clipboard as RGBA pixels.
pub fn write_image_to_clipboard(image: &DynamicImage) -> Result<(), ClipboardError> {
    let rgba = image.to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);

    let data = ImageData {
        width,
        height,
        bytes: Cow::Owned(rgba.into_raw()),
    };

    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
    clipboard
        .set_image(data)
        .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Unavailable(String),

    #[error("Failed to copy image to clipboard: {0}")]
    WriteFailed(String),
}
