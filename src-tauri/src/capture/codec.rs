//! Pure image codec logic — functional core.
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data (or text) out.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Scales a capture down so it fits inside `max_width` x `max_height`,
/// keeping the aspect ratio. Images that already fit are returned untouched.
pub fn fit_to_capture_bounds(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if image.width() <= max_width && image.height() <= max_height {
        return image;
    }
    image.resize(max_width, max_height, FilterType::Triangle)
}

/// Encodes an image as a `data:image/png;base64,...` URI.
///
/// The upload endpoint takes the image inline in its JSON body, so the
/// self-describing data URI is the wire format.
pub fn encode_data_uri(image: &DynamicImage) -> Result<String, CodecError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CodecError::EmptyImage);
    }

    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CodecError::EncodingFailed(e.to_string()))?;

    let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png_bytes.len() * 4 / 3 + 4);
    uri.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(&png_bytes, &mut uri);
    Ok(uri)
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Image has zero width or height")]
    EmptyImage,

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}
