//! Format sniffing and encode helpers around the `image` crate.

use std::io::Cursor;
use image::{DynamicImage, ImageFormat};
use crate::utils::CompressorError;

type Result<T> = std::result::Result<T, CompressorError>;

/// File extensions offered by the picker dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

/// Output encodings the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Sniffs the input format from magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat> {
    image::guess_format(bytes)
        .map_err(|e| CompressorError::format(format!("Unrecognised image data: {e}")))
}

/// Mime type served for input previews.
pub fn mime_for(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

/// Picks the output encoding for a sniffed input format.
///
/// PNG stays PNG so transparency survives. Everything else is re-encoded as
/// JPEG, the only encoder here with a quality dial to walk toward the size
/// budget.
pub fn output_format_for(input: ImageFormat) -> OutputFormat {
    match input {
        ImageFormat::Png => OutputFormat::Png,
        _ => OutputFormat::Jpeg,
    }
}

/// Encodes `image` as JPEG at the given quality (1-100).
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel; flatten before encoding
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| CompressorError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

/// Encodes `image` as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| CompressorError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buf.into_inner())
}
