use anyhow::{Context, Result};
use base64::Engine as _;
use std::fs;
use std::path::Path;

pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Guesses an `image/*` MIME type from the extension, falling back to JPEG.
pub fn detect_mime_type<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path)
        .iter_raw()
        .find(|mime| mime.starts_with("image/"))
        .unwrap_or(FALLBACK_IMAGE_MIME)
        .to_string()
}

pub fn encode_image_to_base64<P: AsRef<Path>>(img_path: P) -> Result<String> {
    let img_path = img_path.as_ref();
    let bytes = fs::read(img_path)
        .with_context(|| format!("Failed to read image file: {}", img_path.display()))?;
    Ok(encode_byte_to_base64(&bytes))
}

pub fn encode_byte_to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn current_timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or_default()
}
