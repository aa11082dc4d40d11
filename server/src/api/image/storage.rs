//! Image storage
//!
//! Validation and compression of uploaded menu images. Everything is
//! re-encoded as JPEG; the stored filename is a fresh uuid.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use uuid::Uuid;

use shared::error::{AppError, AppResult, ErrorCode};

/// Maximum upload size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted upload formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for dish images
const JPEG_QUALITY: u8 = 85;

/// Validate an uploaded image: size cap, extension allowlist, and an
/// actual decode so a renamed file cannot slip through
pub fn validate_image(data: &[u8], ext: &str) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::with_message(ErrorCode::InvalidImage, "Empty file provided"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(ErrorCode::InvalidImage, format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(ErrorCode::InvalidImage, format!(
            "Unsupported file format '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::with_message(ErrorCode::InvalidImage, format!(
            "Invalid image file ({}): {}",
            ext_lower, e
        )));
    }

    Ok(())
}

/// Re-encode the image as JPEG at the standard quality
pub fn compress_image(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::with_message(ErrorCode::InvalidImage, format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok(buffer)
}

/// Validate, compress and store an upload; returns the stored filename
pub fn save_image(images_dir: &Path, data: &[u8], ext: &str) -> AppResult<String> {
    validate_image(data, ext)?;
    let compressed = compress_image(data)?;

    fs::create_dir_all(images_dir)
        .map_err(|e| AppError::with_message(ErrorCode::StorageError, format!("Failed to create images directory: {}", e)))?;

    let filename = format!("{}.jpg", Uuid::new_v4().simple());
    fs::write(images_dir.join(&filename), compressed)
        .map_err(|e| AppError::with_message(ErrorCode::StorageError, format!("Failed to store image: {}", e)))?;

    Ok(filename)
}

/// Remove a stored image; missing files are ignored
pub fn delete_image(images_dir: &Path, filename: &str) {
    let path = images_dir.join(filename);
    if let Err(e) = fs::remove_file(&path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(file = %path.display(), "Failed to delete image: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 60, 30]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn validate_rejects_bad_extension_and_garbage() {
        let png = tiny_png();
        assert!(validate_image(&png, "png").is_ok());
        assert!(validate_image(&png, "gif").is_err());
        assert!(validate_image(b"not an image", "png").is_err());
        assert!(validate_image(&[], "png").is_err());
    }

    #[test]
    fn save_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let filename = save_image(dir.path(), &tiny_png(), "png").unwrap();
        assert!(filename.ends_with(".jpg"));
        assert!(dir.path().join(&filename).exists());

        // Stored bytes decode as JPEG
        let stored = std::fs::read(dir.path().join(&filename)).unwrap();
        assert!(image::load_from_memory(&stored).is_ok());

        delete_image(dir.path(), &filename);
        assert!(!dir.path().join(&filename).exists());
        // Deleting again is a no-op
        delete_image(dir.path(), &filename);
    }
}
