//! Upload validation and decoding.
//!
//! The demo only accepts jpg/jpeg/png uploads; everything else is rejected
//! before decoding. Decode failures are not handled locally — they carry the
//! underlying [`image::ImageError`] up to the caller.

use std::path::Path;

use image::DynamicImage;
use thiserror::Error;

/// File extensions accepted by the upload control.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors produced while turning an upload into a decoded image.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported image extension {0:?} (expected jpg, jpeg or png)")]
    UnsupportedExtension(String),

    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Reads and decodes an image file, validating its extension first.
pub fn from_path(path: impl AsRef<Path>) -> Result<DynamicImage, LoadError> {
    let path = path.as_ref();
    check_extension(path.extension().and_then(|e| e.to_str()).unwrap_or(""))?;
    let bytes = std::fs::read(path)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Decodes an already-read upload, validating the original file name's
/// extension first.
pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    check_extension(extension)?;
    Ok(image::load_from_memory(bytes)?)
}

fn check_extension(extension: &str) -> Result<(), LoadError> {
    let lowered = extension.to_ascii_lowercase();
    if SUPPORTED_EXTENSIONS.contains(&lowered.as_str()) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedExtension(extension.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([42])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn accepts_supported_extensions() {
        let bytes = png_bytes();
        for name in ["shape.png", "shape.jpg", "SHAPE.JPEG"] {
            // Extension gate only; the payload is a PNG either way, and the
            // decoder sniffs the real format from the bytes.
            let img = from_bytes(name, &bytes).unwrap();
            assert_eq!((img.width(), img.height()), (3, 3));
        }
    }

    #[test]
    fn rejects_unsupported_extensions() {
        let bytes = png_bytes();
        let err = from_bytes("shape.bmp", &bytes).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "bmp"));

        let err = from_bytes("no_extension", &bytes).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext.is_empty()));
    }

    #[test]
    fn corrupt_bytes_surface_as_decode_errors() {
        let err = from_bytes("broken.png", b"definitely not a png").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn from_path_reads_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let img = from_path(&path).unwrap();
        assert_eq!((img.width(), img.height()), (3, 3));

        let missing = dir.path().join("missing.png");
        assert!(matches!(from_path(&missing).unwrap_err(), LoadError::Io(_)));
    }
}
