//! Image loading and saving.
//! Decodes PNG, JPEG, WebP, and other formats into FrameBuffers for the
//! still-image conversion path, and writes anaglyph frames back out.

use std::path::Path;

use relievo_core::frame::{FrameBuffer, PixelFormat};
use relievo_core::{RelievoError, RelievoResult};

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> RelievoResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        RelievoError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    fb.data = rgba.into_raw();

    Ok(fb)
}

/// Save a FrameBuffer as an image file; format is inferred from the extension.
pub fn save_image(fb: &FrameBuffer, path: &Path) -> RelievoResult<()> {
    let mismatch =
        || RelievoError::invalid_frame("frame buffer size does not match its dimensions");

    let result = match fb.format {
        PixelFormat::Rgb8 => image::RgbImage::from_raw(fb.width, fb.height, fb.data.clone())
            .ok_or_else(mismatch)?
            .save(path),
        PixelFormat::Rgba8 => image::RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
            .ok_or_else(mismatch)?
            .save(path),
    };

    result.map_err(|e| {
        RelievoError::asset(
            format!("failed to save image '{}': {}", path.display(), e),
            path,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/image.png"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut fb = FrameBuffer::new(6, 4, PixelFormat::Rgb8);
        for (i, b) in fb.data.iter_mut().enumerate() {
            *b = (i * 11 % 256) as u8;
        }

        let path = std::env::temp_dir().join("relievo_test_roundtrip.png");
        save_image(&fb, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.width, 6);
        assert_eq!(loaded.height, 4);
        // Loaded images come back as RGBA; compare channel-wise.
        for y in 0..4 {
            for x in 0..6 {
                let a = fb.get_pixel(x, y).unwrap();
                let b = loaded.get_pixel(x, y).unwrap();
                assert_eq!(&a[..3], &b[..3]);
            }
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_rejects_inconsistent_buffer() {
        let mut fb = FrameBuffer::new(4, 4, PixelFormat::Rgb8);
        fb.data.truncate(10);
        let path = std::env::temp_dir().join("relievo_test_bad_buffer.png");
        assert!(save_image(&fb, &path).is_err());
    }
}
