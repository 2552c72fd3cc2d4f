//! Anaglyph composition.
//! Merges a stereo pair into one red/cyan frame: the red channel comes from
//! the left view, the remaining channels from the right view.

use relievo_core::frame::FrameBuffer;
use relievo_core::{RelievoError, RelievoResult};

use crate::stereo::StereoPair;

/// Compose a red/cyan anaglyph frame from a stereo pair.
///
/// Output red = left red; every other channel (green, blue, and alpha when
/// present) comes from the right view. No blending, no parameters.
pub fn compose_anaglyph(pair: &StereoPair) -> RelievoResult<FrameBuffer> {
    let left = &pair.left;
    let right = &pair.right;

    if left.width != right.width || left.height != right.height || left.format != right.format {
        return Err(RelievoError::invalid_frame(format!(
            "stereo views do not match: left is {}x{} {:?}, right is {}x{} {:?}",
            left.width, left.height, left.format, right.width, right.height, right.format
        )));
    }
    if left.is_empty() {
        return Err(RelievoError::invalid_frame(
            "cannot compose an anaglyph from empty views".to_string(),
        ));
    }

    let bpp = left.format.bytes_per_pixel();
    let mut out = right.clone();
    for (dst, src) in out
        .data
        .chunks_exact_mut(bpp)
        .zip(left.data.chunks_exact(bpp))
    {
        dst[0] = src[0];
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relievo_core::frame::PixelFormat;

    fn noise_frame(width: u32, height: u32, seed: u8) -> FrameBuffer {
        let mut frame = FrameBuffer::new(width, height, PixelFormat::Rgb8);
        for (i, b) in frame.data.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(31).wrapping_add(seed);
        }
        frame
    }

    #[test]
    fn test_channel_selection() {
        let left = noise_frame(5, 3, 7);
        let right = noise_frame(5, 3, 101);
        let pair = StereoPair {
            left: left.clone(),
            right: right.clone(),
        };
        let out = compose_anaglyph(&pair).unwrap();

        for y in 0..3 {
            for x in 0..5 {
                let l = left.get_pixel(x, y).unwrap();
                let r = right.get_pixel(x, y).unwrap();
                let o = out.get_pixel(x, y).unwrap();
                assert_eq!(o[0], l[0], "red channel must come from the left view");
                assert_eq!(o[1], r[1], "green channel must come from the right view");
                assert_eq!(o[2], r[2], "blue channel must come from the right view");
            }
        }
    }

    #[test]
    fn test_identical_views_pass_through() {
        let frame = noise_frame(4, 4, 42);
        let pair = StereoPair {
            left: frame.clone(),
            right: frame.clone(),
        };
        let out = compose_anaglyph(&pair).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_mismatched_views_are_rejected() {
        let pair = StereoPair {
            left: noise_frame(4, 4, 1),
            right: noise_frame(5, 4, 1),
        };
        assert!(compose_anaglyph(&pair).is_err());
    }

    #[test]
    fn test_mismatched_formats_are_rejected() {
        let pair = StereoPair {
            left: FrameBuffer::new(4, 4, PixelFormat::Rgb8),
            right: FrameBuffer::new(4, 4, PixelFormat::Rgba8),
        };
        assert!(compose_anaglyph(&pair).is_err());
    }

    #[test]
    fn test_empty_views_are_rejected() {
        let pair = StereoPair {
            left: FrameBuffer::new(0, 0, PixelFormat::Rgb8),
            right: FrameBuffer::new(0, 0, PixelFormat::Rgb8),
        };
        assert!(compose_anaglyph(&pair).is_err());
    }
}
