//! Depth estimation module.
//! Derives a per-pixel depth proxy from image gradients: strong edges are
//! assumed closer to the viewer and receive larger stereo displacement.

use relievo_core::frame::{DepthMap, FrameBuffer};
use relievo_core::{RelievoError, RelievoResult};

/// Estimate a depth map for one frame.
///
/// The frame is converted to grayscale (BT.601 luma), horizontal and
/// vertical gradients are computed with 3×3 Sobel kernels, and the
/// per-pixel gradient magnitude is rescaled so its minimum maps to 0 and
/// its maximum to 255. A uniform-intensity frame yields an all-zero map.
pub fn estimate_depth(frame: &FrameBuffer) -> RelievoResult<DepthMap> {
    if frame.is_empty() {
        return Err(RelievoError::invalid_frame(format!(
            "cannot estimate depth of an empty frame ({}x{})",
            frame.width, frame.height
        )));
    }

    let gray = grayscale(frame);
    let w = frame.width as usize;
    let h = frame.height as usize;

    let mut magnitude = vec![0f32; w * h];
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for y in 0..h {
        for x in 0..w {
            // Edge-clamped neighbor sample.
            let s = |dx: isize, dy: isize| -> f32 {
                let sx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                let sy = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                gray[sy * w + sx]
            };

            let gx = (s(1, -1) + 2.0 * s(1, 0) + s(1, 1))
                - (s(-1, -1) + 2.0 * s(-1, 0) + s(-1, 1));
            let gy = (s(-1, 1) + 2.0 * s(0, 1) + s(1, 1))
                - (s(-1, -1) + 2.0 * s(0, -1) + s(1, -1));

            let m = (gx * gx + gy * gy).sqrt();
            magnitude[y * w + x] = m;
            if m < min {
                min = m;
            }
            if m > max {
                max = m;
            }
        }
    }

    let mut map = DepthMap::new(frame.width, frame.height);
    if max > min {
        let scale = 255.0 / (max - min);
        for (dst, &m) in map.data.iter_mut().zip(magnitude.iter()) {
            *dst = ((m - min) * scale).round() as u8;
        }
    }
    // max == min: uniform gradient strength, map stays all-zero.

    Ok(map)
}

/// Convert a frame to a single grayscale channel using BT.601 luma weights.
fn grayscale(frame: &FrameBuffer) -> Vec<f32> {
    let bpp = frame.format.bytes_per_pixel();
    frame
        .data
        .chunks_exact(bpp)
        .map(|px| 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relievo_core::frame::PixelFormat;

    #[test]
    fn test_uniform_frame_yields_zero_map() {
        let frame = FrameBuffer::solid(8, 8, [128, 128, 128]);
        let map = estimate_depth(&frame).unwrap();
        assert_eq!(map.min_max(), Some((0, 0)));
    }

    #[test]
    fn test_step_edge_normalizes_to_full_range() {
        // Left half black, right half white: a strong vertical edge.
        let mut frame = FrameBuffer::new(8, 8, PixelFormat::Rgb8);
        for y in 0..8 {
            for x in 4..8 {
                frame.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        let map = estimate_depth(&frame).unwrap();
        let (min, max) = map.min_max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn test_depth_map_matches_frame_dimensions() {
        let frame = FrameBuffer::solid(12, 7, [10, 20, 30]);
        let map = estimate_depth(&frame).unwrap();
        assert_eq!(map.width, 12);
        assert_eq!(map.height, 7);
        assert_eq!(map.data.len(), 12 * 7);
    }

    #[test]
    fn test_rgba_frame_is_accepted() {
        let mut frame = FrameBuffer::new(4, 4, PixelFormat::Rgba8);
        frame.set_pixel(2, 2, [255, 255, 255, 255]);
        let map = estimate_depth(&frame).unwrap();
        let (min, max) = map.min_max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let frame = FrameBuffer::new(0, 8, PixelFormat::Rgb8);
        assert!(estimate_depth(&frame).is_err());
    }

    #[test]
    fn test_edge_strength_peaks_at_the_edge() {
        // A single bright column: depth should peak at or next to it.
        let mut frame = FrameBuffer::new(9, 3, PixelFormat::Rgb8);
        for y in 0..3 {
            frame.set_pixel(4, y, [255, 255, 255, 255]);
        }
        let map = estimate_depth(&frame).unwrap();
        assert!(map.get(4, 1).unwrap() > 0 || map.get(3, 1).unwrap() > 0);
        // Far from the edge there is no gradient at all.
        assert_eq!(map.get(0, 1), Some(0));
        assert_eq!(map.get(8, 1), Some(0));
    }
}
