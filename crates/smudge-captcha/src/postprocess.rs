// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Post-processor — smoothing, hard-threshold binarization, and the final
// nearest-neighbour thumbnail.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::filter::filter3x3;

/// 3x3 smoothing kernel (centre-weighted box blur), normalised to sum 1.
#[rustfmt::skip]
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0,
    1.0 / 13.0, 5.0 / 13.0, 1.0 / 13.0,
    1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0,
];

/// Luminance above this becomes pure white; everything else pure black.
pub(crate) const BINARIZE_THRESHOLD: u8 = 200;

/// Bounds of the final aspect-preserving thumbnail.
pub(crate) const THUMBNAIL_WIDTH: u32 = 175;
pub(crate) const THUMBNAIL_HEIGHT: u32 = 70;

/// Apply the fixed smoothing convolution to the noisy canvas.
pub(crate) fn smooth(canvas: &RgbaImage) -> RgbaImage {
    filter3x3::<Rgba<u8>, f32, u8>(canvas, &SMOOTH_KERNEL)
}

/// Convert to grayscale and binarize with the fixed threshold.
pub(crate) fn binarize(canvas: &RgbaImage) -> GrayImage {
    let gray = imageops::grayscale(canvas);
    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let val = gray.get_pixel(x, y).0[0];
            let binary = if val > BINARIZE_THRESHOLD { 255u8 } else { 0u8 };
            output.put_pixel(x, y, Luma([binary]));
        }
    }
    output
}

/// Downsample into the thumbnail bounds, preserving aspect ratio, with
/// nearest-neighbour resampling. Images already inside the bounds are
/// returned unchanged (downscale only, like a thumbnail).
pub(crate) fn thumbnail(image: GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    if w <= THUMBNAIL_WIDTH && h <= THUMBNAIL_HEIGHT {
        return image;
    }

    let scale = (THUMBNAIL_WIDTH as f32 / w as f32).min(THUMBNAIL_HEIGHT as f32 / h as f32);
    let out_w = ((w as f32 * scale).round() as u32).max(1);
    let out_h = ((h as f32 * scale).round() as u32).max(1);
    imageops::resize(&image, out_w, out_h, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_preserves_dimensions() {
        let canvas = RgbaImage::from_pixel(50, 30, Rgba([200, 200, 200, 255]));
        let smoothed = smooth(&canvas);
        assert_eq!(smoothed.dimensions(), (50, 30));
    }

    #[test]
    fn smooth_blurs_a_hard_edge() {
        let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        for y in 0..20 {
            for x in 0..10 {
                canvas.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let smoothed = smooth(&canvas);
        // Pixels straddling the edge take intermediate values.
        let edge = smoothed.get_pixel(10, 10).0[0];
        assert!(edge > 0 && edge < 255, "edge pixel should be blurred, got {edge}");
    }

    #[test]
    fn binarize_produces_only_black_and_white() {
        let mut canvas = RgbaImage::new(16, 16);
        for (i, pixel) in canvas.pixels_mut().enumerate() {
            let v = (i % 256) as u8;
            *pixel = Rgba([v, v, v, 255]);
        }
        let binary = binarize(&canvas);
        assert!(binary.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn binarize_threshold_splits_at_200() {
        let mut canvas = RgbaImage::new(2, 1);
        canvas.put_pixel(0, 0, Rgba([201, 201, 201, 255]));
        canvas.put_pixel(1, 0, Rgba([200, 200, 200, 255]));
        let binary = binarize(&canvas);
        assert_eq!(binary.get_pixel(0, 0).0[0], 255);
        assert_eq!(binary.get_pixel(1, 0).0[0], 0);
    }

    #[test]
    fn thumbnail_fits_bounds_and_preserves_aspect() {
        let image = GrayImage::from_pixel(350, 140, Luma([255]));
        let thumb = thumbnail(image);
        // 350x140 is exactly 2.5:1, the same as the 175x70 bounds.
        assert_eq!(thumb.dimensions(), (175, 70));
    }

    #[test]
    fn thumbnail_never_upscales() {
        let image = GrayImage::from_pixel(100, 40, Luma([0]));
        let thumb = thumbnail(image);
        assert_eq!(thumb.dimensions(), (100, 40));
    }

    #[test]
    fn thumbnail_handles_odd_aspect_ratios() {
        let image = GrayImage::from_pixel(700, 100, Luma([0]));
        let thumb = thumbnail(image);
        assert_eq!(thumb.dimensions(), (175, 25));
        let tall = GrayImage::from_pixel(100, 700, Luma([0]));
        let thumb = thumbnail(tall);
        assert_eq!(thumb.dimensions(), (10, 70));
    }
}
