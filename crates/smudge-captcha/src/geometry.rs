// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sprite geometry — tight alpha bounding box, expand-to-fit rotation, and
// the four-corner quadrilateral warp used for perspective-style glyph
// distortion. Built on `imageproc::geometric_transformations`.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::debug;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Tight bounding box of the non-transparent pixels, as (x, y, width,
/// height). `None` when every pixel is fully transparent.
pub(crate) fn content_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x == u32::MAX {
        None
    } else {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

/// Rotate about the centre with bilinear interpolation, expanding the
/// output canvas so the rotated content is never clipped.
///
/// `imageproc` only offers same-size rotation, so this composes the
/// equivalent projection into an enlarged target: translate the centre to
/// the origin, rotate, translate to the centre of the expanded canvas.
pub(crate) fn rotate_expand(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let out_w = (w as f32 * cos + h as f32 * sin).ceil() as u32;
    let out_h = (w as f32 * sin + h as f32 * cos).ceil() as u32;

    let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    let mut output = RgbaImage::new(out_w.max(1), out_h.max(1));
    warp_into(
        image,
        &projection,
        Interpolation::Bilinear,
        TRANSPARENT,
        &mut output,
    );
    output
}

/// Remap the quadrilateral `quad` of `sprite` onto an `out_w` x `out_h`
/// rectangle, producing the skewed glyph image.
///
/// `quad` is given in sprite coordinates, ordered top-left, top-right,
/// bottom-right, bottom-left; corners may lie outside the sprite. Should
/// the four corners be (near-)degenerate, so that no projective transform
/// exists, the sprite is plainly resized instead of aborting the call.
pub(crate) fn warp_quad(
    sprite: &RgbaImage,
    out_w: u32,
    out_h: u32,
    quad: [(f32, f32); 4],
) -> RgbaImage {
    let dest = [
        (0.0, 0.0),
        (out_w as f32, 0.0),
        (out_w as f32, out_h as f32),
        (0.0, out_h as f32),
    ];

    match Projection::from_control_points(quad, dest) {
        Some(projection) => {
            let mut output = RgbaImage::new(out_w, out_h);
            warp_into(
                sprite,
                &projection,
                Interpolation::Bilinear,
                TRANSPARENT,
                &mut output,
            );
            output
        }
        None => {
            debug!(?quad, "Degenerate warp quadrilateral, falling back to resize");
            imageops::resize(sprite, out_w, out_h, FilterType::CatmullRom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([200, 30, 30, 255]))
    }

    #[test]
    fn content_bounds_of_transparent_image_is_none() {
        let image = RgbaImage::new(8, 8);
        assert_eq!(content_bounds(&image), None);
    }

    #[test]
    fn content_bounds_finds_drawn_rectangle() {
        let mut image = RgbaImage::new(20, 20);
        for y in 5..9 {
            for x in 3..10 {
                image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        assert_eq!(content_bounds(&image), Some((3, 5, 7, 4)));
    }

    #[test]
    fn rotate_zero_degrees_preserves_content() {
        let image = opaque(10, 6);
        let rotated = rotate_expand(&image, 0.0);
        assert_eq!(rotated.dimensions(), (10, 6));
        assert_eq!(rotated.get_pixel(5, 3), image.get_pixel(5, 3));
    }

    #[test]
    fn rotation_expands_the_canvas() {
        let image = opaque(20, 4);
        let rotated = rotate_expand(&image, 45.0);
        assert!(rotated.height() > 4, "rotated height must grow");
        // Some content must survive the rotation.
        assert!(rotated.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn identity_quad_warp_is_a_copy() {
        let image = opaque(12, 8);
        let quad = [(0.0, 0.0), (12.0, 0.0), (12.0, 8.0), (0.0, 8.0)];
        let warped = warp_quad(&image, 12, 8, quad);
        assert_eq!(warped.dimensions(), (12, 8));
        assert_eq!(warped.get_pixel(6, 4), image.get_pixel(6, 4));
    }

    #[test]
    fn degenerate_quad_falls_back_to_resize() {
        let image = opaque(12, 8);
        // All four corners collinear: no projective transform exists.
        let quad = [(0.0, 0.0), (4.0, 0.0), (8.0, 0.0), (12.0, 0.0)];
        let warped = warp_quad(&image, 6, 4, quad);
        assert_eq!(warped.dimensions(), (6, 4));
    }

    #[test]
    fn skewed_quad_produces_output_of_requested_size() {
        let image = opaque(30, 20);
        let quad = [(3.0, -2.0), (28.0, 1.0), (33.0, 22.0), (-3.0, 18.0)];
        let warped = warp_quad(&image, 30, 20, quad);
        assert_eq!(warped.dimensions(), (30, 20));
        assert!(warped.pixels().any(|p| p.0[3] > 0));
    }
}
