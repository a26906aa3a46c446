// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph renderer — rasterizes one character (or whitespace spacer) into a
// cropped, rotated, quadrilateral-warped transparent sprite.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rand::Rng;
use smudge_core::error::Result;

use crate::fonts::FontSet;
use crate::geometry::{content_bounds, rotate_expand, warp_quad};

/// Render `text` into a distorted transparent sprite with the given ink
/// color, using a randomly chosen face from the font set.
///
/// Whitespace-only text yields a fully transparent sprite of the measured
/// advance width; the compositor uses these as forced inter-glyph gaps.
pub(crate) fn render_text_sprite<R: Rng>(
    text: &str,
    fonts: &FontSet,
    ink: Rgba<u8>,
    rng: &mut R,
) -> Result<RgbaImage> {
    let face = fonts.pick_for(text, rng)?;
    let (width, height) = face.measure(text);

    // Jitter the origin so the later rotation has headroom before clipping.
    let jitter_x = rng.gen_range(0..=4u32);
    let jitter_y = rng.gen_range(0..=6u32);
    let mut sprite = RgbaImage::new(width + jitter_x, height + jitter_y);
    draw_text_mut(
        &mut sprite,
        ink,
        jitter_x as i32,
        jitter_y as i32,
        face.scale,
        &face.font,
        text,
    );

    let sprite = match content_bounds(&sprite) {
        Some((x, y, w, h)) => imageops::crop_imm(&sprite, x, y, w, h).to_image(),
        // Nothing rendered (spacer): keep the whole transparent sprite.
        None => sprite,
    };

    let rotated = rotate_expand(&sprite, rng.gen_range(-10.0f32..=10.0));

    // Displacement magnitudes come from the measured text box rather than
    // the rotated sprite, so warp intensity tracks the nominal glyph size.
    let max_dx = width as f32 * rng.gen_range(0.1..0.3);
    let max_dy = height as f32 * rng.gen_range(0.2..0.3);
    let x1 = rng.gen_range(-max_dx..max_dx) as i32;
    let y1 = rng.gen_range(-max_dy..max_dy) as i32;
    let x2 = rng.gen_range(-max_dx..max_dx) as i32;
    let y2 = rng.gen_range(-max_dy..max_dy) as i32;

    let warp_w = width + x1.unsigned_abs() + x2.unsigned_abs();
    let warp_h = height + y1.unsigned_abs() + y2.unsigned_abs();
    let stretched = imageops::resize(&rotated, warp_w, warp_h, FilterType::CatmullRom);

    let quad = [
        (x1 as f32, y1 as f32),
        ((warp_w as i32 - x2) as f32, (-y1) as f32),
        ((warp_w as i32 + x2) as f32, (warp_h as i32 + y2) as f32),
        ((-x1) as f32, (warp_h as i32 - y2) as f32),
    ];
    Ok(warp_quad(&stretched, width, height, quad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use smudge_core::CaptchaConfig;

    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    fn font_set() -> FontSet {
        let config = CaptchaConfig {
            font_sizes: vec![40.0],
            ..Default::default()
        };
        FontSet::load(&config).expect("bundled font loads")
    }

    #[test]
    fn glyph_sprite_has_ink_pixels() {
        let fonts = font_set();
        let mut rng = StdRng::seed_from_u64(21);
        let sprite = render_text_sprite("W", &fonts, INK, &mut rng).unwrap();
        assert!(sprite.width() > 0 && sprite.height() > 0);
        assert!(
            sprite.pixels().any(|p| p.0[3] > 128),
            "a rendered glyph must contain opaque pixels"
        );
    }

    #[test]
    fn sprite_dimensions_match_measured_text_box() {
        let fonts = font_set();
        let mut rng = StdRng::seed_from_u64(7);
        let face = fonts.pick_for("H", &mut rng).unwrap();
        let (w, h) = face.measure("H");
        // Fresh RNG so the sprite uses the same (only) face.
        let mut rng = StdRng::seed_from_u64(7);
        let sprite = render_text_sprite("H", &fonts, INK, &mut rng).unwrap();
        assert_eq!(sprite.dimensions(), (w, h));
    }

    #[test]
    fn spacer_sprite_is_fully_transparent() {
        let fonts = font_set();
        let mut rng = StdRng::seed_from_u64(5);
        let sprite = render_text_sprite("  ", &fonts, INK, &mut rng).unwrap();
        assert!(sprite.width() > 0, "spacer keeps its advance width");
        assert!(
            sprite.pixels().all(|p| p.0[3] == 0),
            "spacers must render nothing"
        );
    }

    #[test]
    fn sprites_vary_with_the_rng() {
        let fonts = font_set();
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(999);
        let first = render_text_sprite("S", &fonts, INK, &mut a).unwrap();
        let second = render_text_sprite("S", &fonts, INK, &mut b).unwrap();
        // Same glyph, different jitter/rotation/warp draws.
        assert!(
            first.dimensions() != second.dimensions()
                || first.as_raw() != second.as_raw()
        );
    }
}
