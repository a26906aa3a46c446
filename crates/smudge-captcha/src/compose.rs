// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compositor — lays glyph sprites onto the background canvas with
// randomized overlap, pasting through a contrast-boosted luminance mask.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use once_cell::sync::Lazy;
use rand::Rng;
use smudge_core::error::Result;
use smudge_core::CaptchaConfig;
use tracing::{debug, instrument};

use crate::fonts::FontSet;
use crate::glyph::render_text_sprite;

/// Contrast-boosting alpha lookup table: `round(i * 1.97)` clamped to 255.
///
/// Applied to the sprite's luminance when building the paste mask, it
/// pushes glyph interiors to full opacity while anti-aliased edges keep a
/// partial alpha and blend into the background.
static CONTRAST_TABLE: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = ((i as f32) * 1.97).round().min(255.0) as u8;
    }
    table
});

/// Assembles glyph sprites into a populated canvas.
pub(crate) struct Compositor<'a> {
    pub config: &'a CaptchaConfig,
    pub fonts: &'a FontSet,
}

impl Compositor<'_> {
    /// Render every character of `chars` and lay the sprites out
    /// left-to-right on a canvas filled with `background`.
    ///
    /// The sprite sequence is a leading single-space spacer, then for each
    /// character a double-space spacer followed by the glyph itself; the
    /// forced gaps are anti-segmentation noise. If the sprites outgrow the
    /// configured width the canvas is widened to fit and squeezed back down
    /// at the end, compressing and overlapping the glyphs.
    #[instrument(skip_all, fields(chars = chars.chars().count()))]
    pub fn compose<R: Rng>(
        &self,
        chars: &str,
        ink: Rgba<u8>,
        background: Rgba<u8>,
        rng: &mut R,
    ) -> Result<RgbaImage> {
        let mut sprites: Vec<RgbaImage> = Vec::with_capacity(chars.chars().count() * 2 + 1);
        sprites.push(render_text_sprite(" ", self.fonts, ink, rng)?);
        for c in chars.chars() {
            sprites.push(render_text_sprite("  ", self.fonts, ink, rng)?);
            sprites.push(render_text_sprite(&c.to_string(), self.fonts, ink, rng)?);
        }

        let total_width: u32 = sprites.iter().map(|s| s.width()).sum();
        let char_count = chars.chars().count() as u32; // non-zero, checked by the generator
        let canvas_width = total_width.max(self.config.width);
        let mut canvas = RgbaImage::from_pixel(canvas_width, self.config.height, background);
        debug!(total_width, canvas_width, "Sprites rendered");

        let average = (total_width / char_count) as i64;
        let max_jitter = average / 4;
        let mut cursor = average / 10;

        for sprite in &sprites {
            let y = (self.config.height as i64 - sprite.height() as i64) / 2;
            paste_masked(&mut canvas, sprite, cursor, y);
            let jitter = if max_jitter > 0 {
                rng.gen_range(-max_jitter..=0)
            } else {
                0
            };
            cursor += sprite.width() as i64 + jitter;
        }

        if canvas_width > self.config.width {
            debug!(
                from = canvas_width,
                to = self.config.width,
                "Squeezing widened canvas back to configured size"
            );
            canvas = imageops::resize(
                &canvas,
                self.config.width,
                self.config.height,
                FilterType::Lanczos3,
            );
        }
        Ok(canvas)
    }
}

/// Paste `sprite` onto `canvas` at (x, y), using the sprite's
/// contrast-amplified Rec.601 luminance as the alpha mask. Off-canvas
/// regions are clipped.
fn paste_masked(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) {
    let (canvas_w, canvas_h) = canvas.dimensions();

    for (sx, sy, pixel) in sprite.enumerate_pixels() {
        let cx = x + sx as i64;
        let cy = y + sy as i64;
        if cx < 0 || cy < 0 || cx >= canvas_w as i64 || cy >= canvas_h as i64 {
            continue;
        }

        let Rgba([r, g, b, _]) = *pixel;
        let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
            .round()
            .min(255.0) as usize;
        let mask = CONTRAST_TABLE[luma] as u16;
        if mask == 0 {
            continue;
        }
        let inverse = 255 - mask;

        let dest = canvas.get_pixel_mut(cx as u32, cy as u32);
        for channel in 0..3 {
            let blended =
                (pixel.0[channel] as u16 * mask + dest.0[channel] as u16 * inverse) / 255;
            dest.0[channel] = blended as u8;
        }
        dest.0[3] = 255;
    }
}
