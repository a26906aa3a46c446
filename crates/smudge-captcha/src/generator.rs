// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generator facade — ties the glyph renderer, compositor, noise injector,
// and post-processor into the public generate/encode/write entry points.

use image::{DynamicImage, GrayImage, ImageFormat};
use imageproc::drawing::Blend;
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smudge_core::error::{Result, SmudgeError};
use smudge_core::CaptchaConfig;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::color;
use crate::compose::Compositor;
use crate::fonts::FontSet;
use crate::noise;
use crate::postprocess;

/// Generates distorted text CAPTCHA images.
///
/// The generator owns its configuration, a lazily materialised font set
/// (loaded on the first generation call and reused afterwards), and the
/// random source. Seeded construction makes output byte-reproducible:
///
/// ```ignore
/// let mut generator = CaptchaGenerator::with_seed(CaptchaConfig::default(), 42)?;
/// generator.write("AB12", "out/ab12.png", "png")?;
/// ```
pub struct CaptchaGenerator {
    config: CaptchaConfig,
    fonts: OnceCell<FontSet>,
    rng: StdRng,
}

impl CaptchaGenerator {
    // -- Construction ---------------------------------------------------------

    /// Create a generator seeded from OS entropy.
    ///
    /// Fails fast on degenerate configuration; font files are validated on
    /// first use.
    pub fn new(config: CaptchaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fonts: OnceCell::new(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Create a generator with a fixed seed, for reproducible output.
    pub fn with_seed(config: CaptchaConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fonts: OnceCell::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Borrow the generator's configuration.
    pub fn config(&self) -> &CaptchaConfig {
        &self.config
    }

    // -- Generation -----------------------------------------------------------

    /// Run the full synthesis pipeline for `chars` and return the final
    /// binarized, thumbnailed image.
    #[instrument(skip(self), fields(len = chars.chars().count()))]
    pub fn generate_image(&mut self, chars: &str) -> Result<GrayImage> {
        if chars.is_empty() {
            return Err(SmudgeError::EmptyText);
        }
        let fonts = self
            .fonts
            .get_or_try_init(|| FontSet::load(&self.config))?;
        let rng = &mut self.rng;

        let background = color::random_color(238, 255, rng);
        let ink = color::random_color(10, 200, rng);
        debug!(?background, ?ink, "Colors chosen");

        let compositor = Compositor {
            config: &self.config,
            fonts,
        };
        let composed = compositor.compose(chars, ink, background, rng)?;

        let mut canvas = Blend(composed);
        noise::draw_noise_dots(
            &mut canvas,
            ink,
            noise::PRIMARY_DOT_MAX_WIDTH,
            noise::PRIMARY_DOT_COUNT,
            rng,
        );
        noise::draw_noise_dots(
            &mut canvas,
            color::with_alpha(ink, noise::SECONDARY_DOT_ALPHA),
            noise::SECONDARY_DOT_MAX_WIDTH,
            noise::SECONDARY_DOT_COUNT,
            rng,
        );
        let curve_count = rng.gen_range(noise::MIN_CURVES..=noise::MAX_CURVES);
        for _ in 0..curve_count {
            let stroke_width = rng.gen_range(noise::MIN_CURVE_WIDTH..=noise::MAX_CURVE_WIDTH);
            noise::draw_noise_curve(&mut canvas, ink, stroke_width, rng);
        }
        debug!(curve_count, "Noise injected");

        let smoothed = postprocess::smooth(&canvas.0);
        let binary = postprocess::binarize(&smoothed);
        let final_image = postprocess::thumbnail(binary);

        info!(
            width = final_image.width(),
            height = final_image.height(),
            "CAPTCHA generated"
        );
        Ok(final_image)
    }

    /// Generate and encode to the named raster format (by extension name,
    /// e.g. "png", "jpeg", "bmp"), returning the encoded bytes.
    pub fn generate(&mut self, chars: &str, format: &str) -> Result<Vec<u8>> {
        let image = self.generate_image(chars)?;
        encode_to_format(image, format)
    }

    /// Generate, encode, and write to a file path.
    pub fn write(&mut self, chars: &str, path: impl AsRef<Path>, format: &str) -> Result<()> {
        let bytes = self.generate(chars, format)?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!(path = %path.as_ref().display(), bytes = bytes.len(), "CAPTCHA written");
        Ok(())
    }

    /// Generate, encode, and write to an open output stream.
    pub fn write_to<W: Write>(&mut self, chars: &str, output: &mut W, format: &str) -> Result<()> {
        let bytes = self.generate(chars, format)?;
        output.write_all(&bytes)?;
        Ok(())
    }
}

/// Encode the final image into the named format, returning the raw bytes.
fn encode_to_format(image: GrayImage, format: &str) -> Result<Vec<u8>> {
    let image_format = ImageFormat::from_extension(format)
        .ok_or_else(|| SmudgeError::UnsupportedFormat(format.to_string()))?;

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageLuma8(image)
        .write_to(&mut cursor, image_format)
        .map_err(|err| SmudgeError::Encode(err.to_string()))?;
    Ok(buffer)
}
