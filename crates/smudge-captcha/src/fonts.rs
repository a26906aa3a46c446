// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font set — loaded font faces crossed with configured point sizes.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use rand::Rng;
use smudge_core::error::{Result, SmudgeError};
use smudge_core::CaptchaConfig;
use tracing::{debug, info, instrument};

/// Font bundled with the crate, used when no font paths are configured.
pub(crate) const BUILTIN_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// One loaded font face at one pixel scale.
#[derive(Debug)]
pub(crate) struct SizedFace {
    pub font: FontArc,
    pub scale: PxScale,
}

impl SizedFace {
    /// Whether the face's glyph table covers `c` (i.e. is not `.notdef`).
    pub fn covers(&self, c: char) -> bool {
        self.font.glyph_id(c).0 != 0
    }

    /// Measure the rendered bounding box of `text`: advance-width sum by
    /// ascent-minus-descent height. Both dimensions are at least 1.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let font = &self.font;
        let scaled = font.as_scaled(self.scale);
        let width: f32 = text
            .chars()
            .map(|c| scaled.h_advance(scaled.glyph_id(c)))
            .sum();
        let height = scaled.height();
        (
            width.ceil().max(1.0) as u32,
            height.ceil().max(1.0) as u32,
        )
    }
}

/// The ordered collection of (font face, size) pairs a generator renders
/// with. Built once from the configuration (every configured font file is
/// loaded at every configured size) and immutable afterwards.
#[derive(Debug)]
pub struct FontSet {
    faces: Vec<SizedFace>,
}

impl FontSet {
    /// Load every configured font at every configured size.
    ///
    /// An unreadable or unparsable font file is fatal; no partial set is
    /// silently tolerated.
    #[instrument(skip(config))]
    pub fn load(config: &CaptchaConfig) -> Result<Self> {
        let mut fonts: Vec<FontArc> = Vec::new();
        match &config.fonts {
            None => {
                fonts.push(FontArc::try_from_slice(BUILTIN_FONT).map_err(|err| {
                    SmudgeError::FontLoad {
                        path: "<bundled DejaVuSansMono>".into(),
                        reason: err.to_string(),
                    }
                })?);
                debug!("Using bundled font");
            }
            Some(paths) => {
                for path in paths {
                    let bytes =
                        std::fs::read(path).map_err(|err| SmudgeError::FontLoad {
                            path: path.display().to_string(),
                            reason: err.to_string(),
                        })?;
                    fonts.push(FontArc::try_from_vec(bytes).map_err(|err| {
                        SmudgeError::FontLoad {
                            path: path.display().to_string(),
                            reason: err.to_string(),
                        }
                    })?);
                }
            }
        }

        let faces: Vec<SizedFace> = fonts
            .iter()
            .flat_map(|font| {
                config.font_sizes.iter().map(|size| SizedFace {
                    font: font.clone(),
                    scale: PxScale::from(*size),
                })
            })
            .collect();

        info!(faces = faces.len(), "Font set materialised");
        Ok(Self { faces })
    }

    /// Number of (face, size) pairs in the set.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Pick a random face able to render every character of `text`.
    ///
    /// Whitespace is exempt from the coverage check; spacer sprites render
    /// nothing on purpose. If no face covers some character the call fails
    /// with `UnrenderableCharacter`; a missing glyph never silently becomes
    /// a blank region.
    pub(crate) fn pick_for<R: Rng>(&self, text: &str, rng: &mut R) -> Result<&SizedFace> {
        if text.chars().all(char::is_whitespace) {
            return Ok(&self.faces[rng.gen_range(0..self.faces.len())]);
        }

        let candidates: Vec<&SizedFace> = self
            .faces
            .iter()
            .filter(|face| {
                text.chars()
                    .all(|c| c.is_whitespace() || face.covers(c))
            })
            .collect();

        if candidates.is_empty() {
            let missing = text
                .chars()
                .find(|c| {
                    !c.is_whitespace() && !self.faces.iter().any(|face| face.covers(*c))
                })
                .unwrap_or_else(|| text.chars().next().unwrap_or('?'));
            return Err(SmudgeError::UnrenderableCharacter(missing));
        }

        Ok(candidates[rng.gen_range(0..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    #[test]
    fn bundled_font_loads_at_every_size() {
        let fonts = FontSet::load(&CaptchaConfig::default()).expect("bundled font loads");
        // One bundled font crossed with the three default sizes.
        assert_eq!(fonts.len(), 3);
    }

    #[test]
    fn missing_font_file_is_fatal() {
        let config = CaptchaConfig {
            fonts: Some(vec![PathBuf::from("/no/such/font.ttf")]),
            ..Default::default()
        };
        match FontSet::load(&config) {
            Err(SmudgeError::FontLoad { path, .. }) => {
                assert!(path.contains("/no/such/font.ttf"));
            }
            other => panic!("expected FontLoad error, got {other:?}"),
        }
    }

    #[test]
    fn picks_face_covering_ascii() {
        let fonts = FontSet::load(&CaptchaConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(fonts.pick_for("A", &mut rng).is_ok());
    }

    #[test]
    fn whitespace_spacer_accepts_any_face() {
        let fonts = FontSet::load(&CaptchaConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(fonts.pick_for("  ", &mut rng).is_ok());
    }

    #[test]
    fn uncovered_character_is_explicit_error() {
        let fonts = FontSet::load(&CaptchaConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        // U+E000 is in the Private Use Area; DejaVu Sans Mono has no glyph
        // for it.
        match fonts.pick_for("\u{e000}", &mut rng) {
            Err(SmudgeError::UnrenderableCharacter(c)) => assert_eq!(c, '\u{e000}'),
            other => panic!("expected UnrenderableCharacter, got {other:?}"),
        }
    }

    #[test]
    fn measure_is_positive_for_glyphs_and_spaces() {
        let fonts = FontSet::load(&CaptchaConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let face = fonts.pick_for("A", &mut rng).unwrap();
        let (w, h) = face.measure("A");
        assert!(w > 0 && h > 0);
        let (sw, _) = face.measure(" ");
        assert!(sw > 0, "space must still have an advance width");
    }
}
