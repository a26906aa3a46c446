// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// smudge-captcha — text CAPTCHA image synthesis.
//
// The pipeline is strictly linear: each character is rasterized into a
// transparent sprite, rotated and warped (glyph renderer), the sprites are
// laid out with randomized overlap onto a background canvas (compositor),
// randomized dots and meandering curves are drawn over the composite (noise
// injector), and the result is smoothed, binarized, and thumbnailed
// (post-processor).

mod color;
mod compose;
mod geometry;
mod glyph;
mod noise;
mod postprocess;

pub mod fonts;
pub mod generator;

// Re-export the primary entry points so callers can use
// `smudge_captcha::CaptchaGenerator` directly.
pub use fonts::FontSet;
pub use generator::CaptchaGenerator;
