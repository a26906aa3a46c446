// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color helpers — per-image random background/ink colors.

use image::Rgba;
use rand::Rng;

/// Pick a fully opaque color with each channel uniform in `min..=max`.
///
/// A high range (e.g. 238–255) yields a light background; a wide darker
/// range (e.g. 10–200) yields the ink color.
pub(crate) fn random_color<R: Rng>(min: u8, max: u8, rng: &mut R) -> Rgba<u8> {
    Rgba([
        rng.gen_range(min..=max),
        rng.gen_range(min..=max),
        rng.gen_range(min..=max),
        255,
    ])
}

/// Replace the alpha channel, keeping the color channels.
pub(crate) fn with_alpha(color: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let Rgba([r, g, b, _]) = color;
    Rgba([r, g, b, alpha])
}
