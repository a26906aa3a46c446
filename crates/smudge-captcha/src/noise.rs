// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Noise injector — randomized dot clusters and meandering random-walk
// curves drawn over the finished composite to defeat segmentation-based
// OCR. All drawing goes through `Blend` so semi-transparent passes lighten
// rather than overwrite.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, Blend};
use rand::Rng;

/// Primary dot pass: opaque ink.
pub(crate) const PRIMARY_DOT_COUNT: u32 = 900;
pub(crate) const PRIMARY_DOT_MAX_WIDTH: u32 = 3;

/// Secondary dot pass: lighter, semi-transparent ink.
pub(crate) const SECONDARY_DOT_COUNT: u32 = 250;
pub(crate) const SECONDARY_DOT_MAX_WIDTH: u32 = 2;
pub(crate) const SECONDARY_DOT_ALPHA: u8 = 50;

/// Curves per image and their stroke widths.
pub(crate) const MIN_CURVES: u32 = 4;
pub(crate) const MAX_CURVES: u32 = 9;
pub(crate) const MIN_CURVE_WIDTH: u32 = 2;
pub(crate) const MAX_CURVE_WIDTH: u32 = 8;

// Curve anchor margins: starting points keep this much distance from the
// far edge on the axis the walk traverses.
const EDGE_MARGIN_X: i64 = 100;
const EDGE_MARGIN_Y: i64 = 50;

/// Draw `count` dot clusters: two short segments with endpoints jittered
/// ±2 px around a random point, each with an independently random stroke
/// width in `1..=max_width`. Visually a small dash/"X" cluster, not a
/// literal dot.
pub(crate) fn draw_noise_dots<R: Rng>(
    canvas: &mut Blend<RgbaImage>,
    color: Rgba<u8>,
    max_width: u32,
    count: u32,
    rng: &mut R,
) {
    let (w, h) = canvas.0.dimensions();
    for _ in 0..count {
        let width = rng.gen_range(1..=max_width);
        let x = rng.gen_range(0..w) as f32;
        let y = rng.gen_range(0..h) as f32;

        let ax = x + rng.gen_range(-2..=2) as f32;
        let ay = y + rng.gen_range(-2..=2) as f32;
        draw_thick_segment(canvas, (x, y), (ax, ay), width, color);

        let bx = x + rng.gen_range(-2..=2) as f32;
        let by = y + rng.gen_range(-2..=2) as f32;
        draw_thick_segment(canvas, (bx, by), (x, y), width, color);
    }
}

/// Draw one meandering polyline across the canvas.
///
/// One of four diagonal traversal directions is chosen as an (x, y) sign
/// pair; the walk is anchored near the edge it departs from and extends in
/// steps of 4–20 px horizontally and 1–10 px vertically until either axis
/// reaches a canvas bound, where the final segment is clamped and the
/// curve terminates.
pub(crate) fn draw_noise_curve<R: Rng>(
    canvas: &mut Blend<RgbaImage>,
    color: Rgba<u8>,
    stroke_width: u32,
    rng: &mut R,
) {
    let w = canvas.0.width() as i64;
    let h = canvas.0.height() as i64;

    let (x_sign, y_sign): (i64, i64) = match rng.gen_range(0..4u8) {
        0 => (1, 1),
        1 => (-1, 1),
        2 => (-1, -1),
        _ => (1, -1),
    };

    // Distance from the departure edge: either flush or 10-100 px in.
    let edge_offset = if rng.gen_bool(0.5) {
        rng.gen_range(10..=100i64)
    } else {
        0
    };

    let (mut x, mut y) = match (x_sign, y_sign) {
        // Departing the left edge, drifting down.
        (1, 1) => (
            edge_offset.min(w),
            rng.gen_range(0..=(h - EDGE_MARGIN_Y).max(0)),
        ),
        // Departing the top edge, drifting left.
        (-1, 1) => (
            rng.gen_range(EDGE_MARGIN_X.min(w)..=w),
            edge_offset.min(h),
        ),
        // Departing the right edge, drifting up.
        (-1, -1) => (
            (w - edge_offset).max(0),
            rng.gen_range(0..=(h - EDGE_MARGIN_Y).max(0)),
        ),
        // Departing the bottom edge, drifting right.
        _ => (
            rng.gen_range(0..=(w - EDGE_MARGIN_X).max(0)),
            (h - edge_offset).max(0),
        ),
    };

    loop {
        let step_x = rng.gen_range(4..=20i64);
        let step_y = rng.gen_range(1..=10i64);
        let mut next_x = x + x_sign * step_x;
        let mut next_y = y + y_sign * step_y;

        let mut finished = false;
        if x_sign > 0 && next_x >= w {
            next_x = w;
            finished = true;
        }
        if x_sign < 0 && next_x <= 0 {
            next_x = 0;
            finished = true;
        }
        if y_sign > 0 && next_y >= h {
            next_y = h;
            finished = true;
        }
        if y_sign < 0 && next_y <= 0 {
            next_y = 0;
            finished = true;
        }

        draw_thick_segment(
            canvas,
            (x as f32, y as f32),
            (next_x as f32, next_y as f32),
            stroke_width,
            color,
        );

        if finished {
            break;
        }
        x = next_x;
        y = next_y;
    }
}

/// Draw a line segment with the given stroke width as parallel 1-px
/// segments offset along the minor axis. Out-of-bounds parts are clipped
/// by the underlying line drawing.
fn draw_thick_segment(
    canvas: &mut Blend<RgbaImage>,
    start: (f32, f32),
    end: (f32, f32),
    width: u32,
    color: Rgba<u8>,
) {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let width = width.max(1);

    for i in 0..width {
        let offset = i as f32 - (width - 1) as f32 / 2.0;
        let (ox, oy) = if dx.abs() >= dy.abs() {
            (0.0, offset)
        } else {
            (offset, 0.0)
        };
        draw_line_segment_mut(
            canvas,
            (start.0 + ox, start.1 + oy),
            (end.0 + ox, end.1 + oy),
            color,
        );
    }
}
