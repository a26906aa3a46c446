// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generator configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SmudgeError};

/// Settings for a CAPTCHA generator instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaConfig {
    /// Width of the composed CAPTCHA canvas in pixels.
    pub width: u32,
    /// Height of the composed CAPTCHA canvas in pixels.
    pub height: u32,
    /// Font files to render glyphs with. `None` selects the bundled font;
    /// an explicitly empty list is a configuration error.
    pub fonts: Option<Vec<PathBuf>>,
    /// Point sizes to randomly choose from per glyph.
    pub font_sizes: Vec<f32>,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            width: 350,
            height: 140,
            fonts: None,
            font_sizes: vec![71.0, 83.0, 90.0],
        }
    }
}

impl CaptchaConfig {
    /// Check the configuration for degenerate values.
    ///
    /// Called by the generator constructors so that bad settings fail fast
    /// rather than producing empty or distorted-beyond-use images.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SmudgeError::Config(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(fonts) = &self.fonts {
            if fonts.is_empty() {
                return Err(SmudgeError::Config(
                    "font list is empty; omit `fonts` to use the bundled font".into(),
                ));
            }
        }
        if self.font_sizes.is_empty() {
            return Err(SmudgeError::Config("font size list is empty".into()));
        }
        if let Some(bad) = self.font_sizes.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(SmudgeError::Config(format!(
                "font sizes must be positive, got {bad}"
            )));
        }
        Ok(())
    }
}
