// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Smudge.

use thiserror::Error;

/// Top-level error type for all Smudge operations.
#[derive(Debug, Error)]
pub enum SmudgeError {
    // -- Configuration errors --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Font errors --
    #[error("failed to load font {path}: {reason}")]
    FontLoad { path: String, reason: String },

    #[error("no configured font can render character {0:?}")]
    UnrenderableCharacter(char),

    // -- Generation errors --
    #[error("cannot generate a CAPTCHA from empty text")]
    EmptyText,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SmudgeError>;
