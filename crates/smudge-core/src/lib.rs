// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smudge — shared error and configuration types used across all crates.

pub mod config;
pub mod error;

pub use config::CaptchaConfig;
pub use error::SmudgeError;
