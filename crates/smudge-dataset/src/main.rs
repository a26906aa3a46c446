// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// smudge-dataset — batch CAPTCHA dataset generator.
//
// Samples random strings from a character set and writes one labelled
// image per sample into the output directory, named `<text>_<uuid>.<ext>`
// so the label is recoverable from the filename and collisions are
// impossible.

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

use smudge_captcha::CaptchaGenerator;
use smudge_core::error::{Result, SmudgeError};
use smudge_core::CaptchaConfig;

/// ASCII letters, lower then upper case.
const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Parser, Debug)]
#[command(
    name = "smudge-dataset",
    about = "Generate a labelled CAPTCHA image dataset"
)]
struct Args {
    /// Number of samples to generate.
    #[arg(long, default_value_t = 100)]
    count: u64,

    /// Characters per sample.
    #[arg(long, default_value_t = 4)]
    length: usize,

    /// Characters to sample from (defaults to ASCII letters).
    #[arg(long)]
    charset: Option<String>,

    /// Output directory for the generated images.
    #[arg(long, default_value = "dataset")]
    out_dir: PathBuf,

    /// Image format, by extension name.
    #[arg(long, default_value = "png")]
    format: String,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 350)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 140)]
    height: u32,

    /// Font file to render with (repeatable); defaults to the bundled font.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Point size to choose from (repeatable); defaults to 71, 83, 90.
    #[arg(long = "font-size")]
    font_sizes: Vec<f32>,

    /// Seed for reproducible datasets; omitted means OS entropy.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        error!(%err, "dataset generation failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.length == 0 {
        return Err(SmudgeError::Config("sample length must be positive".into()));
    }
    let charset: Vec<char> = args
        .charset
        .as_deref()
        .unwrap_or(DEFAULT_CHARSET)
        .chars()
        .collect();
    if charset.is_empty() {
        return Err(SmudgeError::Config("charset is empty".into()));
    }

    let config = build_config(&args);
    let mut generator = match args.seed {
        Some(seed) => CaptchaGenerator::with_seed(config, seed)?,
        None => CaptchaGenerator::new(config)?,
    };
    // Label sampling gets its own stream so image randomness and label
    // randomness stay independently reproducible.
    let mut label_rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    std::fs::create_dir_all(&args.out_dir)?;
    info!(
        count = args.count,
        dir = %args.out_dir.display(),
        format = %args.format,
        "Generating dataset"
    );

    for i in 0..args.count {
        let text: String = (0..args.length)
            .map(|_| *charset.choose(&mut label_rng).expect("charset is non-empty"))
            .collect();
        let name = format!("{text}_{}.{}", Uuid::new_v4(), args.format);
        generator.write(&text, args.out_dir.join(name), &args.format)?;

        if (i + 1) % 500 == 0 {
            info!(done = i + 1, total = args.count, "Progress");
        }
    }

    info!(count = args.count, "Dataset complete");
    Ok(())
}

/// Map CLI arguments onto the generator configuration; empty repeatable
/// flags fall back to the library defaults.
fn build_config(args: &Args) -> CaptchaConfig {
    let defaults = CaptchaConfig::default();
    CaptchaConfig {
        width: args.width,
        height: args.height,
        fonts: if args.fonts.is_empty() {
            None
        } else {
            Some(args.fonts.clone())
        },
        font_sizes: if args.font_sizes.is_empty() {
            defaults.font_sizes
        } else {
            args.font_sizes.clone()
        },
    }
}
