use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

/// Bare-metal target the core crates must build for.
const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: platform + ecc without std
    step(
        "Core crates (no_std, embedded target)",
        &[
            "check",
            "-p",
            "platform",
            "-p",
            "ecc",
            "--target",
            EMBEDDED_TARGET,
            "--no-default-features",
        ],
        OnFailure::Abort,
    )?;

    // Check 2: application with on-target logging
    step(
        "Firmware library (defmt, embedded target)",
        &[
            "check",
            "-p",
            "firmware",
            "--lib",
            "--target",
            EMBEDDED_TARGET,
            "--features",
            "defmt",
        ],
        OnFailure::Abort,
    )?;

    // Check 3: emulator binary on the host
    step(
        "Emulator (host)",
        &["check", "-p", "firmware", "--features", "emulator"],
        OnFailure::Abort,
    )?;

    // Check 4: clippy lints
    step(
        "Clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        OnFailure::Warn,
    )?;

    // Check 5: formatting
    if step("Formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
