use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

use platform::config;

/// Emulator settings passed through as environment variables.
pub struct Overrides {
    pub channel: Option<u8>,
    pub word: Option<u8>,
    pub value: Option<String>,
    pub settle_ms: Option<u64>,
}

impl Overrides {
    /// `(variable, value)` pairs for every override that is set.
    fn env(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(channel) = self.channel {
            vars.push(("ECC_CHANNEL", channel.to_string()));
        }
        if let Some(word) = self.word {
            vars.push(("ECC_WORD", word.to_string()));
        }
        if let Some(value) = &self.value {
            vars.push(("ECC_TEST_VALUE", value.clone()));
        }
        if let Some(ms) = self.settle_ms {
            vars.push(("ECC_SETTLE_MS", ms.to_string()));
        }
        vars
    }
}

pub fn run(overrides: &Overrides, release: bool) -> Result<()> {
    println!();
    println!(
        "{}",
        format!("🖥  {} v{} - emulator", config::APP_NAME, config::APP_VERSION)
            .cyan()
            .bold()
    );
    println!();

    let vars = overrides.env();
    for (key, value) in &vars {
        println!("   {}", format!("{key}={value}").dimmed());
    }

    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "-p",
        "firmware",
        "--bin",
        "ecc_emulator",
        "--features",
        "emulator",
    ]);
    if release {
        cmd.arg("--release");
    }
    cmd.envs(vars);

    // Output streams straight through: the report is the point.
    let status = cmd.status().context("Failed to run the emulator")?;

    println!();
    if status.success() {
        println!("{}", "✓ ECC validation passed".green().bold());
        Ok(())
    } else {
        eprintln!("{}", "✗ ECC validation failed".red().bold());
        anyhow::bail!("emulator exited with {status}");
    }
}
