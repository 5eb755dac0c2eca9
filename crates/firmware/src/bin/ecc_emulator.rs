//! P-DMA ECC error injection, desktop emulator
//!
//! Runs the full validation against a simulated P-DMA instance and prints
//! the console report.
//! Run with: cargo run -p firmware --bin ecc_emulator --features emulator
//!
//! Logging is filtered with `RUST_LOG` (default `info`). See
//! `firmware::emulator` for the configuration variables.

#![allow(clippy::print_stdout)]

use anyhow::{bail, Context, Result};
use ecc::mocks::SimulatedPdma;
use ecc::FaultMonitor;
use firmware::emulator::{config_from_env, EMULATED_CHANNEL_COUNT};
use firmware::report::{render, REPORT_CAPACITY};
use firmware::run_validation;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config_from_env()?;
    let monitor = FaultMonitor::new(config.instance);
    let mut pdma = SimulatedPdma::with_instance(config.instance, EMULATED_CHANNEL_COUNT);

    tracing::info!(
        channel = config.location.channel(),
        word = config.location.word().index(),
        test_value = config.test_value,
        "starting ECC validation on simulated {}",
        config.instance.name()
    );

    let report = run_validation(&mut pdma, &monitor, config)
        .await
        .context("validation could not run")?;

    let text = render::<REPORT_CAPACITY>(&report).context("console report overflowed")?;
    print!("{text}");

    if !report.all_passed() {
        bail!("{} of 3 test steps failed", report.failures());
    }
    Ok(())
}
