// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod cargo;
mod check;
mod doc;
mod emulate;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "P-DMA ECC error injection development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the no_std core for the embedded target and the emulator on the host
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run the validation against the simulated P-DMA
    Emulate {
        /// Channel under test (ECC_CHANNEL)
        #[arg(long)]
        channel: Option<u8>,
        /// SRAM word under test, 0 or 1 (ECC_WORD)
        #[arg(long)]
        word: Option<u8>,
        /// Test value, decimal or 0x hex (ECC_TEST_VALUE)
        #[arg(long)]
        value: Option<String>,
        /// Settle interval in milliseconds (ECC_SETTLE_MS)
        #[arg(long)]
        settle_ms: Option<u64>,
        /// Build the emulator in release mode
        #[arg(short, long)]
        release: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Emulate {
            channel,
            word,
            value,
            settle_ms,
            release,
        } => emulate::run(
            &emulate::Overrides {
                channel,
                word,
                value,
                settle_ms,
            },
            release,
        ),
        Commands::Doc { open } => doc::run(open),
    }
}
