//! Application configuration and constants
//!
//! Central values used across the workspace. Bring-up code, the sequencer
//! defaults and the console banner reference these instead of hardcoding.

use embassy_time::Duration;

use crate::pdma::{DwInstance, SramWord};

/// The application name
pub const APP_NAME: &str = "P-DMA ECC Error Injection";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// P-DMA instance exercised by default.
pub const TEST_INSTANCE: DwInstance = DwInstance::Dw0;

/// Channel within the test instance whose SRAM words are corrupted.
pub const TEST_CHANNEL: u8 = 5;

/// SRAM word under test. Word 1 holds the channel's current descriptor
/// pointer (CH_CURR_PTR), so a descriptor read is the natural trigger.
pub const TEST_WORD: SramWord = SramWord::Word1;

/// Test value written as the current descriptor.
///
/// On target this is the SRAM address of a dummy descriptor; any 32-bit
/// pattern works for the simulator.
pub const TEST_VALUE: u32 = 0x2800_4A60;

/// Fault interrupt priority.
pub const FAULT_IRQ_PRIORITY: u8 = 2;

/// NVIC multiplexer line the fault structure interrupt is routed through.
pub const FAULT_IRQ_NVIC_MUX: u8 = 3;

/// Time allowed for the fault interrupt to complete after a test access.
pub const SETTLE_INTERVAL: Duration = Duration::from_millis(1);

/// Banner printed before the test run.
pub const fn banner() -> &'static str {
    "****************** P-DMA ECC Error Injection Code Example ******************"
}
