//! P-DMA ECC error injection application
//!
//! Brings up fault handling, runs the three-step ECC validation and formats
//! the console report.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (app::run_validation, report)
//!         ↓
//! Fault handling bring-up (boot)
//!         ↓
//! ECC core (ecc: parity, injection, monitor, sequencer)
//!         ↓
//! Device capabilities (platform: PdmaEcc, FaultStruct, FaultIrq)
//! ```
//!
//! # Features
//!
//! - `defmt` - On-target logging
//! - `tracing` - Desktop logging
//! - `emulator` - Build the `ecc_emulator` binary (tokio, simulated P-DMA)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Emulator Target
//!
//! ```bash
//! cargo run -p firmware --bin ecc_emulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod app;
pub mod boot;
pub mod report;

#[cfg(feature = "emulator")]
pub mod emulator;

pub use app::{run_validation, AppError};
pub use boot::init_fault_handling;
pub use report::ConsoleReport;
