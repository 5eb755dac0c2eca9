//! P-DMA SRAM ECC validation core.
//!
//! Deliberately corrupts the parity stored with a P-DMA channel SRAM word and
//! checks that the system fault path classifies the corruption correctly.
//!
//! ```text
//! Sequencer ──► parity::compute_parity ──► correct ParityCode
//!     │
//!     ├──► inject::InjectionController ──► PdmaEcc (ECC_CTL, ECC_INJ_EN, RMW)
//!     │
//!     ├──► triggering access ──► hardware decode ──► fault IRQ
//!     │                                                 │
//!     │                                  monitor::FaultMonitor (FaultHandler)
//!     │                                                 │
//!     └──◄── settle, take last fault ◄──────────────────┘
//! ```
//!
//! The crate is `no_std`. With the `std` feature it also provides
//! [`mocks::SimulatedPdma`], a host model of the P-DMA SRAM with a real
//! SEC-DED decoder, used by the tests and the desktop emulator.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod inject;
pub mod location;
pub mod monitor;
pub mod outcome;
pub mod parity;
pub mod sequencer;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use inject::InjectionController;
pub use location::{LocationError, LogicalAddress, StorageLocation};
pub use monitor::{FaultClass, FaultEvent, FaultFlags, FaultMonitor};
pub use outcome::{evaluate, FailReason, Scenario, TestOutcome, ValidationReport, Verdict};
pub use parity::{compute_parity, ParityCode};
pub use sequencer::{SettleStrategy, Sequencer, ValidationConfig};
