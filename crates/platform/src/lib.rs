//! Hardware Abstraction Layer (HAL) for the P-DMA ECC injection test
//!
//! This crate provides trait-based abstractions for the hardware the ECC
//! validation touches, enabling development and testing without a target
//! board.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: bring-up, report, entry point)
//!         ↓
//! Core (ecc crate: parity, injection, fault monitor, sequencer)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (PDL / PAC register access, or the host simulator)
//! ```
//!
//! # Capabilities
//!
//! - [`PdmaEcc`] - P-DMA SRAM words, ECC_CTL and the injection toggle
//! - [`FaultStruct`] - system fault structure: status, data, masks
//! - [`FaultIrq`] - routes the fault structure interrupt to a [`FaultHandler`]
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{PdmaEcc, SramWord};
//!
//! fn touch<D: PdmaEcc>(dw: &mut D) -> u32 {
//!     dw.sram_data(5, SramWord::Word1)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod irq;
pub mod pdma;
pub mod sysfault;

pub use irq::{FaultHandler, FaultIrq, IrqConfig};
pub use pdma::{DwInstance, PdmaEcc, SramWord};
pub use sysfault::{FaultData, FaultInitError, FaultSource, FaultStruct, FaultStructConfig};
