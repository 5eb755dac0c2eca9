//! ECC parity injection.
//!
//! The P-DMA stores a parity with every SRAM word write. With
//! `CTL.ECC_INJ_EN` set, a write to the word addressed by `ECC_CTL` stores
//! the `ECC_CTL` parity instead, so the next decode of that word sees
//! whatever corruption the caller chose.
//!
//! Sequence for one injection:
//!
//! ```text
//! ECC_CTL ← (parity, word address)
//! ECC_INJ_EN ← 1
//! SRAM_DATAx ← SRAM_DATAx        (read-modify-write, value unchanged)
//! ECC_INJ_EN ← 0
//! ```
//!
//! Injection must be enabled before the write and disabled only after it.
//! Leaving it enabled would corrupt the parity of every later write to the
//! same word.

use platform::PdmaEcc;

use crate::location::StorageLocation;
use crate::parity::ParityCode;

/// Installs a chosen parity into a P-DMA SRAM word.
///
/// Each injection must be followed by exactly one triggering access before
/// the next one. The controller tracks this as the `armed` state.
#[derive(Debug, Default)]
pub struct InjectionController {
    armed: bool,
}

impl InjectionController {
    /// Controller with nothing injected.
    pub const fn new() -> Self {
        Self { armed: false }
    }

    /// Store `parity` with the current contents of `location`.
    ///
    /// Injecting again while armed is still performed, since the hardware
    /// simply overwrites the parity, but it is logged as a sequencing fault.
    pub fn inject<D: PdmaEcc + ?Sized>(
        &mut self,
        dev: &mut D,
        location: StorageLocation,
        parity: ParityCode,
    ) {
        if self.is_armed() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ECC injection re-armed before the previous one was consumed");
            #[cfg(feature = "tracing")]
            tracing::warn!("ECC injection re-armed before the previous one was consumed");
        }

        // Logical addresses are at most 255 * 2 + 1.
        #[allow(clippy::cast_possible_truncation)]
        let word_addr = location.logical_address().get() as u32;

        dev.set_ecc_ctl(word_addr, parity.get());
        dev.set_ecc_injection(true);

        let channel = location.channel();
        let word = location.word();
        let current = dev.sram_data(channel, word);
        dev.set_sram_data(channel, word, current);

        dev.set_ecc_injection(false);
        self.armed = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Injected parity 0x{=u8:02x} at SRAM word address {=u32}",
            parity.get(),
            word_addr
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(parity = parity.get(), word_addr, "injected ECC parity");
    }

    /// Record that the triggering access for the last injection happened.
    pub fn on_access(&mut self) {
        self.armed = false;
    }

    /// Whether an injection is waiting for its triggering access.
    pub const fn is_armed(&self) -> bool {
        self.armed
    }
}
