//! P-DMA (DataWire) SRAM and ECC control abstraction
//!
//! Each P-DMA channel keeps two 32-bit words of state in an ECC-protected
//! SRAM inside the DMA block:
//!
//! | Word | Contents                                   |
//! |------|--------------------------------------------|
//! | 0    | Channel status / intermediate state        |
//! | 1    | Current descriptor pointer (CH_CURR_PTR)   |
//!
//! The SRAM word address used by the ECC logic is `channel * 2 + word`.
//!
//! Error injection works through two controls on the instance:
//! - `ECC_CTL` holds a parity value and a target SRAM word address.
//! - `CTL.ECC_INJ_EN` makes the next write to that word store the `ECC_CTL`
//!   parity instead of the parity computed from the data.
//!
//! Register accesses cannot fail, so the trait methods are infallible.

use crate::sysfault::FaultSource;

/// P-DMA instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DwInstance {
    /// P-DMA instance #0 (DW0)
    Dw0,
    /// P-DMA instance #1 (DW1)
    Dw1,
}

impl DwInstance {
    /// System fault source reported for a correctable ECC error in this instance.
    pub const fn correctable_ecc_source(self) -> FaultSource {
        match self {
            Self::Dw0 => FaultSource::DW0_C_ECC,
            Self::Dw1 => FaultSource::DW1_C_ECC,
        }
    }

    /// System fault source reported for a non-correctable ECC error in this instance.
    pub const fn non_correctable_ecc_source(self) -> FaultSource {
        match self {
            Self::Dw0 => FaultSource::DW0_NC_ECC,
            Self::Dw1 => FaultSource::DW1_NC_ECC,
        }
    }

    /// Short name as used in the device documentation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dw0 => "DW0",
            Self::Dw1 => "DW1",
        }
    }
}

/// One of the two ECC-protected SRAM words of a P-DMA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SramWord {
    /// SRAM word #0 (SRAM_DATA0)
    Word0 = 0,
    /// SRAM word #1 (SRAM_DATA1, current descriptor pointer)
    Word1 = 1,
}

impl SramWord {
    /// Word selector as used in the SRAM word address.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Parse a word selector; only 0 and 1 exist.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Word0),
            1 => Some(Self::Word1),
            _ => None,
        }
    }
}

/// P-DMA instance with ECC-protected channel SRAM.
///
/// Implementations are either the real register block (PDL / PAC) or the
/// host simulator used by the tests and the emulator.
pub trait PdmaEcc {
    /// Number of channels in this instance.
    fn channel_count(&self) -> u8;

    /// Set the channel's current descriptor pointer (SRAM word 1).
    ///
    /// This is a normal write: the hardware stores freshly computed parity
    /// unless injection is enabled for that word.
    fn set_descriptor(&mut self, channel: u8, descriptor: u32);

    /// Read the channel's current descriptor pointer.
    ///
    /// The read goes through the ECC decoder, so a corrupted word raises a
    /// fault and, for a correctable error, returns corrected data.
    fn current_descriptor(&mut self, channel: u8) -> u32;

    /// Program `ECC_CTL` with the parity to inject and the target SRAM word
    /// address.
    fn set_ecc_ctl(&mut self, word_addr: u32, parity: u8);

    /// Set or clear `CTL.ECC_INJ_EN`.
    fn set_ecc_injection(&mut self, enabled: bool);

    /// Read SRAM word `word` of `channel` (SRAM_DATA0 / SRAM_DATA1).
    fn sram_data(&mut self, channel: u8, word: SramWord) -> u32;

    /// Write SRAM word `word` of `channel` (SRAM_DATA0 / SRAM_DATA1).
    fn set_sram_data(&mut self, channel: u8, word: SramWord, value: u32);
}

impl<T: PdmaEcc + ?Sized> PdmaEcc for &mut T {
    fn channel_count(&self) -> u8 {
        (**self).channel_count()
    }

    fn set_descriptor(&mut self, channel: u8, descriptor: u32) {
        (**self).set_descriptor(channel, descriptor);
    }

    fn current_descriptor(&mut self, channel: u8) -> u32 {
        (**self).current_descriptor(channel)
    }

    fn set_ecc_ctl(&mut self, word_addr: u32, parity: u8) {
        (**self).set_ecc_ctl(word_addr, parity);
    }

    fn set_ecc_injection(&mut self, enabled: bool) {
        (**self).set_ecc_injection(enabled);
    }

    fn sram_data(&mut self, channel: u8, word: SramWord) -> u32 {
        (**self).sram_data(channel, word)
    }

    fn set_sram_data(&mut self, channel: u8, word: SramWord, value: u32) {
        (**self).set_sram_data(channel, word, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_index_round_trips_for_both_words() {
        assert_eq!(SramWord::from_index(0), Some(SramWord::Word0));
        assert_eq!(SramWord::from_index(1), Some(SramWord::Word1));
        assert_eq!(SramWord::Word1.index(), 1);
    }

    #[test]
    fn word_index_rejects_two() {
        assert_eq!(SramWord::from_index(2), None);
        assert_eq!(SramWord::from_index(255), None);
    }

    #[test]
    fn each_instance_has_its_own_ecc_sources() {
        assert_eq!(DwInstance::Dw0.correctable_ecc_source(), FaultSource(66));
        assert_eq!(DwInstance::Dw0.non_correctable_ecc_source(), FaultSource(67));
        assert_eq!(DwInstance::Dw1.correctable_ecc_source(), FaultSource(68));
        assert_eq!(DwInstance::Dw1.non_correctable_ecc_source(), FaultSource(69));
    }
}
