//! P-DMA SRAM ECC parity encoder.
//!
//! The ECC covers a 64-bit code word built from the 32-bit data value in the
//! low half and the SRAM word address in the high half:
//!
//! ```text
//!  63                 32 31                  0
//! ┌─────────────────────┬─────────────────────┐
//! │  SRAM word address  │     data value      │
//! └─────────────────────┴─────────────────────┘
//! ```
//!
//! Parity bit `i` is the XOR reduction of `code_word & ECC_P[i]`. The masks
//! are the rows of the hardware's parity-check matrix and must match it bit
//! for bit; a single wrong bit turns every verdict downstream into noise.
//!
//! Column `j` of the matrix (bit `j` of every row, stacked) is the syndrome a
//! flip of code word bit `j` produces. All data columns have weight 3 and are
//! distinct, so a single data-bit error is locatable; a single stored parity
//! bit error gives a weight-1 syndrome; any two-bit error gives an even,
//! non-zero syndrome.

use crate::location::LogicalAddress;

/// Number of ECC parity bits per SRAM word.
pub const PARITY_BITS: usize = 7;

/// Valid bits of a [`ParityCode`].
pub const PARITY_MASK: u8 = 0x7F;

/// Shift placing the SRAM word address in the upper 32 bits of the code word.
const SHIFT_TO_UPPER_32BIT_WORD: u32 = 32;

/// Parity-check matrix rows, one per parity bit (P0 first).
pub const ECC_P: [u64; PARITY_BITS] = [
    0x037F_36DB_2254_2AAB,
    0x05BD_EB5A_4499_4D35,
    0x09DD_DCEE_08E2_71C6,
    0x11EE_BBA9_8F03_81F8,
    0x21F6_D775_F003_FE00,
    0x41FB_6DB4_FFFC_0000,
    0x8103_FFF8_112C_965F,
];

/// 7-bit ECC parity of one SRAM word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ParityCode(u8);

impl ParityCode {
    /// Wrap a raw parity value; bit 7 is discarded.
    pub const fn new(bits: u8) -> Self {
        Self(bits & PARITY_MASK)
    }

    /// Raw 7-bit value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// This parity with the bits in `mask` inverted.
    ///
    /// `flip(0b000_0001)` is a single-bit error, `flip(0b000_0011)` a
    /// double-bit error.
    #[must_use]
    pub const fn flip(self, mask: u8) -> Self {
        Self::new(self.0 ^ mask)
    }
}

impl core::fmt::Display for ParityCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Build the 64-bit code word the parity is computed over.
pub const fn code_word(address: LogicalAddress, value: u32) -> u64 {
    (value as u64) | (address.get() << SHIFT_TO_UPPER_32BIT_WORD)
}

/// XOR reduction of a 64-bit value: 1 when an odd number of bits is set.
const fn xor_reduce(data: u64) -> u8 {
    (data.count_ones() & 1) as u8
}

/// Compute the ECC parity for `value` stored at SRAM word `address`.
///
/// Pure and total: every `u32` at every address has exactly one parity.
#[allow(clippy::indexing_slicing)] // Safety: i < PARITY_BITS == ECC_P.len()
#[allow(clippy::arithmetic_side_effects)] // Safety: i < 7, shift and increment cannot overflow
pub const fn compute_parity(address: LogicalAddress, value: u32) -> ParityCode {
    let word = code_word(address, value);
    let mut parity = 0u8;
    let mut i = 0;
    while i < PARITY_BITS {
        parity |= xor_reduce(word & ECC_P[i]) << i;
        i += 1;
    }
    ParityCode(parity)
}

/// Syndrome of a stored word: computed parity XOR stored parity.
///
/// Zero means the word decodes clean.
pub const fn syndrome(address: LogicalAddress, value: u32, stored: ParityCode) -> u8 {
    compute_parity(address, value).get() ^ stored.get()
}

/// Matrix column for code word bit `bit`: the syndrome flipping that bit causes.
///
/// Bits past the 64-bit code word have no column and return 0.
#[allow(clippy::indexing_slicing)] // Safety: i < PARITY_BITS == ECC_P.len()
#[allow(clippy::arithmetic_side_effects)] // Safety: i < 7, so `<< i` stays inside u8
pub const fn column(bit: u32) -> u8 {
    let mut col = 0u8;
    let mut i = 0;
    while i < PARITY_BITS {
        let Some(row) = ECC_P[i].checked_shr(bit) else {
            return 0;
        };
        col |= ((row & 1) as u8) << i;
        i += 1;
    }
    col
}

/// Data bit (0..32) whose flip produces `syndrome`, if any.
pub fn data_bit_for_syndrome(syndrome: u8) -> Option<u32> {
    (0..u32::BITS).find(|&bit| column(bit) == syndrome)
}
