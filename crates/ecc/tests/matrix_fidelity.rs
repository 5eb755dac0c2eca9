//! Parity encoder checked against values derived independently of
//! `compute_parity`: a hand table and a bit-by-bit reference encoder.

#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]

use ecc::parity::{column, ECC_P, PARITY_BITS};
use ecc::{compute_parity, LogicalAddress};

/// (word address, value, parity), computed offline from the matrix rows.
const VECTORS: &[(u64, u32, u8)] = &[
    (0, 0x0000_0000, 0x00),
    (0, 0x0000_0001, 0x43),
    (0, 0xFFFF_FFFF, 0x55),
    (11, 0x0000_0000, 0x51),
    (11, 0x2800_4A60, 0x5f),
    (11, 0x2800_1234, 0x4e),
    (10, 0xDEAD_BEEF, 0x0c),
    (1, 0x8000_0000, 0x21),
    (57, 0x1234_5678, 0x23),
    (63, 0xA5A5_A5A5, 0x0a),
    (3, 0x0BAD_CAFE, 0x6e),
    (4, 0x0BAD_CAFE, 0x44),
];

/// Parity computed one code word bit at a time.
fn reference_parity(address: u64, value: u32) -> u8 {
    let word = u64::from(value) | (address << 32);
    let mut parity = 0u8;
    for row in 0..PARITY_BITS {
        let mut acc = 0u8;
        for bit in 0..64 {
            if (word >> bit) & 1 == 1 && (ECC_P[row] >> bit) & 1 == 1 {
                acc ^= 1;
            }
        }
        parity |= acc << row;
    }
    parity
}

#[test]
fn known_vectors_match() {
    for &(address, value, expected) in VECTORS {
        let got = compute_parity(LogicalAddress::new(address), value).get();
        assert_eq!(
            got, expected,
            "address {address}, value {value:#010x}: got {got:#04x}, want {expected:#04x}"
        );
    }
}

#[test]
fn reference_encoder_agrees_with_vectors() {
    for &(address, value, expected) in VECTORS {
        assert_eq!(reference_parity(address, value), expected);
    }
}

#[test]
fn rows_match_the_hardware_matrix() {
    assert_eq!(
        ECC_P,
        [
            0x037F_36DB_2254_2AAB,
            0x05BD_EB5A_4499_4D35,
            0x09DD_DCEE_08E2_71C6,
            0x11EE_BBA9_8F03_81F8,
            0x21F6_D775_F003_FE00,
            0x41FB_6DB4_FFFC_0000,
            0x8103_FFF8_112C_965F,
        ]
    );
}

#[test]
fn each_row_owns_its_parity_bit_position() {
    // Row i covers code word bit 57 + i and no other row does.
    for row in 0..PARITY_BITS {
        let col = column(57 + row as u32);
        assert_eq!(col, 1 << row, "bit {} column {col:#04x}", 57 + row);
    }
}

#[test]
fn parity_is_linear_in_the_code_word() {
    // parity(a ^ b) == parity(a) ^ parity(b) for the same address: the
    // address contribution cancels in a ^ b, so compare against address 0.
    let a = 0x1357_9BDF;
    let b = 0x0246_8ACE;
    let addr = LogicalAddress::new(11);
    let zero = LogicalAddress::new(0);
    let lhs = compute_parity(zero, a ^ b).get();
    let rhs = compute_parity(addr, a).get() ^ compute_parity(addr, b).get();
    assert_eq!(lhs, rhs);
}

#[test]
fn address_changes_parity() {
    let v = 0x0BAD_CAFE;
    assert_ne!(
        compute_parity(LogicalAddress::new(3), v),
        compute_parity(LogicalAddress::new(4), v)
    );
}
