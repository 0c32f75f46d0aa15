//! Extended (`0xCB`-prefixed) opcode table.
//!
//! The whole space is regular: bits 0-2 select the operand (B, C, D, E, H,
//! L, (HL), A) and bits 3-7 the operation. Register forms take 8 cycles,
//! (HL) forms 16, except BIT n,(HL) which only reads memory and takes 12.

use super::{op, OpcodeDescriptor};
use crate::instructions::bits::{bit, res, set};
use crate::instructions::code::*;
use crate::instructions::shifts::{rl, rlc, rr, rrc, sla, sra, srl, swap};

macro_rules! shift_row {
    ($t:ident, $base:literal, $name:literal, $f:ident) => {
        $t[$base] = op(concat!($name, " B"), 8, 0, $f::<B>);
        $t[$base + 1] = op(concat!($name, " C"), 8, 0, $f::<C>);
        $t[$base + 2] = op(concat!($name, " D"), 8, 0, $f::<D>);
        $t[$base + 3] = op(concat!($name, " E"), 8, 0, $f::<E>);
        $t[$base + 4] = op(concat!($name, " H"), 8, 0, $f::<H>);
        $t[$base + 5] = op(concat!($name, " L"), 8, 0, $f::<L>);
        $t[$base + 6] = op(concat!($name, " (HL)"), 16, 0, $f::<HLI>);
        $t[$base + 7] = op(concat!($name, " A"), 8, 0, $f::<A>);
    };
}

macro_rules! bit_row {
    ($t:ident, $base:literal, $name:literal, $f:ident, $n:literal, $hl_cycles:literal) => {
        $t[$base] = op(concat!($name, " ", $n, ",B"), 8, 0, $f::<$n, B>);
        $t[$base + 1] = op(concat!($name, " ", $n, ",C"), 8, 0, $f::<$n, C>);
        $t[$base + 2] = op(concat!($name, " ", $n, ",D"), 8, 0, $f::<$n, D>);
        $t[$base + 3] = op(concat!($name, " ", $n, ",E"), 8, 0, $f::<$n, E>);
        $t[$base + 4] = op(concat!($name, " ", $n, ",H"), 8, 0, $f::<$n, H>);
        $t[$base + 5] = op(concat!($name, " ", $n, ",L"), 8, 0, $f::<$n, L>);
        $t[$base + 6] = op(concat!($name, " ", $n, ",(HL)"), $hl_cycles, 0, $f::<$n, HLI>);
        $t[$base + 7] = op(concat!($name, " ", $n, ",A"), 8, 0, $f::<$n, A>);
    };
}

const fn build_extended_table() -> [Option<OpcodeDescriptor>; 256] {
    let mut t: [Option<OpcodeDescriptor>; 256] = [None; 256];

    shift_row!(t, 0x00, "RLC", rlc);
    shift_row!(t, 0x08, "RRC", rrc);
    shift_row!(t, 0x10, "RL", rl);
    shift_row!(t, 0x18, "RR", rr);
    shift_row!(t, 0x20, "SLA", sla);
    shift_row!(t, 0x28, "SRA", sra);
    shift_row!(t, 0x30, "SWAP", swap);
    shift_row!(t, 0x38, "SRL", srl);

    bit_row!(t, 0x40, "BIT", bit, 0, 12);
    bit_row!(t, 0x48, "BIT", bit, 1, 12);
    bit_row!(t, 0x50, "BIT", bit, 2, 12);
    bit_row!(t, 0x58, "BIT", bit, 3, 12);
    bit_row!(t, 0x60, "BIT", bit, 4, 12);
    bit_row!(t, 0x68, "BIT", bit, 5, 12);
    bit_row!(t, 0x70, "BIT", bit, 6, 12);
    bit_row!(t, 0x78, "BIT", bit, 7, 12);

    bit_row!(t, 0x80, "RES", res, 0, 16);
    bit_row!(t, 0x88, "RES", res, 1, 16);
    bit_row!(t, 0x90, "RES", res, 2, 16);
    bit_row!(t, 0x98, "RES", res, 3, 16);
    bit_row!(t, 0xA0, "RES", res, 4, 16);
    bit_row!(t, 0xA8, "RES", res, 5, 16);
    bit_row!(t, 0xB0, "RES", res, 6, 16);
    bit_row!(t, 0xB8, "RES", res, 7, 16);

    bit_row!(t, 0xC0, "SET", set, 0, 16);
    bit_row!(t, 0xC8, "SET", set, 1, 16);
    bit_row!(t, 0xD0, "SET", set, 2, 16);
    bit_row!(t, 0xD8, "SET", set, 3, 16);
    bit_row!(t, 0xE0, "SET", set, 4, 16);
    bit_row!(t, 0xE8, "SET", set, 5, 16);
    bit_row!(t, 0xF0, "SET", set, 6, 16);
    bit_row!(t, 0xF8, "SET", set, 7, 16);

    t
}

/// Extended 256-entry opcode table, indexed by the byte after `0xCB`.
///
/// # Examples
///
/// ```
/// use libsm83::opcodes::EXTENDED_TABLE;
///
/// let rlc_a = EXTENDED_TABLE[0x07].unwrap();
/// assert_eq!(rlc_a.mnemonic, "RLC A");
/// assert_eq!(rlc_a.cycles, 8);
///
/// let bit_hl = EXTENDED_TABLE[0x7E].unwrap();
/// assert_eq!(bit_hl.mnemonic, "BIT 7,(HL)");
/// assert_eq!(bit_hl.cycles, 12);
/// ```
pub static EXTENDED_TABLE: [Option<OpcodeDescriptor>; 256] = build_extended_table();
