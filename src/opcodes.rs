//! # Opcode Tables
//!
//! This module contains the two 256-entry opcode tables that serve as the
//! single source of truth for SM83 instruction metadata and semantics:
//!
//! - [`BASE_TABLE`]: the one-byte opcode space. Eleven slots are unused on
//!   the hardware and stay `None`; slot `0xCB` is the escape into the
//!   extended table and also stays `None` here.
//! - [`EXTENDED_TABLE`]: the 256 `0xCB`-prefixed opcodes (rotates, shifts,
//!   SWAP, BIT, RES, SET).
//!
//! Each populated slot is an [`OpcodeDescriptor`]: mnemonic, cycle cost,
//! operand byte count and effect function. Cycle costs are in clock cycles
//! (multiples of 4) and include the `0xCB` prefix fetch for extended
//! opcodes.
//!
//! Mnemonics use `d8`/`d16` for immediates, `a8`/`a16` for addresses and
//! `e8` for signed offsets; the disassembler substitutes the operand bytes.

mod extended;

pub use extended::EXTENDED_TABLE;

use crate::instructions::code::*;
use crate::instructions::{
    alu::*, branches::*, control::*, flags::*, inc_dec::*, load_store::*, shifts::*, stack::*,
};
use crate::memory::MemoryBus;
use crate::registers::Registers;

/// The single base opcode that selects the extended table.
pub const ESCAPE_OPCODE: u8 = 0xCB;

/// Largest operand count an instruction window holds.
pub const MAX_OPERAND_BYTES: u8 = 2;

/// Clock cycles per machine cycle, the engine's natural clock unit.
pub const CYCLES_PER_MACHINE_CYCLE: u8 = 4;

/// What an effect did with control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Execution falls through (or a condition was not met)
    Continue,
    /// Control transferred; the taken cycle cost applies
    Taken,
}

/// Effect function of an opcode.
///
/// Receives the register file, the memory bus and the operand bytes in
/// encoded order (low byte first for 16-bit immediates).
pub type Effect = fn(&mut Registers, &mut dyn MemoryBus, &[u8]) -> Flow;

/// Metadata and semantics of a single opcode.
///
/// # Examples
///
/// ```
/// use libsm83::opcodes::{lookup, OpcodeSpace};
///
/// let call = lookup(OpcodeSpace::Base, 0xCD).unwrap();
/// assert_eq!(call.mnemonic, "CALL a16");
/// assert_eq!(call.cycles, 24);
/// assert_eq!(call.operand_bytes, 2);
///
/// let jr_nz = lookup(OpcodeSpace::Base, 0x20).unwrap();
/// assert_eq!((jr_nz.cycles, jr_nz.taken_cycles), (8, 12));
/// ```
#[derive(Clone, Copy)]
pub struct OpcodeDescriptor {
    /// Instruction mnemonic (diagnostic only)
    pub mnemonic: &'static str,

    /// Clock cycles when no branch is taken.
    pub cycles: u8,

    /// Clock cycles when the effect reports [`Flow::Taken`].
    ///
    /// Equal to `cycles` for everything except conditional JR/JP/CALL/RET.
    pub taken_cycles: u8,

    /// Immediate operand bytes following the opcode (0-2).
    pub operand_bytes: u8,

    /// Effect function.
    pub execute: Effect,
}

impl OpcodeDescriptor {
    /// Clock cycles for an execution that ended with `flow`.
    pub fn cycles_for(&self, flow: Flow) -> u8 {
        match flow {
            Flow::Continue => self.cycles,
            Flow::Taken => self.taken_cycles,
        }
    }
}

impl std::fmt::Debug for OpcodeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpcodeDescriptor")
            .field("mnemonic", &self.mnemonic)
            .field("cycles", &self.cycles)
            .field("taken_cycles", &self.taken_cycles)
            .field("operand_bytes", &self.operand_bytes)
            .finish_non_exhaustive()
    }
}

/// Which table an opcode was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeSpace {
    Base,
    Extended,
}

impl std::fmt::Display for OpcodeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpcodeSpace::Base => f.write_str("base"),
            OpcodeSpace::Extended => f.write_str("extended"),
        }
    }
}

pub(crate) const fn op(mnemonic: &'static str, cycles: u8, operand_bytes: u8, execute: Effect) -> Option<OpcodeDescriptor> {
    Some(OpcodeDescriptor {
        mnemonic,
        cycles,
        taken_cycles: cycles,
        operand_bytes,
        execute,
    })
}

const fn branch(
    mnemonic: &'static str,
    cycles: u8,
    taken_cycles: u8,
    operand_bytes: u8,
    execute: Effect,
) -> Option<OpcodeDescriptor> {
    Some(OpcodeDescriptor {
        mnemonic,
        cycles,
        taken_cycles,
        operand_bytes,
        execute,
    })
}

/// Returns the table an escape opcode selects, if `opcode` is one.
pub fn extension(opcode: u8) -> Option<&'static [Option<OpcodeDescriptor>; 256]> {
    (opcode == ESCAPE_OPCODE).then_some(&EXTENDED_TABLE)
}

/// Looks up a descriptor by table and opcode.
pub fn lookup(space: OpcodeSpace, opcode: u8) -> Option<&'static OpcodeDescriptor> {
    let table = match space {
        OpcodeSpace::Base => &BASE_TABLE,
        OpcodeSpace::Extended => &EXTENDED_TABLE,
    };
    table[opcode as usize].as_ref()
}

/// A table entry that violates a construction-time invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefect {
    pub space: OpcodeSpace,
    pub opcode: u8,
    pub reason: &'static str,
}

/// Checks both tables for descriptors that could not be fetched or timed.
///
/// Returns every defect found; an empty vector means the tables are sound.
pub fn validate_tables() -> Vec<TableDefect> {
    let spaces = [(OpcodeSpace::Base, &BASE_TABLE), (OpcodeSpace::Extended, &EXTENDED_TABLE)];
    let mut defects = Vec::new();

    for (space, table) in spaces {
        for (opcode, slot) in table.iter().enumerate() {
            let Some(desc) = slot else { continue };
            let opcode = opcode as u8;
            let mut defect = |reason| defects.push(TableDefect { space, opcode, reason });

            if desc.operand_bytes > MAX_OPERAND_BYTES {
                defect("operand count exceeds the instruction window");
            }
            if desc.cycles == 0 || desc.cycles % CYCLES_PER_MACHINE_CYCLE != 0 {
                defect("cycle cost is not a whole number of machine cycles");
            }
            if desc.taken_cycles < desc.cycles || desc.taken_cycles % CYCLES_PER_MACHINE_CYCLE != 0 {
                defect("taken cycle cost is below the base cost or misaligned");
            }
        }
    }

    defects
}

macro_rules! ld_row {
    ($t:ident, $base:literal, $dst:literal, $d:ident, $cycles:literal) => {
        $t[$base] = op(concat!("LD ", $dst, ",B"), $cycles, 0, ld::<$d, B>);
        $t[$base + 1] = op(concat!("LD ", $dst, ",C"), $cycles, 0, ld::<$d, C>);
        $t[$base + 2] = op(concat!("LD ", $dst, ",D"), $cycles, 0, ld::<$d, D>);
        $t[$base + 3] = op(concat!("LD ", $dst, ",E"), $cycles, 0, ld::<$d, E>);
        $t[$base + 4] = op(concat!("LD ", $dst, ",H"), $cycles, 0, ld::<$d, H>);
        $t[$base + 5] = op(concat!("LD ", $dst, ",L"), $cycles, 0, ld::<$d, L>);
        $t[$base + 6] = op(concat!("LD ", $dst, ",(HL)"), 8, 0, ld::<$d, HLI>);
        $t[$base + 7] = op(concat!("LD ", $dst, ",A"), $cycles, 0, ld::<$d, A>);
    };
}

macro_rules! alu_row {
    ($t:ident, $base:literal, $name:literal, $f:ident) => {
        $t[$base] = op(concat!($name, "B"), 4, 0, $f::<B>);
        $t[$base + 1] = op(concat!($name, "C"), 4, 0, $f::<C>);
        $t[$base + 2] = op(concat!($name, "D"), 4, 0, $f::<D>);
        $t[$base + 3] = op(concat!($name, "E"), 4, 0, $f::<E>);
        $t[$base + 4] = op(concat!($name, "H"), 4, 0, $f::<H>);
        $t[$base + 5] = op(concat!($name, "L"), 4, 0, $f::<L>);
        $t[$base + 6] = op(concat!($name, "(HL)"), 8, 0, $f::<HLI>);
        $t[$base + 7] = op(concat!($name, "A"), 4, 0, $f::<A>);
    };
}

const fn build_base_table() -> [Option<OpcodeDescriptor>; 256] {
    let mut t: [Option<OpcodeDescriptor>; 256] = [None; 256];

    // 0x00-0x3F: misc, 16-bit loads, INC/DEC, relative jumps
    t[0x00] = op("NOP", 4, 0, nop);
    t[0x01] = op("LD BC,d16", 12, 2, ld_pair_imm::<BC>);
    t[0x02] = op("LD (BC),A", 8, 0, ld_pair_ind_a::<BC>);
    t[0x03] = op("INC BC", 8, 0, inc_pair::<BC>);
    t[0x04] = op("INC B", 4, 0, inc::<B>);
    t[0x05] = op("DEC B", 4, 0, dec::<B>);
    t[0x06] = op("LD B,d8", 8, 1, ld::<B, IMM>);
    t[0x07] = op("RLCA", 4, 0, rlca);
    t[0x08] = op("LD (a16),SP", 20, 2, ld_abs_sp);
    t[0x09] = op("ADD HL,BC", 8, 0, add_hl::<BC>);
    t[0x0A] = op("LD A,(BC)", 8, 0, ld_a_pair_ind::<BC>);
    t[0x0B] = op("DEC BC", 8, 0, dec_pair::<BC>);
    t[0x0C] = op("INC C", 4, 0, inc::<C>);
    t[0x0D] = op("DEC C", 4, 0, dec::<C>);
    t[0x0E] = op("LD C,d8", 8, 1, ld::<C, IMM>);
    t[0x0F] = op("RRCA", 4, 0, rrca);

    t[0x10] = op("STOP", 4, 1, stop);
    t[0x11] = op("LD DE,d16", 12, 2, ld_pair_imm::<DE>);
    t[0x12] = op("LD (DE),A", 8, 0, ld_pair_ind_a::<DE>);
    t[0x13] = op("INC DE", 8, 0, inc_pair::<DE>);
    t[0x14] = op("INC D", 4, 0, inc::<D>);
    t[0x15] = op("DEC D", 4, 0, dec::<D>);
    t[0x16] = op("LD D,d8", 8, 1, ld::<D, IMM>);
    t[0x17] = op("RLA", 4, 0, rla);
    t[0x18] = op("JR e8", 12, 1, jr::<ALWAYS>);
    t[0x19] = op("ADD HL,DE", 8, 0, add_hl::<DE>);
    t[0x1A] = op("LD A,(DE)", 8, 0, ld_a_pair_ind::<DE>);
    t[0x1B] = op("DEC DE", 8, 0, dec_pair::<DE>);
    t[0x1C] = op("INC E", 4, 0, inc::<E>);
    t[0x1D] = op("DEC E", 4, 0, dec::<E>);
    t[0x1E] = op("LD E,d8", 8, 1, ld::<E, IMM>);
    t[0x1F] = op("RRA", 4, 0, rra);

    t[0x20] = branch("JR NZ,e8", 8, 12, 1, jr::<IF_NZ>);
    t[0x21] = op("LD HL,d16", 12, 2, ld_pair_imm::<HL>);
    t[0x22] = op("LD (HL+),A", 8, 0, ld_hl_inc_a);
    t[0x23] = op("INC HL", 8, 0, inc_pair::<HL>);
    t[0x24] = op("INC H", 4, 0, inc::<H>);
    t[0x25] = op("DEC H", 4, 0, dec::<H>);
    t[0x26] = op("LD H,d8", 8, 1, ld::<H, IMM>);
    t[0x27] = op("DAA", 4, 0, daa);
    t[0x28] = branch("JR Z,e8", 8, 12, 1, jr::<IF_Z>);
    t[0x29] = op("ADD HL,HL", 8, 0, add_hl::<HL>);
    t[0x2A] = op("LD A,(HL+)", 8, 0, ld_a_hl_inc);
    t[0x2B] = op("DEC HL", 8, 0, dec_pair::<HL>);
    t[0x2C] = op("INC L", 4, 0, inc::<L>);
    t[0x2D] = op("DEC L", 4, 0, dec::<L>);
    t[0x2E] = op("LD L,d8", 8, 1, ld::<L, IMM>);
    t[0x2F] = op("CPL", 4, 0, cpl);

    t[0x30] = branch("JR NC,e8", 8, 12, 1, jr::<IF_NC>);
    t[0x31] = op("LD SP,d16", 12, 2, ld_pair_imm::<SP>);
    t[0x32] = op("LD (HL-),A", 8, 0, ld_hl_dec_a);
    t[0x33] = op("INC SP", 8, 0, inc_pair::<SP>);
    t[0x34] = op("INC (HL)", 12, 0, inc::<HLI>);
    t[0x35] = op("DEC (HL)", 12, 0, dec::<HLI>);
    t[0x36] = op("LD (HL),d8", 12, 1, ld::<HLI, IMM>);
    t[0x37] = op("SCF", 4, 0, scf);
    t[0x38] = branch("JR C,e8", 8, 12, 1, jr::<IF_C>);
    t[0x39] = op("ADD HL,SP", 8, 0, add_hl::<SP>);
    t[0x3A] = op("LD A,(HL-)", 8, 0, ld_a_hl_dec);
    t[0x3B] = op("DEC SP", 8, 0, dec_pair::<SP>);
    t[0x3C] = op("INC A", 4, 0, inc::<A>);
    t[0x3D] = op("DEC A", 4, 0, dec::<A>);
    t[0x3E] = op("LD A,d8", 8, 1, ld::<A, IMM>);
    t[0x3F] = op("CCF", 4, 0, ccf);

    // 0x40-0x7F: register-to-register loads
    ld_row!(t, 0x40, "B", B, 4);
    ld_row!(t, 0x48, "C", C, 4);
    ld_row!(t, 0x50, "D", D, 4);
    ld_row!(t, 0x58, "E", E, 4);
    ld_row!(t, 0x60, "H", H, 4);
    ld_row!(t, 0x68, "L", L, 4);
    ld_row!(t, 0x70, "(HL)", HLI, 8);
    ld_row!(t, 0x78, "A", A, 4);
    // LD (HL),(HL) is HALT
    t[0x76] = op("HALT", 4, 0, halt);

    // 0x80-0xBF: accumulator arithmetic and logic
    alu_row!(t, 0x80, "ADD A,", alu_add);
    alu_row!(t, 0x88, "ADC A,", alu_adc);
    alu_row!(t, 0x90, "SUB A,", alu_sub);
    alu_row!(t, 0x98, "SBC A,", alu_sbc);
    alu_row!(t, 0xA0, "AND ", alu_and);
    alu_row!(t, 0xA8, "XOR ", alu_xor);
    alu_row!(t, 0xB0, "OR ", alu_or);
    alu_row!(t, 0xB8, "CP ", alu_cp);

    // 0xC0-0xFF: stack, calls, immediates, high-page I/O
    t[0xC0] = branch("RET NZ", 8, 20, 0, ret::<IF_NZ>);
    t[0xC1] = op("POP BC", 12, 0, pop::<BC>);
    t[0xC2] = branch("JP NZ,a16", 12, 16, 2, jp::<IF_NZ>);
    t[0xC3] = op("JP a16", 16, 2, jp::<ALWAYS>);
    t[0xC4] = branch("CALL NZ,a16", 12, 24, 2, call::<IF_NZ>);
    t[0xC5] = op("PUSH BC", 16, 0, push::<BC>);
    t[0xC6] = op("ADD A,d8", 8, 1, alu_add::<IMM>);
    t[0xC7] = op("RST $00", 16, 0, rst::<0x00>);
    t[0xC8] = branch("RET Z", 8, 20, 0, ret::<IF_Z>);
    t[0xC9] = op("RET", 16, 0, ret::<ALWAYS>);
    t[0xCA] = branch("JP Z,a16", 12, 16, 2, jp::<IF_Z>);
    t[0xCC] = branch("CALL Z,a16", 12, 24, 2, call::<IF_Z>);
    t[0xCD] = op("CALL a16", 24, 2, call::<ALWAYS>);
    t[0xCE] = op("ADC A,d8", 8, 1, alu_adc::<IMM>);
    t[0xCF] = op("RST $08", 16, 0, rst::<0x08>);

    t[0xD0] = branch("RET NC", 8, 20, 0, ret::<IF_NC>);
    t[0xD1] = op("POP DE", 12, 0, pop::<DE>);
    t[0xD2] = branch("JP NC,a16", 12, 16, 2, jp::<IF_NC>);
    t[0xD4] = branch("CALL NC,a16", 12, 24, 2, call::<IF_NC>);
    t[0xD5] = op("PUSH DE", 16, 0, push::<DE>);
    t[0xD6] = op("SUB A,d8", 8, 1, alu_sub::<IMM>);
    t[0xD7] = op("RST $10", 16, 0, rst::<0x10>);
    t[0xD8] = branch("RET C", 8, 20, 0, ret::<IF_C>);
    t[0xD9] = op("RETI", 16, 0, reti);
    t[0xDA] = branch("JP C,a16", 12, 16, 2, jp::<IF_C>);
    t[0xDC] = branch("CALL C,a16", 12, 24, 2, call::<IF_C>);
    t[0xDE] = op("SBC A,d8", 8, 1, alu_sbc::<IMM>);
    t[0xDF] = op("RST $18", 16, 0, rst::<0x18>);

    t[0xE0] = op("LDH (a8),A", 12, 1, ldh_imm_a);
    t[0xE1] = op("POP HL", 12, 0, pop::<HL>);
    t[0xE2] = op("LD (C),A", 8, 0, ld_c_ind_a);
    t[0xE5] = op("PUSH HL", 16, 0, push::<HL>);
    t[0xE6] = op("AND d8", 8, 1, alu_and::<IMM>);
    t[0xE7] = op("RST $20", 16, 0, rst::<0x20>);
    t[0xE8] = op("ADD SP,e8", 16, 1, add_sp_offset);
    t[0xE9] = op("JP (HL)", 4, 0, jp_hl);
    t[0xEA] = op("LD (a16),A", 16, 2, ld_abs_a);
    t[0xEE] = op("XOR d8", 8, 1, alu_xor::<IMM>);
    t[0xEF] = op("RST $28", 16, 0, rst::<0x28>);

    t[0xF0] = op("LDH A,(a8)", 12, 1, ldh_a_imm);
    t[0xF1] = op("POP AF", 12, 0, pop::<AF>);
    t[0xF2] = op("LD A,(C)", 8, 0, ld_a_c_ind);
    t[0xF3] = op("DI", 4, 0, di);
    t[0xF5] = op("PUSH AF", 16, 0, push::<AF>);
    t[0xF6] = op("OR d8", 8, 1, alu_or::<IMM>);
    t[0xF7] = op("RST $30", 16, 0, rst::<0x30>);
    t[0xF8] = op("LD HL,SP+e8", 12, 1, ld_hl_sp_offset);
    t[0xF9] = op("LD SP,HL", 8, 0, ld_sp_hl);
    t[0xFA] = op("LD A,(a16)", 16, 2, ld_a_abs);
    t[0xFB] = op("EI", 4, 0, ei);
    t[0xFE] = op("CP d8", 8, 1, alu_cp::<IMM>);
    t[0xFF] = op("RST $38", 16, 0, rst::<0x38>);

    t
}

/// Base 256-entry opcode table indexed by opcode byte.
///
/// # Examples
///
/// ```
/// use libsm83::opcodes::BASE_TABLE;
///
/// let nop = BASE_TABLE[0x00].unwrap();
/// assert_eq!(nop.mnemonic, "NOP");
/// assert_eq!(nop.cycles, 4);
///
/// // Unused on the hardware
/// assert!(BASE_TABLE[0xD3].is_none());
/// ```
pub static BASE_TABLE: [Option<OpcodeDescriptor>; 256] = build_base_table();
