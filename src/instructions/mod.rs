//! # SM83 Instruction Implementations
//!
//! Effect functions for every opcode, organized by category. Each function
//! has the [`Effect`](crate::opcodes::Effect) signature: it receives the
//! register file, the memory bus and the already-fetched operand bytes, and
//! reports whether a conditional branch was taken.
//!
//! Regular opcode rows are expressed once with const-generic operand codes,
//! so `ld::<B, HLI>` is `LD B,(HL)` and `alu_add::<IMM>` is `ADD A,d8`.
//!
//! ## Categories
//!
//! - **load_store**: 8-bit and 16-bit loads and stores
//! - **alu**: ADD, ADC, SUB, SBC, AND, XOR, OR, CP, ADD HL,rr
//! - **inc_dec**: 8-bit and 16-bit INC/DEC
//! - **shifts**: accumulator rotates and the extended rotate/shift/swap rows
//! - **bits**: BIT, RES, SET
//! - **stack**: PUSH, POP, ADD SP,e8, LD HL,SP+e8
//! - **branches**: JR, JP, CALL, RET, RETI, RST
//! - **flags**: DAA, CPL, SCF, CCF
//! - **control**: NOP, HALT, STOP, DI, EI

pub mod alu;
pub mod bits;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;

use crate::memory::MemoryBus;
use crate::registers::{Flag, Reg16, Reg8, Registers};

/// 8-bit operand codes, in opcode-encoding order.
pub mod code {
    pub const B: u8 = 0;
    pub const C: u8 = 1;
    pub const D: u8 = 2;
    pub const E: u8 = 3;
    pub const H: u8 = 4;
    pub const L: u8 = 5;
    /// Memory at HL
    pub const HLI: u8 = 6;
    pub const A: u8 = 7;
    /// Immediate byte (first operand)
    pub const IMM: u8 = 8;

    // 16-bit register pairs
    pub const BC: u8 = 0;
    pub const DE: u8 = 1;
    pub const HL: u8 = 2;
    pub const SP: u8 = 3;
    pub const AF: u8 = 4;

    // Branch conditions
    pub const ALWAYS: u8 = 0;
    pub const IF_NZ: u8 = 1;
    pub const IF_Z: u8 = 2;
    pub const IF_NC: u8 = 3;
    pub const IF_C: u8 = 4;
}

const fn register_for(code: u8) -> Option<Reg8> {
    match code {
        code::B => Some(Reg8::B),
        code::C => Some(Reg8::C),
        code::D => Some(Reg8::D),
        code::E => Some(Reg8::E),
        code::H => Some(Reg8::H),
        code::L => Some(Reg8::L),
        code::A => Some(Reg8::A),
        _ => None,
    }
}

/// Reads an 8-bit operand: a register, memory at HL, or the immediate byte.
pub(crate) fn read_operand(regs: &Registers, bus: &dyn MemoryBus, operands: &[u8], code: u8) -> u8 {
    match code {
        code::HLI => bus.read(regs.hl()),
        code::IMM => operands[0],
        _ => match register_for(code) {
            Some(reg) => regs.get8(reg),
            None => 0xFF,
        },
    }
}

/// Writes an 8-bit destination: a register or memory at HL.
pub(crate) fn write_operand(regs: &mut Registers, bus: &mut dyn MemoryBus, code: u8, value: u8) {
    if code == code::HLI {
        bus.write(regs.hl(), value);
    } else if let Some(reg) = register_for(code) {
        regs.set8(reg, value);
    }
}

const fn pair_registers(pair: u8) -> (Reg8, Reg8) {
    match pair {
        code::BC => (Reg8::B, Reg8::C),
        code::DE => (Reg8::D, Reg8::E),
        code::AF => (Reg8::A, Reg8::F),
        _ => (Reg8::H, Reg8::L),
    }
}

pub(crate) fn read_pair(regs: &Registers, pair: u8) -> u16 {
    if pair == code::SP {
        return regs.sp();
    }
    let (high, low) = pair_registers(pair);
    regs.pair(high, low)
}

pub(crate) fn write_pair(regs: &mut Registers, pair: u8, value: u16) {
    if pair == code::SP {
        regs.set16(Reg16::Sp, value);
        return;
    }
    let (high, low) = pair_registers(pair);
    regs.split_into(value, high, low);
}

/// Evaluates a branch condition against the flags.
pub(crate) fn condition_met(regs: &Registers, cond: u8) -> bool {
    match cond {
        code::IF_NZ => !regs.flag(Flag::Zero),
        code::IF_Z => regs.flag(Flag::Zero),
        code::IF_NC => !regs.flag(Flag::Carry),
        code::IF_C => regs.flag(Flag::Carry),
        _ => true,
    }
}

/// Little-endian 16-bit immediate from the operand bytes.
pub(crate) fn imm16(operands: &[u8]) -> u16 {
    u16::from_le_bytes([operands[0], operands[1]])
}

/// Pushes a word: high byte at SP-1, low byte at SP-2.
pub(crate) fn push16(regs: &mut Registers, bus: &mut dyn MemoryBus, value: u16) {
    let [high, low] = value.to_be_bytes();
    let sp = regs.word(Reg16::Sp).dec().value();
    bus.write(sp, high);
    let sp = regs.word(Reg16::Sp).dec().value();
    bus.write(sp, low);
}

/// Pops a word pushed by [`push16`].
pub(crate) fn pop16(regs: &mut Registers, bus: &dyn MemoryBus) -> u16 {
    let low = bus.read(regs.sp());
    let high = bus.read(regs.word(Reg16::Sp).inc().value());
    regs.word(Reg16::Sp).inc();
    u16::from_be_bytes([high, low])
}
