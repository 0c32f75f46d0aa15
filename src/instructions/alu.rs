//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements the accumulator arithmetic and logic rows
//! (0x80-0xBF and their `d8` forms) and the 16-bit `ADD HL,rr`.
//!
//! | Op  | Z | N | H            | C            |
//! |-----|---|---|--------------|--------------|
//! | ADD | * | 0 | carry bit 3  | carry bit 7  |
//! | ADC | * | 0 | carry bit 3  | carry bit 7  |
//! | SUB | * | 1 | borrow bit 4 | borrow       |
//! | SBC | * | 1 | borrow bit 4 | borrow       |
//! | AND | * | 0 | 1            | 0            |
//! | XOR | * | 0 | 0            | 0            |
//! | OR  | * | 0 | 0            | 0            |
//! | CP  | * | 1 | borrow bit 4 | borrow       |
//!
//! ADC and SBC fold the carry-in into one three-input operation so carry
//! and half-carry reflect the whole sum.

use super::{read_operand, read_pair};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{add_words, Flag, Reg8, Registers};

/// `ADD A,SRC`.
pub(crate) fn alu_add<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let outcome = regs.add8(Reg8::A, value, false);
    regs.apply_alu(outcome, false);
    Flow::Continue
}

/// `ADC A,SRC`.
pub(crate) fn alu_adc<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let carry = regs.flag(Flag::Carry);
    let outcome = regs.add8(Reg8::A, value, carry);
    regs.apply_alu(outcome, false);
    Flow::Continue
}

/// `SUB A,SRC`.
pub(crate) fn alu_sub<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let outcome = regs.sub8(Reg8::A, value, false);
    regs.apply_alu(outcome, true);
    Flow::Continue
}

/// `SBC A,SRC`.
pub(crate) fn alu_sbc<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let carry = regs.flag(Flag::Carry);
    let outcome = regs.sub8(Reg8::A, value, carry);
    regs.apply_alu(outcome, true);
    Flow::Continue
}

/// `AND SRC`.
pub(crate) fn alu_and<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let outcome = regs.and8(Reg8::A, value);
    regs.apply_alu(outcome, false);
    Flow::Continue
}

/// `XOR SRC`.
pub(crate) fn alu_xor<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let outcome = regs.xor8(Reg8::A, value);
    regs.apply_alu(outcome, false);
    Flow::Continue
}

/// `OR SRC`.
pub(crate) fn alu_or<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let outcome = regs.or8(Reg8::A, value);
    regs.apply_alu(outcome, false);
    Flow::Continue
}

/// `CP SRC`: subtraction flags only, A unchanged.
pub(crate) fn alu_cp<const SRC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    let outcome = regs.compare8(Reg8::A, value);
    regs.apply_alu(outcome, true);
    Flow::Continue
}

/// `ADD HL,rr`: Z untouched, N cleared, H from bit 11, C from bit 15.
pub(crate) fn add_hl<const P: u8>(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let (result, outcome) = add_words(regs.hl(), read_pair(regs, P));
    regs.set_hl(result);
    regs.set_flags(&[
        (Flag::Subtract, false),
        (Flag::HalfCarry, outcome.half_carry),
        (Flag::Carry, outcome.carry),
    ]);
    Flow::Continue
}
