//! # Shift and Rotate Operations
//!
//! Accumulator rotates from the base table and the first four rows of the
//! extended table:
//!
//! - RLCA, RRCA, RLA, RRA: Z always cleared, N/H cleared, C = bit out
//! - RLC, RRC, RL, RR, SLA, SRA, SWAP, SRL on r or (HL):
//!   Z from result, N/H cleared, C = bit out (cleared by SWAP)

use super::{read_operand, write_operand};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{Flag, Reg8, Registers, ShiftOp};

fn rotate_accumulator(regs: &mut Registers, op: ShiftOp) -> Flow {
    let outcome = regs.shift(Reg8::A, op);
    regs.set_flags(&[
        (Flag::Zero, false),
        (Flag::Subtract, false),
        (Flag::HalfCarry, false),
        (Flag::Carry, outcome.carry),
    ]);
    Flow::Continue
}

pub(crate) fn rlca(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    rotate_accumulator(regs, ShiftOp::Rlc)
}

pub(crate) fn rrca(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    rotate_accumulator(regs, ShiftOp::Rrc)
}

pub(crate) fn rla(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    rotate_accumulator(regs, ShiftOp::Rl)
}

pub(crate) fn rra(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    rotate_accumulator(regs, ShiftOp::Rr)
}

fn shift_operand(regs: &mut Registers, bus: &mut dyn MemoryBus, target: u8, op: ShiftOp) -> Flow {
    let value = read_operand(regs, bus, &[], target);
    let (result, outcome) = op.apply(value, regs.flag(Flag::Carry));
    write_operand(regs, bus, target, result);
    regs.apply_shift(outcome);
    Flow::Continue
}

pub(crate) fn rlc<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Rlc)
}

pub(crate) fn rrc<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Rrc)
}

pub(crate) fn rl<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Rl)
}

pub(crate) fn rr<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Rr)
}

pub(crate) fn sla<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Sla)
}

pub(crate) fn sra<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Sra)
}

pub(crate) fn swap<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Swap)
}

pub(crate) fn srl<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    shift_operand(regs, bus, R, ShiftOp::Srl)
}
