//! # Single-Bit Instructions
//!
//! - BIT n,r: Z = !bit, N = 0, H = 1, C preserved
//! - RES n,r / SET n,r: no flags touched

use super::{read_operand, write_operand};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{Flag, Registers};

/// `BIT N,R`.
pub(crate) fn bit<const N: u8, const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let set = read_operand(regs, bus, &[], R) & (1 << N) != 0;
    regs.set_flags(&[
        (Flag::Zero, !set),
        (Flag::Subtract, false),
        (Flag::HalfCarry, true),
    ]);
    Flow::Continue
}

/// `RES N,R`.
pub(crate) fn res<const N: u8, const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, &[], R) & !(1 << N);
    write_operand(regs, bus, R, value);
    Flow::Continue
}

/// `SET N,R`.
pub(crate) fn set<const N: u8, const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let value = read_operand(regs, bus, &[], R) | (1 << N);
    write_operand(regs, bus, R, value);
    Flow::Continue
}
