//! # Increment and Decrement Instructions
//!
//! - INC r / DEC r / INC (HL) / DEC (HL): Z, N, H updated; C preserved
//! - INC rr / DEC rr: 16-bit, no flags

use super::{read_operand, read_pair, write_operand, write_pair};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{add_bytes, sub_bytes, Flag, Registers};

/// `INC r` / `INC (HL)`.
pub(crate) fn inc<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let (result, outcome) = add_bytes(read_operand(regs, bus, operands, R), 1, false);
    write_operand(regs, bus, R, result);
    regs.set_flags(&[
        (Flag::Zero, outcome.zero),
        (Flag::Subtract, false),
        (Flag::HalfCarry, outcome.half_carry),
    ]);
    Flow::Continue
}

/// `DEC r` / `DEC (HL)`.
pub(crate) fn dec<const R: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let (result, outcome) = sub_bytes(read_operand(regs, bus, operands, R), 1, false);
    write_operand(regs, bus, R, result);
    regs.set_flags(&[
        (Flag::Zero, outcome.zero),
        (Flag::Subtract, true),
        (Flag::HalfCarry, outcome.half_carry),
    ]);
    Flow::Continue
}

/// `INC rr`.
pub(crate) fn inc_pair<const P: u8>(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let value = read_pair(regs, P).wrapping_add(1);
    write_pair(regs, P, value);
    Flow::Continue
}

/// `DEC rr`.
pub(crate) fn dec_pair<const P: u8>(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let value = read_pair(regs, P).wrapping_sub(1);
    write_pair(regs, P, value);
    Flow::Continue
}
