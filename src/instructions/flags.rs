//! # Flag and Accumulator Adjust Instructions
//!
//! - DAA: decimal-adjust A after a BCD add or subtract
//! - CPL: complement A (N = H = 1)
//! - SCF: set carry (N = H = 0)
//! - CCF: complement carry (N = H = 0)

use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{Flag, Reg8, Registers};

/// `DAA`.
///
/// After an addition the correction is added, after a subtraction (N set)
/// it is subtracted. C is set when the high digit needed correcting after
/// an addition and kept otherwise; H is always cleared; N is unchanged.
pub(crate) fn daa(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let mut a = regs.get8(Reg8::A);
    let mut carry = regs.flag(Flag::Carry);
    let half_carry = regs.flag(Flag::HalfCarry);

    if regs.flag(Flag::Subtract) {
        if carry {
            a = a.wrapping_sub(0x60);
        }
        if half_carry {
            a = a.wrapping_sub(0x06);
        }
    } else {
        if carry || a > 0x99 {
            a = a.wrapping_add(0x60);
            carry = true;
        }
        if half_carry || a & 0x0F > 0x09 {
            a = a.wrapping_add(0x06);
        }
    }

    regs.set8(Reg8::A, a);
    regs.set_flags(&[
        (Flag::Zero, a == 0),
        (Flag::HalfCarry, false),
        (Flag::Carry, carry),
    ]);
    Flow::Continue
}

/// `CPL`.
pub(crate) fn cpl(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let a = !regs.get8(Reg8::A);
    regs.set8(Reg8::A, a);
    regs.set_flags(&[(Flag::Subtract, true), (Flag::HalfCarry, true)]);
    Flow::Continue
}

/// `SCF`.
pub(crate) fn scf(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set_flags(&[
        (Flag::Subtract, false),
        (Flag::HalfCarry, false),
        (Flag::Carry, true),
    ]);
    Flow::Continue
}

/// `CCF`.
pub(crate) fn ccf(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let carry = regs.flag(Flag::Carry);
    regs.set_flags(&[
        (Flag::Subtract, false),
        (Flag::HalfCarry, false),
        (Flag::Carry, !carry),
    ]);
    Flow::Continue
}
