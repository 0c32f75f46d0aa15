//! # Stack Operations
//!
//! - PUSH rr / POP rr (BC, DE, HL, AF)
//! - ADD SP,e8 and LD HL,SP+e8
//!
//! The stack grows downward. PUSH writes the high byte at SP-1 and the low
//! byte at SP-2; POP reads them back in the opposite order.
//!
//! Both SP-offset instructions take a *signed* 8-bit offset. H and C are the
//! carries out of bits 3 and 7 of the unsigned low-byte addition; Z and N
//! are always cleared.

use super::{code, pop16, push16, read_pair, write_pair};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{add_signed_offset, AluOutcome, Flag, Reg16, Registers};

/// `PUSH rr`.
pub(crate) fn push<const P: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let value = read_pair(regs, P);
    push16(regs, bus, value);
    Flow::Continue
}

/// `POP rr`. The unused low nibble of F always pops as zero.
pub(crate) fn pop<const P: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let mut value = pop16(regs, bus);
    if P == code::AF {
        value &= 0xFFF0;
    }
    write_pair(regs, P, value);
    Flow::Continue
}

fn apply_offset_flags(regs: &mut Registers, outcome: AluOutcome) {
    regs.set_flags(&[
        (Flag::Zero, false),
        (Flag::Subtract, false),
        (Flag::HalfCarry, outcome.half_carry),
        (Flag::Carry, outcome.carry),
    ]);
}

/// `ADD SP,e8`.
pub(crate) fn add_sp_offset(regs: &mut Registers, _bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let (result, outcome) = add_signed_offset(regs.sp(), operands[0]);
    regs.set16(Reg16::Sp, result);
    apply_offset_flags(regs, outcome);
    Flow::Continue
}

/// `LD HL,SP+e8`.
pub(crate) fn ld_hl_sp_offset(regs: &mut Registers, _bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let (result, outcome) = add_signed_offset(regs.sp(), operands[0]);
    regs.set_hl(result);
    apply_offset_flags(regs, outcome);
    Flow::Continue
}
