//! # Control Flow Instructions
//!
//! - JR [cc,]e8: relative jump by a signed offset from the next instruction
//! - JP [cc,]a16 and JP (HL)
//! - CALL [cc,]a16: push the return address, then jump
//! - RET [cc] and RETI (RET plus IME on)
//! - RST n: one-byte CALL to a fixed vector
//!
//! The engine has already advanced PC past the instruction when these run,
//! so the "return address" is simply the current PC. Every function returns
//! [`Flow::Taken`] when control actually transfers, which selects the
//! descriptor's taken cycle cost.

use super::{condition_met, imm16, pop16, push16};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{Reg16, Registers};

/// `JR CC,e8`.
pub(crate) fn jr<const CC: u8>(regs: &mut Registers, _bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    if !condition_met(regs, CC) {
        return Flow::Continue;
    }
    let offset = operands[0] as i8;
    regs.word(Reg16::Pc).add(offset as i16 as u16);
    Flow::Taken
}

/// `JP CC,a16`.
pub(crate) fn jp<const CC: u8>(regs: &mut Registers, _bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    if !condition_met(regs, CC) {
        return Flow::Continue;
    }
    regs.set16(Reg16::Pc, imm16(operands));
    Flow::Taken
}

/// `JP (HL)`.
pub(crate) fn jp_hl(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set16(Reg16::Pc, regs.hl());
    Flow::Taken
}

/// `CALL CC,a16`.
pub(crate) fn call<const CC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    if !condition_met(regs, CC) {
        return Flow::Continue;
    }
    let ret = regs.pc();
    push16(regs, bus, ret);
    regs.set16(Reg16::Pc, imm16(operands));
    Flow::Taken
}

/// `RET CC`.
pub(crate) fn ret<const CC: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    if !condition_met(regs, CC) {
        return Flow::Continue;
    }
    let target = pop16(regs, bus);
    regs.set16(Reg16::Pc, target);
    Flow::Taken
}

/// `RETI`: return and enable interrupts immediately.
pub(crate) fn reti(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let target = pop16(regs, bus);
    regs.set16(Reg16::Pc, target);
    regs.set_ime(true);
    Flow::Taken
}

/// `RST VECTOR`.
pub(crate) fn rst<const VECTOR: u8>(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    let ret = regs.pc();
    push16(regs, bus, ret);
    regs.set16(Reg16::Pc, VECTOR as u16);
    Flow::Taken
}
