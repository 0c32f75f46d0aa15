//! # Load and Store Instructions
//!
//! - LD r,r' / LD r,d8 / LD r,(HL) / LD (HL),r / LD (HL),d8
//! - LD rr,d16 and LD SP,HL
//! - LD (BC)/(DE),A and LD A,(BC)/(DE)
//! - LD (HL+)/(HL-),A and LD A,(HL+)/(HL-)
//! - LD (a16),A / LD A,(a16) / LD (a16),SP
//! - LDH (a8),A / LDH A,(a8) / LD (C),A / LD A,(C)
//!
//! None of these touch the flags.

use super::{imm16, read_operand, read_pair, write_operand, write_pair};
use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::{Reg16, Reg8, Registers};

/// Base of the high page addressed by LDH and LD (C).
const HIGH_PAGE: u16 = 0xFF00;

/// `LD DST,SRC` for any 8-bit operand codes.
pub(crate) fn ld<const DST: u8, const SRC: u8>(
    regs: &mut Registers,
    bus: &mut dyn MemoryBus,
    operands: &[u8],
) -> Flow {
    let value = read_operand(regs, bus, operands, SRC);
    write_operand(regs, bus, DST, value);
    Flow::Continue
}

/// `LD rr,d16`.
pub(crate) fn ld_pair_imm<const P: u8>(
    regs: &mut Registers,
    _bus: &mut dyn MemoryBus,
    operands: &[u8],
) -> Flow {
    write_pair(regs, P, imm16(operands));
    Flow::Continue
}

/// `LD (rr),A`.
pub(crate) fn ld_pair_ind_a<const P: u8>(
    regs: &mut Registers,
    bus: &mut dyn MemoryBus,
    _operands: &[u8],
) -> Flow {
    bus.write(read_pair(regs, P), regs.get8(Reg8::A));
    Flow::Continue
}

/// `LD A,(rr)`.
pub(crate) fn ld_a_pair_ind<const P: u8>(
    regs: &mut Registers,
    bus: &mut dyn MemoryBus,
    _operands: &[u8],
) -> Flow {
    let value = bus.read(read_pair(regs, P));
    regs.set8(Reg8::A, value);
    Flow::Continue
}

/// `LD (HL+),A`.
pub(crate) fn ld_hl_inc_a(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    bus.write(regs.hl(), regs.get8(Reg8::A));
    regs.combine(Reg8::H, Reg8::L).inc();
    Flow::Continue
}

/// `LD (HL-),A`.
pub(crate) fn ld_hl_dec_a(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    bus.write(regs.hl(), regs.get8(Reg8::A));
    regs.combine(Reg8::H, Reg8::L).dec();
    Flow::Continue
}

/// `LD A,(HL+)`.
pub(crate) fn ld_a_hl_inc(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set8(Reg8::A, bus.read(regs.hl()));
    regs.combine(Reg8::H, Reg8::L).inc();
    Flow::Continue
}

/// `LD A,(HL-)`.
pub(crate) fn ld_a_hl_dec(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set8(Reg8::A, bus.read(regs.hl()));
    regs.combine(Reg8::H, Reg8::L).dec();
    Flow::Continue
}

/// `LD (a16),SP`: low byte first.
pub(crate) fn ld_abs_sp(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    let addr = imm16(operands);
    let (high, low) = regs.split16(Reg16::Sp);
    bus.write(addr, low);
    bus.write(addr.wrapping_add(1), high);
    Flow::Continue
}

/// `LD (a16),A`.
pub(crate) fn ld_abs_a(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    bus.write(imm16(operands), regs.get8(Reg8::A));
    Flow::Continue
}

/// `LD A,(a16)`.
pub(crate) fn ld_a_abs(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    regs.set8(Reg8::A, bus.read(imm16(operands)));
    Flow::Continue
}

/// `LDH (a8),A`.
pub(crate) fn ldh_imm_a(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    bus.write(HIGH_PAGE | operands[0] as u16, regs.get8(Reg8::A));
    Flow::Continue
}

/// `LDH A,(a8)`.
pub(crate) fn ldh_a_imm(regs: &mut Registers, bus: &mut dyn MemoryBus, operands: &[u8]) -> Flow {
    regs.set8(Reg8::A, bus.read(HIGH_PAGE | operands[0] as u16));
    Flow::Continue
}

/// `LD (C),A`.
pub(crate) fn ld_c_ind_a(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    bus.write(HIGH_PAGE | regs.get8(Reg8::C) as u16, regs.get8(Reg8::A));
    Flow::Continue
}

/// `LD A,(C)`.
pub(crate) fn ld_a_c_ind(regs: &mut Registers, bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set8(Reg8::A, bus.read(HIGH_PAGE | regs.get8(Reg8::C) as u16));
    Flow::Continue
}

/// `LD SP,HL`.
pub(crate) fn ld_sp_hl(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set16(Reg16::Sp, regs.hl());
    Flow::Continue
}
