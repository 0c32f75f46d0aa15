//! # Processor Control Instructions
//!
//! - NOP
//! - HALT: sleep until an enabled interrupt is requested
//! - STOP: very-low-power sleep until a joypad interrupt; its padding byte
//!   is fetched as an operand
//! - DI: disable interrupts immediately
//! - EI: enable interrupts after the following instruction

use crate::memory::MemoryBus;
use crate::opcodes::Flow;
use crate::registers::Registers;

pub(crate) fn nop(_regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    Flow::Continue
}

pub(crate) fn halt(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set_halted(true);
    Flow::Continue
}

pub(crate) fn stop(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set_stopped(true);
    Flow::Continue
}

pub(crate) fn di(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.set_ime(false);
    Flow::Continue
}

pub(crate) fn ei(regs: &mut Registers, _bus: &mut dyn MemoryBus, _operands: &[u8]) -> Flow {
    regs.schedule_ime();
    Flow::Continue
}
