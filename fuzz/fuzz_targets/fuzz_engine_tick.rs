//! Fuzz target for engine ticks.
//!
//! Builds an arbitrary register file and instruction stream, then ticks the
//! engine through a few instructions. Any panic is a bug; decode faults are
//! expected and must leave the registers untouched.

#![no_main]

use arbitrary::Arbitrary;
use libsm83::{Cpu, FlatMemory, MemoryBus, Reg16, Reg8};
use libfuzzer_sys::fuzz_target;

/// Arbitrary register file for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzRegisters {
    /// A, B, C, D, E, F, H, L in order
    r8: [u8; 8],
    pc: u16,
    sp: u16,
    ime: bool,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    registers: FuzzRegisters,
    /// Bytes placed at PC
    program: [u8; 16],
    /// Contents of the page SP points into
    stack_page: [u8; 256],
    /// IE and IF
    interrupt_enable: u8,
    interrupt_flags: u8,
    ticks: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    let stack_base = input.registers.sp & 0xFF00;
    memory.write_range(stack_base, &input.stack_page);
    memory.write_range(input.registers.pc, &input.program);
    memory.write(0xFFFF, input.interrupt_enable);
    memory.write(0xFF0F, input.interrupt_flags);

    let mut cpu = Cpu::new(memory);
    {
        let regs = cpu.registers_mut();
        for (reg, value) in Reg8::ALL.iter().zip(input.registers.r8) {
            regs.set8(*reg, value);
        }
        regs.set16(Reg16::Pc, input.registers.pc);
        regs.set16(Reg16::Sp, input.registers.sp);
        regs.set_ime(input.registers.ime);
    }

    for _ in 0..input.ticks {
        let before = cpu.registers().clone();
        let was_busy = cpu.is_busy();
        match cpu.tick() {
            Ok(()) => {
                if was_busy {
                    assert_eq!(cpu.registers(), &before);
                }
            }
            Err(_) => {
                // Faults are sticky and leave the registers alone
                assert_eq!(cpu.registers(), &before);
                assert!(cpu.tick().is_err());
                break;
            }
        }
    }
});
