//! Tests for stack and control-flow instructions.
//!
//! Tests cover:
//! - PUSH/POP round trips for every pair
//! - POP AF masking the unused low nibble of F
//! - CALL/RET, conditional CALL/RET/JP/JR with taken and not-taken timing
//! - RST vectors, JP HL, RETI

use libsm83::{Cpu, EngineConfig, Flag, FlatMemory, MemoryBus, Reg16, Reg8};

/// Helper function to create an engine at the post-boot entry point 0x0100
fn setup_cpu(program: &[u8]) -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write_range(0x0100, program);
    Cpu::with_config(memory, EngineConfig::post_boot())
}

// ========== PUSH / POP ==========

#[test]
fn test_push_pop_round_trip() {
    // (PUSH, POP, high, low) for BC, DE, HL
    let cases = [
        (0xC5, 0xC1, Reg8::B, Reg8::C),
        (0xD5, 0xD1, Reg8::D, Reg8::E),
        (0xE5, 0xE1, Reg8::H, Reg8::L),
    ];

    for (push, pop, high, low) in cases {
        let mut cpu = setup_cpu(&[push, pop]);
        cpu.registers_mut().split_into(0xBEEF, high, low);
        let before = cpu.registers().clone();

        assert_eq!(cpu.step().unwrap(), 16);
        assert_eq!(cpu.sp(), 0xFFFC);

        // Clobber the pair between push and pop
        cpu.registers_mut().split_into(0x0000, high, low);

        assert_eq!(cpu.step().unwrap(), 12);
        assert_eq!(cpu.registers().pair(high, low), 0xBEEF);
        assert_eq!(cpu.sp(), before.sp());
    }
}

#[test]
fn test_push_byte_order() {
    // PUSH DE: high byte at SP-1, low byte at SP-2
    let mut cpu = setup_cpu(&[0xD5]);
    cpu.registers_mut().split_into(0x1234, Reg8::D, Reg8::E);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0xFFFD), 0x12);
    assert_eq!(cpu.memory().read(0xFFFC), 0x34);
}

#[test]
fn test_pop_af_masks_low_nibble() {
    // PUSH BC ; POP AF
    let mut cpu = setup_cpu(&[0xC5, 0xF1]);
    cpu.registers_mut().split_into(0x12FF, Reg8::B, Reg8::C);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x12);
    assert_eq!(cpu.registers().get8(Reg8::F), 0xF0);
    assert!(cpu.registers().flag(Flag::Zero));
    assert!(cpu.registers().flag(Flag::Carry));
}

#[test]
fn test_push_af() {
    let mut cpu = setup_cpu(&[0xF5]);
    cpu.registers_mut().set8(Reg8::A, 0x77);
    cpu.registers_mut().set8(Reg8::F, 0xA0);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0xFFFD), 0x77);
    assert_eq!(cpu.memory().read(0xFFFC), 0xA0);
}

// ========== CALL / RET ==========

#[test]
fn test_call_then_ret() {
    // 0x0100: CALL $0200
    // 0x0200: RET
    let mut cpu = setup_cpu(&[0xCD, 0x00, 0x02]);
    cpu.memory_mut().write(0x0200, 0xC9);

    assert_eq!(cpu.step().unwrap(), 24);
    assert_eq!(cpu.pc(), 0x0200);
    assert_eq!(cpu.sp(), 0xFFFC);

    assert_eq!(cpu.step().unwrap(), 16);
    assert_eq!(cpu.pc(), 0x0103);
    assert_eq!(cpu.sp(), 0xFFFE);
}

#[test]
fn test_conditional_call_timing() {
    // CALL Z,$0200 with Z clear: not taken
    let mut cpu = setup_cpu(&[0xCC, 0x00, 0x02]);
    assert_eq!(cpu.step().unwrap(), 12);
    assert_eq!(cpu.pc(), 0x0103);
    assert_eq!(cpu.sp(), 0xFFFE);

    // Same with Z set: taken
    let mut cpu = setup_cpu(&[0xCC, 0x00, 0x02]);
    cpu.registers_mut().set_flag(Flag::Zero, true);
    assert_eq!(cpu.step().unwrap(), 24);
    assert_eq!(cpu.pc(), 0x0200);
}

#[test]
fn test_conditional_ret_timing() {
    // RET NC
    let mut cpu = setup_cpu(&[0xD0]);
    cpu.registers_mut().set_flag(Flag::Carry, true);
    assert_eq!(cpu.step().unwrap(), 8);
    assert_eq!(cpu.pc(), 0x0101);

    let mut cpu = setup_cpu(&[0xD0]);
    cpu.memory_mut().write_range(0xFFFC, &[0x34, 0x12]);
    cpu.registers_mut().set16(Reg16::Sp, 0xFFFC);
    assert_eq!(cpu.step().unwrap(), 20);
    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.sp(), 0xFFFE);
}

#[test]
fn test_rst_vectors() {
    for (opcode, vector) in [(0xC7, 0x00), (0xCF, 0x08), (0xDF, 0x18), (0xFF, 0x38)] {
        let mut cpu = setup_cpu(&[opcode]);

        assert_eq!(cpu.step().unwrap(), 16);

        assert_eq!(cpu.pc(), vector);
        assert_eq!(cpu.memory().read(0xFFFD), 0x01);
        assert_eq!(cpu.memory().read(0xFFFC), 0x01);
    }
}

#[test]
fn test_reti_enables_interrupts() {
    let mut cpu = setup_cpu(&[0xD9]);
    cpu.memory_mut().write_range(0xFFFC, &[0x50, 0x01]);
    cpu.registers_mut().set16(Reg16::Sp, 0xFFFC);

    assert_eq!(cpu.step().unwrap(), 16);

    assert_eq!(cpu.pc(), 0x0150);
    assert!(cpu.registers().ime());
}

// ========== Jumps ==========

#[test]
fn test_jp_absolute_and_hl() {
    // JP $0150 ; (at 0x0150) JP HL
    let mut cpu = setup_cpu(&[0xC3, 0x50, 0x01]);
    cpu.memory_mut().write(0x0150, 0xE9);
    cpu.registers_mut().set_hl(0x4000);

    assert_eq!(cpu.step().unwrap(), 16);
    assert_eq!(cpu.pc(), 0x0150);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.pc(), 0x4000);
}

#[test]
fn test_jp_conditional_timing() {
    // JP C,$0200 with carry clear
    let mut cpu = setup_cpu(&[0xDA, 0x00, 0x02]);
    assert_eq!(cpu.step().unwrap(), 12);
    assert_eq!(cpu.pc(), 0x0103);

    let mut cpu = setup_cpu(&[0xDA, 0x00, 0x02]);
    cpu.registers_mut().set_flag(Flag::Carry, true);
    assert_eq!(cpu.step().unwrap(), 16);
    assert_eq!(cpu.pc(), 0x0200);
}

#[test]
fn test_jr_backward_and_forward() {
    // JR +3
    let mut cpu = setup_cpu(&[0x18, 0x03]);
    assert_eq!(cpu.step().unwrap(), 12);
    assert_eq!(cpu.pc(), 0x0105);

    // JR -2 (infinite loop on itself)
    let mut cpu = setup_cpu(&[0x18, 0xFE]);
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x0100);
}

#[test]
fn test_jr_conditional_not_taken() {
    // JR Z,+3 with Z clear
    let mut cpu = setup_cpu(&[0x28, 0x03]);
    assert_eq!(cpu.step().unwrap(), 8);
    assert_eq!(cpu.pc(), 0x0102);
}
