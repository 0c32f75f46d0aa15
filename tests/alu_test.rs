//! Tests for the 8-bit and 16-bit arithmetic and logic instructions.
//!
//! Tests cover:
//! - ADD/ADC/SUB/SBC flag outcomes, including single-pass carry-in
//! - AND/OR/XOR/CP flag rules
//! - INC/DEC preserving Carry
//! - ADD HL,rr half-carry from bit 11 and Z preservation
//! - ADD SP,e8 and LD HL,SP+e8 with signed offsets
//! - DAA, CPL, SCF, CCF

use libsm83::{Cpu, EngineConfig, Flag, FlatMemory, MemoryBus, Reg8};

/// Helper function to create an engine at the post-boot entry point 0x0100
fn setup_cpu(program: &[u8]) -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write_range(0x0100, program);
    Cpu::with_config(memory, EngineConfig::post_boot())
}

/// Flags as (Z, N, H, C)
fn flags(cpu: &Cpu<FlatMemory>) -> (bool, bool, bool, bool) {
    let regs = cpu.registers();
    (
        regs.flag(Flag::Zero),
        regs.flag(Flag::Subtract),
        regs.flag(Flag::HalfCarry),
        regs.flag(Flag::Carry),
    )
}

// ========== ADD / ADC ==========

#[test]
fn test_add_half_carry() {
    // ADD A,$01
    let mut cpu = setup_cpu(&[0xC6, 0x01]);
    cpu.registers_mut().set8(Reg8::A, 0x0F);

    assert_eq!(cpu.step().unwrap(), 8);

    assert_eq!(cpu.registers().get8(Reg8::A), 0x10);
    assert_eq!(flags(&cpu), (false, false, true, false));
}

#[test]
fn test_add_overflow_to_zero() {
    // ADD A,B
    let mut cpu = setup_cpu(&[0x80]);
    cpu.registers_mut().set8(Reg8::A, 0xF0);
    cpu.registers_mut().set8(Reg8::B, 0x10);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, false, false, true));
}

#[test]
fn test_adc_single_pass_carry() {
    // ADC A,$0F with carry in: 0xF0 + 0x0F + 1 = 0x100.
    // The carry out of the combined sum must be reported even though
    // 0xF0 + 0x0F alone does not overflow.
    let mut cpu = setup_cpu(&[0xCE, 0x0F]);
    cpu.registers_mut().set8(Reg8::A, 0xF0);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, false, true, true));
}

#[test]
fn test_adc_without_carry_is_add() {
    // ADC A,C
    let mut cpu = setup_cpu(&[0x89]);
    cpu.registers_mut().set8(Reg8::A, 0x3A);
    cpu.registers_mut().set8(Reg8::C, 0xC6);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, false, true, true));
}

#[test]
fn test_add_from_hl_indirect() {
    // ADD A,(HL)
    let mut cpu = setup_cpu(&[0x86]);
    cpu.registers_mut().set_hl(0xC000);
    cpu.memory_mut().write(0xC000, 0x22);
    cpu.registers_mut().set8(Reg8::A, 0x11);

    assert_eq!(cpu.step().unwrap(), 8);
    assert_eq!(cpu.registers().get8(Reg8::A), 0x33);
}

// ========== SUB / SBC / CP ==========

#[test]
fn test_sub_borrow() {
    // SUB A,$01
    let mut cpu = setup_cpu(&[0xD6, 0x01]);
    cpu.registers_mut().set8(Reg8::A, 0x00);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0xFF);
    assert_eq!(flags(&cpu), (false, true, true, true));
}

#[test]
fn test_sub_self_is_zero() {
    // SUB A,A
    let mut cpu = setup_cpu(&[0x97]);
    cpu.registers_mut().set8(Reg8::A, 0x5D);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, true, false, false));
}

#[test]
fn test_sbc_single_pass_borrow() {
    // SBC A,$0F with carry in: 0x10 - 0x0F - 1 = 0x00
    let mut cpu = setup_cpu(&[0xDE, 0x0F]);
    cpu.registers_mut().set8(Reg8::A, 0x10);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, true, true, false));
}

#[test]
fn test_sbc_borrow_from_carry_only() {
    // SBC A,B with B = 0: the carry-in alone borrows
    let mut cpu = setup_cpu(&[0x98]);
    cpu.registers_mut().set8(Reg8::A, 0x00);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0xFF);
    assert_eq!(flags(&cpu), (false, true, true, true));
}

#[test]
fn test_cp_leaves_a() {
    // CP $40
    let mut cpu = setup_cpu(&[0xFE, 0x40]);
    cpu.registers_mut().set8(Reg8::A, 0x40);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x40);
    assert_eq!(flags(&cpu), (true, true, false, false));
}

// ========== Logic ==========

#[test]
fn test_and_sets_half_carry() {
    // AND $0F
    let mut cpu = setup_cpu(&[0xE6, 0x0F]);
    cpu.registers_mut().set8(Reg8::A, 0xF0);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, false, true, false));
}

#[test]
fn test_or_and_xor_clear_carry() {
    // OR B ; XOR A
    let mut cpu = setup_cpu(&[0xB0, 0xAF]);
    cpu.registers_mut().set8(Reg8::A, 0x0C);
    cpu.registers_mut().set8(Reg8::B, 0x30);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    cpu.step().unwrap();
    assert_eq!(cpu.registers().get8(Reg8::A), 0x3C);
    assert_eq!(flags(&cpu), (false, false, false, false));

    cpu.step().unwrap();
    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, false, false, false));
}

// ========== INC / DEC ==========

#[test]
fn test_inc_wraps_and_preserves_carry() {
    // INC B
    let mut cpu = setup_cpu(&[0x04]);
    cpu.registers_mut().set8(Reg8::B, 0xFF);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    assert_eq!(cpu.step().unwrap(), 4);

    assert_eq!(cpu.registers().get8(Reg8::B), 0x00);
    assert_eq!(flags(&cpu), (true, false, true, true));
}

#[test]
fn test_dec_half_borrow() {
    // DEC C
    let mut cpu = setup_cpu(&[0x0D]);
    cpu.registers_mut().set8(Reg8::C, 0x10);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::C), 0x0F);
    assert_eq!(flags(&cpu), (false, true, true, false));
}

#[test]
fn test_inc_hl_indirect() {
    // INC (HL)
    let mut cpu = setup_cpu(&[0x34]);
    cpu.registers_mut().set_hl(0xC000);
    cpu.memory_mut().write(0xC000, 0x41);

    assert_eq!(cpu.step().unwrap(), 12);
    assert_eq!(cpu.memory().read(0xC000), 0x42);
}

#[test]
fn test_inc_dec_pairs_without_flags() {
    // INC DE ; DEC BC ; INC SP
    let mut cpu = setup_cpu(&[0x13, 0x0B, 0x33]);
    cpu.registers_mut().split_into(0x00FF, Reg8::D, Reg8::E);
    cpu.registers_mut().split_into(0x0000, Reg8::B, Reg8::C);
    cpu.registers_mut().set8(Reg8::F, 0xF0);

    assert_eq!(cpu.step().unwrap(), 8);
    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().de(), 0x0100);
    assert_eq!(cpu.registers().bc(), 0xFFFF);
    assert_eq!(cpu.sp(), 0xFFFF);
    assert_eq!(cpu.registers().get8(Reg8::F), 0xF0);
}

// ========== 16-bit Arithmetic ==========

#[test]
fn test_add_hl_half_carry_from_bit_11() {
    // ADD HL,BC
    let mut cpu = setup_cpu(&[0x09]);
    cpu.registers_mut().set_hl(0x0FFF);
    cpu.registers_mut().split_into(0x0001, Reg8::B, Reg8::C);
    cpu.registers_mut().set_flag(Flag::Zero, true);

    assert_eq!(cpu.step().unwrap(), 8);

    assert_eq!(cpu.registers().hl(), 0x1000);
    // Z is left alone
    assert_eq!(flags(&cpu), (true, false, true, false));
}

#[test]
fn test_add_hl_carry_from_bit_15() {
    // ADD HL,HL
    let mut cpu = setup_cpu(&[0x29]);
    cpu.registers_mut().set_hl(0x8000);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().hl(), 0x0000);
    assert_eq!(flags(&cpu), (false, false, false, true));
}

#[test]
fn test_add_sp_negative_offset() {
    // ADD SP,-1. The immediate is a signed offset: SP decreases, it does
    // not grow by 0xFF as an unsigned read would make it.
    let mut cpu = setup_cpu(&[0xE8, 0xFF]);
    cpu.registers_mut().set16(libsm83::Reg16::Sp, 0xD000);

    assert_eq!(cpu.step().unwrap(), 16);

    assert_eq!(cpu.sp(), 0xCFFF);
    // H and C come from the unsigned low-byte add 0x00 + 0xFF
    assert_eq!(flags(&cpu), (false, false, false, false));
}

#[test]
fn test_add_sp_positive_offset_flags() {
    // ADD SP,+1 from 0x00FF: low byte 0xFF + 0x01 carries out of bits 3 and 7
    let mut cpu = setup_cpu(&[0xE8, 0x01]);
    cpu.registers_mut().set16(libsm83::Reg16::Sp, 0x00FF);
    cpu.registers_mut().set_flag(Flag::Zero, true);

    cpu.step().unwrap();

    assert_eq!(cpu.sp(), 0x0100);
    assert_eq!(flags(&cpu), (false, false, true, true));
}

#[test]
fn test_ld_hl_sp_negative_offset() {
    // LD HL,SP-2. Signed offset, SP itself unchanged.
    let mut cpu = setup_cpu(&[0xF8, 0xFE]);

    assert_eq!(cpu.step().unwrap(), 12);

    assert_eq!(cpu.registers().hl(), 0xFFFC);
    assert_eq!(cpu.sp(), 0xFFFE);
    // 0xFE + 0xFE carries out of bits 3 and 7
    assert_eq!(flags(&cpu), (false, false, true, true));
}

// ========== Accumulator Adjust ==========

#[test]
fn test_daa_after_add() {
    // ADD A,$27 ; DAA  (15 + 27 = 42 in BCD)
    let mut cpu = setup_cpu(&[0xC6, 0x27, 0x27]);
    cpu.registers_mut().set8(Reg8::A, 0x15);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x42);
    assert!(!cpu.registers().flag(Flag::Carry));
}

#[test]
fn test_daa_decimal_carry() {
    // ADD A,$01 ; DAA  (99 + 1 = 00 carry 1)
    let mut cpu = setup_cpu(&[0xC6, 0x01, 0x27]);
    cpu.registers_mut().set8(Reg8::A, 0x99);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x00);
    assert_eq!(flags(&cpu), (true, false, false, true));
}

#[test]
fn test_daa_after_sub() {
    // SUB A,$01 ; DAA  (20 - 1 = 19 in BCD)
    let mut cpu = setup_cpu(&[0xD6, 0x01, 0x27]);
    cpu.registers_mut().set8(Reg8::A, 0x20);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.registers().get8(Reg8::A), 0x19);
    assert_eq!(flags(&cpu), (false, true, false, false));
}

#[test]
fn test_cpl_scf_ccf() {
    // CPL ; SCF ; CCF
    let mut cpu = setup_cpu(&[0x2F, 0x37, 0x3F]);
    cpu.registers_mut().set8(Reg8::A, 0x35);

    cpu.step().unwrap();
    assert_eq!(cpu.registers().get8(Reg8::A), 0xCA);
    assert_eq!(flags(&cpu), (false, true, true, false));

    cpu.step().unwrap();
    assert_eq!(flags(&cpu), (false, false, false, true));

    cpu.step().unwrap();
    assert_eq!(flags(&cpu), (false, false, false, false));
}
