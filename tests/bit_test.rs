//! Tests for the extended BIT, RES and SET instructions.
//!
//! Tests cover:
//! - BIT setting Z from the complement of the tested bit, N=0, H=1
//! - BIT never touching Carry
//! - RES/SET touching only their bit and never any flag
//! - (HL) forms and their cycle costs

use libsm83::{Cpu, EngineConfig, Flag, FlatMemory, MemoryBus, Reg8};

/// Helper function to create an engine at the post-boot entry point 0x0100
fn setup_cpu(program: &[u8]) -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write_range(0x0100, program);
    Cpu::with_config(memory, EngineConfig::post_boot())
}

/// Extended opcode for an operation row, bit number and operand code.
fn cb(row: u8, bit: u8, operand: u8) -> [u8; 2] {
    [0xCB, row | (bit << 3) | operand]
}

const BIT: u8 = 0x40;
const RES: u8 = 0x80;
const SET: u8 = 0xC0;

/// Operand code for B, C, D, E, H, L, A (6 is (HL))
const REGISTER_CODES: [(u8, Reg8); 7] = [
    (0, Reg8::B),
    (1, Reg8::C),
    (2, Reg8::D),
    (3, Reg8::E),
    (4, Reg8::H),
    (5, Reg8::L),
    (7, Reg8::A),
];

// ========== BIT ==========

#[test]
fn test_bit_sets_zero_when_clear() {
    // BIT 7,H
    let mut cpu = setup_cpu(&cb(BIT, 7, 4));
    cpu.registers_mut().set8(Reg8::H, 0x7F);

    assert_eq!(cpu.step().unwrap(), 8);

    assert!(cpu.registers().flag(Flag::Zero));
    assert!(!cpu.registers().flag(Flag::Subtract));
    assert!(cpu.registers().flag(Flag::HalfCarry));
    assert_eq!(cpu.registers().get8(Reg8::H), 0x7F);
}

#[test]
fn test_bit_clears_zero_when_set() {
    // BIT 0,A
    let mut cpu = setup_cpu(&cb(BIT, 0, 7));
    cpu.registers_mut().set8(Reg8::A, 0x01);
    cpu.registers_mut().set_flag(Flag::Zero, true);

    cpu.step().unwrap();

    assert!(!cpu.registers().flag(Flag::Zero));
}

#[test]
fn test_bit_never_touches_carry() {
    for bit in 0..8 {
        for (code, reg) in REGISTER_CODES {
            for carry in [false, true] {
                let mut cpu = setup_cpu(&cb(BIT, bit, code));
                cpu.registers_mut().set8(reg, 0xA5);
                cpu.registers_mut().set_flag(Flag::Carry, carry);

                cpu.step().unwrap();

                assert_eq!(
                    cpu.registers().flag(Flag::Carry),
                    carry,
                    "BIT {},{}",
                    bit,
                    reg.name()
                );
                assert_eq!(cpu.registers().flag(Flag::Zero), 0xA5 & (1 << bit) == 0);
            }
        }
    }
}

#[test]
fn test_bit_hl_indirect() {
    // BIT 3,(HL)
    let mut cpu = setup_cpu(&cb(BIT, 3, 6));
    cpu.registers_mut().set_hl(0xC000);
    cpu.memory_mut().write(0xC000, 0x08);

    assert_eq!(cpu.step().unwrap(), 12);
    assert!(!cpu.registers().flag(Flag::Zero));
}

// ========== RES / SET ==========

#[test]
fn test_res_clears_only_its_bit() {
    // RES 4,C
    let mut cpu = setup_cpu(&cb(RES, 4, 1));
    cpu.registers_mut().set8(Reg8::C, 0xFF);

    assert_eq!(cpu.step().unwrap(), 8);
    assert_eq!(cpu.registers().get8(Reg8::C), 0xEF);
}

#[test]
fn test_set_sets_only_its_bit() {
    // SET 1,E
    let mut cpu = setup_cpu(&cb(SET, 1, 3));
    cpu.registers_mut().set8(Reg8::E, 0x00);

    cpu.step().unwrap();
    assert_eq!(cpu.registers().get8(Reg8::E), 0x02);
}

#[test]
fn test_res_set_never_touch_flags() {
    for row in [RES, SET] {
        for bit in 0..8 {
            for (code, reg) in REGISTER_CODES {
                for flags in [0x00, 0xF0, 0xA0, 0x50] {
                    let mut cpu = setup_cpu(&cb(row, bit, code));
                    cpu.registers_mut().set8(reg, 0x5A);
                    cpu.registers_mut().set8(Reg8::F, flags);

                    cpu.step().unwrap();

                    assert_eq!(cpu.registers().get8(Reg8::F), flags);
                    let expected = if row == SET {
                        0x5A | (1 << bit)
                    } else {
                        0x5A & !(1 << bit)
                    };
                    assert_eq!(cpu.registers().get8(reg), expected);
                }
            }
        }
    }
}

#[test]
fn test_set_res_hl_indirect() {
    // SET 7,(HL) ; RES 0,(HL)
    let [p0, op0] = cb(SET, 7, 6);
    let [p1, op1] = cb(RES, 0, 6);
    let mut cpu = setup_cpu(&[p0, op0, p1, op1]);
    cpu.registers_mut().set_hl(0xC000);
    cpu.memory_mut().write(0xC000, 0x01);

    assert_eq!(cpu.step().unwrap(), 16);
    assert_eq!(cpu.memory().read(0xC000), 0x81);

    assert_eq!(cpu.step().unwrap(), 16);
    assert_eq!(cpu.memory().read(0xC000), 0x80);
}
