//! Tests for processor control and interrupt handling.
//!
//! Tests cover:
//! - NOP, HALT, STOP
//! - DI immediately, EI after one more instruction
//! - Interrupt dispatch: vector, priority, IF acknowledge, IME clear, timing
//! - HALT waking on IE & IF even with IME clear

use libsm83::cpu::{IE_ADDRESS, IF_ADDRESS};
use libsm83::{Cpu, EngineConfig, FlatMemory, Interrupt, MemoryBus};

/// Helper function to create an engine at the post-boot entry point 0x0100
fn setup_cpu(program: &[u8]) -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write_range(0x0100, program);
    Cpu::with_config(memory, EngineConfig::post_boot())
}

#[test]
fn test_nop() {
    let mut cpu = setup_cpu(&[0x00]);
    let before = cpu.registers().clone();

    assert_eq!(cpu.step().unwrap(), 4);

    assert_eq!(cpu.pc(), 0x0101);
    let mut expected = before;
    expected.set16(libsm83::Reg16::Pc, 0x0101);
    assert_eq!(cpu.registers(), &expected);
}

// ========== IME ==========

#[test]
fn test_di_is_immediate() {
    let mut cpu = setup_cpu(&[0xF3]);
    cpu.registers_mut().set_ime(true);

    cpu.step().unwrap();

    assert!(!cpu.registers().ime());
}

#[test]
fn test_ei_is_delayed_one_instruction() {
    // EI ; NOP ; NOP
    let mut cpu = setup_cpu(&[0xFB, 0x00, 0x00]);

    cpu.step().unwrap();
    assert!(!cpu.registers().ime());

    // IME turns on at the boundary after the next instruction
    cpu.step().unwrap();
    cpu.step().unwrap();
    assert!(cpu.registers().ime());
}

#[test]
fn test_di_cancels_pending_ei() {
    // EI ; DI ; NOP
    let mut cpu = setup_cpu(&[0xFB, 0xF3, 0x00]);

    for _ in 0..3 {
        cpu.step().unwrap();
    }

    assert!(!cpu.registers().ime());
}

// ========== Interrupt Dispatch ==========

#[test]
fn test_interrupt_vectors() {
    for (source, vector) in [
        (Interrupt::VBlank, 0x40),
        (Interrupt::LcdStat, 0x48),
        (Interrupt::Timer, 0x50),
        (Interrupt::Serial, 0x58),
        (Interrupt::Joypad, 0x60),
    ] {
        let mut cpu = setup_cpu(&[0x00]);
        cpu.registers_mut().set_ime(true);
        cpu.memory_mut().write(IE_ADDRESS, 0x1F);
        cpu.request_interrupt(source);

        assert_eq!(cpu.step().unwrap(), 20);

        assert_eq!(cpu.pc(), vector);
        assert_eq!(cpu.sp(), 0xFFFC);
        assert_eq!(cpu.memory().read(0xFFFD), 0x01);
        assert_eq!(cpu.memory().read(0xFFFC), 0x00);
        assert_eq!(cpu.memory().read(IF_ADDRESS), 0x00);
        assert!(!cpu.registers().ime());
    }
}

#[test]
fn test_interrupt_priority_and_masking() {
    let mut cpu = setup_cpu(&[0x00]);
    cpu.registers_mut().set_ime(true);
    // VBlank requested but not enabled; Timer and Joypad both enabled
    cpu.memory_mut().write(IE_ADDRESS, Interrupt::Timer.mask() | Interrupt::Joypad.mask());
    cpu.request_interrupt(Interrupt::VBlank);
    cpu.request_interrupt(Interrupt::Joypad);
    cpu.request_interrupt(Interrupt::Timer);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), Interrupt::Timer.vector());
    assert_eq!(
        cpu.memory().read(IF_ADDRESS),
        Interrupt::VBlank.mask() | Interrupt::Joypad.mask()
    );
}

#[test]
fn test_no_dispatch_with_ime_clear() {
    let mut cpu = setup_cpu(&[0x00]);
    cpu.memory_mut().write(IE_ADDRESS, 0x1F);
    cpu.request_interrupt(Interrupt::VBlank);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.pc(), 0x0101);
}

#[test]
fn test_handler_reti_returns() {
    let mut cpu = setup_cpu(&[0x00, 0x00]);
    cpu.memory_mut().write(0x0050, 0xD9); // RETI
    cpu.registers_mut().set_ime(true);
    cpu.memory_mut().write(IE_ADDRESS, Interrupt::Timer.mask());
    cpu.request_interrupt(Interrupt::Timer);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x0050);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x0100);
    assert!(cpu.registers().ime());
}

// ========== HALT / STOP ==========

#[test]
fn test_halt_idles_until_request() {
    // HALT ; INC A
    let mut cpu = setup_cpu(&[0x76, 0x3C]);
    cpu.memory_mut().write(IE_ADDRESS, Interrupt::Serial.mask());

    assert_eq!(cpu.step().unwrap(), 4);
    assert!(cpu.registers().halted());

    for _ in 0..5 {
        assert_eq!(cpu.step().unwrap(), 4);
        assert_eq!(cpu.pc(), 0x0101);
    }

    cpu.request_interrupt(Interrupt::Serial);
    cpu.step().unwrap();

    assert!(!cpu.registers().halted());
    // IME clear: execution continues after HALT
    assert_eq!(cpu.registers().get8(libsm83::Reg8::A), 0x01);
    assert_eq!(cpu.pc(), 0x0102);
}

#[test]
fn test_halt_with_ime_services_interrupt() {
    let mut cpu = setup_cpu(&[0x76, 0x00]);
    cpu.registers_mut().set_ime(true);
    cpu.memory_mut().write(IE_ADDRESS, Interrupt::VBlank.mask());

    cpu.step().unwrap();
    cpu.request_interrupt(Interrupt::VBlank);
    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x0040);
    // Return address is the instruction after HALT
    assert_eq!(cpu.memory().read(0xFFFC), 0x01);
}

#[test]
fn test_stop_consumes_padding_byte() {
    let mut cpu = setup_cpu(&[0x10, 0x00, 0x00]);

    assert_eq!(cpu.step().unwrap(), 4);

    assert_eq!(cpu.pc(), 0x0102);
    assert!(cpu.registers().stopped());
}

#[test]
fn test_stop_ignores_non_joypad_requests() {
    let mut cpu = setup_cpu(&[0x10, 0x00, 0x00]);
    cpu.memory_mut().write(IE_ADDRESS, 0x1F);

    cpu.step().unwrap();
    cpu.request_interrupt(Interrupt::VBlank);
    cpu.step().unwrap();
    assert!(cpu.registers().stopped());

    cpu.request_interrupt(Interrupt::Joypad);
    cpu.step().unwrap();
    assert!(!cpu.registers().stopped());
}
