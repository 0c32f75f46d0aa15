//! WASM API for the SM83 emulator.
//!
//! Provides JavaScript-callable interfaces for engine control, state
//! inspection and disassembly.

use crate::disassembler::formatter;
use crate::{disassemble, Cpu, EngineConfig, Flag, FlatMemory, MemoryBus, Reg16, Reg8};
use wasm_bindgen::prelude::*;

/// Longest SM83 instruction in bytes.
const MAX_INSTRUCTION_BYTES: usize = 3;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<crate::ExecutionError> for JsError {
    fn from(err: crate::ExecutionError) -> Self {
        JsError::new(&err.to_string())
    }
}

/// One line of disassembly
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u16,
    bytes: Vec<u8>,
    text: String,
    cycles: u8,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u16 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> u8 {
        self.cycles
    }
}

/// Main emulator interface for JavaScript
///
/// Drives a single engine over flat memory; the scheduler and placeholder
/// units are not exposed.
#[wasm_bindgen]
pub struct WasmEmulator {
    cpu: Cpu<FlatMemory>,
    program_start: u16,
    program_end: u16,
}

#[wasm_bindgen]
impl WasmEmulator {
    /// Create an engine in the post-boot state (PC 0x0100, SP 0xFFFE)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        WasmEmulator {
            cpu: Cpu::with_config(FlatMemory::new(), EngineConfig::post_boot()),
            program_start: 0x0100,
            program_end: 0x0100,
        }
    }

    /// Execute a single instruction, returning its clock cycles
    pub fn step(&mut self) -> Result<u32, JsError> {
        Ok(self.cpu.step()?)
    }

    /// Advance one machine cycle
    pub fn tick(&mut self) -> Result<(), JsError> {
        Ok(self.cpu.tick()?)
    }

    /// Execute instructions for at least `cycles` clock cycles
    pub fn run_for_cycles(&mut self, cycles: u32) -> Result<u32, JsError> {
        Ok(self.cpu.run_for_cycles(cycles as u64)? as u32)
    }

    /// Reset registers, keeping memory contents
    pub fn reset(&mut self) {
        let memory = std::mem::take(self.cpu.memory_mut());
        let config = EngineConfig::post_boot().with_entry_point(self.program_start);
        self.cpu = Cpu::with_config(memory, config);
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.registers().get8(Reg8::A)
    }

    #[wasm_bindgen(getter)]
    pub fn f(&self) -> u8 {
        self.cpu.registers().get8(Reg8::F)
    }

    #[wasm_bindgen(getter)]
    pub fn bc(&self) -> u16 {
        self.cpu.registers().bc()
    }

    #[wasm_bindgen(getter)]
    pub fn de(&self) -> u16 {
        self.cpu.registers().de()
    }

    #[wasm_bindgen(getter)]
    pub fn hl(&self) -> u16 {
        self.cpu.registers().hl()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.cpu.cycles() as f64 // u64 does not cross the boundary
    }

    #[wasm_bindgen(getter)]
    pub fn ime(&self) -> bool {
        self.cpu.registers().ime()
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.cpu.registers().halted()
    }

    // Flag getters
    #[wasm_bindgen(getter)]
    pub fn flag_z(&self) -> bool {
        self.cpu.registers().flag(Flag::Zero)
    }

    #[wasm_bindgen(getter)]
    pub fn flag_n(&self) -> bool {
        self.cpu.registers().flag(Flag::Subtract)
    }

    #[wasm_bindgen(getter)]
    pub fn flag_h(&self) -> bool {
        self.cpu.registers().flag(Flag::HalfCarry)
    }

    #[wasm_bindgen(getter)]
    pub fn flag_c(&self) -> bool {
        self.cpu.registers().flag(Flag::Carry)
    }

    /// Set the program counter
    pub fn set_pc(&mut self, addr: u16) {
        self.cpu.registers_mut().set16(Reg16::Pc, addr);
    }

    // Memory access methods

    pub fn read_memory(&self, addr: u16) -> u8 {
        self.cpu.memory().read(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.cpu.memory_mut().write(addr, value);
    }

    /// Read a 256-byte page from memory (for efficient display)
    pub fn get_memory_page(&self, page: u8) -> js_sys::Uint8Array {
        let start = (page as u16) << 8;
        let bytes: Vec<u8> = (0..=0xFFu16)
            .map(|i| self.cpu.memory().read(start.wrapping_add(i)))
            .collect();
        js_sys::Uint8Array::from(bytes.as_slice())
    }

    /// Load a program into memory and set PC
    pub fn load_program(&mut self, program: &[u8], start_addr: u16) {
        self.cpu.memory_mut().write_range(start_addr, program);
        self.set_pc(start_addr);
        self.program_start = start_addr;
        self.program_end = start_addr.wrapping_add(program.len() as u16);
    }

    /// Disassemble memory starting at an address
    pub fn disassemble(&self, start_addr: u16, num_instructions: u32) -> Vec<JsValue> {
        let window_len = num_instructions as usize * MAX_INSTRUCTION_BYTES;
        let window: Vec<u8> = (0..window_len)
            .map(|i| self.cpu.memory().read(start_addr.wrapping_add(i as u16)))
            .collect();

        disassemble(&window, start_addr)
            .iter()
            .take(num_instructions as usize)
            .map(|instr| {
                let line = DisassemblyLine {
                    address: instr.address,
                    bytes: (0..instr.size_bytes as u16)
                        .map(|i| self.cpu.memory().read(instr.address.wrapping_add(i)))
                        .collect(),
                    text: formatter::format_instruction(instr),
                    cycles: instr.cycles,
                };
                JsValue::from(line)
            })
            .collect()
    }

    #[wasm_bindgen(getter)]
    pub fn program_start(&self) -> u16 {
        self.program_start
    }

    #[wasm_bindgen(getter)]
    pub fn program_end(&self) -> u16 {
        self.program_end
    }
}

impl Default for WasmEmulator {
    fn default() -> Self {
        Self::new()
    }
}
