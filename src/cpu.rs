//! # Instruction Engine
//!
//! This module contains the [`Cpu`] struct: the SM83 register file, its
//! memory bus, and the fetch-decode-execute pipeline driven one machine
//! cycle at a time.
//!
//! ## Execution Model
//!
//! The engine is a two-state machine over a "cycles remaining" counter:
//!
//! - **Fetching** (counter == 0): the next [`tick`](Cpu::tick) fetches,
//!   decodes and executes a whole instruction, then sets the counter to the
//!   instruction's cost in machine cycles.
//! - **Busy** (counter > 0): a tick only decrements the counter.
//!
//! An instruction costing N machine cycles leaves the counter at N after
//! its fetch tick, so the next fetch happens on tick N+2.
//! [`step`](Cpu::step) runs one whole instruction regardless of the
//! counter, for tests and tools.
//!
//! ## Interrupts
//!
//! At each instruction boundary the engine checks `IE & IF` (0xFFFF and
//! 0xFF0F). A pending request wakes HALT; with IME set the lowest pending
//! source is serviced: PC pushed, IF bit cleared, IME cleared, jump to
//! `0x40 + 8 * bit`, five machine cycles.
//!
//! ## Faults
//!
//! An unpopulated opcode is fatal. The engine records the fault, leaves the
//! registers exactly as they were before the fetch, and returns the same
//! error from every later tick.

use crate::disassembler::{decoder, formatter};
use crate::opcodes::{
    self, OpcodeSpace, BASE_TABLE, CYCLES_PER_MACHINE_CYCLE, MAX_OPERAND_BYTES,
};
use crate::registers::{Reg16, Registers};
use crate::scheduler::HardwareUnit;
use crate::{ExecutionError, MemoryBus};

/// Interrupt enable register address.
pub const IE_ADDRESS: u16 = 0xFFFF;

/// Interrupt request register address.
pub const IF_ADDRESS: u16 = 0xFF0F;

/// Interrupt sources in priority order (bit index in IE/IF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Address the handler is dispatched to.
    pub const fn vector(self) -> u16 {
        0x40 + 8 * (self as u16)
    }

    fn highest_priority(pending: u8) -> Option<Self> {
        [
            Interrupt::VBlank,
            Interrupt::LcdStat,
            Interrupt::Timer,
            Interrupt::Serial,
            Interrupt::Joypad,
        ]
        .into_iter()
        .find(|source| pending & source.mask() != 0)
    }
}

/// Machine cycles spent dispatching an interrupt.
const INTERRUPT_MACHINE_CYCLES: u32 = 5;

/// Clock divisor the engine declares to the scheduler.
pub const CPU_CLOCK_DIVISOR: u8 = 4;

/// Power-on register values.
///
/// The default leaves every register zero. [`EngineConfig::post_boot`]
/// matches the state the boot ROM hands over to a cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Initial program counter
    pub entry_point: u16,
    /// Initial stack pointer
    pub stack_pointer: u16,
}

impl EngineConfig {
    /// PC 0x0100, SP 0xFFFE.
    pub fn post_boot() -> Self {
        Self {
            entry_point: 0x0100,
            stack_pointer: 0xFFFE,
        }
    }

    pub fn with_entry_point(mut self, entry_point: u16) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn with_stack_pointer(mut self, stack_pointer: u16) -> Self {
        self.stack_pointer = stack_pointer;
        self
    }
}

/// Engine timing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Next tick fetches an instruction
    Fetching,
    /// Paying down the given number of machine cycles
    Busy(u32),
}

/// SM83 instruction engine.
///
/// Generic over the memory implementation via the `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use libsm83::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write_range(0x0000, &[0x3E, 0x42]); // LD A,$42
///
/// let mut cpu = Cpu::new(memory);
/// cpu.tick().unwrap(); // fetch + execute
/// assert_eq!(cpu.registers().get8(libsm83::Reg8::A), 0x42);
/// assert_eq!(cpu.cycles_remaining(), 2); // cost of LD A,d8 still owed
///
/// cpu.tick().unwrap();
/// cpu.tick().unwrap();
/// assert!(!cpu.is_busy());
/// assert_eq!(cpu.cycles(), 8);
/// ```
pub struct Cpu<M: MemoryBus> {
    registers: Registers,
    memory: M,
    cycles_remaining: u32,
    cycles: u64,
    fault: Option<ExecutionError>,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates an engine with all registers zeroed.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, EngineConfig::default())
    }

    /// Creates an engine with the given power-on PC and SP.
    pub fn with_config(memory: M, config: EngineConfig) -> Self {
        let mut registers = Registers::new();
        registers.set16(Reg16::Pc, config.entry_point);
        registers.set16(Reg16::Sp, config.stack_pointer);

        Self {
            registers,
            memory,
            cycles_remaining: 0,
            cycles: 0,
            fault: None,
        }
    }

    /// Advances the engine by one machine cycle.
    ///
    /// # Errors
    ///
    /// Returns the engine's fault when the instruction fetched on this tick
    /// (or on any earlier tick) could not be decoded.
    pub fn tick(&mut self) -> Result<(), ExecutionError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if self.cycles_remaining > 0 {
            self.cycles_remaining -= 1;
            return Ok(());
        }

        let machine_cycles = self.execute_next()?;
        self.cycles_remaining = machine_cycles;
        Ok(())
    }

    /// Runs one whole instruction (or interrupt dispatch, or idle cycle).
    ///
    /// Any outstanding wait is dropped first. Returns the clock cycles the
    /// instruction cost.
    pub fn step(&mut self) -> Result<u32, ExecutionError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        self.cycles_remaining = 0;
        let machine_cycles = self.execute_next()?;
        Ok(machine_cycles * CYCLES_PER_MACHINE_CYCLE as u32)
    }

    /// Runs instructions until at least `cycle_budget` clock cycles elapsed.
    ///
    /// Returns the cycles actually consumed (may overshoot by one
    /// instruction).
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, ExecutionError> {
        let start = self.cycles;
        while self.cycles - start < cycle_budget {
            self.step()?;
        }
        Ok(self.cycles - start)
    }

    fn execute_next(&mut self) -> Result<u32, ExecutionError> {
        let checkpoint = self.registers.clone();
        let machine_cycles = match self.dispatch() {
            Ok(machine_cycles) => machine_cycles,
            Err(err) => {
                // Undo the boundary bookkeeping (EI delay, HALT wake) too.
                self.registers = checkpoint;
                log::error!("engine fault: {}", err);
                self.fault = Some(err.clone());
                return Err(err);
            }
        };
        self.cycles += machine_cycles as u64 * CYCLES_PER_MACHINE_CYCLE as u64;
        Ok(machine_cycles)
    }

    fn dispatch(&mut self) -> Result<u32, ExecutionError> {
        self.registers.tick_ime_delay();

        let pending = self.memory.read(IE_ADDRESS) & self.memory.read(IF_ADDRESS) & 0x1F;
        if self.registers.stopped() {
            if pending & Interrupt::Joypad.mask() == 0 {
                return Ok(1);
            }
            self.registers.set_stopped(false);
        }
        if self.registers.halted() {
            if pending == 0 {
                return Ok(1);
            }
            self.registers.set_halted(false);
        }
        if self.registers.ime() {
            if let Some(source) = Interrupt::highest_priority(pending) {
                self.service_interrupt(source);
                return Ok(INTERRUPT_MACHINE_CYCLES);
            }
        }

        self.execute_instruction()
    }

    fn service_interrupt(&mut self, source: Interrupt) {
        log::debug!(
            "servicing {:?} interrupt from PC=0x{:04X}",
            source,
            self.registers.pc()
        );
        self.registers.set_ime(false);
        let requested = self.memory.read(IF_ADDRESS);
        self.memory.write(IF_ADDRESS, requested & !source.mask());

        let ret = self.registers.pc();
        crate::instructions::push16(&mut self.registers, &mut self.memory, ret);
        self.registers.set16(Reg16::Pc, source.vector());
    }

    fn execute_instruction(&mut self) -> Result<u32, ExecutionError> {
        let pc = self.registers.pc();
        let opcode = self.memory.read(pc);

        // Resolve the descriptor before touching PC so a bad opcode leaves
        // the registers as they were.
        let (space, code, prefix_len, table) = match opcodes::extension(opcode) {
            Some(table) => (OpcodeSpace::Extended, self.memory.read(pc.wrapping_add(1)), 2u16, table),
            None => (OpcodeSpace::Base, opcode, 1u16, &BASE_TABLE),
        };
        let descriptor = table[code as usize].ok_or(ExecutionError::InvalidOpcode {
            space,
            opcode: code,
            pc,
        })?;

        if descriptor.operand_bytes > MAX_OPERAND_BYTES {
            return Err(ExecutionError::MalformedOperandFetch {
                opcode: code,
                pc,
                declared: descriptor.operand_bytes,
                window: MAX_OPERAND_BYTES,
            });
        }

        if log::log_enabled!(log::Level::Trace) {
            self.trace_instruction(pc);
        }

        let count = descriptor.operand_bytes as usize;
        let mut operands = [0u8; MAX_OPERAND_BYTES as usize];
        let operand_start = pc.wrapping_add(prefix_len);
        for (offset, slot) in operands.iter_mut().take(count).enumerate() {
            *slot = self.memory.read(operand_start.wrapping_add(offset as u16));
        }
        self.registers
            .word(Reg16::Pc)
            .add(prefix_len + descriptor.operand_bytes as u16);

        let flow = (descriptor.execute)(&mut self.registers, &mut self.memory, &operands[..count]);
        Ok((descriptor.cycles_for(flow) / CYCLES_PER_MACHINE_CYCLE) as u32)
    }

    fn trace_instruction(&self, pc: u16) {
        let window = [
            self.memory.read(pc),
            self.memory.read(pc.wrapping_add(1)),
            self.memory.read(pc.wrapping_add(2)),
        ];
        if let Some(instruction) = decoder::decode_instruction(&window, pc) {
            log::trace!("{:04X}  {}", pc, formatter::format_instruction(&instruction));
        }
    }

    // ========== State Inspection ==========

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc()
    }

    pub fn sp(&self) -> u16 {
        self.registers.sp()
    }

    /// Machine cycles still owed by the current instruction.
    pub fn cycles_remaining(&self) -> u32 {
        self.cycles_remaining
    }

    pub fn state(&self) -> EngineState {
        match self.cycles_remaining {
            0 => EngineState::Fetching,
            n => EngineState::Busy(n),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.cycles_remaining > 0
    }

    /// Total clock cycles consumed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The fault that stopped the engine, if any.
    pub fn fault(&self) -> Option<&ExecutionError> {
        self.fault.as_ref()
    }

    /// Requests an interrupt by setting its IF bit.
    pub fn request_interrupt(&mut self, source: Interrupt) {
        let requested = self.memory.read(IF_ADDRESS);
        self.memory.write(IF_ADDRESS, requested | source.mask());
    }
}

impl<M: MemoryBus + Send + 'static> HardwareUnit for Cpu<M> {
    fn name(&self) -> &str {
        "cpu"
    }

    fn clock_divisor(&self) -> u8 {
        CPU_CLOCK_DIVISOR
    }

    fn tick(&mut self) -> Result<(), ExecutionError> {
        Cpu::tick(self)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
