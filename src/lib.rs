//! # SM83 CPU Emulator Core
//!
//! A machine-cycle-granular emulator of the SM83 (LR35902) processor found
//! in the classic 8-bit handheld, plus the clock scheduler that keeps it in
//! lock-step with the other hardware units on a shared bus.
//!
//! ## Quick Start
//!
//! ```rust
//! use libsm83::{Cpu, FlatMemory, MemoryBus, Reg8};
//!
//! let mut memory = FlatMemory::new();
//! // LD B,$05 ; DEC B
//! memory.write_range(0x0000, &[0x06, 0x05, 0x05]);
//!
//! let mut cpu = Cpu::new(memory);
//! cpu.step().unwrap();
//! cpu.step().unwrap();
//!
//! assert_eq!(cpu.registers().get8(Reg8::B), 0x04);
//! assert_eq!(cpu.pc(), 0x0003);
//! ```
//!
//! ## Architecture
//!
//! - **Register File**: eight 8-bit registers, PC and SP, flag accessors and
//!   ALU primitives that report carry, half-carry and zero
//! - **Memory Bus**: the `MemoryBus` trait, a single-owner `FlatMemory` and
//!   the scheduler-shared `SharedMemory`
//! - **Table-Driven Design**: 512 opcode descriptors built at compile time
//! - **Instruction Engine**: `Fetching`/`Busy` state machine, one machine
//!   cycle per tick
//! - **Clock Scheduler**: fork-join dispatch of every hardware unit whose
//!   clock divisor matches the current sub-cycle
//!
//! ## Modules
//!
//! - `registers` - Register file and arithmetic primitives
//! - `memory` - MemoryBus trait and implementations
//! - `opcodes` - Base and extended opcode tables
//! - `cpu` - Instruction engine
//! - `scheduler` - HardwareUnit trait and clock scheduler
//! - `units` - Placeholder graphics and audio units
//! - `emulator` - Engine, units and shared bus wired together
//! - `disassembler` - Machine code to mnemonic text

pub mod cpu;
pub mod disassembler;
pub mod emulator;
pub mod memory;
pub mod opcodes;
pub mod registers;
pub mod scheduler;
pub mod units;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use cpu::{Cpu, EngineConfig, EngineState, Interrupt};
pub use disassembler::{disassemble, Instruction};
pub use emulator::{Emulator, EmulatorConfig};
pub use memory::{FlatMemory, MemoryBus, SharedMemory};
pub use opcodes::{OpcodeDescriptor, OpcodeSpace, BASE_TABLE, EXTENDED_TABLE};
pub use registers::{Flag, Reg16, Reg8, Registers};
pub use scheduler::{ClockScheduler, HardwareUnit, SchedulerConfig, SchedulerError};
pub use units::{AudioUnit, GraphicsUnit};

/// Errors that stop the instruction engine.
///
/// Both kinds are fatal to the unit that raised them: the engine keeps
/// returning the same error and the scheduler excludes the unit from later
/// sub-cycles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The fetched opcode has no entry in its table.
    #[error("invalid {space} opcode 0x{opcode:02X} at 0x{pc:04X}")]
    InvalidOpcode {
        /// Table the opcode was looked up in
        space: OpcodeSpace,
        /// The unpopulated opcode byte
        opcode: u8,
        /// Address of the instruction's first byte
        pc: u16,
    },

    /// A descriptor declares more operand bytes than an instruction can hold.
    #[error("opcode 0x{opcode:02X} at 0x{pc:04X} declares {declared} operand bytes, window is {window}")]
    MalformedOperandFetch {
        opcode: u8,
        pc: u16,
        declared: u8,
        window: u8,
    },
}
