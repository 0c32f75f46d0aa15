//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the engine from a
//! specific memory implementation, plus two 64KB implementations:
//!
//! - [`FlatMemory`]: a single owned RAM array, for tests and single-unit use
//! - [`SharedMemory`]: a cloneable handle to one byte array shared by every
//!   hardware unit the scheduler drives
//!
//! ## Design Principles
//!
//! - No bus errors: reads and writes always succeed
//! - Addresses are 16 bits; `write_range` wraps past 0xFFFF
//! - No ordering or locking policy of its own. Units sharing a bus rely on
//!   the scheduler's end-of-sub-cycle barrier to see settled values.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Size of the SM83 address space.
pub const ADDRESS_SPACE: usize = 0x1_0000;

/// Memory bus trait for the engine to read/write bytes.
///
/// # Examples
///
/// ```
/// use libsm83::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0xC000, 0x42);
/// assert_eq!(mem.read(0xC000), 0x42);
///
/// mem.write_range(0x0100, &[0x00, 0xC3, 0x50, 0x01]);
/// assert_eq!(mem.read(0x0101), 0xC3);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// Must never panic; unmapped addresses may return any value.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// Must never panic; read-only or unmapped addresses may ignore the write.
    fn write(&mut self, addr: u16, value: u8);

    /// Writes `bytes` starting at `start`, wrapping past 0xFFFF.
    ///
    /// Used once at power-on to install a boot image.
    fn write_range(&mut self, start: u16, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.write(start.wrapping_add(offset as u16), byte);
        }
    }
}

/// Simple 64KB flat memory implementation.
///
/// All addresses (0x0000-0xFFFF) are writable RAM initialized to 0x00.
pub struct FlatMemory {
    data: Box<[u8; ADDRESS_SPACE]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; ADDRESS_SPACE]),
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

/// 64KB memory shared between hardware units.
///
/// Cloning yields another handle to the same bytes. Each cell is an atomic
/// byte accessed with relaxed ordering, so units ticking in parallel never
/// race in the language sense, yet no unit waits on another. Visibility of
/// one sub-cycle's writes in the next comes from the scheduler's join.
///
/// # Examples
///
/// ```
/// use libsm83::{MemoryBus, SharedMemory};
///
/// let mut a = SharedMemory::new();
/// let b = a.clone();
/// a.write(0xFF80, 0x99);
/// assert_eq!(b.read(0xFF80), 0x99);
/// ```
#[derive(Clone)]
pub struct SharedMemory {
    cells: Arc<[AtomicU8]>,
}

impl SharedMemory {
    /// Creates a zeroed 64KB shared memory.
    pub fn new() -> Self {
        Self {
            cells: (0..ADDRESS_SPACE).map(|_| AtomicU8::new(0)).collect(),
        }
    }

    /// Copies out a 256-byte page, for inspection.
    pub fn page(&self, page: u8) -> Vec<u8> {
        let start = (page as usize) << 8;
        self.cells[start..start + 0x100]
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect()
    }
}

impl Default for SharedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMemory")
            .field("handles", &Arc::strong_count(&self.cells))
            .finish()
    }
}

impl MemoryBus for SharedMemory {
    fn read(&self, addr: u16) -> u8 {
        self.cells[addr as usize].load(Ordering::Relaxed)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.cells[addr as usize].store(value, Ordering::Relaxed);
    }
}
