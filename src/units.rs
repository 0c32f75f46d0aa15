//! Placeholder graphics and audio units.
//!
//! Neither unit renders or synthesizes anything. Each honours the
//! [`HardwareUnit`] contract and counts the work it was asked to do, which
//! is enough to exercise the scheduler alongside the engine.

use std::any::Any;

use crate::scheduler::HardwareUnit;
use crate::ExecutionError;

/// Default divisor for both placeholder units.
pub const PLACEHOLDER_CLOCK_DIVISOR: u8 = 2;

/// Dots in one scanline.
const DOTS_PER_LINE: u32 = 456;

/// Scanlines in one frame, including vertical blank.
const LINES_PER_FRAME: u8 = 154;

/// Graphics unit stand-in: walks the dot/scanline counters only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsUnit {
    divisor: u8,
    dot: u32,
    line: u8,
    frames: u64,
    ticks: u64,
}

impl GraphicsUnit {
    pub fn new() -> Self {
        Self::with_divisor(PLACEHOLDER_CLOCK_DIVISOR)
    }

    pub fn with_divisor(divisor: u8) -> Self {
        Self {
            divisor,
            dot: 0,
            line: 0,
            frames: 0,
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current scanline (0..154).
    pub fn line(&self) -> u8 {
        self.line
    }

    /// Completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for GraphicsUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareUnit for GraphicsUnit {
    fn name(&self) -> &str {
        "graphics"
    }

    fn clock_divisor(&self) -> u8 {
        self.divisor
    }

    fn tick(&mut self) -> Result<(), ExecutionError> {
        self.ticks += 1;
        self.dot += 1;
        if self.dot == DOTS_PER_LINE {
            self.dot = 0;
            self.line += 1;
            if self.line == LINES_PER_FRAME {
                self.line = 0;
                self.frames += 1;
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Audio unit stand-in: counts ticks, produces no samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUnit {
    divisor: u8,
    ticks: u64,
}

impl AudioUnit {
    pub fn new() -> Self {
        Self::with_divisor(PLACEHOLDER_CLOCK_DIVISOR)
    }

    pub fn with_divisor(divisor: u8) -> Self {
        Self { divisor, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for AudioUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareUnit for AudioUnit {
    fn name(&self) -> &str {
        "audio"
    }

    fn clock_divisor(&self) -> u8 {
        self.divisor
    }

    fn tick(&mut self) -> Result<(), ExecutionError> {
        self.ticks += 1;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
