//! Engine, placeholder units and shared bus wired together.
//!
//! ```
//! use libsm83::{Emulator, EmulatorConfig, MemoryBus, Reg8};
//! use libsm83::SchedulerConfig;
//!
//! let config = EmulatorConfig::default()
//!     .with_scheduler(SchedulerConfig::default().with_max_macro_steps(4));
//! let mut emulator = Emulator::new(config).unwrap();
//!
//! // LD A,$12 ; LD ($C000),A
//! emulator.load_boot_image(&[0x3E, 0x12, 0xEA, 0x00, 0xC0]);
//! emulator.run();
//!
//! assert_eq!(emulator.memory().read(0xC000), 0x12);
//! assert_eq!(emulator.cpu().unwrap().registers().get8(Reg8::A), 0x12);
//! ```

use crate::cpu::{Cpu, EngineConfig};
use crate::memory::{MemoryBus, SharedMemory};
use crate::scheduler::{ClockScheduler, RunSummary, SchedulerConfig, SchedulerError, UnitFault};
use crate::units::{AudioUnit, GraphicsUnit, PLACEHOLDER_CLOCK_DIVISOR};

/// Address the boot image is installed at.
pub const BOOT_IMAGE_ADDRESS: u16 = 0x0000;

/// Emulator assembly settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorConfig {
    pub engine: EngineConfig,
    pub scheduler: SchedulerConfig,
    pub graphics_divisor: u8,
    pub audio_divisor: u8,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            scheduler: SchedulerConfig::default(),
            graphics_divisor: PLACEHOLDER_CLOCK_DIVISOR,
            audio_divisor: PLACEHOLDER_CLOCK_DIVISOR,
        }
    }
}

impl EmulatorConfig {
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_graphics_divisor(mut self, divisor: u8) -> Self {
        self.graphics_divisor = divisor;
        self
    }

    pub fn with_audio_divisor(mut self, divisor: u8) -> Self {
        self.audio_divisor = divisor;
        self
    }
}

/// A complete machine: engine plus placeholder units on one shared bus.
pub struct Emulator {
    memory: SharedMemory,
    scheduler: ClockScheduler,
    cpu: usize,
    graphics: usize,
    audio: usize,
}

impl Emulator {
    /// Builds the shared bus and registers the engine, graphics and audio
    /// units with a fresh scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroDivisor`] if a configured divisor is
    /// zero.
    pub fn new(config: EmulatorConfig) -> Result<Self, SchedulerError> {
        let memory = SharedMemory::new();
        let mut scheduler = ClockScheduler::new(config.scheduler);

        let cpu = scheduler.add_unit(Cpu::with_config(memory.clone(), config.engine))?;
        let graphics = scheduler.add_unit(GraphicsUnit::with_divisor(config.graphics_divisor))?;
        let audio = scheduler.add_unit(AudioUnit::with_divisor(config.audio_divisor))?;

        Ok(Self {
            memory,
            scheduler,
            cpu,
            graphics,
            audio,
        })
    }

    /// Installs a boot image at the bottom of the address space.
    pub fn load_boot_image(&mut self, image: &[u8]) {
        log::debug!("installing {}-byte boot image", image.len());
        self.memory.write_range(BOOT_IMAGE_ADDRESS, image);
    }

    /// Runs the scheduler to its configured bound.
    pub fn run(&mut self) -> RunSummary {
        self.scheduler.run()
    }

    /// Runs one macro-step (four sub-cycles).
    pub fn step_macro(&mut self) -> Vec<UnitFault> {
        self.scheduler
            .step_macro()
            .into_iter()
            .flat_map(|report| report.faults)
            .collect()
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SharedMemory {
        &mut self.memory
    }

    pub fn scheduler(&self) -> &ClockScheduler {
        &self.scheduler
    }

    pub fn cpu(&self) -> Option<&Cpu<SharedMemory>> {
        self.scheduler.unit(self.cpu)
    }

    pub fn cpu_mut(&mut self) -> Option<&mut Cpu<SharedMemory>> {
        self.scheduler.unit_mut(self.cpu)
    }

    pub fn graphics(&self) -> Option<&GraphicsUnit> {
        self.scheduler.unit(self.graphics)
    }

    pub fn audio(&self) -> Option<&AudioUnit> {
        self.scheduler.unit(self.audio)
    }

    /// The engine's fault, if it has stopped.
    pub fn cpu_fault(&self) -> Option<&UnitFault> {
        self.scheduler.unit_fault(self.cpu)
    }
}
