//! # Clock Scheduler
//!
//! Drives a fixed set of [`HardwareUnit`]s through the shared clock.
//!
//! One macro-step is four sub-cycles. On each sub-cycle every live unit
//! whose clock divisor divides the sub-cycle counter is dispatched as an
//! independent task, and the scheduler joins all of them before the counter
//! advances. Units share one memory bus, so the join is the only thing
//! keeping a unit from seeing another unit's writes of the same sub-cycle
//! half-applied; no relative order between units inside a sub-cycle is
//! promised.
//!
//! With the `parallel` feature (default) dispatch goes through rayon's
//! work-stealing pool. Without it each eligible unit gets a scoped thread.
//!
//! A unit whose tick fails is recorded as faulted and excluded from every
//! later sub-cycle; the scheduler never retries it.
//!
//! # Examples
//!
//! ```
//! use libsm83::{AudioUnit, ClockScheduler, GraphicsUnit, SchedulerConfig};
//!
//! let mut scheduler = ClockScheduler::new(SchedulerConfig::default().with_max_macro_steps(2));
//! let graphics = scheduler.add_unit(GraphicsUnit::new()).unwrap();
//! let audio = scheduler.add_unit(AudioUnit::with_divisor(4)).unwrap();
//!
//! let summary = scheduler.run();
//! assert_eq!(summary.sub_cycles, 8);
//! assert_eq!(scheduler.unit_ticks(graphics), Some(4));
//! assert_eq!(scheduler.unit_ticks(audio), Some(2));
//! ```

use std::any::Any;

use thiserror::Error;

use crate::ExecutionError;

/// Sub-cycles in one macro-step.
pub const SUB_CYCLES_PER_MACRO_STEP: u8 = 4;

/// Macro-steps in one 70224-clock video frame.
pub const MACRO_STEPS_PER_FRAME: u64 = 70224 / SUB_CYCLES_PER_MACRO_STEP as u64;

/// A device that advances with the shared clock.
///
/// Implemented by the instruction engine and the placeholder units.
///
/// # Design
///
/// - **Bounded ticks**: `tick` does one unit of work and returns; it never
///   waits on another unit
/// - **Send**: ticks may run on a worker thread
/// - **Downcasting**: `as_any` lets callers recover the concrete unit after a
///   run for inspection
pub trait HardwareUnit: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Sub-cycles between successive activations (must be positive).
    fn clock_divisor(&self) -> u8;

    /// Performs one unit of work.
    fn tick(&mut self) -> Result<(), ExecutionError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Error returned when a unit cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The unit declared a clock divisor of zero.
    #[error("unit '{name}' declares a zero clock divisor")]
    ZeroDivisor { name: String },
}

/// Runtime scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Macro-steps [`ClockScheduler::run`] performs before returning.
    pub max_macro_steps: u64,
}

impl Default for SchedulerConfig {
    /// One video frame.
    fn default() -> Self {
        Self {
            max_macro_steps: MACRO_STEPS_PER_FRAME,
        }
    }
}

impl SchedulerConfig {
    pub fn with_max_macro_steps(mut self, max_macro_steps: u64) -> Self {
        self.max_macro_steps = max_macro_steps;
        self
    }
}

/// A fault raised by a unit during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFault {
    /// Registration index of the unit
    pub unit: usize,
    /// Absolute sub-cycle on which the tick failed
    pub sub_cycle: u64,
    pub error: ExecutionError,
}

/// What happened during one sub-cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCycleReport {
    /// Phase within the macro-step (0..=3)
    pub phase: u8,
    /// Units ticked on this sub-cycle
    pub dispatched: usize,
    /// Units that faulted on this sub-cycle
    pub faults: Vec<UnitFault>,
}

/// Totals for a [`ClockScheduler::run`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub macro_steps: u64,
    pub sub_cycles: u64,
    pub dispatched: u64,
    pub faults: Vec<UnitFault>,
}

/// Internal registration record for one unit.
struct UnitSlot {
    unit: Box<dyn HardwareUnit>,
    divisor: u8,
    ticks: u64,
    fault: Option<UnitFault>,
}

impl UnitSlot {
    fn is_due(&self, phase: u8) -> bool {
        self.fault.is_none() && phase % self.divisor == 0
    }

    fn run_tick(&mut self, index: usize, sub_cycle: u64) {
        self.ticks += 1;
        if let Err(error) = self.unit.tick() {
            self.fault = Some(UnitFault {
                unit: index,
                sub_cycle,
                error,
            });
        }
    }
}

/// Fork-join clock scheduler.
pub struct ClockScheduler {
    slots: Vec<UnitSlot>,
    config: SchedulerConfig,
    phase: u8,
    sub_cycles: u64,
    macro_steps: u64,
}

impl ClockScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            slots: Vec::new(),
            config,
            phase: 0,
            sub_cycles: 0,
            macro_steps: 0,
        }
    }

    /// Registers a unit and returns its index.
    ///
    /// The divisor is read once here; a unit cannot change it later.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroDivisor`] if the unit declares a
    /// divisor of zero.
    pub fn add_unit<U: HardwareUnit + 'static>(&mut self, unit: U) -> Result<usize, SchedulerError> {
        self.add_boxed_unit(Box::new(unit))
    }

    pub fn add_boxed_unit(&mut self, unit: Box<dyn HardwareUnit>) -> Result<usize, SchedulerError> {
        let divisor = unit.clock_divisor();
        if divisor == 0 {
            return Err(SchedulerError::ZeroDivisor {
                name: unit.name().to_string(),
            });
        }

        log::debug!("registered unit '{}' with divisor {}", unit.name(), divisor);
        self.slots.push(UnitSlot {
            unit,
            divisor,
            ticks: 0,
            fault: None,
        });
        Ok(self.slots.len() - 1)
    }

    /// Runs one sub-cycle: dispatch every due unit, join, advance.
    pub fn step_sub_cycle(&mut self) -> SubCycleReport {
        let phase = self.phase;
        let sub_cycle = self.sub_cycles;

        let due: Vec<(usize, &mut UnitSlot)> = self
            .slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.is_due(phase))
            .collect();
        let dispatched = due.len();

        dispatch(due, sub_cycle);

        // Barrier passed: every due tick has returned.
        let faults: Vec<UnitFault> = self
            .slots
            .iter()
            .filter_map(|slot| slot.fault.as_ref())
            .filter(|fault| fault.sub_cycle == sub_cycle)
            .cloned()
            .collect();
        for fault in &faults {
            log::warn!(
                "unit '{}' faulted on sub-cycle {} and is excluded: {}",
                self.slots[fault.unit].unit.name(),
                sub_cycle,
                fault.error
            );
        }
        log::debug!(
            "sub-cycle {} (phase {}): dispatched {} unit(s)",
            sub_cycle,
            phase,
            dispatched
        );

        self.sub_cycles += 1;
        self.phase = (phase + 1) % SUB_CYCLES_PER_MACRO_STEP;
        if self.phase == 0 {
            self.macro_steps += 1;
        }

        SubCycleReport {
            phase,
            dispatched,
            faults,
        }
    }

    /// Runs four sub-cycles.
    pub fn step_macro(&mut self) -> Vec<SubCycleReport> {
        (0..SUB_CYCLES_PER_MACRO_STEP)
            .map(|_| self.step_sub_cycle())
            .collect()
    }

    /// Runs until the configured macro-step bound is reached.
    ///
    /// Returns early once every registered unit has faulted, since no
    /// further sub-cycle could do any work.
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();
        let start_sub_cycles = self.sub_cycles;
        let start_macro_steps = self.macro_steps;

        while self.macro_steps < self.config.max_macro_steps {
            if self.live_units() == 0 {
                log::debug!("all units faulted; stopping at macro-step {}", self.macro_steps);
                break;
            }
            let report = self.step_sub_cycle();
            summary.dispatched += report.dispatched as u64;
            summary.faults.extend(report.faults);
        }

        summary.sub_cycles = self.sub_cycles - start_sub_cycles;
        summary.macro_steps = self.macro_steps - start_macro_steps;
        summary
    }

    // ========== State Inspection ==========

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Phase within the current macro-step (0..=3).
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Sub-cycles completed since construction.
    pub fn sub_cycles(&self) -> u64 {
        self.sub_cycles
    }

    pub fn macro_steps(&self) -> u64 {
        self.macro_steps
    }

    pub fn unit_count(&self) -> usize {
        self.slots.len()
    }

    /// Units that have not faulted.
    pub fn live_units(&self) -> usize {
        self.slots.iter().filter(|slot| slot.fault.is_none()).count()
    }

    /// Ticks dispatched to the unit at `index`.
    pub fn unit_ticks(&self, index: usize) -> Option<u64> {
        self.slots.get(index).map(|slot| slot.ticks)
    }

    /// The fault that excluded the unit at `index`, if any.
    pub fn unit_fault(&self, index: usize) -> Option<&UnitFault> {
        self.slots.get(index).and_then(|slot| slot.fault.as_ref())
    }

    /// Borrows the unit at `index` as its concrete type.
    pub fn unit<T: HardwareUnit + 'static>(&self, index: usize) -> Option<&T> {
        self.slots
            .get(index)
            .and_then(|slot| slot.unit.as_any().downcast_ref::<T>())
    }

    pub fn unit_mut<T: HardwareUnit + 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.slots
            .get_mut(index)
            .and_then(|slot| slot.unit.as_any_mut().downcast_mut::<T>())
    }
}

impl Default for ClockScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(feature = "parallel")]
fn dispatch(due: Vec<(usize, &mut UnitSlot)>, sub_cycle: u64) {
    use rayon::prelude::*;

    // for_each returns only after every task has completed.
    due.into_par_iter()
        .for_each(|(index, slot)| slot.run_tick(index, sub_cycle));
}

#[cfg(not(feature = "parallel"))]
fn dispatch(due: Vec<(usize, &mut UnitSlot)>, sub_cycle: u64) {
    if due.len() <= 1 {
        for (index, slot) in due {
            slot.run_tick(index, sub_cycle);
        }
        return;
    }

    std::thread::scope(|scope| {
        let handles: Vec<_> = due
            .into_iter()
            .map(|(index, slot)| scope.spawn(move || slot.run_tick(index, sub_cycle)))
            .collect();
        for handle in handles {
            if let Err(panic) = handle.join() {
                std::panic::resume_unwind(panic);
            }
        }
    });
}
