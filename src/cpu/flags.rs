//! Represents flags that aid in implementation but aren't a part of the Chip-8 machine

use super::{Quirks, Variant};
use crate::error::Fault;

/// The execution state of the interpreter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    /// Executing instructions every frame
    #[default]
    Running,
    /// Servicing input, but not executing
    Paused,
    /// Finished. There's no coming back from this one.
    Stopped,
}

/// Represents flags that aid in operation, but aren't inherent to the CPU
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when debug (live disassembly) mode enabled
    pub debug: bool,
    /// The current [RunState]
    pub state: RunState,
    /// The [Variant] this CPU imitates
    pub variant: Variant,
    /// The set of [Quirks] in effect. Derived from the [Variant].
    pub quirks: Quirks,
    /// Set when the CPU has faulted, and won't execute until reset
    pub fault: Option<Fault>,
}

impl Flags {
    /// Builds a set of flags for the given [Variant]
    pub fn new(variant: Variant) -> Self {
        Flags {
            variant,
            quirks: variant.into(),
            ..Default::default()
        }
    }

    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.debug);
    /// // Toggle debug mode
    /// cpu.flags.debug();
    /// assert_eq!(true, cpu.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }

    /// Toggles between [RunState::Running] and [RunState::Paused].
    /// A stopped CPU stays stopped.
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(RunState::Running, cpu.flags.state);
    /// // Pause the cpu
    /// cpu.flags.pause();
    /// assert_eq!(RunState::Paused, cpu.flags.state);
    /// cpu.flags.pause();
    /// assert_eq!(RunState::Running, cpu.flags.state);
    /// ```
    pub fn pause(&mut self) {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Stopped => RunState::Stopped,
        }
    }

    /// Stops the CPU for good
    pub fn stop(&mut self) {
        self.state = RunState::Stopped
    }

    /// Reports whether the CPU should execute instructions
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running && self.fault.is_none()
    }
}
