// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Engine-visible settings

use crate::cpu::variant::Variant;

/// The rate at which frames are run, and timers count down
pub const FRAME_RATE: usize = 60;
/// The default execution speed, in instructions per second
pub const DEFAULT_IPS: usize = 700;

/// Settings which change how the engine runs a program
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Execution speed, in instructions per second
    pub ips: usize,
    /// The quirk set to emulate
    pub variant: Variant,
    /// Live disassembly of every executed instruction
    pub debug: bool,
    /// Start paused
    pub pause: bool,
}

impl Config {
    /// Gets the number of instructions to run each frame, rounded to the nearest whole
    /// # Examples
    /// ```rust
    /// # use chipvm::Config;
    /// assert_eq!(12, Config::default().ipf());
    /// assert_eq!(17, Config { ips: 1000, ..Default::default() }.ipf());
    /// ```
    pub fn ipf(&self) -> usize {
        (self.ips + FRAME_RATE / 2) / FRAME_RATE
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ips: DEFAULT_IPS,
            variant: Variant::default(),
            debug: false,
            pause: false,
        }
    }
}
