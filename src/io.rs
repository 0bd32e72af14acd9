// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The boundary between the [Emulator](crate::Emulator) and the outside world

use crate::{cpu::screen::Screen, error::Result};

/// Something that happened outside the emulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A key in `0x0..=0xf` went down
    Press(usize),
    /// A key in `0x0..=0xf` came up
    Release(usize),
    /// Reload the program and start over
    Reset,
    /// Toggle between running and paused
    TogglePause,
    /// Stop for good
    Quit,
}

/// Input, video, and audio, as seen by the [Emulator](crate::Emulator).
///
/// Each method is called at most once per frame.
pub trait Frontend {
    /// Collects the events which happened since the last frame
    fn poll(&mut self) -> Vec<Event>;
    /// Shows the screen. Only called when the screen changed.
    fn present(&mut self, screen: &Screen) -> Result<()>;
    /// Turns the tone on or off
    fn sound(&mut self, gate: bool);
}

/// A [Frontend] with no inputs and no outputs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Headless;

impl Frontend for Headless {
    fn poll(&mut self) -> Vec<Event> {
        vec![]
    }
    fn present(&mut self, _: &Screen) -> Result<()> {
        Ok(())
    }
    fn sound(&mut self, _: bool) {}
}
