// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Paces the [CPU] at a fixed frame rate, and connects it to a [Frontend]

use crate::{
    config::{Config, FRAME_RATE},
    cpu::{flags::RunState, CPU},
    error::{Error, Result},
    io::{Event, Frontend},
};
use std::time::{Duration, Instant};

/// A running session: one [CPU], and the clock which drives it
#[derive(Clone, Debug, PartialEq)]
pub struct Emulator {
    cpu: CPU,
    /// Instructions executed per frame
    pub ipf: usize,
    frames: usize,
    sound_gate: bool,
    frame_time: Duration,
}

impl Emulator {
    /// Builds a session running the provided ROM
    ///
    /// Returns [Error::RomTooLarge] if the ROM doesn't fit in program memory.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let emu = Emulator::new(&[0x12, 0x00], Config::default()).unwrap();
    /// assert_eq!(12, emu.ipf);
    /// assert_eq!(RunState::Running, emu.state());
    /// ```
    pub fn new(rom: &[u8], config: Config) -> Result<Self> {
        let mut cpu = CPU::new(rom, config.variant)?;
        cpu.flags.debug = config.debug;
        if config.pause {
            cpu.flags.state = RunState::Paused;
        }
        Ok(Emulator {
            cpu,
            ipf: config.ipf(),
            frames: 0,
            sound_gate: false,
            frame_time: Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64),
        })
    }

    /// Gets the [CPU]
    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    /// Gets the [CPU] mutably
    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    /// Gets the current [RunState]
    pub fn state(&self) -> RunState {
        self.cpu.flags.state
    }

    /// Gets the sound gate, as sampled at the end of the last frame
    pub fn sound_gate(&self) -> bool {
        self.sound_gate
    }

    /// Gets the number of frames run so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Applies a single [Event]
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut emu = Emulator::new(&[0x12, 0x00], Config::default()).unwrap();
    /// emu.handle(Event::TogglePause).unwrap();
    /// assert_eq!(RunState::Paused, emu.state());
    /// emu.handle(Event::Quit).unwrap();
    /// assert_eq!(RunState::Stopped, emu.state());
    /// // Once stopped, always stopped
    /// emu.handle(Event::TogglePause).unwrap();
    /// assert_eq!(RunState::Stopped, emu.state());
    /// ```
    pub fn handle(&mut self, event: Event) -> Result<()> {
        if self.state() == RunState::Stopped {
            return Ok(());
        }
        match event {
            Event::Press(key) => {
                self.cpu.press(key)?;
            }
            Event::Release(key) => {
                self.cpu.release(key)?;
            }
            Event::Reset => {
                self.cpu.reset();
                log::info!("reset");
            }
            Event::TogglePause => {
                self.cpu.flags.pause();
                log::info!(
                    "{}",
                    match self.state() {
                        RunState::Paused => "paused",
                        _ => "running",
                    }
                );
            }
            Event::Quit => {
                self.cpu.flags.stop();
                log::info!("quit");
            }
        }
        Ok(())
    }

    /// Runs a single frame, without waiting for it to end.
    ///
    /// Events which can't be applied (a key outside `0..=0xf`) are logged
    /// and dropped. Returns `false` once the session has stopped.
    /// # Examples
    /// ```rust
    /// # use chipvm::{io::Headless, *};
    /// let mut emu = Emulator::new(&[0x70, 0x01, 0x12, 0x00], Config::default()).unwrap();
    /// assert!(emu.frame(&mut Headless).unwrap());
    /// // 12 instructions: six `add v0, #01`s, and six jumps
    /// assert_eq!(6, emu.cpu().v()[0]);
    /// ```
    pub fn frame(&mut self, ui: &mut impl Frontend) -> Result<bool> {
        for event in ui.poll() {
            // keep draining past a bad event
            if let Err(e) = self.handle(event) {
                log::warn!("dropped {event:?}: {e}");
            }
        }
        if self.state() == RunState::Stopped {
            return Ok(false);
        }
        if self.cpu.flags.is_running() {
            match self.cpu.multistep(self.ipf) {
                Ok(_) => self.cpu.tick_timers(),
                Err(Error::Fault(fault)) => log::error!("{fault}; halting until reset"),
                Err(e) => return Err(e),
            }
        }
        self.sound_gate = self.cpu.flags.is_running() && self.cpu.sound_gate();
        ui.sound(self.sound_gate);
        if self.cpu.screen_mut().take_dirty() {
            ui.present(self.cpu.screen())?;
        }
        self.frames += 1;
        Ok(true)
    }

    /// Runs frames until the session is stopped, sleeping off whatever is
    /// left of each frame.
    pub fn run(&mut self, ui: &mut impl Frontend) -> Result<()> {
        loop {
            let start = Instant::now();
            if !self.frame(ui)? {
                break;
            }
            self.wait_for_next_frame(start);
        }
        log::info!("stopped after {} frames", self.frames);
        Ok(())
    }

    /// Sleeps until one frame after `start`. Late frames aren't made up for.
    fn wait_for_next_frame(&self, start: Instant) {
        let elapsed = start.elapsed();
        if elapsed > self.frame_time {
            log::debug!(
                "frame {} overran by {:?}",
                self.frames,
                elapsed - self.frame_time
            );
        }
        std::thread::sleep(self.frame_time.saturating_sub(elapsed));
    }
}
