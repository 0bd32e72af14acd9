// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;
pub mod screen;
pub mod variant;

use self::{
    flags::{Flags, RunState},
    instruction::{
        disassembler::{Dis, Disassembler},
        Instruction,
    },
    mem::{Mem, Region, ENTRY_POINT},
    quirks::Quirks,
    screen::Screen,
    variant::Variant,
};
use crate::error::{Error, Result};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Maximum depth of the call stack
pub const STACK_DEPTH: usize = 12;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], [RunState], etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    rom: Vec<u8>,
    stack: Vec<Adr>,
    // display
    screen: Screen,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    awaiting_key: Option<usize>,
    // Execution data
    cycle: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU running the provided ROM
    ///
    /// Returns [Error::RomTooLarge] if the ROM doesn't fit in program memory.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let cpu = CPU::new(&[0x00, 0xe0], Variant::Classic).unwrap();
    /// assert_eq!(0x200, cpu.pc());
    ///
    /// let too_big = vec![0; 0x1000];
    /// assert!(CPU::new(&too_big, Variant::Classic).is_err());
    /// ```
    pub fn new(rom: &[u8], variant: Variant) -> Result<Self> {
        let mut cpu = CPU {
            flags: Flags::new(variant),
            ..Default::default()
        };
        cpu.load_program_bytes(rom)?;
        Ok(cpu)
    }

    /// Loads bytes into the CPU's program space, replacing the previous program.
    ///
    /// The ROM is kept, and reloaded on [CPU::reset].
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.clear_region(Region::Program);
        self.mem.load_region(Region::Program, rom)?;
        self.rom = rom.to_vec();
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(!std::mem::replace(keyref, true))
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(keyref, false))
    }

    /// Gets the state of all 16 keys
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Gets the key latched by a pending `Fx0A`, if any.
    ///
    /// The key is recorded when it's pressed, and delivered when it's released.
    pub fn awaiting_key(&self) -> Option<usize> {
        self.awaiting_key
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Reports whether a tone should be audible right now
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::new(&[0x60, 0x02, 0xf0, 0x18], Variant::Classic).unwrap();
    /// assert!(!cpu.sound_gate());
    /// cpu.multistep(2).unwrap();
    /// assert!(cpu.sound_gate());
    /// ```
    pub fn sound_gate(&self) -> bool {
        self.sound > 0
    }

    /// Gets the return addresses on the call stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the screen mutably, so the presentation layer can clear the dirty flag
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Gets the number of instructions the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the fault which halted the CPU, if any
    pub fn fault(&self) -> Option<crate::error::Fault> {
        self.flags.fault
    }

    /// Resets the emulator to the state it was in right after loading the ROM.
    ///
    /// Zeroes the registers, stack, timers, keys, and screen, reloads memory,
    /// and clears any fault. Keeps the [Variant], [Quirks], and debug flag,
    /// and sets the CPU running.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::new(&[0x60, 0x42, 0x12, 0x02], Variant::Extended).unwrap();
    /// cpu.multistep(4).unwrap();
    /// assert_eq!(0x42, cpu.v()[0]);
    /// cpu.reset();
    /// assert_eq!(0, cpu.v()[0]);
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(Variant::Extended, cpu.flags.variant);
    /// ```
    pub fn reset(&mut self) {
        self.flags = Flags {
            state: RunState::Running,
            fault: None,
            ..self.flags.clone()
        };
        self.mem = Mem::new();
        // The ROM fit the first time around
        if let Err(e) = self.mem.load_region(Region::Program, &self.rom) {
            log::error!("failed to reload rom: {e}");
        }
        self.stack.clear();
        self.screen.clear();
        self.pc = ENTRY_POINT;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.keys = [false; 16];
        self.awaiting_key = None;
        self.cycle = 0;
    }

    /// Fetches the instruction at the program counter, without executing it
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let cpu = CPU::new(&[0x81, 0x24], Variant::Classic).unwrap();
    /// let instruction = cpu.fetch();
    /// assert_eq!(0x8124, instruction.opcode);
    /// assert_eq!((1, 2, 4), (instruction.x, instruction.y, instruction.n));
    /// ```
    pub fn fetch(&self) -> Instruction {
        Instruction::from_bytes(
            self.mem.read(self.pc),
            self.mem.read(self.pc.wrapping_add(1)),
        )
    }

    /// Executes `steps` instructions, stopping early on a fault.
    ///
    /// Does not touch the timers; see [CPU::tick_timers]
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::new(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jp 202
    /// ], Variant::Classic).unwrap();
    /// cpu.multistep(0x20).unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick()?;
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Returns [Error::Fault] if the instruction violated the stack discipline,
    /// and [Error::Halted] on every tick after that, until [CPU::reset].
    ///
    /// Words which aren't instructions are skipped over.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::new(&[
    ///     0xff, 0xff, // not an instruction
    ///     0x00, 0xee, // ret, with nothing to return to
    /// ], Variant::Classic).unwrap();
    /// cpu.tick().unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// cpu.tick().expect_err("Nothing on the stack to return to");
    /// assert_eq!(0x202, cpu.pc());
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        if let Some(fault) = self.flags.fault {
            return Err(Error::Halted { fault });
        }
        self.cycle += 1;
        // fetch
        let instruction = self.fetch();
        if self.flags.debug {
            eprintln!(
                "{:6} {:03x}: {:<36}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(instruction.opcode)
            );
        }
        self.pc = self.pc.wrapping_add(2);
        // decode and execute
        match instruction.insn() {
            Some(insn) => {
                if let Err(fault) = self.execute(insn) {
                    // leave pc on the offending instruction
                    self.pc = self.pc.wrapping_sub(2);
                    self.flags.fault = Some(fault);
                    return Err(fault.into());
                }
            }
            None => log::trace!(
                "skipped unrecognized opcode {:04x} at {:03x}",
                instruction.opcode,
                self.pc.wrapping_sub(2)
            ),
        }
        Ok(self)
    }

    /// Counts the delay and sound timers down by one tick, stopping at zero.
    ///
    /// Call this once per 60 Hz frame.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::new(&[0x60, 0x01, 0xf0, 0x15], Variant::Classic).unwrap();
    /// cpu.multistep(2).unwrap();
    /// assert_eq!(1, cpu.delay());
    /// cpu.tick_timers();
    /// cpu.tick_timers();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        eprintln!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("awaiting_key", &self.awaiting_key)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new Classic CPU with no program loaded
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use chipvm::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            rom: vec![],
            stack: Vec::with_capacity(STACK_DEPTH),
            screen: Screen::new(),
            pc: ENTRY_POINT,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            awaiting_key: None,
            cycle: 0,
            disassembler: Dis::default(),
        }
    }
}
