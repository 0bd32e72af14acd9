// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture.
//!
//! The [CPU] owns the whole machine: memory, registers, screen, and keys.
//! The [Emulator] paces it at 60 frames a second, and talks to the outside
//! world through a [Frontend].

pub mod config;
pub mod cpu;
pub mod emulator;
pub mod error;
pub mod io;

pub use config::Config;
pub use cpu::{
    flags::{Flags, RunState},
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn, Instruction,
    },
    mem::Mem,
    quirks::Quirks,
    screen::Screen,
    variant::Variant,
    CPU,
};
pub use emulator::Emulator;
pub use error::{Error, Fault, Result};
pub use io::{Event, Frontend};
