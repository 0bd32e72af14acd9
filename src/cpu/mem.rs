// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Total size of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;
/// Address where programs are loaded, and where execution starts
pub const ENTRY_POINT: u16 = 0x200;
/// The largest program that fits between [ENTRY_POINT] and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - ENTRY_POINT as usize;

/// The built-in hexadecimal font, 16 glyphs of 5 rows each
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM. Read-only once the [Mem] is built.
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the address range covered by this [Region]
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0..FONT.len(),
            Region::Program => ENTRY_POINT as usize..MEMORY_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// Flat, bounds-checked 4 KiB of memory, with the font baked in
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a new mem, with the font loaded into the [Region::Charset]
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(MEMORY_SIZE, mem.len());
    /// assert_eq!(Some(&FONT[..]), mem.get_region(Region::Charset));
    /// ```
    pub fn new() -> Self {
        let mut memory = vec![0; MEMORY_SIZE];
        memory[Region::Charset.range()].copy_from_slice(&FONT);
        Mem { memory }
    }

    /// Gets the length of the mem's backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Reads a byte of memory. Addresses past the end of memory read as 0.
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf0, mem.read(0x000));
    /// assert_eq!(0x00, mem.read(0xffff));
    /// ```
    #[inline(always)]
    pub fn read(&self, addr: u16) -> u8 {
        self.memory.get(addr as usize).copied().unwrap_or_default()
    }

    /// Writes a byte of memory, and reports whether the write landed.
    ///
    /// Writes past the end of memory, or into the [Region::Charset], are dropped.
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::mem::*;
    /// let mut mem = Mem::new();
    /// assert!(mem.write(0x300, 0xaa));
    /// assert_eq!(0xaa, mem.read(0x300));
    /// // The font can't be overwritten
    /// assert!(!mem.write(0x000, 0xaa));
    /// assert_eq!(0xf0, mem.read(0x000));
    /// ```
    #[inline(always)]
    pub fn write(&mut self, addr: u16, value: u8) -> bool {
        let addr = addr as usize;
        if Region::Charset.range().contains(&addr) {
            log::trace!("dropped write of {value:02x} to font memory at {addr:03x}");
            return false;
        }
        match self.memory.get_mut(addr) {
            Some(byte) => {
                *byte = value;
                true
            }
            None => {
                log::trace!("dropped write of {value:02x} past end of memory at {addr:04x}");
                false
            }
        }
    }

    /// Gets a slice of [Mem] memory
    #[inline(always)]
    pub fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Loads data into a named [Region], starting at the beginning of that region.
    ///
    /// Returns [Error::RomTooLarge] if the data doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::mem::*;
    /// # fn main() -> chipvm::error::Result<()> {
    /// let mut mem = Mem::new();
    /// mem.load_region(Region::Program, b"Hello, world!")?;
    /// assert_eq!(b"Hello", &mem.get_region(Region::Program).unwrap()[..5]);
    ///
    /// // Too big!
    /// assert!(mem.load_region(Region::Program, &[0; 0x1000]).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let range = name.range();
        if data.len() > range.len() {
            return Err(Error::RomTooLarge {
                size: data.len(),
                max: range.len(),
            });
        }
        self.memory[range.start..range.start + data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        self.memory[name.range()].fill(0);
        self
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> Option<&[u8]> {
        self.grab(name.range())
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}
