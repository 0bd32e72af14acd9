// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Instruction], and its decoded form, [Insn]

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// A raw instruction word, split into every field an opcode might use.
///
/// Every 16-bit word splits cleanly, whether or not it means anything.
/// # Examples
/// ```rust
/// # use chipvm::cpu::instruction::*;
/// let instruction = Instruction::from_bytes(0xd1, 0x25);
/// assert_eq!(0xd125, instruction.opcode);
/// assert_eq!(0x125, instruction.nnn);
/// assert_eq!(0x25, instruction.nn);
/// assert_eq!(0x5, instruction.n);
/// assert_eq!(0x1, instruction.x);
/// assert_eq!(0x2, instruction.y);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// The whole big-endian instruction word
    pub opcode: u16,
    /// Low 12 bits: an address
    pub nnn: u16,
    /// Low 8 bits: an immediate byte
    pub nn: u8,
    /// Low 4 bits: an immediate nibble
    pub n: u8,
    /// Bits 8..12: a register index
    pub x: usize,
    /// Bits 4..8: a register index
    pub y: usize,
}

impl Instruction {
    /// Splits an instruction from its high and low bytes
    #[inline(always)]
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Self::from(u16::from_be_bytes([hi, lo]))
    }

    /// Classifies this instruction. Returns [None] if the word isn't an instruction.
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::instruction::*;
    /// assert_eq!(Some(Insn::cls), Instruction::from(0x00e0).insn());
    /// assert_eq!(None, Instruction::from(0xffff).insn());
    /// ```
    pub fn insn(&self) -> Option<Insn> {
        Insn::decode(&self.opcode.to_be_bytes())
            .ok()
            .map(|(_, insn)| insn)
    }
}

impl From<u16> for Instruction {
    #[inline(always)]
    fn from(opcode: u16) -> Self {
        Instruction {
            opcode,
            nnn: opcode & 0x0fff,
            nn: (opcode & 0xff) as u8,
            n: (opcode & 0xf) as u8,
            x: (opcode >> 8 & 0xf) as usize,
            y: (opcode >> 4 & 0xf) as usize,
        }
    }
}

#[allow(non_camel_case_types, non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A recognized Chip-8 instruction, with its operands pulled out
pub enum Insn {
    /// | 00e0 | Clear the screen
    #[opcode = "0x00e0"]
    cls,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    ret,
    /// | 1aaa | Jump to address a
    #[opcode = "0x1AAA"]
    jp { A: u16 },
    /// | 2aaa | Call subroutine at address a
    #[opcode = "0x2AAA"]
    call { A: u16 },
    /// | 3xbb | Skip next instruction if vX == b
    #[opcode = "0x3xBB"]
    seb { B: u8, x: usize },
    /// | 4xbb | Skip next instruction if vX != b
    #[opcode = "0x4xBB"]
    sneb { B: u8, x: usize },
    /// | 5xy0 | Skip next instruction if vX == vY
    #[opcode = "0x5xy0"]
    ser { y: usize, x: usize },
    /// | 6xbb | vX = b
    #[opcode = "0x6xBB"]
    ldb { B: u8, x: usize },
    /// | 7xbb | vX += b, without touching vF
    #[opcode = "0x7xBB"]
    addb { B: u8, x: usize },
    /// | 8xy0 | vX = vY
    #[opcode = "0x8xy0"]
    ldr { y: usize, x: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    or { y: usize, x: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    and { y: usize, x: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    xor { y: usize, x: usize },
    /// | 8xy4 | vX += vY, vF = carry
    #[opcode = "0x8xy4"]
    add { y: usize, x: usize },
    /// | 8xy5 | vX -= vY, vF = !borrow
    #[opcode = "0x8xy5"]
    sub { y: usize, x: usize },
    /// | 8xy6 | vX = vY >> 1 (or vX >> 1), vF = shifted-out bit
    #[opcode = "0x8xy6"]
    shr { y: usize, x: usize },
    /// | 8xy7 | vX = vY - vX, vF = !borrow
    #[opcode = "0x8xy7"]
    subn { y: usize, x: usize },
    /// | 8xyE | vX = vY << 1 (or vX << 1), vF = shifted-out bit
    #[opcode = "0x8xye"]
    shl { y: usize, x: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    #[opcode = "0x9xy0"]
    sner { y: usize, x: usize },
    /// | Aaaa | I = a
    #[opcode = "0xaAAA"]
    ldi { A: u16 },
    /// | Baaa | Jump to a + v0
    #[opcode = "0xbAAA"]
    jpr { A: u16 },
    /// | Cxbb | vX = random & b
    #[opcode = "0xcxBB"]
    rnd { B: u8, x: usize },
    /// | Dxyn | Draw an n-row sprite from &I at (vX, vY)
    #[opcode = "0xdxyn"]
    drw { y: usize, x: usize, n: u8 },
    /// | Ex9E | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    skp { x: usize },
    /// | ExA1 | Skip next instruction if key vX is not held
    #[opcode = "0xexa1"]
    sknp { x: usize },
    /// | Fx07 | vX = DT
    #[opcode = "0xfx07"]
    lddt { x: usize },
    /// | Fx0A | Wait for a key to be pressed and released, then vX = key
    #[opcode = "0xfx0a"]
    ldk { x: usize },
    /// | Fx15 | DT = vX
    #[opcode = "0xfx15"]
    stdt { x: usize },
    /// | Fx18 | ST = vX
    #[opcode = "0xfx18"]
    stst { x: usize },
    /// | Fx1E | I += vX
    #[opcode = "0xfx1e"]
    addi { x: usize },
    /// | Fx29 | I = address of the font glyph for vX
    #[opcode = "0xfx29"]
    ldf { x: usize },
    /// | Fx33 | Store the BCD of vX at &I
    #[opcode = "0xfx33"]
    bcd { x: usize },
    /// | Fx55 | Store v0..=vX at &I
    #[opcode = "0xfx55"]
    stm { x: usize },
    /// | Fx65 | Load v0..=vX from &I
    #[opcode = "0xfx65"]
    ldm { x: usize },
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::cls               => write!(f, "cls"),
            Insn::ret               => write!(f, "ret"),
            Insn::jp    { A }       => write!(f, "jp     {A:03x}"),
            Insn::call  { A }       => write!(f, "call   {A:03x}"),
            Insn::seb   { B, x }    => write!(f, "se     v{x:X}, #{B:02x}"),
            Insn::sneb  { B, x }    => write!(f, "sne    v{x:X}, #{B:02x}"),
            Insn::ser   { y, x }    => write!(f, "se     v{x:X}, v{y:X}"),
            Insn::ldb   { B, x }    => write!(f, "ld     v{x:X}, #{B:02x}"),
            Insn::addb  { B, x }    => write!(f, "add    v{x:X}, #{B:02x}"),
            Insn::ldr   { y, x }    => write!(f, "ld     v{x:X}, v{y:X}"),
            Insn::or    { y, x }    => write!(f, "or     v{x:X}, v{y:X}"),
            Insn::and   { y, x }    => write!(f, "and    v{x:X}, v{y:X}"),
            Insn::xor   { y, x }    => write!(f, "xor    v{x:X}, v{y:X}"),
            Insn::add   { y, x }    => write!(f, "add    v{x:X}, v{y:X}"),
            Insn::sub   { y, x }    => write!(f, "sub    v{x:X}, v{y:X}"),
            Insn::shr   { y, x }    => write!(f, "shr    v{x:X}, v{y:X}"),
            Insn::subn  { y, x }    => write!(f, "subn   v{x:X}, v{y:X}"),
            Insn::shl   { y, x }    => write!(f, "shl    v{x:X}, v{y:X}"),
            Insn::sner  { y, x }    => write!(f, "sne    v{x:X}, v{y:X}"),
            Insn::ldi   { A }       => write!(f, "ld     I, ${A:03x}"),
            Insn::jpr   { A }       => write!(f, "jp     v0, ${A:03x}"),
            Insn::rnd   { B, x }    => write!(f, "rnd    v{x:X}, #{B:02x}"),
            Insn::drw   { y, x, n } => write!(f, "drw    v{x:X}, v{y:X}, #{n:x}"),
            Insn::skp   { x }       => write!(f, "skp    v{x:X}"),
            Insn::sknp  { x }       => write!(f, "sknp   v{x:X}"),
            Insn::lddt  { x }       => write!(f, "ld     v{x:X}, DT"),
            Insn::ldk   { x }       => write!(f, "ld     v{x:X}, K"),
            Insn::stdt  { x }       => write!(f, "ld     DT, v{x:X}"),
            Insn::stst  { x }       => write!(f, "ld     ST, v{x:X}"),
            Insn::addi  { x }       => write!(f, "add    I, v{x:X}"),
            Insn::ldf   { x }       => write!(f, "ld     F, v{x:X}"),
            Insn::bcd   { x }       => write!(f, "ld     B, v{x:X}"),
            Insn::stm   { x }       => write!(f, "ld     [I], v{x:X}"),
            Insn::ldm   { x }       => write!(f, "ld     v{x:X}, [I]"),
        }
    }
}
