// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory

use std::fmt::{Display, Formatter, Result};

/// Width of the display, in pixels
pub const WIDTH: usize = 64;
/// Height of the display, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 monochrome framebuffer, plus a flag marking it for redraw
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<bool>,
    dirty: bool,
}

impl Screen {
    /// Creates a blank screen
    pub fn new() -> Self {
        Screen {
            pixels: vec![false; WIDTH * HEIGHT],
            dirty: false,
        }
    }

    /// Turns every pixel off, and marks the screen dirty
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::screen::*;
    /// let mut screen = Screen::new();
    /// screen.xor(3, 4, true);
    /// screen.clear();
    /// assert!(screen.as_slice().iter().all(|&px| !px));
    /// assert!(screen.is_dirty());
    /// ```
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.dirty = true;
    }

    /// Gets the pixel at (x, y). Off-screen pixels are off.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[y * WIDTH + x]
    }

    /// XORs `bit` into the pixel at (x, y), and reports a collision
    /// (a lit pixel being switched off). Off-screen pixels are ignored.
    ///
    /// Does not touch the dirty flag; see [Screen::mark_dirty].
    /// # Examples
    /// ```rust
    /// # use chipvm::cpu::screen::*;
    /// let mut screen = Screen::new();
    /// assert!(!screen.xor(0, 0, true));
    /// assert!(screen.get(0, 0));
    /// assert!(screen.xor(0, 0, true));
    /// assert!(!screen.get(0, 0));
    /// ```
    pub fn xor(&mut self, x: usize, y: usize, bit: bool) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let pixel = &mut self.pixels[y * WIDTH + x];
        let collision = bit && *pixel;
        *pixel ^= bit;
        collision
    }

    /// Marks the screen as needing a redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Reports whether the screen changed since it was last presented
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, returning its previous value
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Gets the pixels in row-major order
    pub fn as_slice(&self) -> &[bool] {
        &self.pixels
    }

    /// Iterates over the rows of the screen, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks_exact(WIDTH)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.rows() {
            for &pixel in row {
                write!(f, "{}", if pixel { '█' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
