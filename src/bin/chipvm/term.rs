//! Draws the screen on a truecolor terminal, and reads the keyboard in raw mode

use super::args::Arguments;
use chipvm::{cpu::screen::Screen, error::Result, Event, Frontend};
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyModifiers},
    terminal,
};
use owo_colors::OwoColorize;
use std::{fmt::Write as _, io::Write as _, time::Duration};

type Rgb = (u8, u8, u8);

/// Frames a key stays held after its last press or repeat.
///
/// Terminals don't report key-up, so releases are inferred.
pub const HOLD_FRAMES: usize = 6;

/// The left-hand block of a qwerty keyboard, laid over the COSMAC hex keypad
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  =>  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
#[rustfmt::skip]
const KEYMAP: [(char, usize); 16] = [
    ('1', 0x1), ('2', 0x2), ('3', 0x3), ('4', 0xc),
    ('q', 0x4), ('w', 0x5), ('e', 0x6), ('r', 0xd),
    ('a', 0x7), ('s', 0x8), ('d', 0x9), ('f', 0xe),
    ('z', 0xa), ('x', 0x0), ('c', 0xb), ('v', 0xf),
];

fn rgb(color: u32) -> Rgb {
    let [_, r, g, b] = color.to_be_bytes();
    (r, g, b)
}

fn keypad(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    KEYMAP.iter().find(|(k, _)| *k == c).map(|&(_, key)| key)
}

/// A [Frontend] which draws two rows of pixels per line of text
#[derive(Debug, PartialEq, Eq)]
pub struct Terminal {
    pub fg: Rgb,
    pub bg: Rgb,
    pub frame_limit: Option<usize>,
    pub bell: bool,
    frames: usize,
    gate: bool,
    /// Frames left until each key is released
    held: [usize; 16],
    raw: bool,
}

impl Terminal {
    /// Puts the terminal in raw mode and clears it, ready for the first frame.
    ///
    /// Raw mode is undone when the [Terminal] is dropped.
    pub fn open(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.raw = true;
        let mut out = std::io::stdout().lock();
        // clear, and hide the cursor
        write!(out, "\x1b[2J\x1b[?25l")?;
        out.flush()?;
        Ok(())
    }

    fn shade(&self, pixel: bool) -> Rgb {
        if pixel {
            self.fg
        } else {
            self.bg
        }
    }

    /// Renders the screen, starting from the top left corner
    pub fn render(&self, screen: &Screen) -> String {
        let mut frame = String::from("\x1b[H");
        let rows: Vec<&[bool]> = screen.rows().collect();
        for pair in rows.chunks(2) {
            let (top, bottom) = (pair[0], pair.get(1).copied().unwrap_or(&[]));
            for (x, &upper) in top.iter().enumerate() {
                let (fg, bg) = (
                    self.shade(upper),
                    self.shade(bottom.get(x).copied().unwrap_or_default()),
                );
                let _ = write!(
                    frame,
                    "{}",
                    '▀'.truecolor(fg.0, fg.1, fg.2).on_truecolor(bg.0, bg.1, bg.2)
                );
            }
            // raw mode doesn't return the carriage for us
            frame.push_str("\r\n");
        }
        frame
    }

    /// Translates one keystroke into an [Event]
    pub fn key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
        match code {
            KeyCode::Esc => Some(Event::Quit),
            // raw mode swallows the interrupt
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Event::Quit),
            KeyCode::Char(' ') => Some(Event::TogglePause),
            KeyCode::Backspace => Some(Event::Reset),
            KeyCode::Char(c) => {
                let key = keypad(c)?;
                let was_held = self.held[key] > 0;
                self.held[key] = HOLD_FRAMES;
                (!was_held).then_some(Event::Press(key))
            }
            _ => None,
        }
    }

    /// Counts every held key down by a frame, releasing the ones that run out
    fn decay(&mut self, events: &mut Vec<Event>) {
        for (key, frames) in self.held.iter_mut().enumerate() {
            if *frames > 0 {
                *frames -= 1;
                if *frames == 0 {
                    events.push(Event::Release(key));
                }
            }
        }
    }

    /// Reads every keystroke waiting on the terminal, without blocking
    fn read_input(&mut self, events: &mut Vec<Event>) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            if let TermEvent::Key(key) = event::read()? {
                events.extend(self.key(key.code, key.modifiers));
            }
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if !self.raw {
            return;
        }
        print!("\x1b[?25h");
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("couldn't leave raw mode: {e}");
        }
    }
}

impl From<&Arguments> for Terminal {
    fn from(value: &Arguments) -> Self {
        Terminal {
            fg: rgb(value.fg),
            bg: rgb(value.bg),
            frame_limit: value.frames,
            bell: value.bell,
            frames: 0,
            gate: false,
            held: [0; 16],
            raw: false,
        }
    }
}

impl Frontend for Terminal {
    fn poll(&mut self) -> Vec<Event> {
        self.frames += 1;
        let mut events = vec![];
        if self.raw {
            if let Err(e) = self.read_input(&mut events) {
                log::warn!("couldn't read the keyboard: {e}");
            }
        }
        self.decay(&mut events);
        if matches!(self.frame_limit, Some(limit) if self.frames > limit) {
            events.push(Event::Quit);
        }
        events
    }

    fn present(&mut self, screen: &Screen) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(self.render(screen).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn sound(&mut self, gate: bool) {
        if self.bell && gate && !self.gate {
            print!("\x07");
        }
        self.gate = gate;
    }
}
