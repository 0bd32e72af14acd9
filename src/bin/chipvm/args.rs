//! Parses arguments into a struct

use chipvm::{Config, Variant};
use gumdrop::*;
use std::path::PathBuf;

/// Parses a hexadecimal string into a u32
fn parse_hex(value: &str) -> std::result::Result<u32, std::num::ParseIntError> {
    u32::from_str_radix(value.trim_start_matches('#'), 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
pub struct Arguments {
    #[options(help = "Load a ROM to run on chipvm.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable live disassembly at startup.")]
    pub debug: bool,
    #[options(help = "Start paused. SPACE toggles pause.")]
    pub pause: bool,
    #[options(help = "Set the instructions-per-second rate.", default = "700", meta = "IPS")]
    pub speed: usize,
    #[options(help = "Run in (classic, extended) mode.")]
    pub mode: Option<Variant>,
    #[options(help = "Quit after running this many frames.", meta = "N")]
    pub frames: Option<usize>,
    #[options(
        no_short,
        help = "Set the foreground color, as hex RGB.",
        parse(try_from_str = "parse_hex"),
        default = "ffffff",
        meta = "RGB"
    )]
    pub fg: u32,
    #[options(
        no_short,
        help = "Set the background color, as hex RGB.",
        parse(try_from_str = "parse_hex"),
        default = "000000",
        meta = "RGB"
    )]
    pub bg: u32,
    #[options(help = "Ring the terminal bell when the sound timer starts.")]
    pub bell: bool,
    #[options(help = "Dump the registers on exit.")]
    pub registers: bool,
}

impl Arguments {
    pub fn parse() -> Arguments {
        Arguments::parse_args_default_or_exit()
    }
}

impl From<&Arguments> for Config {
    fn from(value: &Arguments) -> Self {
        Config {
            ips: value.speed,
            variant: value.mode.unwrap_or_default(),
            debug: value.debug,
            pause: value.pause,
        }
    }
}
