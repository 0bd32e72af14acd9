//! chipvm-disasm: lists the instructions in a Chip-8 ROM

use chipvm::{cpu::mem::ENTRY_POINT, error::Result, Dis, Disassembler};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    let disassembler = Dis::default();
    for (addr, insn) in contents
        .get(options.offset..)
        .unwrap_or_default()
        .chunks_exact(2)
        .enumerate()
    {
        let insn = u16::from_be_bytes([insn[0], insn[1]]);
        println!(
            "{}",
            format_args!(
                "{:03x}: {} {:04x}",
                2 * addr + ENTRY_POINT as usize + options.offset,
                disassembler.once(insn),
                insn.bright_black(),
            )
        );
    }
    Ok(())
}
