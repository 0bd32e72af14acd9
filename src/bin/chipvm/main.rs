// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chipvm: A chip-8 interpreter in Rust, drawn in the terminal

mod args;
mod term;

use args::Arguments;
use chipvm::{error::Result, Config, Emulator};
use owo_colors::OwoColorize;
use term::Terminal;

fn main() {
    env_logger::init();
    let options = Arguments::parse();
    if let Err(e) = run(&options) {
        eprintln!("{}: {}", options.file.display(), e.bold().red());
        std::process::exit(1);
    }
}

fn run(options: &Arguments) -> Result<()> {
    let rom = std::fs::read(&options.file)?;
    let mut emu = Emulator::new(&rom, Config::from(options))?;
    log::info!(
        "loaded {} ({} bytes), {} mode at {} instructions per frame",
        options.file.display(),
        rom.len(),
        emu.cpu().flags.variant,
        emu.ipf
    );
    let mut ui = Terminal::from(options);
    ui.open()?;
    emu.run(&mut ui)?;
    if options.registers {
        emu.cpu().dump();
    }
    if let Some(fault) = emu.cpu().fault() {
        eprintln!("{}", fault.bold().red());
    }
    Ok(())
}
