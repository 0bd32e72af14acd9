//! Runs whole programs through chipvm's public API
use chipvm::{io::Headless, *};
use std::collections::VecDeque;

/// A [Frontend] which replays a fixed list of events, one list per frame,
/// and records everything the emulator sends it
#[derive(Debug, Default)]
struct Script {
    events: VecDeque<Vec<Event>>,
    presented: usize,
    sounds: Vec<bool>,
}

impl Script {
    fn new(frames: impl IntoIterator<Item = Vec<Event>>) -> Self {
        Script {
            events: frames.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl Frontend for Script {
    fn poll(&mut self) -> Vec<Event> {
        self.events.pop_front().unwrap_or_default()
    }
    fn present(&mut self, _: &Screen) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
    fn sound(&mut self, gate: bool) {
        self.sounds.push(gate);
    }
}

fn emulator(rom: &[u8]) -> Emulator {
    Emulator::new(rom, Config::default()).expect("Test roms should fit in memory")
}

mod programs {
    use super::*;

    #[test]
    fn add_registers() -> Result<()> {
        let mut cpu = CPU::new(
            &[
                0x60, 0x05, // ld v0, #05
                0x61, 0x03, // ld v1, #03
                0x80, 0x14, // add v0, v1
                0x00, 0x00, // not an instruction
            ],
            Variant::Classic,
        )?;
        cpu.multistep(3)?;
        assert_eq!(8, cpu.v()[0]);
        assert_eq!(0, cpu.v()[0xf]);
        assert_eq!(0x206, cpu.pc());
        Ok(())
    }

    #[test]
    fn call_and_return() -> Result<()> {
        let mut cpu = CPU::new(
            &[
                0x22, 0x06, // call 206
                0x60, 0x01, // ld v0, #01
                0x12, 0x04, // jp 204
                0x61, 0x02, // ld v1, #02
                0x00, 0xee, // ret
            ],
            Variant::Classic,
        )?;
        cpu.multistep(5)?;
        assert_eq!((1, 2), (cpu.v()[0], cpu.v()[1]));
        assert_eq!(0x204, cpu.pc());
        assert!(cpu.stack().is_empty());
        Ok(())
    }

    #[test]
    fn runaway_recursion_overflows() -> Result<()> {
        // call 200, forever
        let mut cpu = CPU::new(&[0x22, 0x00], Variant::Classic)?;
        cpu.multistep(12)?;
        assert_eq!(12, cpu.stack().len());

        match cpu.tick() {
            Err(Error::Fault(fault)) => assert_eq!(
                Fault::StackOverflow {
                    addr: 0x200,
                    depth: 12
                },
                fault
            ),
            other => panic!("expected a stack overflow, got {other:?}"),
        }
        assert_eq!(0x200, cpu.pc());
        assert_eq!(12, cpu.stack().len());
        Ok(())
    }

    #[test]
    fn font_is_read_only() -> Result<()> {
        let mut cpu = CPU::new(
            &[
                0xa0, 0x00, // ld i, 000
                0x60, 0xff, // ld v0, #ff
                0xf0, 0x55, // ld [i], v0
                0xf0, 0x33, // bcd v0
            ],
            Variant::Classic,
        )?;
        cpu.multistep(4)?;
        assert_eq!(Some(0xf0), cpu.mem().grab(0).copied());
        assert_eq!(Some(0x90), cpu.mem().grab(1).copied());
        Ok(())
    }

    #[test]
    fn variants_shift_differently() -> Result<()> {
        let rom = [
            0x61, 0x03, // ld v1, #03
            0x62, 0xf0, // ld v2, #f0
            0x81, 0x26, // shr v1, v2
        ];
        let mut classic = CPU::new(&rom, Variant::Classic)?;
        classic.multistep(3)?;
        assert_eq!((0x78, 0), (classic.v()[1], classic.v()[0xf]));

        let mut extended = CPU::new(&rom, Variant::Extended)?;
        extended.multistep(3)?;
        assert_eq!((0x01, 1), (extended.v()[1], extended.v()[0xf]));
        Ok(())
    }

    #[test]
    fn rom_too_large() {
        assert!(CPU::new(&[0; 0xe00], Variant::Classic).is_ok());
        match Emulator::new(&[0; 0xe01], Config::default()) {
            Err(Error::RomTooLarge { size, max }) => assert_eq!((0xe01, 0xe00), (size, max)),
            other => panic!("expected RomTooLarge, got {other:?}"),
        }
    }
}

mod scheduler {
    use super::*;

    /// ld v0, #03; ld dt, v0; ld st, v0; jp 206
    const TIMERS: [u8; 8] = [0x60, 0x03, 0xf0, 0x15, 0xf0, 0x18, 0x12, 0x06];

    #[test]
    fn runs_ipf_instructions_per_frame() -> Result<()> {
        let mut emu = emulator(&[0x12, 0x00]);
        for frame in 1..=5 {
            assert!(emu.frame(&mut Headless)?);
            assert_eq!(frame * 12, emu.cpu().cycle());
        }
        assert_eq!(5, emu.frames());
        Ok(())
    }

    #[test]
    fn timers_tick_once_per_frame() -> Result<()> {
        let mut emu = emulator(&TIMERS);
        let mut ui = Script::default();
        for _ in 0..4 {
            emu.frame(&mut ui)?;
        }
        assert_eq!(0, emu.cpu().delay());
        assert_eq!(vec![true, true, false, false], ui.sounds);
        assert!(!emu.sound_gate());
        Ok(())
    }

    #[test]
    fn pause_freezes_everything() -> Result<()> {
        let mut emu = emulator(&TIMERS);
        let mut ui = Script::new([
            vec![],
            vec![Event::TogglePause],
            vec![],
            vec![Event::TogglePause],
        ]);

        emu.frame(&mut ui)?;
        let (delay, cycle) = (emu.cpu().delay(), emu.cpu().cycle());
        assert_eq!(2, delay);

        emu.frame(&mut ui)?;
        emu.frame(&mut ui)?;
        assert_eq!(RunState::Paused, emu.state());
        assert_eq!((delay, cycle), (emu.cpu().delay(), emu.cpu().cycle()));

        emu.frame(&mut ui)?;
        assert_eq!(RunState::Running, emu.state());
        assert_eq!(1, emu.cpu().delay());
        // the sound timer kept its value, but the gate closed while paused
        assert_eq!(vec![true, false, false, true], ui.sounds);
        Ok(())
    }

    #[test]
    fn start_paused() -> Result<()> {
        let config = Config {
            pause: true,
            ..Default::default()
        };
        let mut emu = Emulator::new(&TIMERS, config)?;
        emu.frame(&mut Headless)?;
        assert_eq!(0, emu.cpu().cycle());
        assert_eq!(0x200, emu.cpu().pc());
        Ok(())
    }

    #[test]
    fn reset_starts_over() -> Result<()> {
        let mut emu = emulator(&TIMERS);
        emu.ipf = 3;
        let mut ui = Script::new([vec![], vec![], vec![Event::Reset]]);
        emu.frame(&mut ui)?;
        emu.frame(&mut ui)?;
        assert_eq!(6, emu.cpu().cycle());
        assert_eq!(1, emu.cpu().delay());

        emu.frame(&mut ui)?;
        // the reset frame runs the first three instructions again
        assert_eq!(3, emu.cpu().cycle());
        assert_eq!(0x206, emu.cpu().pc());
        assert_eq!(2, emu.cpu().delay());
        assert_eq!(3, emu.frames());
        Ok(())
    }

    #[test]
    fn quit_stops_for_good() -> Result<()> {
        let mut emu = emulator(&TIMERS);
        let mut ui = Script::new([vec![], vec![Event::Quit], vec![Event::Reset]]);
        assert!(emu.frame(&mut ui)?);
        assert!(!emu.frame(&mut ui)?);
        assert!(!emu.frame(&mut ui)?);
        assert_eq!(RunState::Stopped, emu.state());
        assert_eq!(12, emu.cpu().cycle());
        assert_eq!(1, emu.frames());
        Ok(())
    }

    #[test]
    fn run_returns_on_quit() -> Result<()> {
        let mut emu = emulator(&[0x12, 0x00]);
        let mut ui = Script::new([vec![], vec![], vec![Event::Quit]]);
        emu.run(&mut ui)?;
        assert_eq!(2, emu.frames());
        Ok(())
    }

    #[test]
    fn present_only_when_dirty() -> Result<()> {
        // cls; jp 202
        let mut emu = emulator(&[0x00, 0xe0, 0x12, 0x02]);
        let mut ui = Script::default();
        for _ in 0..3 {
            emu.frame(&mut ui)?;
        }
        assert_eq!(1, ui.presented);

        // drw v0, v0, 5; jp 200
        let mut emu = emulator(&[0xd0, 0x05, 0x12, 0x00]);
        let mut ui = Script::default();
        for _ in 0..3 {
            emu.frame(&mut ui)?;
        }
        assert_eq!(3, ui.presented);
        Ok(())
    }

    #[test]
    fn keys_reach_the_program() -> Result<()> {
        // ld v1, k; jp 202
        let mut emu = emulator(&[0xf1, 0x0a, 0x12, 0x02]);
        let mut ui = Script::new([
            vec![Event::Press(0xa)],
            vec![],
            vec![Event::Release(0xa)],
        ]);
        emu.frame(&mut ui)?;
        emu.frame(&mut ui)?;
        assert_eq!(Some(0xa), emu.cpu().awaiting_key());
        assert_eq!(0x200, emu.cpu().pc());

        emu.frame(&mut ui)?;
        assert_eq!(0xa, emu.cpu().v()[1]);
        assert_eq!(0x202, emu.cpu().pc());
        Ok(())
    }

    #[test]
    fn invalid_key_is_dropped() -> Result<()> {
        // ld v0, k; jp 202
        let mut emu = emulator(&[0xf0, 0x0a, 0x12, 0x02]);
        let mut ui = Script::new([vec![Event::Press(0x10), Event::Press(0x3)]]);
        assert!(emu.frame(&mut ui)?);
        // the events after it still land, and the frame still runs
        assert_eq!(Some(0x3), emu.cpu().awaiting_key());
        assert_eq!(12, emu.cpu().cycle());
        Ok(())
    }

    #[test]
    fn invalid_key_keeps_quit() -> Result<()> {
        let mut emu = emulator(&[0x12, 0x00]);
        let mut ui = Script::new([vec![Event::Press(0x10), Event::Quit]]);
        assert!(!emu.frame(&mut ui)?);
        assert_eq!(RunState::Stopped, emu.state());
        Ok(())
    }

    #[test]
    fn fault_halts_until_reset() -> Result<()> {
        // ld v0, #05; ld dt, v0; ret
        let mut emu = emulator(&[0x60, 0x05, 0xf0, 0x15, 0x00, 0xee]);
        let mut ui = Script::new([vec![], vec![], vec![Event::Reset]]);

        // faults are reported through the cpu, not as errors
        assert!(emu.frame(&mut ui)?);
        assert_eq!(Some(Fault::StackUnderflow { addr: 0x204 }), emu.cpu().fault());
        assert_eq!(0x204, emu.cpu().pc());
        assert_eq!(5, emu.cpu().delay());

        // nothing runs, and the timers hold still
        emu.frame(&mut ui)?;
        assert_eq!(3, emu.cpu().cycle());
        assert_eq!(5, emu.cpu().delay());

        // reset clears the fault, and the program runs into it again
        emu.frame(&mut ui)?;
        assert_eq!(3, emu.cpu().cycle());
        assert_eq!(Some(Fault::StackUnderflow { addr: 0x204 }), emu.cpu().fault());
        assert_eq!(3, emu.frames());
        Ok(())
    }
}
