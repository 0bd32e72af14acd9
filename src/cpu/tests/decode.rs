// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
use super::*;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new CPU
/// returns the CPU for inspection
fn run_single_op(op: &[u8]) -> CPU {
    let mut cpu = with_program(Variant::Classic, op);
    cpu.v = *INDX;
    cpu.tick().unwrap(); // will panic on a fault
    cpu
}

/// runs a word which isn't an instruction, and checks that only pc moved
fn nop(op: &[u8]) {
    let cpu = run_single_op(op);
    assert_eq!(0x202, cpu.pc);
    assert_eq!(INDX, cpu.v());
    assert_eq!(0, cpu.i);
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test]                 fn cls()   { assert_eq!(0x202, run_single_op(b"\x00\xe0").pc); }
    #[test] #[should_panic] fn ret()   { run_single_op(b"\x00\xee"); }
    #[test]                 fn u0420() { nop(b"\x04\x20"); }
    #[test]                 fn u00e1() { nop(b"\x00\xe1"); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").pc); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").pc); }
    #[test] fn pushes()    { assert_eq!(&[0x202_u16], run_single_op(b"\x22\x30").stack()); }
}
#[rustfmt::skip]
mod skeb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").pc); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").pc); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x40\x01").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x40\x00").pc); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x50\x00").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x50\x10").pc); }
    #[test] fn u5ff1() { nop(b"\x5f\xf1"); }
    #[test] fn u5ff7() { nop(b"\x5f\xf7"); }
    #[test] fn u5fff() { nop(b"\x5f\xff"); }
}
#[rustfmt::skip]
mod mov {
    use super::*;
    #[test] fn w00() { assert_eq!(0x00, run_single_op(b"\x61\x00").v[1]); }
    #[test] fn wc5() { assert_eq!(0xc5, run_single_op(b"\x62\xc5").v[2]); }
    #[test] fn wff() { assert_eq!(0xff, run_single_op(b"\x63\xff").v[3]); }
}
#[rustfmt::skip]
mod add {
    use super::*;
    #[test] fn p00() { assert_eq!(0x01, run_single_op(b"\x71\x00").v[1]); }
    #[test] fn pc5() { assert_eq!(0xc7, run_single_op(b"\x72\xc5").v[2]); }
    #[test] fn pff() { assert_eq!(0x02, run_single_op(b"\x73\xff").v[3]); }
    #[test] fn keeps_vf() { assert_eq!(0x0f, run_single_op(b"\x73\xff").v[0xf]); }
}
#[rustfmt::skip]
mod alu {
    use super::*;
    #[test] fn mov()  { assert_eq!(0x02, run_single_op(b"\x81\x20").v[1]); }
    #[test] fn or()   { assert_eq!(0x03, run_single_op(b"\x81\x21").v[1]); }
    #[test] fn and()  { assert_eq!(0x00, run_single_op(b"\x81\x22").v[1]); }
    #[test] fn xor()  { assert_eq!(0x03, run_single_op(b"\x81\x23").v[1]); }
    #[test] fn add()  { assert_eq!(0x03, run_single_op(b"\x81\x24").v[1]); }
    #[test] fn sub()  { assert_eq!(0xff, run_single_op(b"\x81\x25").v[1]); }
    #[test] fn shr()  { assert_eq!(0x01, run_single_op(b"\x81\x26").v[1]); }
    #[test] fn bsub() { assert_eq!(0x01, run_single_op(b"\x81\x27").v[1]); }
    #[test] fn u8128() { nop(b"\x81\x28"); }
    #[test] fn u8129() { nop(b"\x81\x29"); }
    #[test] fn u812a() { nop(b"\x81\x2a"); }
    #[test] fn u812b() { nop(b"\x81\x2b"); }
    #[test] fn u812c() { nop(b"\x81\x2c"); }
    #[test] fn u812d() { nop(b"\x81\x2d"); }
    #[test] fn shl()  { assert_eq!(0x04, run_single_op(b"\x81\x2e").v[1]); }
    #[test] fn u812f() { nop(b"\x81\x2f"); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x90\x10").pc); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x90\x00").pc); }
    #[test] fn u9ff1() { nop(b"\x9f\xf1"); }
    #[test] fn u9ffe() { nop(b"\x9f\xfe"); }
}
#[rustfmt::skip]
mod movi {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\xa2\x30").i()); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\xa2\x31").i()); }
}
#[rustfmt::skip]
mod jmpr {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\xb2\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\xb2\x31").pc); }
}
#[rustfmt::skip]
mod rand {
    use super::*;
    // for exhaustive testing, see src/cpu/tests.rs
    #[test] fn rand() { assert!(run_single_op(b"\xc0\x01").v[0] <= 1); }
}
#[rustfmt::skip]
mod draw {
    use super::*;
    #[test] fn draw()  { assert!(run_single_op(b"\xd0\x0f").screen().get(0, 0)); }
    #[test] fn dirty() { assert!(run_single_op(b"\xd0\x00").screen().is_dirty()); }
}
#[rustfmt::skip]
mod key {
    use super::*;
    #[test] fn skip_key_equals()     { assert_eq!(0x202, run_single_op(b"\xe0\x9e").pc); }
    #[test] fn skip_key_not_equals() { assert_eq!(0x204, run_single_op(b"\xe0\xa1").pc); }
    #[test] fn uefff() { nop(b"\xef\xff"); }
}
#[rustfmt::skip]
mod io {
    use super::*;
    #[test] fn load_delay_timer()  { assert_eq!(0x0, run_single_op(b"\xf7\x07").v[7]);     }
    #[test] fn wait_for_key()      { assert_eq!(0x200, run_single_op(b"\xf0\x0a").pc);     }
    #[test] fn store_delay_timer() { assert_eq!(0xf, run_single_op(b"\xff\x15").delay());  }
    #[test] fn store_sound_timer() { assert_eq!(0xf, run_single_op(b"\xff\x18").sound());  }
    #[test] fn add_i()             { assert_eq!(0x3, run_single_op(b"\xf3\x1e").i);        }
    #[test] fn load_sprite()       { assert_eq!(0x19, run_single_op(b"\xf5\x29").i);       }
    #[test] fn bcd_convert()       { assert_eq!(0, run_single_op(b"\xf0\x33").i);          }
    #[test] fn store_dma()         { assert_eq!(INDX, run_single_op(b"\xff\x55").v());     }
    #[test] fn load_dma()          { assert_eq!(&mem::FONT[..16], run_single_op(b"\xff\x65").v()); }
    #[test] fn uffff() { nop(b"\xff\xff"); }
    #[test] fn uf000() { nop(b"\xf0\x00"); }
}
