// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chipvm

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// A stack discipline violation.
///
/// A fault halts the [CPU](crate::cpu::CPU) where it stands, leaving it inspectable
/// until it is reset.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fault {
    /// A `call` was issued with a full call stack
    #[error("stack overflow at {addr:03x}: call stack already holds {depth} return addresses")]
    StackOverflow {
        /// Address of the offending `call`
        addr: u16,
        /// Depth of the stack when the call was made
        depth: usize,
    },
    /// A `ret` was issued with an empty call stack
    #[error("stack underflow at {addr:03x}: return with an empty call stack")]
    StackUnderflow {
        /// Address of the offending `ret`
        addr: u16,
    },
}

/// Error type for chipvm.
#[derive(Debug, Error)]
pub enum Error {
    /// The ROM doesn't fit in program memory
    #[error("rom is {size} bytes, but at most {max} bytes fit in program memory")]
    RomTooLarge {
        /// Size of the offending ROM
        size: usize,
        /// Size of program memory
        max: usize,
    },
    /// The CPU faulted while executing
    #[error(transparent)]
    Fault(#[from] Fault),
    /// Tried to run a CPU which has already faulted
    #[error("cpu halted by an earlier fault: {fault}")]
    Halted {
        /// The [Fault] which halted the CPU
        fault: Fault,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into a variant, but it did not match.
    #[error("no suitable conversion of \"{variant}\" into Variant")]
    InvalidVariant {
        /// The string which failed to become a variant
        variant: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
