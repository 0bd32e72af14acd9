//! Selects the quirk set of the [super::CPU]

use crate::error::Error;
use std::{fmt::Display, str::FromStr};

/// Selects which family of interpreters to imitate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// COSMAC VIP behavior
    #[default]
    Classic,
    /// CHIP-48 and SUPER-CHIP behavior
    Extended,
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "chip8" | "chip-8" | "vip" => Ok(Variant::Classic),
            "extended" | "chip48" | "chip-48" | "schip" | "superchip" => Ok(Variant::Extended),
            _ => Err(Error::InvalidVariant {
                variant: s.to_string(),
            }),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Classic => write!(f, "classic"),
            Variant::Extended => write!(f, "extended"),
        }
    }
}
