//! Controls the [Quirks] behavior of the CPU on a granular level.

use super::Variant;

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `true` is COSMAC VIP behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Binary ops in `8xy`(`1`, `2`, `3`) set vF to 0 afterward
    pub vf_reset: bool,
    /// Shift ops in `8xy`(`6`, `E`) take their input from vY, rather than vX
    pub shift_from_y: bool,
    /// DMA instructions `Fx55`/`Fx65` leave I at I + x + 1
    pub dma_inc: bool,
}

impl From<Variant> for Quirks {
    fn from(value: Variant) -> Self {
        let classic = value == Variant::Classic;
        Quirks {
            vf_reset: classic,
            shift_from_y: classic,
            dma_inc: classic,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::from(Variant::default())
    }
}
