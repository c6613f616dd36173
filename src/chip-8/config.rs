use crate::error::{Error, Result};

/// Source register for `8XY6` and `8XYE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSource {
    /// Shift VX in place. What most modern interpreters do.
    Vx,
    /// Shift VY and store the result in VX, as the COSMAC VIP interpreter did.
    Vy,
}

/// Behavior of `FX1E` when `I + VX` leaves the 12 bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOverflow {
    /// `I` wraps at 16 bits, VF is untouched.
    Wrap16,
    /// `I` wraps at 12 bits, VF is untouched.
    Wrap12,
    /// `I` wraps at 16 bits and VF is set to 1 when the result is past 0xFFF, 0 otherwise.
    /// The Amiga interpreter did this and at least one game relies on it.
    Flag,
}

/// Points where historical interpreters disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub shift_source: ShiftSource,
    pub index_overflow: IndexOverflow,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            shift_source: ShiftSource::Vx,
            index_overflow: IndexOverflow::Wrap16,
        }
    }
}

/// Fastest CPU clock accepted. Far beyond any real interpreter and still leaves a cycle period
/// of a microsecond, so the scheduler always makes progress.
pub const MAX_CYCLES_PER_SECOND: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// CPU instructions per second. Timers always run at 60Hz regardless.
    pub cycles_per_second: u32,
    pub quirks: Quirks,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.cycles_per_second == 0 || self.cycles_per_second > MAX_CYCLES_PER_SECOND {
            return Err(Error::InvalidClockRate(self.cycles_per_second));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles_per_second: 1000,
            quirks: Quirks::default(),
        }
    }
}
