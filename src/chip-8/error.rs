use thiserror::Error;

/// Fatal conditions for an emulation session.
///
/// Every runtime variant carries the address of the instruction that failed so a host can
/// report where a ROM went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Instruction fetch out of bounds at pc {pc:#06x}")]
    OutOfBoundsFetch { pc: u16 },

    #[error("Unknown opcode {opcode:#06x} at pc {pc:#06x}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("Stack overflow calling from pc {pc:#06x}")]
    StackOverflow { pc: u16 },

    #[error("Stack underflow returning from pc {pc:#06x}")]
    StackUnderflow { pc: u16 },

    #[error("Memory access out of bounds at address {address:#06x} (pc {pc:#06x})")]
    MemoryOutOfBounds { address: usize, pc: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("Invalid clock rate {0} Hz, must be between 1 and 1000000")]
    InvalidClockRate(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
