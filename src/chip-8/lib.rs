//! A CHIP-8 virtual machine core.
//!
//! [`CPU`] owns all machine state and runs one instruction per [`CPU::step`]. [`Emulator`]
//! wraps it with the loaded ROM and a wall clock schedule that keeps the CPU clock and the
//! 60Hz timers independent. Painting pixels, playing the tone and reading the keyboard are
//! left to the host.
mod config;
mod cpu;
mod display;
mod emulator;
mod error;
mod input;
mod memory;
mod opcode;
mod random;
mod timer;

pub use config::{Config, IndexOverflow, Quirks, ShiftSource, MAX_CYCLES_PER_SECOND};
pub use cpu::{Cycle, CPU, STACK_SIZE};
pub use display::{Framebuffer, FRAME_BUFFER_PIXEL_HEIGHT, FRAME_BUFFER_PIXEL_WIDTH};
pub use emulator::{Emulator, Frame, MAX_CATCH_UP};
pub use error::{Error, Result};
pub use input::{Keypad, KEY_COUNT};
pub use memory::{Memory, FONTSET_BASE_ADDRESS, MAX_PROGRAM_SIZE, PROGRAM_START_ADDRESS};
pub use opcode::Instruction;
pub use random::{RandomNumberProvider, WallClockRng};
pub use timer::{Timer, Timers, TIMER_HZ};
