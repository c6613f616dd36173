use std::ops::{Index, IndexMut};

use log::{debug, error, info, trace};

use super::config::{IndexOverflow, Quirks, ShiftSource};
use super::display::Framebuffer;
use super::error::{Error, Result};
use super::input::Keypad;
use super::memory::{Memory, PROGRAM_START_ADDRESS};
use super::opcode::Instruction;
use super::random::RandomNumberProvider;
use super::timer::Timers;

const FLAG_REGISTER: u8 = 0xF;

#[derive(Debug, Default, Clone)]
struct Registers([u8; 16]);

impl Registers {
    fn as_slice_through(&self, idx: u8) -> &[u8] {
        &self.0[0..=(idx as usize)]
    }

    fn clone_from_slice(&mut self, slice: &[u8]) {
        self.0[0..slice.len()].copy_from_slice(slice)
    }
}

impl Index<u8> for Registers {
    type Output = u8;

    fn index(&self, register: u8) -> &Self::Output {
        assert!(register < 16, "Invalid register {:#02x}", register);

        &self.0[register as usize]
    }
}

impl IndexMut<u8> for Registers {
    fn index_mut(&mut self, register: u8) -> &mut Self::Output {
        assert!(register < 16, "Invalid register {:#02x}", register);

        &mut self.0[register as usize]
    }
}

pub const STACK_SIZE: usize = 16;

/// What a call to [`CPU::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction ran to completion. A finished `FX0A` wait reports `WaitForKey`.
    Executed(Instruction),
    /// Blocked on `FX0A` until a key is freshly pressed. Nothing changed.
    AwaitingKey,
}

/// The whole machine: memory, registers, stack, timers, framebuffer and keypad.
///
/// Opcode semantics are the only code that touches registers, memory, `PC`, `SP`, the stack or
/// `I`. The host drives [`CPU::step`] at the CPU clock rate and [`CPU::tick_timers`] at 60Hz,
/// and pushes key state through [`CPU::keypad_mut`].
pub struct CPU {
    // Registers
    v: Registers,
    i: u16,

    // Program Counter
    pc: u16,

    // Stack
    stack: [u16; STACK_SIZE],
    sp: usize,

    memory: Memory,
    framebuffer: Framebuffer,
    keypad: Keypad,
    timers: Timers,
    random_number_provider: Box<dyn RandomNumberProvider>,
    quirks: Quirks,

    // Register waiting for FX0A to complete
    awaiting_key: Option<u8>,
    // Set once a fatal error halts execution
    fault: Option<Error>,
}

impl CPU {
    pub fn new(random_number_provider: Box<dyn RandomNumberProvider>, quirks: Quirks) -> Self {
        Self {
            v: Registers::default(),
            i: 0,
            pc: PROGRAM_START_ADDRESS,

            stack: [0; STACK_SIZE],
            sp: 0,

            memory: Memory::default(),
            framebuffer: Framebuffer::default(),
            keypad: Keypad::default(),
            timers: Timers::default(),
            random_number_provider,
            quirks,

            awaiting_key: None,
            fault: None,
        }
    }

    /// Return to the power-on state. Memory is wiped apart from the font, so the program has to
    /// be loaded again.
    pub fn reset(&mut self) {
        self.v = Registers::default();
        self.i = 0;
        self.pc = PROGRAM_START_ADDRESS;
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.memory = Memory::default();
        self.framebuffer = Framebuffer::default();
        self.keypad = Keypad::default();
        self.timers = Timers::default();
        self.random_number_provider.reseed();
        self.awaiting_key = None;
        self.fault = None;

        info!("CPU reset to power-on state");
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)?;
        info!(
            "Loaded program of {} bytes at {:#06x}",
            program.len(),
            PROGRAM_START_ADDRESS
        );

        Ok(())
    }

    /// Run one instruction cycle.
    ///
    /// Errors are fatal: the CPU halts and every later call returns the same error until
    /// [`CPU::reset`]. On error `PC` is left pointing at the failing instruction and no other
    /// state has changed.
    pub fn step(&mut self) -> Result<Cycle> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if let Some(register) = self.awaiting_key {
            return Ok(self.resume_key_wait(register));
        }

        let result = self.fetch_and_execute();
        if let Err(fault) = &result {
            error!("Halting CPU: {}", fault);
            self.fault = Some(fault.clone());
        }

        result
    }

    /// Count the delay and sound timers down by one 60Hz period.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn v(&self, register: u8) -> u8 {
        self.v[register]
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay.current_value()
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound.current_value()
    }

    pub fn is_sound_playing(&self) -> bool {
        self.timers.is_sound_playing()
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    fn fetch_and_execute(&mut self) -> Result<Cycle> {
        let current_pc = self.pc;
        let opcode = self
            .memory
            .word(current_pc)
            .ok_or(Error::OutOfBoundsFetch { pc: current_pc })?;
        let instruction = Instruction::decode(opcode).ok_or(Error::UnknownOpcode {
            opcode,
            pc: current_pc,
        })?;
        trace!("{:04x}: {:04x} {:?}", current_pc, opcode, instruction);

        self.pc = current_pc.wrapping_add(2);
        if let Err(fault) = self.execute(instruction, current_pc) {
            self.pc = current_pc;
            return Err(fault);
        }

        if self.awaiting_key.is_some() {
            Ok(Cycle::AwaitingKey)
        } else {
            Ok(Cycle::Executed(instruction))
        }
    }

    fn resume_key_wait(&mut self, register: u8) -> Cycle {
        match self.keypad.take_fresh_press() {
            Some(key) => {
                debug!("Key {:#x} pressed, resuming into V{:X}", key, register);
                self.v[register] = key;
                self.pc = self.pc.wrapping_add(2);
                self.awaiting_key = None;

                Cycle::Executed(Instruction::WaitForKey { x: register })
            }
            None => Cycle::AwaitingKey,
        }
    }

    /// Apply `instruction`. `PC` has already been advanced past it, `current_pc` is where it
    /// was fetched from.
    fn execute(&mut self, instruction: Instruction, current_pc: u16) -> Result<()> {
        use Instruction::*;

        match instruction {
            // 00E0: Clear screen
            Cls => self.framebuffer.cls(),

            // 00EE: Return from subroutine
            Ret => {
                if self.sp == 0 {
                    return Err(Error::StackUnderflow { pc: current_pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }

            // 1NNN: Jump to address NNN
            Jump { nnn } => self.pc = nnn,

            // 2NNN: Call NNN
            Call { nnn } => {
                if self.sp == STACK_SIZE {
                    return Err(Error::StackOverflow { pc: current_pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }

            // 3XKK: Skip next instruction if VX is equal to KK.
            SkipEqualByte { x, kk } => self.skip_if(self.v[x] == kk),

            // 4XKK: Skip next instruction if VX is not equal to KK.
            SkipNotEqualByte { x, kk } => self.skip_if(self.v[x] != kk),

            // 5XY0: Skip next instruction if VX is equal to VY.
            SkipEqualRegisters { x, y } => self.skip_if(self.v[x] == self.v[y]),

            // 6XKK: Set VX to KK.
            LoadByte { x, kk } => self.v[x] = kk,

            // 7XKK: Add KK to VX, carry flag is not changed.
            AddByte { x, kk } => self.v[x] = self.v[x].wrapping_add(kk),

            // 8XY0: Set VX to the value of VY.
            LoadRegister { x, y } => self.v[x] = self.v[y],

            // 8XY1: Set VX to the result of VX | VY
            Or { x, y } => self.v[x] |= self.v[y],

            // 8XY2: Set VX to the result of VX & VY
            And { x, y } => self.v[x] &= self.v[y],

            // 8XY3: Set VX to the result of VX ^ VY
            Xor { x, y } => self.v[x] ^= self.v[y],

            // 8XY4: Add VY to VX. VF is set to 1 if there is a carry, 0 if not.
            AddRegisters { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v[FLAG_REGISTER] = carry as u8;
            }

            // 8XY5: Subtract VY from VX. VF is set to 0 if there is a borrow, 1 if not.
            Sub { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.v[x] = vx.wrapping_sub(vy);
                self.v[FLAG_REGISTER] = (vx >= vy) as u8;
            }

            // 8XY6: Shift right by 1, the bit shifted out goes to VF.
            ShiftRight { x, y } => {
                let source = self.shift_source(x, y);
                self.v[x] = source >> 1;
                self.v[FLAG_REGISTER] = source & 0x1;
            }

            // 8XY7: Set VX to the result of VY - VX. VF is set 0 when there is a borrow, 1
            // if not.
            SubN { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.v[x] = vy.wrapping_sub(vx);
                self.v[FLAG_REGISTER] = (vy >= vx) as u8;
            }

            // 8XYE: Shift left by 1, the bit shifted out goes to VF.
            ShiftLeft { x, y } => {
                let source = self.shift_source(x, y);
                self.v[x] = source << 1;
                self.v[FLAG_REGISTER] = (source & 0x80) >> 7;
            }

            // 9XY0: Skip the next instruction if VX is not equal VY
            SkipNotEqualRegisters { x, y } => self.skip_if(self.v[x] != self.v[y]),

            // ANNN: Set `I` to address NNN
            LoadIndex { nnn } => self.i = nnn,

            // BNNN: Jump to the address NNN + V0
            JumpOffset { nnn } => self.pc = nnn + self.v[0] as u16,

            // CXKK: Set the VX to the result of rand() & KK.
            Random { x, kk } => self.v[x] = self.random_number_provider.next_byte() & kk,

            // DXYN: Draw a sprite at VX, VY of width 8 and height N.
            Draw { x, y, n } => {
                let (x, y) = (self.v[x], self.v[y]);
                let sprite = self
                    .memory
                    .slice(self.i, n as usize)
                    .ok_or_else(|| out_of_bounds(self.i, n as usize, current_pc))?;
                let collided = self.framebuffer.draw_sprite(x, y, sprite);
                self.v[FLAG_REGISTER] = collided as u8;
            }

            // EX9E: Skip the next instruction if the key stored in VX is pressed
            SkipKeyPressed { x } => self.skip_if(self.keypad.is_key_down(self.v[x])),

            // EXA1: Skip the next instruction if the key stored in VX isn't pressed
            SkipKeyNotPressed { x } => self.skip_if(!self.keypad.is_key_down(self.v[x])),

            // FX07: Set the VX value to the value of the delay timer
            LoadDelayTimer { x } => self.v[x] = self.timers.delay.current_value(),

            // FX0A: Block execution until a key is pressed. Pressed key is stored in VX.
            WaitForKey { x } => {
                debug!("Waiting for key press into V{:X}", x);
                self.pc = current_pc;
                self.keypad.clear_fresh_press();
                self.awaiting_key = Some(x);
            }

            // FX15: Set the delay timer to the value of VX
            SetDelayTimer { x } => self.timers.delay.set_value(self.v[x]),

            // FX18: Set the sound timer to the value of VX
            SetSoundTimer { x } => self.timers.sound.set_value(self.v[x]),

            // FX1E: Add VX to I
            AddIndex { x } => {
                let sum = self.i as u32 + self.v[x] as u32;
                match self.quirks.index_overflow {
                    IndexOverflow::Wrap16 => self.i = sum as u16,
                    IndexOverflow::Wrap12 => self.i = (sum & 0xFFF) as u16,
                    IndexOverflow::Flag => {
                        self.i = sum as u16;
                        self.v[FLAG_REGISTER] = (sum > 0xFFF) as u8;
                    }
                }
            }

            // FX29: Set I to the location of the sprite for the character in VX.
            LoadFont { x } => self.i = self.memory.font_address_for_character(self.v[x]),

            // FX33: Store BCD representation of VX in memory locations I, I+1, and I+2.
            StoreBcd { x } => {
                let value = self.v[x];
                let i = self.i;
                let digits = self
                    .memory
                    .slice_mut(i, 3)
                    .ok_or_else(|| out_of_bounds(i, 3, current_pc))?;
                digits[0] = value / 100;
                digits[1] = (value / 10) % 10;
                digits[2] = value % 10;
            }

            // FX55: Store registers V0 through VX in memory starting at I.
            StoreRegisters { x } => {
                let i = self.i;
                let length = x as usize + 1;
                self.memory
                    .slice_mut(i, length)
                    .ok_or_else(|| out_of_bounds(i, length, current_pc))?
                    .copy_from_slice(self.v.as_slice_through(x));
            }

            // FX65: Read into registers V0 through VX starting at I.
            LoadRegisters { x } => {
                let length = x as usize + 1;
                let values = self
                    .memory
                    .slice(self.i, length)
                    .ok_or_else(|| out_of_bounds(self.i, length, current_pc))?;
                self.v.clone_from_slice(values);
            }
        }

        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        match self.quirks.shift_source {
            ShiftSource::Vx => self.v[x],
            ShiftSource::Vy => self.v[y],
        }
    }
}

fn out_of_bounds(base_address: u16, length: usize, pc: u16) -> Error {
    Error::MemoryOutOfBounds {
        address: Memory::first_invalid_address(base_address, length),
        pc,
    }
}
