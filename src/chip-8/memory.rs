use crate::error::{Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START_ADDRESS: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START_ADDRESS as usize;
pub const FONTSET_BASE_ADDRESS: u16 = 0x50;
const FONT_GLYPH_SIZE: u16 = 5;
const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Main memory holding 4KiB of data.
///
/// The first 0x200 locations are reserved for the interpreter, the built in font lives at
/// [`FONTSET_BASE_ADDRESS`] and programs are loaded at [`PROGRAM_START_ADDRESS`].
///
/// Accessors return `None` instead of panicking when an address falls outside of memory, the
/// caller knows which instruction was executing and turns that into an [`Error`].
#[derive(Clone)]
pub struct Memory {
    memory: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Construct a new instance of `Memory` with the font loaded and everything else zeroed.
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = FONTSET_BASE_ADDRESS as usize;
        memory[font_start..font_start + FONTSET.len()].copy_from_slice(&FONTSET);

        Self { memory }
    }

    /// Copy a program into memory at [`PROGRAM_START_ADDRESS`].
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::RomTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }

        let start = PROGRAM_START_ADDRESS as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);

        Ok(())
    }

    pub fn font_address_for_character(&self, character: u8) -> u16 {
        FONTSET_BASE_ADDRESS + character as u16 * FONT_GLYPH_SIZE
    }

    /// Big endian 16 bit word at `address` and `address + 1`.
    pub fn word(&self, address: u16) -> Option<u16> {
        let bytes = self.slice(address, 2)?;

        Some((bytes[0] as u16) << 8 | bytes[1] as u16)
    }

    pub fn slice(&self, base_address: u16, length: usize) -> Option<&[u8]> {
        let start = base_address as usize;
        self.memory.get(start..start.checked_add(length)?)
    }

    pub fn slice_mut(&mut self, base_address: u16, length: usize) -> Option<&mut [u8]> {
        let start = base_address as usize;
        self.memory.get_mut(start..start.checked_add(length)?)
    }

    /// First address that a `length` byte access at `base_address` cannot reach.
    pub fn first_invalid_address(base_address: u16, length: usize) -> usize {
        (base_address as usize).max(MEMORY_SIZE.min(base_address as usize + length))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let memory = Memory::default();

        assert_eq!(memory.slice(FONTSET_BASE_ADDRESS, 1), Some(&[0xF0][..]));
        assert_eq!(memory.slice(FONTSET_BASE_ADDRESS + 79, 1), Some(&[0x80][..]));
        assert_eq!(memory.slice(PROGRAM_START_ADDRESS, 1), Some(&[0x00][..]));
    }

    #[test]
    fn test_font_address_for_character() {
        let memory = Memory::default();

        assert_eq!(
            memory.font_address_for_character(5),
            FONTSET_BASE_ADDRESS + 25
        );
        assert_eq!(memory.font_address_for_character(0xF), 0x9B);
    }

    #[test]
    fn test_load_program() {
        let mut memory = Memory::default();

        let rom = [0x00, 0xE0, 0x12, 0x00];
        memory.load_program(&rom).unwrap();

        assert_eq!(&memory.memory[0x200..0x204], &rom);
    }

    #[test]
    fn test_load_program_that_fills_memory() {
        let mut memory = Memory::default();
        let rom = vec![0xAB; MAX_PROGRAM_SIZE];

        memory.load_program(&rom).unwrap();

        assert_eq!(memory.memory[0xFFF], 0xAB);
    }

    #[test]
    fn test_load_program_too_large() {
        let mut memory = Memory::default();
        let rom = vec![0; MAX_PROGRAM_SIZE + 1];

        assert_eq!(
            memory.load_program(&rom),
            Err(Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        );
        assert_eq!(memory.memory[0x200], 0);
    }

    #[test]
    fn test_slice() {
        let memory = Memory::default();

        let expected = [0x90, 0x90, 0xF0, 0x10, 0x10];

        assert_eq!(memory.slice(FONTSET_BASE_ADDRESS + 20, 5), Some(&expected[..]));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let memory = Memory::default();

        assert!(memory.slice(0xFFF, 1).is_some());
        assert!(memory.slice(0xFFF, 2).is_none());
        assert!(memory.slice(0x1000, 1).is_none());
        assert_eq!(Memory::first_invalid_address(0xFFE, 4), 0x1000);
        assert_eq!(Memory::first_invalid_address(0x2000, 1), 0x2000);
    }

    #[test]
    fn test_word() {
        let mut memory = Memory::default();
        memory.load_program(&[0xAA, 0xBB]).unwrap();

        assert_eq!(memory.word(0x200), Some(0xAABB));
        assert_eq!(memory.word(0xFFF), None);
    }
}
