/// A decoded CHIP-8 instruction.
///
/// Opcodes are 16 bits. The top nibble selects a family, and for families `0`, `8`, `E` and `F`
/// the low nibble or low byte picks the exact instruction. The remaining nibbles carry operands:
/// - `x` (`_X__`) is the register VX, or the last register of the range V0..=VX
/// - `y` (`__Y_`) is the register VY
/// - `n` (`___N`) is a 4 bit constant
/// - `kk` (`__KK`) is an 8 bit constant
/// - `nnn` (`_NNN`) is a 12 bit address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XKK
    SkipEqualByte { x: u8, kk: u8 },
    /// 4XKK
    SkipNotEqualByte { x: u8, kk: u8 },
    /// 5XY0
    SkipEqualRegisters { x: u8, y: u8 },
    /// 6XKK
    LoadByte { x: u8, kk: u8 },
    /// 7XKK
    AddByte { x: u8, kk: u8 },
    /// 8XY0
    LoadRegister { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddRegisters { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    SubN { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipNotEqualRegisters { x: u8, y: u8 },
    /// ANNN
    LoadIndex { nnn: u16 },
    /// BNNN
    JumpOffset { nnn: u16 },
    /// CXKK
    Random { x: u8, kk: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyPressed { x: u8 },
    /// EXA1
    SkipKeyNotPressed { x: u8 },
    /// FX07
    LoadDelayTimer { x: u8 },
    /// FX0A
    WaitForKey { x: u8 },
    /// FX15
    SetDelayTimer { x: u8 },
    /// FX18
    SetSoundTimer { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadFont { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Decode a raw opcode. `None` if it isn't part of the base CHIP-8 instruction set.
    pub fn decode(opcode: u16) -> Option<Self> {
        use Instruction::*;

        let x = opcode.x();
        let y = opcode.y();
        let n = opcode.n();
        let kk = opcode.kk();
        let nnn = opcode.nnn();

        let instruction = match opcode.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x1, ..) => Jump { nnn },
            (0x2, ..) => Call { nnn },
            (0x3, ..) => SkipEqualByte { x, kk },
            (0x4, ..) => SkipNotEqualByte { x, kk },
            (0x5, .., 0x0) => SkipEqualRegisters { x, y },
            (0x6, ..) => LoadByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, .., 0x0) => LoadRegister { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddRegisters { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x, y },
            (0x8, .., 0x7) => SubN { x, y },
            (0x8, .., 0xE) => ShiftLeft { x, y },
            (0x9, .., 0x0) => SkipNotEqualRegisters { x, y },
            (0xA, ..) => LoadIndex { nnn },
            (0xB, ..) => JumpOffset { nnn },
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipKeyPressed { x },
            (0xE, _, 0xA, 0x1) => SkipKeyNotPressed { x },
            (0xF, _, 0x0, 0x7) => LoadDelayTimer { x },
            (0xF, _, 0x0, 0xA) => WaitForKey { x },
            (0xF, _, 0x1, 0x5) => SetDelayTimer { x },
            (0xF, _, 0x1, 0x8) => SetSoundTimer { x },
            (0xF, _, 0x1, 0xE) => AddIndex { x },
            (0xF, _, 0x2, 0x9) => LoadFont { x },
            (0xF, _, 0x3, 0x3) => StoreBcd { x },
            (0xF, _, 0x5, 0x5) => StoreRegisters { x },
            (0xF, _, 0x6, 0x5) => LoadRegisters { x },
            _ => return None,
        };

        Some(instruction)
    }
}

/// Field accessors for a raw 16 bit opcode.
trait Opcode {
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;

        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.nnn(), 0x0BCD);
    }

    #[test]
    fn test_decode_base_instruction_set() {
        let cases = [
            (0x00E0, Cls),
            (0x00EE, Ret),
            (0x1ABC, Jump { nnn: 0xABC }),
            (0x2ABC, Call { nnn: 0xABC }),
            (0x31AB, SkipEqualByte { x: 1, kk: 0xAB }),
            (0x42CD, SkipNotEqualByte { x: 2, kk: 0xCD }),
            (0x5340, SkipEqualRegisters { x: 3, y: 4 }),
            (0x6512, LoadByte { x: 5, kk: 0x12 }),
            (0x76FF, AddByte { x: 6, kk: 0xFF }),
            (0x8120, LoadRegister { x: 1, y: 2 }),
            (0x8121, Or { x: 1, y: 2 }),
            (0x8122, And { x: 1, y: 2 }),
            (0x8123, Xor { x: 1, y: 2 }),
            (0x8124, AddRegisters { x: 1, y: 2 }),
            (0x8125, Sub { x: 1, y: 2 }),
            (0x8126, ShiftRight { x: 1, y: 2 }),
            (0x8127, SubN { x: 1, y: 2 }),
            (0x812E, ShiftLeft { x: 1, y: 2 }),
            (0x9AB0, SkipNotEqualRegisters { x: 0xA, y: 0xB }),
            (0xA123, LoadIndex { nnn: 0x123 }),
            (0xB456, JumpOffset { nnn: 0x456 }),
            (0xC70F, Random { x: 7, kk: 0x0F }),
            (0xD125, Draw { x: 1, y: 2, n: 5 }),
            (0xE39E, SkipKeyPressed { x: 3 }),
            (0xE4A1, SkipKeyNotPressed { x: 4 }),
            (0xF507, LoadDelayTimer { x: 5 }),
            (0xF60A, WaitForKey { x: 6 }),
            (0xF715, SetDelayTimer { x: 7 }),
            (0xF818, SetSoundTimer { x: 8 }),
            (0xF91E, AddIndex { x: 9 }),
            (0xFA29, LoadFont { x: 0xA }),
            (0xFB33, StoreBcd { x: 0xB }),
            (0xFC55, StoreRegisters { x: 0xC }),
            (0xFD65, LoadRegisters { x: 0xD }),
        ];

        for &(opcode, expected) in cases.iter() {
            assert_eq!(
                Instruction::decode(opcode),
                Some(expected),
                "decoding {:#06x}",
                opcode
            );
        }
    }

    #[test]
    fn test_decode_rejects_unknown_opcodes() {
        // 0NNN machine code routines and the SuperCHIP extensions are not supported.
        let unknown = [
            0x0000, 0x0123, 0x00E1, 0x00FF, 0x5121, 0x8128, 0x812F, 0x9121, 0xE19F, 0xE1A2,
            0xF100, 0xF130, 0xF175, 0xF185,
        ];

        for &opcode in unknown.iter() {
            assert_eq!(Instruction::decode(opcode), None, "decoding {:#06x}", opcode);
        }
    }
}
