use std::fmt;

/// Bit fields of a raw 16-bit instruction word.
///
/// ```text
/// O___  opcode
/// _X__  x
/// __Y_  y
/// _NNN  nnn
/// __NN  nn
/// ___N  n
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Opcode {
    pub word: u16,
    pub op: u8,
    pub x: usize,
    pub y: usize,
    pub nnn: u16,
    pub nn: u8,
    pub n: u8,
}

impl Opcode {
    pub const fn new(word: u16) -> Opcode {
        Opcode {
            word,
            op: (word >> 12) as u8,
            x: ((word & 0x0F00) >> 8) as usize,
            y: ((word & 0x00F0) >> 4) as usize,
            nnn: word & 0x0FFF,
            nn: (word & 0x00FF) as u8,
            n: (word & 0x000F) as u8,
        }
    }
}

/// A decoded CHIP-8 instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// 00E0: Clear screen
    Clear,
    /// 00EE: Return from subroutine
    Return,
    /// 1NNN: Jump to NNN
    Jump { nnn: u16 },
    /// 2NNN: Call subroutine at NNN
    Call { nnn: u16 },
    /// 3XNN: Skip next instruction if VX == NN
    SkipEqImm { x: usize, nn: u8 },
    /// 4XNN: Skip next instruction if VX != NN
    SkipNeqImm { x: usize, nn: u8 },
    /// 5XYN: Skip next instruction if VX == VY
    SkipEqReg { x: usize, y: usize },
    /// 6XNN: VX = NN
    SetImm { x: usize, nn: u8 },
    /// 7XNN: VX += NN, no carry
    AddImm { x: usize, nn: u8 },
    /// 8XY0: VX = VY
    SetReg { x: usize, y: usize },
    /// 8XY1: VX |= VY
    Or { x: usize, y: usize },
    /// 8XY2: VX &= VY
    And { x: usize, y: usize },
    /// 8XY3: VX ^= VY
    Xor { x: usize, y: usize },
    /// 8XY4: VX += VY, VF = carry
    AddReg { x: usize, y: usize },
    /// 8XY5: VX -= VY, VF = no borrow
    SubXY { x: usize, y: usize },
    /// 8XY6: VX >>= 1, VF = shifted out bit
    ShiftRight { x: usize, y: usize },
    /// 8XY7: VX = VY - VX, VF = no borrow
    SubYX { x: usize, y: usize },
    /// 8XYE: VX <<= 1, VF = shifted out bit
    ShiftLeft { x: usize, y: usize },
    /// 9XYN: Skip next instruction if VX != VY
    SkipNeqReg { x: usize, y: usize },
    /// ANNN: I = NNN
    SetIndex { nnn: u16 },
    /// BNNN: Jump to NNN plus an offset register
    JumpOffset { x: usize, nnn: u16 },
    /// CXNN: VX = random & NN
    Random { x: usize, nn: u8 },
    /// DXYN: Draw N rows of sprite data at I to (VX, VY)
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E: Skip next instruction if key VX is pressed
    SkipKeyPressed { x: usize },
    /// EXA1: Skip next instruction if key VX is not pressed
    SkipKeyNotPressed { x: usize },
    /// FX07: VX = delay timer
    GetDelay { x: usize },
    /// FX0A: Wait for a key press, store the key in VX
    WaitKey { x: usize },
    /// FX15: delay timer = VX
    SetDelay { x: usize },
    /// FX18: sound timer = VX
    SetSound { x: usize },
    /// FX1E: I += VX
    AddIndex { x: usize },
    /// FX29: I = address of font glyph for VX
    Font { x: usize },
    /// FX33: Store BCD of VX at I, I+1, I+2
    Bcd { x: usize },
    /// FX55: Store V0..=VX at I..=I+X
    Store { x: usize },
    /// FX65: Load V0..=VX from I..=I+X
    Load { x: usize },
}

impl Instruction {
    /// Decodes a raw word, `None` if it is not a known instruction.
    pub fn decode(word: u16) -> Option<Instruction> {
        let Opcode { op, x, y, nnn, nn, n, .. } = Opcode::new(word);

        let inst = match (op, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clear,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, _, _, _) => Instruction::Jump { nnn },
            (0x2, _, _, _) => Instruction::Call { nnn },
            (0x3, _, _, _) => Instruction::SkipEqImm { x, nn },
            (0x4, _, _, _) => Instruction::SkipNeqImm { x, nn },
            // Low nibble of 5XYN and 9XYN is ignored
            (0x5, _, _, _) => Instruction::SkipEqReg { x, y },
            (0x6, _, _, _) => Instruction::SetImm { x, nn },
            (0x7, _, _, _) => Instruction::AddImm { x, nn },
            (0x8, _, _, 0x0) => Instruction::SetReg { x, y },
            (0x8, _, _, 0x1) => Instruction::Or { x, y },
            (0x8, _, _, 0x2) => Instruction::And { x, y },
            (0x8, _, _, 0x3) => Instruction::Xor { x, y },
            (0x8, _, _, 0x4) => Instruction::AddReg { x, y },
            (0x8, _, _, 0x5) => Instruction::SubXY { x, y },
            (0x8, _, _, 0x6) => Instruction::ShiftRight { x, y },
            (0x8, _, _, 0x7) => Instruction::SubYX { x, y },
            (0x8, _, _, 0xE) => Instruction::ShiftLeft { x, y },
            (0x9, _, _, _) => Instruction::SkipNeqReg { x, y },
            (0xA, _, _, _) => Instruction::SetIndex { nnn },
            (0xB, _, _, _) => Instruction::JumpOffset { x, nnn },
            (0xC, _, _, _) => Instruction::Random { x, nn },
            (0xD, _, _, _) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyPressed { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyNotPressed { x },
            (0xF, _, 0x0, 0x7) => Instruction::GetDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::Font { x },
            (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Store { x },
            (0xF, _, 0x6, 0x5) => Instruction::Load { x },
            _ => return None,
        };
        Some(inst)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { nnn } => write!(f, "JP 0x{:03X}", nnn),
            Instruction::Call { nnn } => write!(f, "CALL 0x{:03X}", nnn),
            Instruction::SkipEqImm { x, nn } => write!(f, "SE V{:X}, 0x{:02X}", x, nn),
            Instruction::SkipNeqImm { x, nn } => write!(f, "SNE V{:X}, 0x{:02X}", x, nn),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::SetImm { x, nn } => write!(f, "LD V{:X}, 0x{:02X}", x, nn),
            Instruction::AddImm { x, nn } => write!(f, "ADD V{:X}, 0x{:02X}", x, nn),
            Instruction::SetReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::SubXY { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x, .. } => write!(f, "SHR V{:X}", x),
            Instruction::SubYX { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x, .. } => write!(f, "SHL V{:X}", x),
            Instruction::SkipNeqReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::SetIndex { nnn } => write!(f, "LD I, 0x{:03X}", nnn),
            Instruction::JumpOffset { x, nnn } => write!(f, "JP V{:X}, 0x{:03X}", x, nnn),
            Instruction::Random { x, nn } => write!(f, "RND V{:X}, 0x{:02X}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            Instruction::GetDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::Font { x } => write!(f, "LD F, V{:X}", x),
            Instruction::Bcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::Store { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::Load { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
