use thiserror::Error;

/// Fatal conditions raised while loading or running a CHIP-8 program.
///
/// None of these are recovered inside the core. The machine is left exactly as it was
/// before the failing instruction, and the host decides whether to halt or report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    /// The word at `pc` does not decode to any known instruction
    #[error("unknown instruction 0x{word:04X} at 0x{pc:04X}")]
    UnknownInstruction { word: u16, pc: u16 },

    /// 2NNN executed with a full call stack
    #[error("stack overflow at 0x{pc:04X}")]
    StackOverflow { pc: u16 },

    /// 00EE executed with an empty call stack
    #[error("stack underflow at 0x{pc:04X}")]
    StackUnderflow { pc: u16 },

    /// ROM does not fit into memory above 0x200
    #[error("ROM is {len} bytes, at most 3584 bytes fit in memory")]
    RomTooLarge { len: usize },

    #[error("font sprite must be 80 bytes, got {len}")]
    InvalidFont { len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Chip8Error::UnknownInstruction { word: 0x8AB8, pc: 0x20E };
        assert_eq!(err.to_string(), "unknown instruction 0x8AB8 at 0x020E");

        let err = Chip8Error::StackUnderflow { pc: 0x200 };
        assert_eq!(err.to_string(), "stack underflow at 0x0200");

        let err = Chip8Error::RomTooLarge { len: 4000 };
        assert_eq!(err.to_string(), "ROM is 4000 bytes, at most 3584 bytes fit in memory");
    }
}
