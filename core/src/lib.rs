// CHIP-8 virtual machine core
//
// The core never touches a window, keyboard or clock. A host feeds it key snapshots,
// calls `step` at the instruction rate and `tick_timers` at 60 Hz, and reads back the
// framebuffer and timers.
//

mod color;
mod error;
mod instruction;
mod interpreter;
mod machine;

use log::debug;

pub use color::{
    paint, Chip8Color, Chip8ColorParseError, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR,
};
pub use error::Chip8Error;
pub use instruction::{Instruction, Opcode};
pub use interpreter::{Interpreter, Quirks};
pub use machine::{
    Machine, DEFAULT_FONT, FONT_ADDR, FONT_SIZE, KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, ROM_ADDR,
    SCREEN_HEIGHT, SCREEN_WIDTH, STACK_SIZE,
};

#[derive(Debug, Default)]
pub struct Chip8Builder {
    /// ROM
    rom: Option<Vec<u8>>,
    /// Font sprite
    font: Option<Vec<u8>>,
    /// PRNG Seed
    rng_seed: Option<u64>,
    /// Instruction quirks
    quirks: Quirks,
}

/// A machine together with the interpreter that drives it.
pub struct Chip8 {
    pub(crate) machine: Machine,
    pub(crate) interpreter: Interpreter,
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder::default()
    }

    pub fn with_rom(mut self, rom: Vec<u8>) -> Self {
        self.rom = Some(rom);
        self
    }

    pub fn with_font(mut self, font: Vec<u8>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Fails if the ROM does not fit above 0x200 or the font is not 80 bytes.
    pub fn build(&self) -> Result<Chip8, Chip8Error> {
        let mut machine = Machine::new();

        if let Some(font) = &self.font {
            machine.load_font(font)?;
        }

        if let Some(rom) = &self.rom {
            machine.load_rom(rom)?;
        }

        debug!(
            "built machine: rom {} bytes, custom font {}, seed {:?}, {:?}",
            self.rom.as_ref().map_or(0, Vec::len),
            self.font.is_some(),
            self.rng_seed,
            self.quirks
        );

        Ok(Chip8 {
            machine,
            interpreter: Interpreter::new(self.quirks, self.rng_seed),
        })
    }
}

impl Chip8 {
    /// Executes one instruction.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        self.interpreter.step(&mut self.machine)
    }

    /// Decrements the delay and sound timers. Call at 60 Hz.
    pub fn tick_timers(&mut self) {
        self.interpreter.tick_timers(&mut self.machine);
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn quirks(&self) -> &Quirks {
        self.interpreter.quirks()
    }

    /// Decodes the instruction at `pc` without executing it.
    pub fn current_instruction(&self) -> Option<Instruction> {
        Instruction::decode(self.machine.read_u16_be(self.machine.pc))
    }
}
