// CHIP-8 machine state
//
// Memory map:
// * 0x000-0x1FF: reserved, font sprites at 0x050-0x09F
// * 0x200-0xFFF: program ROM and working memory
//

use crate::error::Chip8Error;

pub const MEMORY_SIZE: usize = 0x1000;
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const STACK_SIZE: usize = 100;
pub const KEY_COUNT: usize = 16;

pub const FONT_ADDR: u16 = 0x050;
pub const FONT_SIZE: usize = 80;
pub const ROM_ADDR: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - ROM_ADDR as usize;

// Addresses are 12 bits wide
pub(crate) const ADDR_MASK: u16 = (MEMORY_SIZE - 1) as u16;

pub static DEFAULT_FONT: [u8; FONT_SIZE] = [
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

/// Everything a running CHIP-8 program can observe or change.
///
/// The machine has no behaviour of its own beyond loading and accessors; all state
/// transitions are driven by [`Interpreter`](crate::Interpreter).
#[derive(Clone)]
pub struct Machine {
    /// Memory
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// Display: 64x32 monochrome pixels, row-major
    pub(crate) display: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
    /// Set when the display changed since the host last took it
    pub(crate) display_dirty: bool,
    /// Program counter
    pub(crate) pc: u16,
    /// Index register
    pub(crate) index: u16,
    /// Call stack
    pub(crate) stack: [u16; STACK_SIZE],
    /// Stack pointer, points past the top of the stack
    pub(crate) sp: usize,
    /// Delay Timer
    pub(crate) delay_timer: u8,
    /// Sound Timer
    pub(crate) sound_timer: u8,
    /// General purpose registers
    pub(crate) regs: [u8; 16],
    /// Key state snapshot for the current cycle
    pub(crate) keys: [bool; KEY_COUNT],
}

impl Machine {
    /// Creates a machine with zeroed memory, the default font loaded and `pc` at 0x200.
    pub fn new() -> Machine {
        let mut machine = Machine {
            memory: [0u8; MEMORY_SIZE],
            display: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
            display_dirty: true,
            pc: ROM_ADDR,
            index: 0,
            stack: [0u16; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            regs: [0u8; 16],
            keys: [false; KEY_COUNT],
        };
        machine.memory[FONT_ADDR as usize..FONT_ADDR as usize + FONT_SIZE]
            .copy_from_slice(&DEFAULT_FONT);
        machine
    }

    /// Replaces the font sprites at 0x050.
    pub fn load_font(&mut self, font: &[u8]) -> Result<(), Chip8Error> {
        if font.len() != FONT_SIZE {
            return Err(Chip8Error::InvalidFont { len: font.len() });
        }
        self.memory[FONT_ADDR as usize..FONT_ADDR as usize + FONT_SIZE].copy_from_slice(font);
        Ok(())
    }

    /// Copies a ROM image into memory at 0x200.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge { len: rom.len() });
        }
        let start = ROM_ADDR as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Replaces the whole key snapshot, index `i` is hex key `i`.
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// Keys above 0xF are ignored.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = pressed;
        }
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }

    /// Framebuffer snapshot, pixel (x, y) is at `y * SCREEN_WIDTH + x`.
    pub fn display(&self) -> &[bool] {
        &self.display[..]
    }

    /// Returns whether the pixel at (x, y) is lit. Out of range coordinates are off.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.display[y * SCREEN_WIDTH + x]
    }

    /// Returns true once after every change to the display.
    pub fn take_display_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.display_dirty, false)
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.regs
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    /// Return addresses currently on the call stack, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub(crate) fn read_u8(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    pub(crate) fn read_u16_be(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    pub(crate) fn write_u8(&mut self, addr: u16, data: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = data;
    }

    pub(crate) fn get_pixel_xy(&self, x: usize, y: usize) -> bool {
        self.display[y * SCREEN_WIDTH + x]
    }

    pub(crate) fn set_pixel_xy(&mut self, x: usize, y: usize, on_off: bool) {
        self.display[y * SCREEN_WIDTH + x] = on_off;
        self.display_dirty = true;
    }

    pub(crate) fn clear_screen(&mut self) {
        self.display.iter_mut().for_each(|p| *p = false);
        self.display_dirty = true;
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let machine = Machine::new();

        assert_eq!(machine.pc(), 0x200);
        assert_eq!(machine.index(), 0);
        assert_eq!(machine.registers(), &[0u8; 16]);
        assert!(machine.stack().is_empty());
        assert_eq!(machine.delay_timer(), 0);
        assert_eq!(machine.sound_timer(), 0);
        assert!(machine.display().iter().all(|p| !p));
        assert!(machine.keys().iter().all(|k| !k));

        // Font at 0x050-0x09F, everything else zero
        assert_eq!(&machine.memory()[0x050..0x0A0], &DEFAULT_FONT[..]);
        assert!(machine.memory()[..0x050].iter().all(|b| *b == 0));
        assert!(machine.memory()[0x0A0..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_load_rom() {
        let mut machine = Machine::new();

        machine.load_rom(&[0x12, 0x34, 0x56]).unwrap();

        assert_eq!(&machine.memory()[0x200..0x203], &[0x12, 0x34, 0x56]);
        assert_eq!(machine.memory()[0x203], 0);
    }

    #[test]
    fn test_load_rom_max_size() {
        let mut machine = Machine::new();
        let rom = vec![0xAA; MAX_ROM_SIZE];

        machine.load_rom(&rom).unwrap();

        assert_eq!(machine.memory()[0xFFF], 0xAA);
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut machine = Machine::new();
        let rom = vec![0xAA; MAX_ROM_SIZE + 1];

        assert_eq!(
            machine.load_rom(&rom),
            Err(Chip8Error::RomTooLarge { len: 3585 })
        );
        assert!(machine.memory()[0x200..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_load_font() {
        let mut machine = Machine::new();
        let font = [0x11u8; FONT_SIZE];

        machine.load_font(&font).unwrap();
        assert_eq!(&machine.memory()[0x050..0x0A0], &font[..]);

        assert_eq!(
            machine.load_font(&font[..79]),
            Err(Chip8Error::InvalidFont { len: 79 })
        );
    }

    #[test]
    fn test_keys() {
        let mut machine = Machine::new();

        machine.set_key(0xA, true);
        machine.set_key(0x10, true);
        assert!(machine.keys()[0xA]);
        assert_eq!(machine.keys().iter().filter(|k| **k).count(), 1);

        machine.set_keys([false; KEY_COUNT]);
        assert!(!machine.keys()[0xA]);
    }

    #[test]
    fn test_display_dirty() {
        let mut machine = Machine::new();

        // Fresh machine needs a first paint
        assert!(machine.take_display_dirty());
        assert!(!machine.take_display_dirty());

        machine.set_pixel_xy(63, 31, true);
        assert!(machine.pixel(63, 31));
        assert!(!machine.pixel(64, 31));
        assert!(machine.take_display_dirty());

        machine.clear_screen();
        assert!(!machine.pixel(63, 31));
        assert!(machine.take_display_dirty());
    }

    #[test]
    fn test_memory_wraps() {
        let mut machine = Machine::new();

        machine.write_u8(0x1000, 0xAB);
        machine.write_u8(0x0FFF, 0xCD);

        assert_eq!(machine.read_u8(0x0000), 0xAB);
        assert_eq!(machine.read_u16_be(0x0FFF), 0xCDAB);
    }
}
