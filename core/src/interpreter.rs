// CHIP-8 interpreter
//
// Useful links:
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
// * [Cowgod's Chip-8 Technical Reference](http://devernay.free.fr/hacks/chip8/C8TECH10.HTM)
//

use log::trace;
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::machine::{Machine, ADDR_MASK, FONT_ADDR, SCREEN_HEIGHT, SCREEN_WIDTH, STACK_SIZE};

/// Behaviour toggles for instructions whose semantics differ between CHIP-8 variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quirks {
    /// Jump with offset (BNNN) quirk: if true jump to NNN plus V0 (COSMAC VIP),
    /// instead of NNN plus VX
    pub jump_with_v0: bool,
    /// Add to index (FX1E) quirk: if true set VF to 1 when I + VX wraps below VX and 0 otherwise,
    /// if false leave VF untouched.
    ///
    /// I is 16 bits wide, so the flag only reads 1 when I is within 0xFF of 0xFFFF.
    /// Programs that keep I inside the 4 KiB address space always see 0.
    pub index_overflow_flag: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            jump_with_v0: false,
            index_overflow_flag: true,
        }
    }
}

/// Executes instructions against a [`Machine`].
///
/// The interpreter only holds configuration and the random source, all program
/// visible state lives in the machine.
pub struct Interpreter {
    quirks: Quirks,
    rng: StdRng,
}

impl Interpreter {
    pub fn new(quirks: Quirks, rng_seed: Option<u64>) -> Interpreter {
        // Pseudo random number generator
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Interpreter { quirks, rng }
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    /// Fetches, decodes and executes the instruction at `pc`.
    ///
    /// On error the machine is left as it was before the call, with `pc` still pointing
    /// at the failing instruction.
    pub fn step(&mut self, m: &mut Machine) -> Result<(), Chip8Error> {
        let pc = m.pc;
        let word = m.read_u16_be(pc);

        let inst = Instruction::decode(word).ok_or(Chip8Error::UnknownInstruction { word, pc })?;
        trace!("0x{:04x}: {:04x} {}", pc, word, inst);

        m.pc = pc.wrapping_add(2) & ADDR_MASK;
        if let Err(err) = self.execute(m, inst) {
            m.pc = pc;
            return Err(err);
        }
        Ok(())
    }

    /// Decrements both timers by one, stopping at zero. Call at 60 Hz.
    pub fn tick_timers(&self, m: &mut Machine) {
        m.delay_timer = m.delay_timer.saturating_sub(1);
        m.sound_timer = m.sound_timer.saturating_sub(1);
    }

    // `pc` already points at the next instruction when this runs.
    // ALU ops write VF before VX, so `x == F` keeps the result.
    fn execute(&mut self, m: &mut Machine, inst: Instruction) -> Result<(), Chip8Error> {
        match inst {
            Instruction::Clear => m.clear_screen(),
            Instruction::Return => {
                if m.sp == 0 {
                    return Err(Chip8Error::StackUnderflow {
                        pc: m.pc.wrapping_sub(2) & ADDR_MASK,
                    });
                }
                m.sp -= 1;
                m.pc = m.stack[m.sp] & ADDR_MASK;
            }
            Instruction::Jump { nnn } => m.pc = nnn,
            Instruction::Call { nnn } => {
                if m.sp == STACK_SIZE {
                    return Err(Chip8Error::StackOverflow {
                        pc: m.pc.wrapping_sub(2) & ADDR_MASK,
                    });
                }
                m.stack[m.sp] = m.pc;
                m.sp += 1;
                m.pc = nnn;
            }
            Instruction::SkipEqImm { x, nn } => {
                if m.regs[x] == nn {
                    skip(m);
                }
            }
            Instruction::SkipNeqImm { x, nn } => {
                if m.regs[x] != nn {
                    skip(m);
                }
            }
            Instruction::SkipEqReg { x, y } => {
                if m.regs[x] == m.regs[y] {
                    skip(m);
                }
            }
            Instruction::SkipNeqReg { x, y } => {
                if m.regs[x] != m.regs[y] {
                    skip(m);
                }
            }
            Instruction::SetImm { x, nn } => m.regs[x] = nn,
            Instruction::AddImm { x, nn } => m.regs[x] = m.regs[x].wrapping_add(nn),
            Instruction::SetReg { x, y } => m.regs[x] = m.regs[y],
            Instruction::Or { x, y } => m.regs[x] |= m.regs[y],
            Instruction::And { x, y } => m.regs[x] &= m.regs[y],
            Instruction::Xor { x, y } => m.regs[x] ^= m.regs[y],
            Instruction::AddReg { x, y } => {
                let (sum, carry) = m.regs[x].overflowing_add(m.regs[y]);
                m.regs[0xF] = carry as u8;
                m.regs[x] = sum;
            }
            Instruction::SubXY { x, y } => {
                let (vx, vy) = (m.regs[x], m.regs[y]);
                m.regs[0xF] = (vx > vy) as u8;
                m.regs[x] = vx.wrapping_sub(vy);
            }
            Instruction::ShiftRight { x, .. } => {
                let vx = m.regs[x];
                m.regs[0xF] = vx & 0x01;
                m.regs[x] = vx >> 1;
            }
            Instruction::SubYX { x, y } => {
                let (vx, vy) = (m.regs[x], m.regs[y]);
                m.regs[0xF] = (vy > vx) as u8;
                m.regs[x] = vy.wrapping_sub(vx);
            }
            Instruction::ShiftLeft { x, .. } => {
                let vx = m.regs[x];
                m.regs[0xF] = (vx >> 7) & 0x01;
                m.regs[x] = vx << 1;
            }
            Instruction::SetIndex { nnn } => m.index = nnn,
            Instruction::JumpOffset { x, nnn } => {
                let offset = if self.quirks.jump_with_v0 {
                    m.regs[0]
                } else {
                    m.regs[x]
                };
                m.pc = nnn.wrapping_add(offset as u16) & ADDR_MASK;
            }
            Instruction::Random { x, nn } => {
                let n = self.rng.next_u32() as u8;
                m.regs[x] = n & nn;
            }
            Instruction::Draw { x, y, n } => self.draw(m, x, y, n),
            Instruction::SkipKeyPressed { x } => {
                if key_pressed(m, m.regs[x]) {
                    skip(m);
                }
            }
            Instruction::SkipKeyNotPressed { x } => {
                if !key_pressed(m, m.regs[x]) {
                    skip(m);
                }
            }
            Instruction::GetDelay { x } => m.regs[x] = m.delay_timer,
            Instruction::WaitKey { x } => match m.keys.iter().position(|k| *k) {
                Some(key) => m.regs[x] = key as u8,
                // Rewind so the same instruction runs again next step
                None => m.pc = m.pc.wrapping_sub(2) & ADDR_MASK,
            },
            Instruction::SetDelay { x } => m.delay_timer = m.regs[x],
            Instruction::SetSound { x } => m.sound_timer = m.regs[x],
            Instruction::AddIndex { x } => {
                let vx = m.regs[x] as u16;
                let sum = m.index.wrapping_add(vx);
                m.index = sum;
                if self.quirks.index_overflow_flag {
                    m.regs[0xF] = (sum < vx) as u8;
                }
            }
            Instruction::Font { x } => m.index = FONT_ADDR + m.regs[x] as u16 * 5,
            Instruction::Bcd { x } => {
                let vx = m.regs[x];
                m.write_u8(m.index, vx / 100);
                m.write_u8(m.index.wrapping_add(1), (vx / 10) % 10);
                m.write_u8(m.index.wrapping_add(2), vx % 10);
            }
            Instruction::Store { x } => {
                for i in 0..=x {
                    m.write_u8(m.index.wrapping_add(i as u16), m.regs[i]);
                }
            }
            Instruction::Load { x } => {
                for i in 0..=x {
                    m.regs[i] = m.read_u8(m.index.wrapping_add(i as u16));
                }
            }
        }
        Ok(())
    }

    // Sprites are clipped at the screen edges, only the origin wraps
    fn draw(&self, m: &mut Machine, x: usize, y: usize, n: u8) {
        // Origin where we start to draw
        let ox = m.regs[x] as usize % SCREEN_WIDTH;
        let oy = m.regs[y] as usize % SCREEN_HEIGHT;

        // Reset collision flag
        m.regs[0xF] = 0;

        for row in 0..n as usize {
            let py = oy + row;
            if py >= SCREEN_HEIGHT {
                break;
            }

            // Read row(8-bit) of sprite data from memory
            let data = m.read_u8(m.index.wrapping_add(row as u16));

            for column in 0..8 {
                let px = ox + column;
                if px >= SCREEN_WIDTH {
                    break;
                }

                let bit = (data >> (7 - column)) & 1 == 1;
                if !bit {
                    continue;
                }

                // Pixel was on, turning it off is a collision
                let on = m.get_pixel_xy(px, py);
                if on {
                    m.regs[0xF] = 1;
                }
                m.set_pixel_xy(px, py, !on);
            }
        }
    }
}

fn skip(m: &mut Machine) {
    m.pc = m.pc.wrapping_add(2) & ADDR_MASK;
}

fn key_pressed(m: &Machine, key: u8) -> bool {
    m.keys.get(key as usize).copied().unwrap_or(false)
}
