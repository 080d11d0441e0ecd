use std::{
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use chip8_core::{
    paint, Chip8, Chip8Builder, Chip8Color, Quirks, DEFAULT_BACKGROUND_COLOR,
    DEFAULT_FOREGROUND_COLOR, KEY_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use clap::Parser;
use log::{error, info, LevelFilter};
use sdl2::{
    event::Event,
    keyboard::{KeyboardState, Keycode, Scancode},
    pixels::{Color, PixelFormatEnum},
};

const TIMER_HZ: u32 = 60;

// Keyboard looks like this:
// 1 2 3 4
// Q W E R
// A S D F
// Z X C V
const KEYMAP: [Scancode; KEY_COUNT] = [
    Scancode::Num1, Scancode::Num2, Scancode::Num3, Scancode::Num4,
    Scancode::Q, Scancode::W, Scancode::E, Scancode::R,
    Scancode::A, Scancode::S, Scancode::D, Scancode::F,
    Scancode::Z, Scancode::X, Scancode::C, Scancode::V,
];

/// CHIP-8 Emulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to Chip-8 ROM file that will be executed
    #[clap(index = 1)]
    rom: PathBuf,

    /// Filepath to font file
    #[clap(long)]
    font: Option<PathBuf>,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[clap(long)]
    background: Option<Chip8Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[clap(long)]
    foreground: Option<Chip8Color>,

    /// Display scaling factor
    #[clap(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
    scale: u32,

    /// Instructions per second
    #[clap(short, long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..=1_000_000))]
    ips: u32,

    /// PRNG seed
    #[clap(long)]
    seed: Option<u64>,

    /// BNNN jumps to NNN + V0 instead of NNN + VX
    #[clap(long)]
    vip_jump: bool,

    /// FX1E leaves VF untouched
    #[clap(long)]
    no_index_flag: bool,

    /// Trace every executed instruction
    #[clap(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::new();
    logger.filter_level(LevelFilter::Info);
    if args.debug {
        logger.filter_module("chip8_core", LevelFilter::Trace);
    }
    logger.parse_default_env().init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn build_chip(args: &Args) -> Result<Chip8, String> {
    let rom_data = std::fs::read(&args.rom)
        .map_err(|e| format!("failed to read ROM file {}: {}", args.rom.display(), e))?;

    let mut builder = Chip8Builder::new()
        .with_rom(rom_data)
        .with_quirks(Quirks {
            jump_with_v0: args.vip_jump,
            index_overflow_flag: !args.no_index_flag,
        });

    if let Some(font) = &args.font {
        let font_data = std::fs::read(font)
            .map_err(|e| format!("failed to read font file {}: {}", font.display(), e))?;
        builder = builder.with_font(font_data);
    }

    if let Some(seed) = args.seed {
        builder = builder.with_rng_seed(seed);
    }

    builder.build().map_err(|e| e.to_string())
}

fn key_snapshot(state: &KeyboardState) -> [bool; KEY_COUNT] {
    let mut keys = [false; KEY_COUNT];
    for (key, scancode) in keys.iter_mut().zip(KEYMAP) {
        *key = state.is_scancode_pressed(scancode);
    }
    keys
}

fn run(args: Args) -> Result<(), String> {
    let mut chip = build_chip(&args)?;
    let foreground = args.foreground.unwrap_or(DEFAULT_FOREGROUND_COLOR);
    let background = args.background.unwrap_or(DEFAULT_BACKGROUND_COLOR);

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(
            "chip8-emulator",
            SCREEN_WIDTH as u32 * args.scale,
            SCREEN_HEIGHT as u32 * args.scale,
        )
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

    canvas.set_draw_color(Color::RGB(background.r, background.g, background.b));
    canvas.clear();
    canvas.present();

    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(
            PixelFormatEnum::RGBX8888,
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
        )
        .map_err(|e| e.to_string())?;
    let mut pixels = vec![background; SCREEN_WIDTH * SCREEN_HEIGHT];

    let mut event_pump = sdl_context.event_pump()?;

    info!(
        "running {} at {} instructions per second",
        args.rom.display(),
        args.ips
    );

    let delta_update = Duration::new(0, 1_000_000_000u32 / args.ips);
    let delta_timer = Duration::new(0, 1_000_000_000u32 / TIMER_HZ);
    let mut next_update = Instant::now();
    let mut next_timer = next_update + delta_timer;

    'running: loop {
        // Wait until next update
        let now = Instant::now();
        if let Some(delay) = next_update.checked_duration_since(now) {
            ::std::thread::sleep(delay);
        }
        next_update += delta_update;

        // Step timers for every 1/60 s that has passed
        let now = Instant::now();
        while next_timer <= now {
            next_timer += delta_timer;
            chip.tick_timers();
        }

        // Process events
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                _ => {}
            }
        }
        let keys = key_snapshot(&event_pump.keyboard_state());
        chip.machine_mut().set_keys(keys);

        // Execute one CHIP-8 instruction
        if let Err(err) = chip.step() {
            return Err(match chip.current_instruction() {
                Some(inst) => format!("machine halted: {} [{}]", err, inst),
                None => format!("machine halted: {}", err),
            });
        }

        // If display buffer was changed then draw changes on canvas
        if chip.machine_mut().take_display_dirty() {
            paint(chip.machine().display(), foreground, background, &mut pixels);

            // Copy CHIP-8 display buffer into GPU texture
            texture
                .update(None, bytemuck::cast_slice(&pixels), SCREEN_WIDTH * 4)
                .map_err(|e| e.to_string())?;

            // Copy texture to Canvas
            canvas.copy(&texture, None, None)?;

            // present canvas on screen
            canvas.present();
        }
    }

    Ok(())
}
