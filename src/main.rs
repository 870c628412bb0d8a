//! Two-player arena shooter built on the `rphys_arena` engine.
//!
//! Player one moves with A/D, jumps with W and shoots with Space. Player two
//! uses the arrow keys and Enter. A hit player loses the round and the map
//! resets. Pass a TOML file path as the first argument to override the
//! defaults in [`arena::ArenaConfig`].

mod arena;
mod render;

use crate::arena::{Arena, ArenaConfig, Controls};
use crate::render::View;
use sdl2::event::Event;
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};
use sdl2::pixels::Color;
use std::time::{Duration, Instant};
use tracing::{error, info};

const TITLE: &str = "rphys arena";
const BACKGROUND: Color = Color::WHITE;
const FONT_SIZE: u16 = 28;
/// Longest step handed to the scene, so a stalled frame cannot tunnel bodies
const MAX_DT: f64 = 1.0 / 30.0;

const KEYS: [[Scancode; 4]; 2] = [
    [Scancode::A, Scancode::D, Scancode::W, Scancode::Space],
    [Scancode::Left, Scancode::Right, Scancode::Up, Scancode::Return],
];

fn read_controls(keys: &KeyboardState, id: usize) -> Controls {
    let [left, right, jump, shoot] = KEYS[id];
    Controls {
        left: keys.is_scancode_pressed(left),
        right: keys.is_scancode_pressed(right),
        jump: keys.is_scancode_pressed(jump),
        shoot: keys.is_scancode_pressed(shoot),
    }
}

fn load_config() -> ArenaConfig {
    let Some(path) = std::env::args().nth(1) else {
        return ArenaConfig::default();
    };
    match ArenaConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "falling back to default config");
            ArenaConfig::default()
        }
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();
    let config = load_config();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let ttf_context = sdl2::ttf::init().map_err(|e| e.to_string())?;

    let window = video_subsystem
        .window(TITLE, config.window_width, config.window_height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let font = match &config.font_path {
        Some(path) => Some(ttf_context.load_font(path, FONT_SIZE)?),
        None => None,
    };

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    canvas.set_draw_color(BACKGROUND);
    canvas.clear();
    canvas.present();

    let view = View::new(config.window_width, config.window_height);
    let mut rng = rand::rng();
    let mut arena = Arena::new(&config);
    let mut score = [0u32; 2];
    let mut last_frame_time = Instant::now();
    let mut event_pump = sdl_context.event_pump()?;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => break 'running,
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = (now.duration_since(last_frame_time).as_secs_f64() * config.time_mult).min(MAX_DT);
        last_frame_time = now;

        let keys = event_pump.keyboard_state();
        for id in 0..2 {
            arena.apply_controls(id, read_controls(&keys, id), dt);
        }
        arena.maybe_spawn_powerup(dt, &mut rng);
        arena.step(dt);

        if let Some(loser) = arena.loser() {
            score[1 - loser] += 1;
            info!(loser = loser + 1, ?score, "round over");
            arena = Arena::new(&config);
        }

        canvas.set_draw_color(BACKGROUND);
        canvas.clear();
        render::draw_scene(&mut canvas, &view, &arena.scene);
        match &font {
            Some(font) => render::draw_score(&mut canvas, font, score)?,
            None => {
                let _ = canvas.window_mut().set_title(&format!("{TITLE}  {} : {}", score[0], score[1]));
            }
        }
        canvas.present();
        ::std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
    Ok(())
}
