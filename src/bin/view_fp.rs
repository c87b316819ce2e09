//! First-person software viewer for the demo level.
//!
//! ```bash
//! cargo run --release --bin view_fp -- --width 1280 --height 800
//! ```
//!
//! W/S move, A/D strafe, ←/→ turn, R/F look up/down, Esc quits.

use clap::Parser;
use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};

use sectorbsp::engine::render_frame;
use sectorbsp::renderer::Software;
use sectorbsp::{Camera, Frustum, Level, SplitterPolicy, compile_level};

const EYE_HEIGHT: f32 = 28.0;
const MOVE_SPEED: f32 = 3.2; // map units per frame
const TURN_SPEED: f32 = 0.045; // radians per frame
const LOOK_SPEED: f32 = 6.0; // horizon rows per frame

#[derive(Parser)]
#[command(about = "First-person viewer for the sectorbsp demo level")]
struct Args {
    #[arg(long, default_value_t = 1024)]
    width: usize,
    #[arg(long, default_value_t = 640)]
    height: usize,
    /// Horizontal field of view, degrees.
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let level = Level::demo();
    let map = compile_level(&level, SplitterPolicy::Legacy)?;
    println!("compiled {} sectors", map.sectors().len());

    let mut camera = Camera::new(level.spawn(), 0.6, EYE_HEIGHT);
    let frustum = Frustum::with_fov(args.fov.to_radians());

    let mut renderer = Software::default();
    let mut fb = vec![0u32; args.width * args.height];

    let mut win = Window::new(
        "sectorbsp – first person",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(35);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* movement ------------------------------------------------------ */
        let mut forward = 0.0;
        let mut side = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += MOVE_SPEED;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= MOVE_SPEED;
        }
        if win.is_key_down(Key::A) {
            side -= MOVE_SPEED;
        }
        if win.is_key_down(Key::D) {
            side += MOVE_SPEED;
        }
        camera.step(forward, side);

        if win.is_key_down(Key::Left) {
            camera.turn(TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-TURN_SPEED);
        }
        if win.is_key_down(Key::R) {
            camera.look(LOOK_SPEED, args.height as f32 * 0.4);
        }
        if win.is_key_down(Key::F) {
            camera.look(-LOOK_SPEED, args.height as f32 * 0.4);
        }

        /* render --------------------------------------------------------- */
        let t0 = Instant::now();
        render_frame(
            &mut renderer,
            &map,
            &camera,
            &frustum,
            args.width,
            args.height,
            |buf, _, _| fb.copy_from_slice(buf),
        );
        acc_time += t0.elapsed();
        acc_frames += 1;

        win.update_with_buffer(&fb, args.width, args.height)?;

        /* once a second: average frame time ------------------------------ */
        if last_print.elapsed() >= Duration::from_secs(1) && acc_frames > 0 {
            let avg = acc_time / acc_frames as u32;
            win.set_title(&format!(
                "sectorbsp – first person ({avg:.1?}/frame, sector {})",
                map.tree().locate_sector(camera.pos)
            ));
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
