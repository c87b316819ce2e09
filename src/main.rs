//! Top-down map debugger.
//!
//! Compiles the demo level once, paints every pixel with the colour of the
//! sector `locate_sector` resolves it to, overlays the walls, and shows the
//! result until Esc. Handy for eyeballing what the compiler and the sector
//! extractor actually produced.

use minifb::{Key, Window, WindowOptions};
use std::error::Error;

use sectorbsp::bsp::Sector;
use sectorbsp::renderer::shade;
use sectorbsp::{Level, SplitterPolicy, compile_level};

use glam::vec2;

const WIDTH: usize = 900;
const HEIGHT: usize = 660;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let level = Level::demo();
    let map = compile_level(&level, SplitterPolicy::Legacy)?;
    println!(
        "{} walls compiled into {} sectors",
        level.walls.len(),
        map.sectors().len()
    );

    // ─────────── map-space → screen-space transform ────────────
    let (min, max) = {
        let b = &level.boundary.walls;
        let mut lo = b[0].p1;
        let mut hi = b[0].p1;
        for w in b {
            lo = lo.min(w.p1).min(w.p2);
            hi = hi.max(w.p1).max(w.p2);
        }
        (lo, hi)
    };
    let span = max - min;
    let scale = (WIDTH as f32 / span.x).min(HEIGHT as f32 / span.y) * 0.9; // 10 % margin
    let offset = vec2(
        (WIDTH as f32 - span.x * scale) * 0.5,
        (HEIGHT as f32 - span.y * scale) * 0.5,
    );

    let to_screen = |p: glam::Vec2| -> (i32, i32) {
        let s = (p - min) * scale + offset;
        (s.x as i32, HEIGHT as i32 - s.y as i32) // invert Y so north is up
    };

    // ─────────── paint sectors via the point query ────────────
    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let world = vec2(
                (x as f32 - offset.x) / scale + min.x,
                ((HEIGHT - 1 - y) as f32 - offset.y) / scale + min.y,
            );
            let inside = world.x >= min.x
                && world.x <= max.x
                && world.y >= min.y
                && world.y <= max.y;
            if inside {
                let sector: &Sector = map.sector_at(world);
                buffer[y * WIDTH + x] = shade(sector.color, 0.9);
            }
        }
    }

    // ─────────── overlay walls ────────────
    for s in map.sectors() {
        for e in &s.edges {
            let (x0, y0) = to_screen(e.wall.p1);
            let (x1, y1) = to_screen(e.wall.p2);
            let colour = if e.from_boundary { 0x00_FFFFFF } else { 0x00_FFD060 };
            draw_line(&mut buffer, WIDTH, HEIGHT, x0, y0, x1, y1, colour);
        }
    }

    // ─────────── show window ────────────
    let mut window = Window::new("sectorbsp map debug", WIDTH, HEIGHT, WindowOptions::default())?;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

/// Integer Bresenham line-drawing algorithm.
fn draw_line(
    buf: &mut [u32],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            buf[y0 as usize * w + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            if x0 == x1 {
                break;
            }
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            if y0 == y1 {
                break;
            }
            err += dx;
            y0 += sy;
        }
    }
}
