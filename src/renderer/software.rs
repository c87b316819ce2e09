//! ---------------------------------------------------------------------------
//! Classic software (CPU) renderer
//!
//! * Fills an `&mut [u32]` frame-buffer in **0xAARRGGBB** format.
//! * Relies on the BSP walk to feed geometry *near-to-far*, so occlusion is
//!   a per-pixel occupancy bitmap: the first writer wins and no Z-buffer is
//!   needed.
//! * Textures are procedural — a world-space checker derived from the map
//!   coordinates — so the crate renders with no assets at all.
//! ---------------------------------------------------------------------------

use crate::renderer::{Backend, FloorSpan, Rgba, WallColumn, shade};

/// Frame clear colour (unclaimed pixels stay this).
const BACKDROP: Rgba = 0xFF_10_10_16;

/// Checker cell size in map units.
const CHECKER: f32 = 32.0;

/// Depth at which distance shading bottoms out.
const FADE_DEPTH: f32 = 900.0;

/// Doom-style column renderer with first-writer-wins occlusion.
pub struct Software {
    scratch: Vec<Rgba>,
    occupied: Vec<bool>,
    width: usize,
    height: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            occupied: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

impl Software {
    /// Distance dimming factor for a pixel `depth` map units away.
    #[inline]
    fn fade(depth: f32) -> f32 {
        1.0 - 0.65 * (depth / FADE_DEPTH).clamp(0.0, 1.0)
    }

    #[inline]
    fn checker(a: f32, b: f32) -> bool {
        let ia = (a / CHECKER).floor() as i64;
        let ib = (b / CHECKER).floor() as i64;
        (ia + ib) & 1 == 0
    }
}

impl Backend for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.occupied.resize(w * h, false);
        }
        self.scratch.fill(BACKDROP);
        self.occupied.fill(false);
    }

    fn draw_wall(&mut self, dc: &WallColumn) {
        if dc.x < 0 || dc.x >= self.width as i32 {
            return;
        }
        let col = dc.x as usize;
        let y0 = dc.y_top.max(0.0).ceil() as i32;
        let y1 = dc.y_bot.min(self.height as f32 - 1.0).floor() as i32;
        if y0 > y1 {
            return;
        }

        // vertical texture coordinate walks the wall height linearly
        let col_h = (dc.y_bot - dc.y_top).max(1.0);
        let step_v = dc.wall_h / col_h;
        let mut v = (y0 as f32 - dc.y_top) * step_v;

        let fade = Self::fade(dc.depth);
        let lit = shade(dc.color, fade);
        let dim = shade(dc.color, fade * 0.8);

        for y in y0..=y1 {
            let idx = y as usize * self.width + col;
            if !self.occupied[idx] {
                self.occupied[idx] = true;
                self.scratch[idx] = if Self::checker(dc.tex_u, v) { lit } else { dim };
            }
            v += step_v;
        }
    }

    fn draw_floor(&mut self, span: &FloorSpan) {
        if span.y < 0 || span.y >= self.height as i32 {
            return;
        }
        let x0 = span.x_start.max(0);
        let x1 = span.x_end.min(self.width as i32 - 1);
        if x0 > x1 {
            return;
        }

        let w_px = (span.x_end - span.x_start).max(1) as f32;
        let du = (span.world1 - span.world0) / w_px;
        let mut world = span.world0 + du * (x0 - span.x_start) as f32;

        let fade = Self::fade(span.depth);
        let lit = shade(span.color, fade);
        let dim = shade(span.color, fade * 0.8);

        let row = span.y as usize * self.width;
        for x in x0..=x1 {
            let idx = row + x as usize;
            if !self.occupied[idx] {
                self.occupied[idx] = true;
                self.scratch[idx] = if Self::checker(world.x, world.y) { lit } else { dim };
            }
            world += du;
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn column(x: i32, color: Rgba) -> WallColumn {
        WallColumn {
            x,
            y_top: 2.0,
            y_bot: 6.0,
            tex_u: 0.0,
            wall_h: 64.0,
            depth: 10.0,
            color,
        }
    }

    #[test]
    fn wall_column_lands_in_its_rows() {
        let mut sw = Software::default();
        sw.begin_frame(8, 8);
        sw.draw_wall(&column(3, 0xFF_00_00_FF));
        sw.end_frame(|fb, w, _| {
            assert_ne!(fb[2 * w + 3], BACKDROP);
            assert_ne!(fb[6 * w + 3], BACKDROP);
            assert_eq!(fb[1 * w + 3], BACKDROP); // above the strip
            assert_eq!(fb[2 * w + 4], BACKDROP); // neighbouring column
        });
    }

    #[test]
    fn first_writer_wins() {
        let mut sw = Software::default();
        sw.begin_frame(8, 8);
        sw.draw_wall(&column(3, 0xFF_FF_00_00));
        let mut first = 0;
        sw.end_frame(|fb, w, _| first = fb[3 * w + 3]);

        // overlapping second draw must not overwrite
        sw.draw_wall(&column(3, 0xFF_00_FF_00));
        sw.end_frame(|fb, w, _| assert_eq!(fb[3 * w + 3], first));
    }

    #[test]
    fn floor_span_respects_occupancy() {
        let mut sw = Software::default();
        sw.begin_frame(8, 8);
        sw.draw_wall(&column(3, 0xFF_FF_00_00));
        let mut wall_px = 0;
        sw.end_frame(|fb, w, _| wall_px = fb[4 * w + 3]);

        sw.draw_floor(&FloorSpan {
            y: 4,
            x_start: 0,
            x_end: 7,
            world0: vec2(0.0, 0.0),
            world1: vec2(100.0, 0.0),
            depth: 50.0,
            color: 0xFF_00_FF_00,
        });
        sw.end_frame(|fb, w, _| {
            assert_eq!(fb[4 * w + 3], wall_px, "wall pixel was overwritten");
            assert_ne!(fb[4 * w + 5], BACKDROP, "floor failed to fill free pixels");
        });
    }

    #[test]
    fn off_screen_geometry_is_ignored() {
        let mut sw = Software::default();
        sw.begin_frame(8, 8);
        sw.draw_wall(&column(-1, 0xFF_FF_FF_FF));
        sw.draw_wall(&column(9, 0xFF_FF_FF_FF));
        sw.draw_floor(&FloorSpan {
            y: 20,
            x_start: 0,
            x_end: 7,
            world0: vec2(0.0, 0.0),
            world1: vec2(1.0, 0.0),
            depth: 1.0,
            color: 0xFF_FF_FF_FF,
        });
        sw.end_frame(|fb, _, _| assert!(fb.iter().all(|&px| px == BACKDROP)));
    }
}
