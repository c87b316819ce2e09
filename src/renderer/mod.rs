//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.* The BSP walk produces
//! [`WallColumn`]s and [`FloorSpan`]s in near-to-far order and hands them to
//! a type implementing [`Backend`].
//!
//! * Multiple back-ends can be plugged in without changing engine logic; the
//!   crate ships a software rasterizer (`renderer::software`) and the tests
//!   use a recording stub.
//! * Occlusion is the backend's contract: geometry arrives nearest first and
//!   a pixel belongs to whoever writes it first (no depth buffer).

use glam::Vec2;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// One vertical wall strip, a single screen column wide.
///
/// `y_top`/`y_bot` are unclamped projections; the backend clips them to the
/// viewport. `tex_u` is the distance along the wall in map units and
/// `wall_h` the extruded height, enough to texture the strip without any
/// further projection math.
#[derive(Clone, Debug)]
pub struct WallColumn {
    pub x: i32,
    pub y_top: f32,
    pub y_bot: f32,
    pub tex_u: f32,
    pub wall_h: f32,
    pub depth: f32,
    pub color: Rgba,
}

/// One horizontal floor run on a single scan-line.
///
/// `world0`/`world1` are the map-plane points under the first and last pixel;
/// the backend interpolates between them for texturing. Depth is constant
/// along a floor scan-line.
#[derive(Clone, Debug)]
pub struct FloorSpan {
    pub y: i32,
    pub x_start: i32,
    pub x_end: i32,
    pub world0: Vec2,
    pub world1: Vec2,
    pub depth: f32,
    pub color: Rgba,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure exactly
/// once per frame; software callers typically forward it to their window.
pub trait Backend {
    /// (Re)allocate internal scratch for the requested resolution and clear
    /// both the pixels and the per-frame occupancy.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one wall column into the internal buffer.
    fn draw_wall(&mut self, column: &WallColumn);

    /// Rasterise one floor run into the internal buffer.
    fn draw_floor(&mut self, span: &FloorSpan);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Scale a colour's channels by `k` (0..=1).
#[inline]
pub fn shade(c: Rgba, k: f32) -> Rgba {
    let k = k.clamp(0.0, 1.0);
    let r = (((c >> 16) & 0xFF) as f32 * k) as u32;
    let g = (((c >> 8) & 0xFF) as f32 * k) as u32;
    let b = ((c & 0xFF) as f32 * k) as u32;
    (c & 0xFF_00_00_00) | (r << 16) | (g << 8) | b
}

pub mod software;

pub use software::Software;
