use glam::{Vec2, vec2};

use crate::world::{Camera, Frustum};

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_w: f32, // pre-derived for speed
    pub half_h: f32, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        }
    }
}

/// Camera state resolved once per frame and reused by every raster unit.
#[derive(Clone, Copy)]
pub struct ViewState {
    pub eye: Vec2,
    pub eye_z: f32,
    pub fwd: Vec2,
    pub right: Vec2,
    /// Pixel focal length.
    pub focal: f32,
    /// Screen row of the horizon (half height sheared by the vertical look).
    pub horizon: f32,
    /// Near-plane depth; nothing closer is drawn.
    pub near: f32,
}

impl ViewState {
    pub fn new(cam: &Camera, frustum: &Frustum, screen: &Screen) -> Self {
        Self {
            eye: cam.pos,
            eye_z: cam.eye_z,
            fwd: cam.forward(),
            right: cam.right(),
            focal: frustum.focal(screen.w),
            // looking up shifts the eye-level line down the screen
            horizon: screen.half_h + cam.pitch,
            near: frustum.near(),
        }
    }

    /// Map point → view space: `.x` lateral (+ right), `.y` depth.
    #[inline]
    pub fn to_view(&self, p: Vec2) -> Vec2 {
        let d = p - self.eye;
        vec2(d.dot(self.right), d.dot(self.fwd))
    }
}
