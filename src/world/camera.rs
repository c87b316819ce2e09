use glam::{Vec2, vec2};

/// Player view-point in world space.
///
/// * `yaw` is the heading on the map plane; `pitch` shears the horizon up or
///   down in screen rows rather than rotating the view.
/// * `eye_z` is the eye height above the map plane.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec2,
    pub yaw: f32,   // radians (0 = east, counter-clockwise)
    pub pitch: f32, // vertical look offset, screen rows (+ looks up)
    pub eye_z: f32, // map units above the floor plane
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, eye_z: f32) -> Self {
        Self {
            pos,
            yaw,
            pitch: 0.0,
            eye_z,
        }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the map plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        vec2(c, s)
    }

    /// Unit vector pointing to the camera's right on the map plane.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        vec2(f.y, -f.x)
    }

    /// Transform a map point into view space:
    ///  `.x` = lateral offset (+ right), `.y` = depth along the forward axis.
    #[inline]
    pub fn to_view(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos;
        vec2(d.dot(self.right()), d.dot(self.forward()))
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe), preserving eye height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.forward();
        let r = self.right();
        self.pos += f * forward + r * side;
    }

    /// Rotate around the vertical axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }

    /// Shift the vertical look, clamped to `±limit` rows.
    pub fn look(&mut self, delta_rows: f32, limit: f32) {
        self.pitch = (self.pitch + delta_rows).clamp(-limit, limit);
    }
}

/*───────────────────────────── projection ───────────────────────────*/

/// Projection frustum: the projection plane sits `distance` map units in
/// front of the eye and spans `±size` map units horizontally. The near clip
/// coincides with the plane, so nothing closer than `distance` is drawn.
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub distance: f32,
    pub size: f32,
}

impl Frustum {
    pub fn new(distance: f32, size: f32) -> Self {
        Self { distance, size }
    }

    /// Frustum with the given horizontal field of view at the default
    /// near-plane distance.
    pub fn with_fov(fov: f32) -> Self {
        let distance = 40.0;
        Self {
            distance,
            size: distance * (fov * 0.5).tan(),
        }
    }

    /// Pixel focal length for a viewport `w` pixels wide.
    ///
    /// ```text
    /// focal = (w / 2) * distance / size
    /// ```
    #[inline]
    pub fn focal(&self, w: usize) -> f32 {
        w as f32 * 0.5 * self.distance / self.size
    }

    /// Near-plane distance.
    #[inline(always)]
    pub fn near(&self) -> f32 {
        self.distance
    }
}

impl Default for Frustum {
    /// 90° horizontal field of view.
    fn default() -> Self {
        Self {
            distance: 40.0,
            size: 40.0,
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
