//! Wall pass: project one wall into vertical screen strips.
//!
//! Endpoints go to view space and are clipped against the near plane; the
//! surviving span maps to a screen-column range by similar triangles. Every
//! column then re-intersects its view ray with the wall's line for exact
//! depth — a parallel or behind-the-eye solve skips that column, so
//! numerical degeneracy can never take the frame down.

use glam::Vec2;

use crate::engine::types::{Screen, ViewState};
use crate::renderer::{Backend, WallColumn, shade};
use crate::world::{Side, Wall, line_intersection};

/// Facing the wall front-on renders brighter than its back face, the usual
/// fake-contrast trick to keep corners readable.
const FRONT_SHADE: f32 = 0.96;
const BACK_SHADE: f32 = 0.72;

pub fn draw_wall<B: Backend>(backend: &mut B, wall: &Wall, screen: &Screen, view: &ViewState) {
    let mut p1 = view.to_view(wall.p1);
    let mut p2 = view.to_view(wall.p2);
    if !clip_near(&mut p1, &mut p2, view.near) {
        return; // wholly behind the near plane
    }

    // Project to screen X
    let mut sx1 = screen.half_w + p1.x * view.focal / p1.y;
    let mut sx2 = screen.half_w + p2.x * view.focal / p2.y;
    if sx1 > sx2 {
        std::mem::swap(&mut sx1, &mut sx2);
    }
    if sx2 < 0.0 || sx1 >= screen.w as f32 {
        return; // completely off-screen
    }

    let x_l = sx1.max(0.0) as i32;
    let x_r = sx2.min(screen.w as f32 - 1.0) as i32;
    if x_l > x_r {
        return;
    }

    let face = match wall.classify_point(view.eye) {
        Side::Back => BACK_SHADE,
        _ => FRONT_SHADE,
    };
    let color = shade(wall.color, face);
    let wall_dir = wall.dir();

    for x in x_l..=x_r {
        // view ray through the column centre, in world space
        let lateral = (x as f32 + 0.5 - screen.half_w) / view.focal;
        let ray = view.fwd + view.right * lateral;
        let Some(hit) = line_intersection(view.eye, view.eye + ray, wall.p1, wall.p2) else {
            continue; // ray parallel to the wall
        };
        let depth = (hit - view.eye).dot(view.fwd);
        if depth < view.near * 0.5 {
            continue; // intersection behind the eye
        }

        let scale = view.focal / depth;
        backend.draw_wall(&WallColumn {
            x,
            y_top: view.horizon - (wall.height - view.eye_z) * scale,
            y_bot: view.horizon + view.eye_z * scale,
            tex_u: (hit - wall.p1).dot(wall_dir),
            wall_h: wall.height,
            depth,
            color,
        });
    }
}

/// Clip a view-space segment to the near plane. Returns false if completely
/// behind; otherwise both depths end up `>= near`.
fn clip_near(p1: &mut Vec2, p2: &mut Vec2, near: f32) -> bool {
    if p1.y <= near && p2.y <= near {
        return false;
    }
    if p1.y < near {
        let t = (near - p1.y) / (p2.y - p1.y);
        *p1 += (*p2 - *p1) * t;
        p1.y = near;
    }
    if p2.y < near {
        let t = (near - p2.y) / (p1.y - p2.y);
        *p2 += (*p1 - *p2) * t;
        p2.y = near;
    }
    true
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn clip_keeps_segments_in_front() {
        let mut a = vec2(0.0, -10.0);
        let mut b = vec2(0.0, 90.0);
        assert!(clip_near(&mut a, &mut b, 40.0));
        assert!((a.y - 40.0).abs() < 1e-4);
        assert!((b.y - 90.0).abs() < 1e-4);
    }

    #[test]
    fn clip_rejects_fully_behind() {
        let mut a = vec2(-5.0, 10.0);
        let mut b = vec2(5.0, 39.9);
        assert!(!clip_near(&mut a, &mut b, 40.0));
    }

    #[test]
    fn endpoint_exactly_on_the_near_plane_projects_finitely() {
        // the historic divide-by-zero case: one endpoint at the frustum
        // distance exactly
        let mut a = vec2(3.0, 40.0);
        let mut b = vec2(-3.0, 100.0);
        assert!(clip_near(&mut a, &mut b, 40.0));
        let sx = 160.0 + a.x * 160.0 / a.y;
        assert!(sx.is_finite());
    }
}
