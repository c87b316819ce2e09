//! Floor pass: scanline inverse projection.
//!
//! For every screen row below the horizon the projection is inverted — the
//! row fixes the depth of the floor plane, the column fixes the lateral
//! offset — giving the map-plane point under each pixel. Pixels whose point
//! the sector contains are gathered into maximal runs and emitted as
//! [`FloorSpan`]s; the backend's occupancy keeps nearer geometry on top.

use glam::Vec2;

use crate::bsp::Sector;
use crate::engine::types::{Screen, ViewState};
use crate::renderer::{Backend, FloorSpan};

pub fn draw_floor<B: Backend>(backend: &mut B, sector: &Sector, screen: &Screen, view: &ViewState) {
    let plane_h = view.eye_z - sector.height;
    if plane_h <= 0.0 {
        return; // floor at or above the eye is never visible
    }

    let Some((x_min, x_max)) = column_range(sector, screen, view) else {
        return;
    };

    let y0 = (view.horizon.floor() as i32 + 1).max(0);
    for y in y0..screen.h as i32 {
        let dy = y as f32 + 0.5 - view.horizon;
        let depth = view.focal * plane_h / dy;
        if depth <= 0.0 {
            continue;
        }

        // world point under the leftmost column; one constant step per pixel
        let lat_step = depth / view.focal;
        let mut world = view.eye
            + view.fwd * depth
            + view.right * ((x_min as f32 + 0.5 - screen.half_w) * lat_step);
        let du = view.right * lat_step;

        let mut run: Option<(i32, Vec2)> = None;
        for x in x_min..=x_max {
            if sector.contains_point(world) {
                run.get_or_insert((x, world));
            } else if let Some((x_start, world0)) = run.take() {
                backend.draw_floor(&FloorSpan {
                    y,
                    x_start,
                    x_end: x - 1,
                    world0,
                    world1: world - du,
                    depth,
                    color: sector.color,
                });
            }
            world += du;
        }
        if let Some((x_start, world0)) = run {
            backend.draw_floor(&FloorSpan {
                y,
                x_start,
                x_end: x_max,
                world0,
                world1: world - du,
                depth,
                color: sector.color,
            });
        }
    }
}

/// Conservative screen-column range covering the sector.
///
/// With every ring vertex in front of the near plane the projected extent is
/// exact; a vertex behind the eye flares the projection open, so the whole
/// viewport is scanned instead. `None` when the sector is entirely behind.
fn column_range(sector: &Sector, screen: &Screen, view: &ViewState) -> Option<(i32, i32)> {
    let mut min_sx = f32::INFINITY;
    let mut max_sx = f32::NEG_INFINITY;
    let mut any_front = false;
    let mut any_behind = false;

    for e in &sector.edges {
        for p in [e.wall.p1, e.wall.p2] {
            let v = view.to_view(p);
            if v.y <= view.near {
                any_behind = true;
                continue;
            }
            any_front = true;
            let sx = screen.half_w + v.x * view.focal / v.y;
            min_sx = min_sx.min(sx);
            max_sx = max_sx.max(sx);
        }
    }

    if !any_front && !any_behind {
        return None;
    }
    if any_behind {
        return Some((0, screen.w as i32 - 1));
    }
    if max_sx < 0.0 || min_sx >= screen.w as f32 {
        return None;
    }
    Some((
        min_sx.max(0.0) as i32,
        max_sx.min(screen.w as f32 - 1.0) as i32,
    ))
}
