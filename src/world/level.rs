//! Authored map data: a wall set plus the rectangular outer boundary.
//!
//! There is no on-disk format for this subsystem; maps are built in code.
//! [`Level::demo`] is the level the viewer binaries load.

use glam::{Vec2, vec2};

use crate::world::geometry::{Facing, Wall};

/// The four outer map walls, normals facing inward.
///
/// The boundary is not part of the BSP input — the map has no enclosing
/// splitter of its own — it seeds the sector extractor's accumulating
/// polygon and is drawn per leaf as the room's outer surface.
#[derive(Clone, Debug)]
pub struct Boundary {
    pub walls: [Wall; 4],
}

impl Boundary {
    /// Axis-aligned rectangle `min..max`. The edges run counter-clockwise,
    /// so a `Left` facing puts every normal on the interior side.
    pub fn rect(min: Vec2, max: Vec2, height: f32, color: u32) -> Self {
        let a = vec2(min.x, min.y);
        let b = vec2(max.x, min.y);
        let c = vec2(max.x, max.y);
        let d = vec2(min.x, max.y);
        Self {
            walls: [
                Wall::new(a, b, Facing::Left, height, color),
                Wall::new(b, c, Facing::Left, height, color),
                Wall::new(c, d, Facing::Left, height, color),
                Wall::new(d, a, Facing::Left, height, color),
            ],
        }
    }
}

/// One authored map: interior walls plus the outer boundary.
#[derive(Clone, Debug)]
pub struct Level {
    pub walls: Vec<Wall>,
    pub boundary: Boundary,
}

impl Level {
    /// Hard-coded demo map: a 600×440 room with a few interior walls of
    /// varying heights.
    pub fn demo() -> Self {
        let walls = vec![
            // partition wall with a doorway-sized gap at the south end
            Wall::new(
                vec2(220.0, 120.0),
                vec2(220.0, 440.0),
                Facing::Right,
                72.0,
                0xFF_B0_50_40,
            ),
            // diagonal in the eastern half
            Wall::new(
                vec2(330.0, 90.0),
                vec2(470.0, 230.0),
                Facing::Left,
                56.0,
                0xFF_46_8A_52,
            ),
            // low screen wall near the south-east corner
            Wall::new(
                vec2(430.0, 320.0),
                vec2(560.0, 320.0),
                Facing::Left,
                36.0,
                0xFF_4E_62_A8,
            ),
        ];
        Self {
            walls,
            boundary: Boundary::rect(
                vec2(0.0, 0.0),
                vec2(600.0, 440.0),
                88.0,
                0xFF_8A_84_78,
            ),
        }
    }

    /// Where the viewer binaries spawn the player.
    pub fn spawn(&self) -> Vec2 {
        vec2(90.0, 90.0)
    }
}
