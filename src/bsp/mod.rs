//! Map compilation: walls → BSP tree → convex sectors.
//!
//! [`compile_level`] is the one entry point. It validates the authored
//! walls, builds the tree, derives the sector list and freezes the result
//! into a [`CompiledMap`]; the renderer only ever sees the immutable output.

use glam::Vec2;
use thiserror::Error;

mod compiler;
mod sectors;
mod tree;

pub use compiler::{SplitterPolicy, compile};
pub use sectors::{Sector, SectorEdge, extract_sectors};
pub use tree::{BspNode, BspTree, NO_SECTOR, NodeId, SectorId};

use crate::world::{EPS, Level};

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

/// Level-data problems detected while compiling a map. Every variant names
/// the offending wall so the author can find it; nothing here ever aborts
/// the process.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("wall ({p1}..{p2}) is shorter than the classification tolerance")]
    DegenerateWall { p1: Vec2, p2: Vec2 },

    #[error(
        "cut ({p1}..{p2}) crossed the sector boundary at {crossings} points (a convex sector is crossed exactly twice)"
    )]
    NonConvexCut {
        p1: Vec2,
        p2: Vec2,
        crossings: usize,
    },

    #[error("cut ({p1}..{p2}) is collinear with an existing sector boundary edge")]
    CollinearCut { p1: Vec2, p2: Vec2 },

    #[error("sector boundary failed to close after cut ({p1}..{p2})")]
    OpenSector { p1: Vec2, p2: Vec2 },

    #[error("sector boundary degenerated to {edges} edges after cut ({p1}..{p2})")]
    DegenerateSector { p1: Vec2, p2: Vec2, edges: usize },
}

/*=======================================================================*/
/*                             Compiled map                              */
/*=======================================================================*/

/// Immutable compile output: the BSP tree plus one sector per leaf.
///
/// Fields are private on purpose — the map is built once by
/// [`compile_level`] and never mutated afterwards, so the per-frame render
/// pass can borrow it freely.
#[derive(Debug)]
pub struct CompiledMap {
    tree: BspTree,
    sectors: Vec<Sector>,
}

impl CompiledMap {
    #[inline]
    pub fn tree(&self) -> &BspTree {
        &self.tree
    }

    #[inline]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    #[inline]
    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id as usize]
    }

    /// Sector containing `p` (point query through the tree).
    pub fn sector_at(&self, p: Vec2) -> &Sector {
        self.sector(self.tree.locate_sector(p))
    }
}

/// Compile an authored level into a render-ready map.
pub fn compile_level(level: &Level, policy: SplitterPolicy) -> Result<CompiledMap, CompileError> {
    for w in &level.walls {
        if w.len() <= EPS {
            return Err(CompileError::DegenerateWall { p1: w.p1, p2: w.p2 });
        }
    }
    let mut tree = compile(level.walls.clone(), policy);
    let sectors = extract_sectors(&mut tree, &level.boundary)?;
    Ok(CompiledMap { tree, sectors })
}

/*────────────────────────────────── Tests ─────────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Boundary, Facing, Wall};
    use glam::vec2;

    #[test]
    fn empty_wall_set_compiles_to_one_boundary_sector() {
        let level = Level {
            walls: Vec::new(),
            boundary: Boundary::rect(vec2(0.0, 0.0), vec2(300.0, 300.0), 64.0, 0),
        };
        let map = compile_level(&level, SplitterPolicy::Legacy).unwrap();
        assert_eq!(map.sectors().len(), 1);
        assert!((map.sectors()[0].area() - 90_000.0).abs() < 1.0);
    }

    #[test]
    fn zero_length_wall_is_reported_with_its_coordinates() {
        let level = Level {
            walls: vec![Wall::new(
                vec2(10.0, 10.0),
                vec2(10.0, 10.0),
                Facing::Left,
                64.0,
                0,
            )],
            boundary: Boundary::rect(vec2(0.0, 0.0), vec2(300.0, 300.0), 64.0, 0),
        };
        assert!(matches!(
            compile_level(&level, SplitterPolicy::Legacy),
            Err(CompileError::DegenerateWall { .. })
        ));
    }

    #[test]
    fn demo_level_compiles_under_both_policies() {
        let level = Level::demo();
        for policy in [SplitterPolicy::Legacy, SplitterPolicy::FewestSplits] {
            let map = compile_level(&level, policy).unwrap();
            assert!(map.sectors().len() >= 2);
            let total: f32 = map.sectors().iter().map(Sector::area).sum();
            assert!((total - 600.0 * 440.0).abs() < 2.0, "{policy:?}: {total}");
            for s in map.sectors() {
                assert!(s.is_closed());
                assert!(s.is_convex());
            }
        }
    }
}
