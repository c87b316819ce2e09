//! ----------------------------------------------------------------------------
//! **Ordered BSP traversal and frame orchestration**
//!
//! Responsible for
//! * walking the tree in visibility order — near child, splitter, far child,
//!   decided by classifying the eye against each splitter
//! * dispatching splitter walls, leaf boundary walls and sector floors to
//!   the wall/floor passes
//!
//! With first-writer-wins occlusion in the backend, near-to-far order means
//! nearer geometry claims its pixels before anything behind it is offered.
//! An eye exactly on a splitter sees it edge-on (zero columns), so both
//! children are visited — once each, in either order — and the splitter
//! itself is skipped.
//! ----------------------------------------------------------------------------

use glam::Vec2;

use crate::bsp::{BspNode, BspTree, CompiledMap, SectorId};
use crate::engine::types::{Screen, ViewState};
use crate::engine::{floors, walls};
use crate::renderer::{Backend, Rgba};
use crate::world::{Camera, Frustum, Side, Wall};

/// One visibility-ordered traversal event.
pub enum Visit<'a> {
    /// An internal node's splitter wall, emitted between its two subtrees.
    Wall(&'a Wall),
    /// A leaf region; the callee draws its boundary walls and floor.
    Leaf(SectorId),
}

/// Walk the tree near-to-far relative to `eye`.
pub fn walk_tree<'a>(tree: &'a BspTree, eye: Vec2, visit: &mut dyn FnMut(Visit<'a>)) {
    walk(tree, tree.root(), eye, visit);
}

fn walk<'a>(
    tree: &'a BspTree,
    id: crate::bsp::NodeId,
    eye: Vec2,
    visit: &mut dyn FnMut(Visit<'a>),
) {
    match tree.node(id) {
        BspNode::Leaf { sector, .. } => visit(Visit::Leaf(*sector)),
        BspNode::Internal {
            splitter,
            front,
            back,
            ..
        } => match splitter.classify_point(eye) {
            Side::Front => {
                walk(tree, *front, eye, visit);
                visit(Visit::Wall(splitter));
                walk(tree, *back, eye, visit);
            }
            Side::Back => {
                walk(tree, *back, eye, visit);
                visit(Visit::Wall(splitter));
                walk(tree, *front, eye, visit);
            }
            Side::On => {
                walk(tree, *front, eye, visit);
                walk(tree, *back, eye, visit);
            }
        },
    }
}

/// Render one frame of `map` as seen from `cam` into `backend`, handing the
/// finished buffer to `submit`.
///
/// Pure with respect to the map: only the backend's internal scratch is
/// written. Splitter walls are drawn at their node; each leaf draws the
/// sector's boundary-origin walls (the outer room surface, which no node
/// owns) and then its floor.
pub fn render_frame<B: Backend>(
    backend: &mut B,
    map: &CompiledMap,
    cam: &Camera,
    frustum: &Frustum,
    w: usize,
    h: usize,
    submit: impl FnOnce(&[Rgba], usize, usize),
) {
    backend.begin_frame(w, h);

    let screen = Screen::new(w, h);
    let view = ViewState::new(cam, frustum, &screen);

    walk_tree(map.tree(), cam.pos, &mut |event| match event {
        Visit::Wall(wall) => walls::draw_wall(backend, wall, &screen, &view),
        Visit::Leaf(sid) => {
            let sector = map.sector(sid);
            for e in sector.edges.iter().filter(|e| e.from_boundary) {
                walls::draw_wall(backend, &e.wall, &screen, &view);
            }
            floors::draw_floor(backend, sector, &screen, &view);
        }
    });

    backend.end_frame(submit);
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{SplitterPolicy, compile_level};
    use crate::renderer::{FloorSpan, WallColumn};
    use crate::world::{Boundary, Facing, Level};
    use glam::vec2;

    /// Backend stub that records what the engine asked for.
    #[derive(Default)]
    struct Recording {
        walls: Vec<WallColumn>,
        floors: Vec<FloorSpan>,
    }

    impl Backend for Recording {
        fn begin_frame(&mut self, _w: usize, _h: usize) {
            self.walls.clear();
            self.floors.clear();
        }
        fn draw_wall(&mut self, column: &WallColumn) {
            self.walls.push(column.clone());
        }
        fn draw_floor(&mut self, span: &FloorSpan) {
            self.floors.push(span.clone());
        }
        fn end_frame<F>(&mut self, submit: F)
        where
            F: FnOnce(&[Rgba], usize, usize),
        {
            submit(&[], 0, 0);
        }
    }

    fn diagonal_level() -> Level {
        Level {
            walls: vec![Wall::new(
                vec2(100.0, 100.0),
                vec2(200.0, 200.0),
                Facing::Left,
                64.0,
                0xFF_CC_44_44,
            )],
            boundary: Boundary::rect(vec2(0.0, 0.0), vec2(300.0, 300.0), 64.0, 0xFF_AA_AA_AA),
        }
    }

    #[test]
    fn eye_on_the_splitter_visits_both_leaves_exactly_once() {
        let map = compile_level(&diagonal_level(), SplitterPolicy::Legacy).unwrap();
        let mut leaves = Vec::new();
        let mut splitters = 0;
        // (150, 150) lies exactly on the diagonal's line
        walk_tree(map.tree(), vec2(150.0, 150.0), &mut |v| match v {
            Visit::Leaf(sid) => leaves.push(sid),
            Visit::Wall(_) => splitters += 1,
        });
        leaves.sort_unstable();
        assert_eq!(leaves, vec![0, 1]);
        assert_eq!(splitters, 0, "edge-on splitter must not be emitted");
    }

    #[test]
    fn near_side_is_visited_first() {
        let map = compile_level(&diagonal_level(), SplitterPolicy::Legacy).unwrap();
        // clearly on the front (upper-left) side of the diagonal
        let eye = vec2(50.0, 250.0);
        let front_leaf = map.tree().locate_sector(eye);
        let mut order = Vec::new();
        walk_tree(map.tree(), eye, &mut |v| {
            if let Visit::Leaf(sid) = v {
                order.push(sid);
            }
        });
        assert_eq!(order.first(), Some(&front_leaf));
    }

    #[test]
    fn rendering_from_the_splitter_never_panics_and_draws_something() {
        let map = compile_level(&diagonal_level(), SplitterPolicy::Legacy).unwrap();
        let mut cam = Camera::new(vec2(150.0, 150.0), 0.0, 28.0);
        let mut backend = Recording::default();
        for yaw in [0.0_f32, 1.2, std::f32::consts::PI, 4.5] {
            cam.yaw = yaw;
            render_frame(
                &mut backend,
                &map,
                &cam,
                &Frustum::default(),
                320,
                200,
                |_, _, _| {},
            );
            assert!(
                !backend.walls.is_empty(),
                "yaw {yaw}: no wall columns emitted"
            );
        }
    }

    #[test]
    fn every_emitted_column_is_in_front_of_the_near_plane() {
        let map = compile_level(&Level::demo(), SplitterPolicy::Legacy).unwrap();
        let frustum = Frustum::default();
        let cam = Camera::new(Level::demo().spawn(), 0.4, 28.0);
        let mut backend = Recording::default();
        render_frame(&mut backend, &map, &cam, &frustum, 320, 200, |_, _, _| {});
        assert!(!backend.walls.is_empty());
        for c in &backend.walls {
            assert!(c.depth >= frustum.near() * 0.5 - 1e-3);
            assert!((0..320).contains(&c.x));
        }
        assert!(!backend.floors.is_empty(), "demo spawn sees no floor");
    }
}
