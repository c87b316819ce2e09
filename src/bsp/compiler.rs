//! ----------------------------------------------------------------------------
//! **BSP compiler**
//!
//! Consumes an unordered wall set and builds the binary tree recursively:
//! pick a splitter, classify every remaining wall against its infinite line,
//! split the straddlers at the exact intersection point, recurse on both
//! partitions. Each call consumes one wall as a splitter, so the recursion
//! is bounded by the wall count and an empty working set becomes a leaf.
//! ----------------------------------------------------------------------------

use crate::bsp::tree::{BspTree, NodeId};
use crate::world::{EPS, Side, Wall, line_intersection};

/// How the compiler picks the splitter for each node.
///
/// Tree shape — and therefore draw order and sector numbering — depends on
/// this choice, so the historical policy stays the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitterPolicy {
    /// Pop the last wall of the working stack. Arbitrary and unweighted;
    /// can pessimize tree size, but levels may be authored around it.
    #[default]
    Legacy,
    /// Scan for the wall whose line splits the fewest other walls.
    FewestSplits,
}

impl SplitterPolicy {
    /// Remove and return this node's splitter from the working set.
    fn take(self, walls: &mut Vec<Wall>) -> Option<Wall> {
        match self {
            SplitterPolicy::Legacy => walls.pop(),
            SplitterPolicy::FewestSplits => {
                if walls.is_empty() {
                    return None;
                }
                let best = walls
                    .iter()
                    .enumerate()
                    .map(|(i, cand)| {
                        let cuts = walls
                            .iter()
                            .enumerate()
                            .filter(|&(j, w)| j != i && cand.classify_wall(w) == Side::On)
                            .count();
                        (cuts, i)
                    })
                    .min()
                    .map(|(_, i)| i)?;
                Some(walls.swap_remove(best))
            }
        }
    }
}

/// Build a BSP tree from `walls`. Leaves are created with a placeholder
/// sector id; the sector extractor fills them in.
pub fn compile(walls: Vec<Wall>, policy: SplitterPolicy) -> BspTree {
    let mut tree = BspTree::empty();
    let total = walls.len();
    tree.root = build(&mut tree, walls, policy, None);
    log::debug!(
        "compiled {} walls into {} nodes ({} leaves)",
        total,
        tree.node_count(),
        tree.leaf_count()
    );
    tree
}

fn build(
    tree: &mut BspTree,
    mut walls: Vec<Wall>,
    policy: SplitterPolicy,
    parent: Option<NodeId>,
) -> NodeId {
    let Some(splitter) = policy.take(&mut walls) else {
        return tree.push_leaf(parent);
    };

    let mut front = Vec::new();
    let mut back = Vec::new();
    for wall in walls {
        match splitter.classify_wall(&wall) {
            Side::Front => front.push(wall),
            Side::Back => back.push(wall),
            Side::On => split_wall(&splitter, wall, &mut front, &mut back),
        }
    }

    let id = tree.push_internal(splitter, parent);
    let f = build(tree, front, policy, Some(id));
    let b = build(tree, back, policy, Some(id));
    tree.set_children(id, f, b);
    id
}

/// Cut a straddling wall at the splitter's line and push each fragment to
/// its own side. The head fragment keeps the original `p1` (the in-place
/// truncation of the historical code); the tail is a fresh wall.
fn split_wall(splitter: &Wall, wall: Wall, front: &mut Vec<Wall>, back: &mut Vec<Wall>) {
    let Some(cut) = line_intersection(splitter.p1, splitter.p2, wall.p1, wall.p2) else {
        // A straddler cannot be parallel to the splitter; if the solve still
        // degenerates numerically, keep the wall whole on its p1 side.
        log::warn!(
            "unsplittable straddling wall ({}..{}), keeping whole",
            wall.p1,
            wall.p2
        );
        match splitter.classify_point(wall.p1) {
            Side::Back => back.push(wall),
            _ => front.push(wall),
        }
        return;
    };

    let mut head = wall.clone();
    head.p2 = cut;
    let mut tail = wall;
    tail.p1 = cut;

    for frag in [head, tail] {
        if frag.len() <= EPS {
            log::warn!("dropping degenerate fragment at {}", frag.p1);
            continue;
        }
        match splitter.classify_wall(&frag) {
            Side::Back => back.push(frag),
            _ => front.push(frag),
        }
    }
}

/*────────────────────────────────── Tests ─────────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::tree::BspNode;
    use crate::world::Facing;
    use glam::{Vec2, vec2};

    fn wall(p1: Vec2, p2: Vec2) -> Wall {
        Wall::new(p1, p2, Facing::Left, 64.0, 0xFF_FF_FF_FF)
    }

    #[test]
    fn single_wall_yields_one_internal_node_and_two_leaves() {
        let tree = compile(
            vec![wall(vec2(100.0, 100.0), vec2(200.0, 200.0))],
            SplitterPolicy::Legacy,
        );
        assert_eq!(tree.internal_count(), 1);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn legacy_policy_pops_the_last_wall() {
        let a = wall(vec2(0.0, 10.0), vec2(100.0, 10.0));
        let b = wall(vec2(0.0, 20.0), vec2(100.0, 20.0));
        let tree = compile(vec![a, b], SplitterPolicy::Legacy);
        match tree.node(tree.root()) {
            BspNode::Internal { splitter, .. } => {
                assert!((splitter.p1.y - 20.0).abs() < EPS, "expected wall b at the root");
            }
            BspNode::Leaf { .. } => panic!("root must be internal"),
        }
    }

    #[test]
    fn split_fragments_meet_at_the_cut_and_classify_consistently() {
        let splitter = wall(vec2(150.0, 0.0), vec2(150.0, 300.0));
        let target = wall(vec2(0.0, 100.0), vec2(300.0, 100.0));
        assert_eq!(splitter.classify_wall(&target), Side::On);

        let mut front = Vec::new();
        let mut back = Vec::new();
        split_wall(&splitter, target.clone(), &mut front, &mut back);
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);

        let (f, b) = (&front[0], &back[0]);
        // fragments share the cut point on the splitter's line
        let cut = vec2(150.0, 100.0);
        assert!(f.p1.distance(cut) < 1e-3 || f.p2.distance(cut) < 1e-3);
        assert!(b.p1.distance(cut) < 1e-3 || b.p2.distance(cut) < 1e-3);
        // their union spans the original segment
        let mut ends = vec![f.p1, f.p2, b.p1, b.p2];
        ends.retain(|p| p.distance(cut) > 1e-3);
        assert_eq!(ends.len(), 2);
        assert!(ends.iter().any(|p| p.distance(target.p1) < 1e-3));
        assert!(ends.iter().any(|p| p.distance(target.p2) < 1e-3));
        // each fragment is wholly on one side
        assert_eq!(splitter.classify_wall(f), Side::Front);
        assert_eq!(splitter.classify_wall(b), Side::Back);
    }

    #[test]
    fn fewest_splits_avoids_the_cutting_wall() {
        // `bad` crosses h1's line and is crossed by it in turn; h2's line
        // clears both, so the tuned policy starts there and saves a split.
        let h1 = wall(vec2(0.0, 10.0), vec2(100.0, 10.0));
        let h2 = wall(vec2(0.0, 40.0), vec2(100.0, 40.0));
        let bad = wall(vec2(50.0, 0.0), vec2(50.0, 30.0));

        let legacy = compile(
            vec![h1.clone(), h2.clone(), bad.clone()],
            SplitterPolicy::Legacy,
        );
        let tuned = compile(vec![h1, h2, bad], SplitterPolicy::FewestSplits);

        // legacy picks `bad` first and pays for two splits
        assert_eq!(legacy.internal_count(), 5);
        assert_eq!(tuned.internal_count(), 4);
    }

    #[test]
    fn parent_links_mirror_the_children() {
        let tree = compile(
            vec![
                wall(vec2(100.0, 100.0), vec2(200.0, 200.0)),
                wall(vec2(50.0, 250.0), vec2(250.0, 250.0)),
            ],
            SplitterPolicy::Legacy,
        );
        assert_eq!(tree.parent(tree.root()), None);
        for idx in 0..tree.node_count() {
            let id = NodeId(idx as u32);
            if let BspNode::Internal { front, back, .. } = tree.node(id) {
                assert_eq!(tree.parent(*front), Some(id));
                assert_eq!(tree.parent(*back), Some(id));
            }
        }
    }

    #[test]
    fn every_leaf_is_childless_and_every_internal_node_wired() {
        let tree = compile(
            vec![
                wall(vec2(100.0, 100.0), vec2(200.0, 200.0)),
                wall(vec2(50.0, 250.0), vec2(250.0, 250.0)),
                wall(vec2(260.0, 40.0), vec2(260.0, 260.0)),
            ],
            SplitterPolicy::Legacy,
        );
        for idx in 0..tree.node_count() {
            match tree.node(NodeId(idx as u32)) {
                BspNode::Internal { front, back, .. } => {
                    assert_ne!(front.0 as usize, idx);
                    assert_ne!(back.0 as usize, idx);
                }
                BspNode::Leaf { .. } => {}
            }
        }
    }
}
