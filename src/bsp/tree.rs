//! Arena-backed BSP tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`] index, so
//! there are no owning pointers to get wrong and the tree is trivially
//! walkable and testable. `parent` links exist for traversal convenience
//! only and never carry ownership.

use glam::Vec2;

use crate::world::{Side, Wall};

pub type SectorId = u16;

/// Leaf placeholder until the sector extractor assigns real ids.
pub const NO_SECTOR: SectorId = SectorId::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) u32);

#[derive(Debug)]
pub enum BspNode {
    /// Interior node: `splitter`'s infinite line partitions the subtree.
    Internal {
        splitter: Wall,
        front: NodeId,
        back: NodeId,
        parent: Option<NodeId>,
    },
    /// Convex leaf region, one sector each.
    Leaf {
        sector: SectorId,
        parent: Option<NodeId>,
    },
}

#[derive(Debug)]
pub struct BspTree {
    pub(crate) nodes: Vec<BspNode>,
    pub(crate) root: NodeId,
}

impl BspTree {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, BspNode::Internal { .. }))
            .count()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.len() - self.internal_count()
    }

    /// Parent of `id`, `None` for the root. Convenience for upward walks;
    /// never carries ownership.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id) {
            BspNode::Internal { parent, .. } | BspNode::Leaf { parent, .. } => *parent,
        }
    }

    /// Walk the tree and return the sector containing `p`.
    ///
    /// A point exactly on a splitter descends the front child.
    pub fn locate_sector(&self, p: Vec2) -> SectorId {
        let mut id = self.root;
        loop {
            match self.node(id) {
                BspNode::Leaf { sector, .. } => return *sector,
                BspNode::Internal {
                    splitter,
                    front,
                    back,
                    ..
                } => {
                    id = match splitter.classify_point(p) {
                        Side::Back => *back,
                        _ => *front,
                    };
                }
            }
        }
    }

    /*─────────────────── construction (compiler only) ───────────────────*/

    pub(crate) fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn push_leaf(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(BspNode::Leaf {
            sector: NO_SECTOR,
            parent,
        });
        id
    }

    /// Insert an internal node; the children are patched in once the
    /// recursion below them returns.
    pub(crate) fn push_internal(&mut self, splitter: Wall, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(BspNode::Internal {
            splitter,
            front: id, // placeholder, patched by set_children
            back: id,
            parent,
        });
        id
    }

    pub(crate) fn set_children(&mut self, id: NodeId, f: NodeId, b: NodeId) {
        match &mut self.nodes[id.0 as usize] {
            BspNode::Internal { front, back, .. } => {
                *front = f;
                *back = b;
            }
            BspNode::Leaf { .. } => unreachable!("set_children on a leaf"),
        }
    }

    pub(crate) fn set_leaf_sector(&mut self, id: NodeId, sid: SectorId) {
        match &mut self.nodes[id.0 as usize] {
            BspNode::Leaf { sector, .. } => *sector = sid,
            BspNode::Internal { .. } => unreachable!("set_leaf_sector on an internal node"),
        }
    }
}
