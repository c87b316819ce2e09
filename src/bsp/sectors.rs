//! ----------------------------------------------------------------------------
//! **Sector extraction**
//!
//! Walks the compiled tree pre-order carrying an accumulating convex
//! boundary polygon, initially the full map boundary. At every internal node
//! the polygon is cloned and each copy is cropped against the splitter's
//! infinite line — front copy keeps the front half-plane, back copy the back
//! half-plane — so by the time a leaf is reached the polygon is exactly the
//! convex region of that leaf: the splitters on the root path plus whatever
//! survives of the outer boundary.
//!
//! Cropping is monotone (every cut only shrinks the polygon), which is what
//! keeps the ring convex without ever re-sorting it. Topological anomalies —
//! a cut that crosses the boundary other than exactly twice, a splitter
//! collinear with an existing edge, a ring that will not close — surface as
//! [`CompileError`]s carrying the offending wall's coordinates.
//! ----------------------------------------------------------------------------

use glam::Vec2;
use smallvec::SmallVec;

use crate::bsp::CompileError;
use crate::bsp::tree::{BspNode, BspTree, NodeId, SectorId};
use crate::renderer::Rgba;
use crate::world::{Boundary, JOIN_EPS, Side, Wall, line_intersection};

/// Floor palette cycled over sector indices; cosmetic only.
const FLOOR_COLORS: [Rgba; 6] = [
    0xFF_5A_52_48,
    0xFF_48_52_5A,
    0xFF_52_5A_48,
    0xFF_5E_4E_56,
    0xFF_4E_5E_56,
    0xFF_56_56_42,
];

/*──────────────────────────────── sectors ─────────────────────────────────*/

/// One edge of a sector's boundary ring.
#[derive(Clone, Debug)]
pub struct SectorEdge {
    /// This sector's own (possibly cropped) copy of the wall.
    pub wall: Wall,
    /// Which half-plane of `wall` the sector interior lies in.
    pub side: Side,
    /// True for edges descended from the outer map boundary; these are not
    /// BSP splitters and are drawn when the leaf itself is visited.
    pub from_boundary: bool,
}

/// A closed convex wall loop with a floor.
#[derive(Clone, Debug)]
pub struct Sector {
    /// Boundary edges in ring order: consecutive edges share an endpoint.
    pub edges: Vec<SectorEdge>,
    /// Floor plane height.
    pub height: f32,
    pub color: Rgba,
}

impl Sector {
    fn from_boundary(boundary: &Boundary) -> Self {
        let edges = boundary
            .walls
            .iter()
            .map(|w| SectorEdge {
                wall: w.clone(),
                side: Side::Front, // boundary normals face inward
                from_boundary: true,
            })
            .collect();
        Self {
            edges,
            height: 0.0,
            color: FLOOR_COLORS[0],
        }
    }

    /// True if `p` is inside the sector (boundary included): classifying it
    /// against every edge yields that edge's recorded side, or `On`.
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.edges.iter().all(|e| {
            let s = e.wall.classify_point(p);
            s == e.side || s == Side::On
        })
    }

    /// Ring vertices, one per consecutive edge pair. Empty if the ring does
    /// not close.
    pub fn polygon(&self) -> Vec<Vec2> {
        let n = self.edges.len();
        if n < 3 {
            return Vec::new();
        }
        let mut verts = Vec::with_capacity(n);
        for k in 0..n {
            let a = &self.edges[k].wall;
            let b = &self.edges[(k + 1) % n].wall;
            match shared_endpoint(a, b) {
                Some(v) => verts.push(v),
                None => return Vec::new(),
            }
        }
        verts
    }

    pub fn is_closed(&self) -> bool {
        self.edges.len() >= 3 && self.polygon().len() == self.edges.len()
    }

    /// Cross products of consecutive polygon edges all carry one sign.
    pub fn is_convex(&self) -> bool {
        let poly = self.polygon();
        let n = poly.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0_f32;
        for i in 0..n {
            let e0 = poly[(i + 1) % n] - poly[i];
            let e1 = poly[(i + 2) % n] - poly[(i + 1) % n];
            let cross = e0.perp_dot(e1);
            if cross.abs() <= JOIN_EPS {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Shoelace area of the boundary polygon.
    pub fn area(&self) -> f32 {
        let poly = self.polygon();
        let n = poly.len();
        let mut twice = 0.0;
        for i in 0..n {
            twice += poly[i].perp_dot(poly[(i + 1) % n]);
        }
        (twice * 0.5).abs()
    }

    /// Vertex mean; inside the sector because the ring is convex.
    pub fn centroid(&self) -> Vec2 {
        let poly = self.polygon();
        poly.iter().sum::<Vec2>() / poly.len().max(1) as f32
    }

    /*───────────────────────────── cropping ───────────────────────────────*/

    /// Add `wall` as a new boundary edge keeping the `side` half-plane,
    /// cropping the existing ring against the wall's infinite line.
    fn add_wall(&mut self, wall: &Wall, side: Side) -> Result<(), CompileError> {
        // 1 ─ where does the cut line cross the current boundary?
        let mut hits: SmallVec<[(usize, Vec2); 4]> = SmallVec::new();
        for (i, e) in self.edges.iter().enumerate() {
            let Some(p) = line_intersection(wall.p1, wall.p2, e.wall.p1, e.wall.p2) else {
                continue;
            };
            if self.contains_point(p) {
                hits.push((i, p));
            }
        }

        // A cut through a corner touches two edges; count distinct points.
        let mut points: SmallVec<[Vec2; 4]> = SmallVec::new();
        for &(_, p) in &hits {
            if points.iter().all(|q| q.distance(p) > JOIN_EPS) {
                points.push(p);
            }
        }
        if points.len() != 2 {
            return Err(CompileError::NonConvexCut {
                p1: wall.p1,
                p2: wall.p2,
                crossings: points.len(),
            });
        }

        // 2 ─ snap straddling edges to their own hit, drop excluded edges
        let excluded = side.flip();
        let mut kept: Vec<SectorEdge> = Vec::with_capacity(self.edges.len() + 1);
        for (i, e) in self.edges.iter().enumerate() {
            let s1 = wall.classify_point(e.wall.p1);
            let s2 = wall.classify_point(e.wall.p2);
            if s1 == Side::On && s2 == Side::On {
                return Err(CompileError::CollinearCut {
                    p1: wall.p1,
                    p2: wall.p2,
                });
            }
            if s1 != side && s2 != side {
                continue; // nothing of this edge survives the cut
            }
            let mut e = e.clone();
            if s1 == excluded || s2 == excluded {
                let Some(&(_, p)) = hits.iter().find(|&&(j, _)| j == i) else {
                    return Err(CompileError::OpenSector {
                        p1: wall.p1,
                        p2: wall.p2,
                    });
                };
                if s1 == excluded {
                    e.wall.p1 = p;
                } else {
                    e.wall.p2 = p;
                }
            }
            kept.push(e);
        }
        if kept.len() < 2 {
            return Err(CompileError::DegenerateSector {
                p1: wall.p1,
                p2: wall.p2,
                edges: kept.len(),
            });
        }

        // 3 ─ trim the new edge to the chord, keeping the authored direction
        // (and with it the normal's meaning)
        let mut cut = wall.clone();
        let (mut a, mut b) = (points[0], points[1]);
        if (b - a).dot(wall.p2 - wall.p1) < 0.0 {
            std::mem::swap(&mut a, &mut b);
        }
        cut.p1 = a;
        cut.p2 = b;

        // 4 ─ the removed edges leave exactly one gap in the ring; the new
        // edge closes it
        let gap = find_gap(&kept).ok_or(CompileError::OpenSector {
            p1: wall.p1,
            p2: wall.p2,
        })?;
        kept.insert(
            gap + 1,
            SectorEdge {
                wall: cut,
                side,
                from_boundary: false,
            },
        );
        self.edges = kept;
        if !self.is_closed() {
            return Err(CompileError::OpenSector {
                p1: wall.p1,
                p2: wall.p2,
            });
        }
        Ok(())
    }
}

/// The endpoint two ring-adjacent walls have in common, if any.
fn shared_endpoint(a: &Wall, b: &Wall) -> Option<Vec2> {
    for p in [a.p1, a.p2] {
        for q in [b.p1, b.p2] {
            if p.distance(q) <= JOIN_EPS {
                return Some(q);
            }
        }
    }
    None
}

/// Index `k` such that `edges[k]` and `edges[k + 1]` share no endpoint.
/// Exactly one such seam must exist after a cut.
///
/// Two kept edges are a special case: both ring adjacencies pair the same
/// two walls, so the single genuine junction is seen twice and either slot
/// closes the ring once the new edge is inserted.
fn find_gap(edges: &[SectorEdge]) -> Option<usize> {
    let n = edges.len();
    if n == 2 {
        return Some(1);
    }
    let mut gap = None;
    for k in 0..n {
        if shared_endpoint(&edges[k].wall, &edges[(k + 1) % n].wall).is_none() {
            if gap.is_some() {
                return None; // more than one seam: the ring is broken
            }
            gap = Some(k);
        }
    }
    gap
}

/*─────────────────────────────── extraction ───────────────────────────────*/

/// Derive one [`Sector`] per leaf, in visit order (front subtree first),
/// and record each leaf's sector id in the tree.
pub fn extract_sectors(
    tree: &mut BspTree,
    boundary: &Boundary,
) -> Result<Vec<Sector>, CompileError> {
    let mut sectors = Vec::new();
    let seed = Sector::from_boundary(boundary);
    extract_into(tree, tree.root(), seed, &mut sectors)?;
    log::debug!("extracted {} sectors", sectors.len());
    Ok(sectors)
}

fn extract_into(
    tree: &mut BspTree,
    id: NodeId,
    current: Sector,
    out: &mut Vec<Sector>,
) -> Result<(), CompileError> {
    match tree.node(id) {
        BspNode::Leaf { .. } => {
            let sid = out.len() as SectorId;
            tree.set_leaf_sector(id, sid);
            let mut sector = current;
            sector.color = FLOOR_COLORS[sid as usize % FLOOR_COLORS.len()];
            out.push(sector);
            Ok(())
        }
        BspNode::Internal {
            splitter,
            front,
            back,
            ..
        } => {
            let (splitter, front, back) = (splitter.clone(), *front, *back);

            let mut front_sector = current.clone();
            front_sector.add_wall(&splitter, Side::Front)?;
            extract_into(tree, front, front_sector, out)?;

            let mut back_sector = current;
            back_sector.add_wall(&splitter, Side::Back)?;
            extract_into(tree, back, back_sector, out)
        }
    }
}

/*────────────────────────────────── Tests ─────────────────────────────────*/
