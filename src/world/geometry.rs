//! ----------------------------------------------------------------------------
//! **Geometry kernel**
//!
//! Point/vector algebra comes straight from `glam::Vec2`; this module adds the
//! pieces the BSP pipeline is built on:
//! * half-plane classification of points and whole walls ([`Side`])
//! * exact line/line and segment/segment intersection, with parallel lines
//!   reported as `None` instead of a sentinel point
//!
//! Every classification in the crate shares one absolute tolerance, [`EPS`].
//! Wall normals are unit length, so `dot(normal, p - p1)` is a true signed
//! distance in map units and a single epsilon stays honest at any map scale.
//! ----------------------------------------------------------------------------

use glam::Vec2;

use crate::renderer::Rgba;

/// Classification tolerance in map units.
pub const EPS: f32 = 1e-4;

/// Endpoint-matching tolerance for sector ring walks. Corner vertices are
/// produced by intersection solves, so they carry more round-off than raw
/// classifications; this is deliberately coarser than [`EPS`].
pub const JOIN_EPS: f32 = 1e-2;

/*──────────────────────── half-plane classification ───────────────────────*/

/// Which side of a wall's infinite line something lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The half-plane the wall normal points into.
    Front,
    Back,
    /// Within [`EPS`] of the line. For a wall-vs-wall classification this
    /// means the endpoints straddle and a split is required.
    On,
}

impl Side {
    #[inline]
    pub fn flip(self) -> Side {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
            Side::On => Side::On,
        }
    }
}

/// Which perpendicular of the edge direction becomes the wall normal.
///
/// Sidedness cannot be inferred from the endpoints alone, so it is authored
/// explicitly per wall: `Left` is the counter-clockwise perpendicular of
/// `p1 → p2`, `Right` the clockwise one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/*──────────────────────────────── walls ───────────────────────────────────*/

/// One line segment of map geometry, extruded to `height` at render time.
///
/// `normal` is fixed at construction and always unit length. Walls are plain
/// value types; the compiler and the sector extractor work on owned copies.
#[derive(Clone, Debug)]
pub struct Wall {
    pub p1: Vec2,
    pub p2: Vec2,
    pub normal: Vec2,
    pub height: f32,
    pub color: Rgba,
}

impl Wall {
    pub fn new(p1: Vec2, p2: Vec2, facing: Facing, height: f32, color: Rgba) -> Self {
        let dir = (p2 - p1).normalize_or_zero();
        let normal = match facing {
            Facing::Left => dir.perp(),
            Facing::Right => -dir.perp(),
        };
        Self {
            p1,
            p2,
            normal,
            height,
            color,
        }
    }

    #[inline]
    pub fn len(&self) -> f32 {
        self.p1.distance(self.p2)
    }

    /// Unit direction `p1 → p2`.
    #[inline]
    pub fn dir(&self) -> Vec2 {
        (self.p2 - self.p1).normalize_or_zero()
    }

    /// Signed distance of `p` from the wall's infinite line.
    #[inline]
    pub fn signed_distance(&self, p: Vec2) -> f32 {
        self.normal.dot(p - self.p1)
    }

    /// Which half-plane `p` lies in.
    pub fn classify_point(&self, p: Vec2) -> Side {
        let d = self.signed_distance(p);
        if d > EPS {
            Side::Front
        } else if d < -EPS {
            Side::Back
        } else {
            Side::On
        }
    }

    /// Classify a whole wall against this wall's line.
    ///
    /// * `Front` – both endpoints in front (or front + on)
    /// * `Back`  – both endpoints behind (or behind + on)
    /// * `On`    – the endpoints strictly straddle: the caller must split
    ///
    /// A wall collinear with the splitter goes to the front set, matching the
    /// front-child bias of the point query.
    pub fn classify_wall(&self, other: &Wall) -> Side {
        use Side::*;
        match (self.classify_point(other.p1), self.classify_point(other.p2)) {
            (Front, Back) | (Back, Front) => On,
            (Back, _) | (_, Back) => Back,
            (On, On) => Front,
            _ => Front,
        }
    }
}

/*────────────────────────────── intersection ──────────────────────────────*/

/// Intersection of the infinite lines through `a1 → a2` and `b1 → b2`.
///
/// `None` when the lines are parallel within tolerance. The determinant is
/// compared against `EPS` scaled by both segment lengths, i.e. against the
/// sine of the angle between the lines, so the test is independent of how
/// long the authored segments happen to be.
pub fn line_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let da = a2 - a1;
    let db = b2 - b1;
    let det = da.perp_dot(db);
    if det.abs() <= EPS * da.length() * db.length() {
        return None;
    }
    let t = (b1 - a1).perp_dot(db) / det;
    Some(a1 + da * t)
}

/// As [`line_intersection`], but additionally rejects points that fall
/// outside either input segment (projection test with [`EPS`] slack).
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let p = line_intersection(a1, a2, b1, b2)?;
    if on_segment(a1, a2, p) && on_segment(b1, b2, p) {
        Some(p)
    } else {
        None
    }
}

/// True if `p` (assumed on the segment's line) lies between the endpoints.
fn on_segment(s: Vec2, e: Vec2, p: Vec2) -> bool {
    let d = e - s;
    let len = d.length();
    if len <= EPS {
        return p.distance(s) <= EPS;
    }
    let along = (p - s).dot(d / len);
    (-EPS..=len + EPS).contains(&along)
}

/*────────────────────────────────── Tests ─────────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn wall(p1: Vec2, p2: Vec2) -> Wall {
        Wall::new(p1, p2, Facing::Left, 64.0, 0xFF_FF_FF_FF)
    }

    #[test]
    fn normal_is_unit_and_perpendicular() {
        let w = wall(vec2(10.0, 10.0), vec2(70.0, 90.0));
        assert!((w.normal.length() - 1.0).abs() < 1e-5);
        assert!(w.normal.dot(w.dir()).abs() < 1e-5);
    }

    #[test]
    fn facing_selects_the_perpendicular() {
        let left = Wall::new(Vec2::ZERO, vec2(1.0, 0.0), Facing::Left, 1.0, 0);
        let right = Wall::new(Vec2::ZERO, vec2(1.0, 0.0), Facing::Right, 1.0, 0);
        assert!((left.normal - vec2(0.0, 1.0)).length() < 1e-6);
        assert!((right.normal - vec2(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn classification_is_antisymmetric_under_reflection() {
        let w = wall(vec2(0.0, 0.0), vec2(100.0, 50.0));
        for p in [vec2(13.0, 77.0), vec2(-5.0, 2.0), vec2(60.0, -41.0)] {
            let mirrored = p - 2.0 * w.signed_distance(p) * w.normal;
            let (a, b) = (w.classify_point(p), w.classify_point(mirrored));
            assert_eq!(a, b.flip(), "point {p} vs its mirror {mirrored}");
        }
    }

    #[test]
    fn separated_walls_never_straddle() {
        let a = wall(vec2(0.0, 0.0), vec2(100.0, 0.0));
        let b = wall(vec2(10.0, 20.0), vec2(90.0, 35.0)); // fully in front
        let c = wall(vec2(10.0, -20.0), vec2(90.0, -35.0)); // fully behind
        assert_eq!(a.classify_wall(&b), Side::Front);
        assert_eq!(a.classify_wall(&c), Side::Back);
    }

    #[test]
    fn straddling_wall_reports_on() {
        let a = wall(vec2(0.0, 0.0), vec2(100.0, 0.0));
        let b = wall(vec2(50.0, -10.0), vec2(50.0, 10.0));
        assert_eq!(a.classify_wall(&b), Side::On);
    }

    #[test]
    fn intersection_round_trips_onto_both_lines() {
        let (a1, a2) = (vec2(0.0, 0.0), vec2(100.0, 100.0));
        let (b1, b2) = (vec2(0.0, 100.0), vec2(100.0, 0.0));
        let p = line_intersection(a1, a2, b1, b2).unwrap();
        assert!((p - vec2(50.0, 50.0)).length() < EPS);
        // substituting back: p is on both infinite lines
        assert!((a2 - a1).perp_dot(p - a1).abs() < 1e-2);
        assert!((b2 - b1).perp_dot(p - b1).abs() < 1e-2);
    }

    #[test]
    fn parallel_lines_yield_none() {
        let p = line_intersection(
            vec2(0.0, 0.0),
            vec2(100.0, 50.0),
            vec2(0.0, 10.0),
            vec2(100.0, 60.0),
        );
        assert_eq!(p, None);
    }

    #[test]
    fn segment_intersection_rejects_out_of_range_hits() {
        // lines cross at (50, 50) but the second segment stops short of it
        let p = segment_intersection(
            vec2(0.0, 0.0),
            vec2(100.0, 100.0),
            vec2(0.0, 100.0),
            vec2(40.0, 60.0),
        );
        assert_eq!(p, None);

        let q = segment_intersection(
            vec2(0.0, 0.0),
            vec2(100.0, 100.0),
            vec2(0.0, 100.0),
            vec2(100.0, 0.0),
        );
        assert!(q.is_some());
    }
}
