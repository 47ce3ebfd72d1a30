use nalgebra::Vector2;
use num_traits::{Signed, ToPrimitive, Zero};

use super::hull::convex_hull;
use super::point::{coord, cross, Coord, Point};

/// Closed simple loop (no repeated consecutive vertices).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimplePolygon {
    pub vertices: Vec<Point>,
}

impl SimplePolygon {
    #[inline]
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Twice the signed area (positive for CCW loops).
    pub fn signed_area2(&self) -> Coord {
        signed_area2(&self.vertices)
    }

    /// Edges `(v_k, v_{k+1})`, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        loop_edges(&self.vertices)
    }

    fn oriented(mut self, ccw: bool) -> Self {
        if self.signed_area2().is_positive() != ccw {
            self.vertices.reverse();
        }
        self
    }
}

/// Axis-aligned bounding box of a vertex set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub lo: Point,
    pub hi: Point,
}

impl Bounds {
    fn of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Bounds {
            lo: first.clone(),
            hi: first.clone(),
        };
        for p in it {
            if p.x < b.lo.x {
                b.lo.x = p.x.clone();
            }
            if p.x > b.hi.x {
                b.hi.x = p.x.clone();
            }
            if p.y < b.lo.y {
                b.lo.y = p.y.clone();
            }
            if p.y > b.hi.y {
                b.hi.y = p.y.clone();
            }
        }
        Some(b)
    }

    /// True iff the open boxes intersect (touching boxes do not overlap).
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.lo.x < other.hi.x
            && other.lo.x < self.hi.x
            && self.lo.y < other.hi.y
            && other.lo.y < self.hi.y
    }

    /// Closed-box intersection test.
    #[inline]
    pub fn touches(&self, other: &Bounds) -> bool {
        self.lo.x <= other.hi.x
            && other.lo.x <= self.hi.x
            && self.lo.y <= other.hi.y
            && other.lo.y <= self.hi.y
    }
}

/// Convex cover piece.
///
/// Invariants (for pieces built by `hull`, `clip`, `subtract`, `fan`):
/// - CCW, strictly convex, no duplicate or collinear vertices.
/// - Either empty or at least three vertices (positive area).
///
/// `from_loop` accepts arbitrary input (e.g. read from disk); use
/// `is_convex` to check it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvexPolygon {
    vertices: Vec<Point>,
}

impl ConvexPolygon {
    /// "No polygon".
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Convex hull of a point set. May be degenerate (fewer than 3 vertices).
    pub fn hull(points: &[Point]) -> Self {
        Self {
            vertices: convex_hull(points),
        }
    }

    /// Wrap a loop already known to be CCW and strictly convex.
    #[inline]
    pub fn from_ccw_unchecked(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Orient a loop CCW and drop duplicate/collinear vertices.
    ///
    /// Convexity is not checked here.
    pub fn from_loop(vertices: Vec<Point>) -> Self {
        let mut vertices = strip_degenerate(vertices);
        if signed_area2(&vertices).is_negative() {
            vertices.reverse();
        }
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fewer than three vertices: no interior.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Every turn strictly left.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        (0..n).all(|i| {
            cross(
                &self.vertices[i],
                &self.vertices[(i + 1) % n],
                &self.vertices[(i + 2) % n],
            )
            .is_positive()
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        loop_edges(&self.vertices)
    }

    /// Exact area (non-negative for CCW pieces).
    pub fn area(&self) -> Coord {
        signed_area2(&self.vertices) / coord(2)
    }

    pub fn area_f64(&self) -> f64 {
        self.area().to_f64().unwrap_or(0.0)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.vertices)
    }

    /// Vertex average; strictly interior for a non-degenerate piece.
    pub fn interior_point(&self) -> Option<Point> {
        if self.is_degenerate() {
            return None;
        }
        let n = coord(self.vertices.len() as i64);
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((Coord::zero(), Coord::zero()), |(sx, sy), p| {
                (sx + &p.x, sy + &p.y)
            });
        Some(Point::new(sx / &n, sy / &n))
    }

    /// Float vertex average, for distance heuristics.
    pub fn centroid_f64(&self) -> Vector2<f64> {
        if self.vertices.is_empty() {
            return Vector2::zeros();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.to_vec2());
        sum / self.vertices.len() as f64
    }

    /// Closed containment of a point.
    pub fn contains_point(&self, p: &Point) -> bool {
        !self.is_degenerate() && self.edges().all(|(a, b)| !cross(a, b, p).is_negative())
    }

    /// Closed containment of another vertex set (hence of its hull).
    pub fn contains_all(&self, points: &[Point]) -> bool {
        points.iter().all(|p| self.contains_point(p))
    }

    /// Fan triangulation from the first vertex (valid since the piece is convex).
    pub fn fan(&self) -> Vec<ConvexPolygon> {
        if self.is_degenerate() {
            return Vec::new();
        }
        (1..self.vertices.len() - 1)
            .map(|k| {
                ConvexPolygon::from_ccw_unchecked(vec![
                    self.vertices[0].clone(),
                    self.vertices[k].clone(),
                    self.vertices[k + 1].clone(),
                ])
            })
            .collect()
    }
}

/// Polygon with holes: the region to cover.
///
/// The outer loop is stored CCW and holes CW regardless of input orientation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    outer: SimplePolygon,
    holes: Vec<SimplePolygon>,
}

impl Region {
    pub fn new(outer: SimplePolygon, holes: Vec<SimplePolygon>) -> Self {
        Self {
            outer: outer.oriented(true),
            holes: holes.into_iter().map(|h| h.oriented(false)).collect(),
        }
    }

    #[inline]
    pub fn outer(&self) -> &SimplePolygon {
        &self.outer
    }

    #[inline]
    pub fn holes(&self) -> &[SimplePolygon] {
        &self.holes
    }

    /// Outer loop first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &SimplePolygon> + '_ {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub fn boundary_edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        self.rings().flat_map(|r| r.edges())
    }

    pub fn vertex_count(&self) -> usize {
        self.rings().map(SimplePolygon::len).sum()
    }

    /// Exact area: outer minus holes.
    pub fn area(&self) -> Coord {
        self.rings().map(|r| r.signed_area2()).sum::<Coord>() / coord(2)
    }
}

fn signed_area2(vertices: &[Point]) -> Coord {
    loop_edges(vertices)
        .map(|(p, q)| &p.x * &q.y - &q.x * &p.y)
        .sum()
}

fn loop_edges(vertices: &[Point]) -> impl Iterator<Item = (&Point, &Point)> + '_ {
    let n = vertices.len();
    (0..n).map(move |k| (&vertices[k], &vertices[(k + 1) % n]))
}

/// Remove cyclic duplicates and collinear vertices; clear if nothing of area remains.
pub(crate) fn strip_degenerate(mut pts: Vec<Point>) -> Vec<Point> {
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    let mut changed = true;
    while changed && pts.len() >= 3 {
        changed = false;
        let n = pts.len();
        for i in 0..n {
            if cross(&pts[(i + n - 1) % n], &pts[i], &pts[(i + 1) % n]).is_zero() {
                pts.remove(i);
                changed = true;
                break;
            }
        }
    }
    if pts.len() < 3 {
        pts.clear();
    }
    pts
}
