//! Half-plane clipping and convex difference.

use num_traits::Signed;

use super::point::{cross, Coord, Point};
use super::polygon::{strip_degenerate, ConvexPolygon};

impl ConvexPolygon {
    /// Clip against the closed half-plane left of `a→b` (`keep_left`) or right of it.
    ///
    /// Sutherland–Hodgman on a single plane; exact. The result is again a
    /// strictly convex CCW piece, or empty if no area remains.
    pub fn clip(&self, a: &Point, b: &Point, keep_left: bool) -> ConvexPolygon {
        let n = self.len();
        if n == 0 {
            return ConvexPolygon::empty();
        }
        let side: Vec<Coord> = self
            .vertices()
            .iter()
            .map(|v| {
                let c = cross(a, b, v);
                if keep_left {
                    c
                } else {
                    -c
                }
            })
            .collect();
        if side.iter().all(|s| !s.is_negative()) {
            return self.clone();
        }
        if side.iter().all(|s| !s.is_positive()) {
            return ConvexPolygon::empty();
        }
        let mut out: Vec<Point> = Vec::with_capacity(n + 1);
        for i in 0..n {
            let j = (i + 1) % n;
            let (p, q) = (&self.vertices()[i], &self.vertices()[j]);
            let (sp, sq) = (&side[i], &side[j]);
            if !sp.is_negative() {
                out.push(p.clone());
            }
            let crosses =
                (sp.is_positive() && sq.is_negative()) || (sp.is_negative() && sq.is_positive());
            if crosses {
                let t = sp / (sp - sq);
                out.push(p.lerp(q, &t));
            }
        }
        ConvexPolygon::from_ccw_unchecked(strip_degenerate(out))
    }

    /// `self \ other` as interior-disjoint convex pieces of positive area.
    ///
    /// Peels off, edge by edge of `other`, the part of `self` on the outer
    /// side; what survives every edge lies inside `other` and is dropped.
    pub fn subtract(&self, other: &ConvexPolygon) -> Vec<ConvexPolygon> {
        if self.is_degenerate() {
            return Vec::new();
        }
        if other.is_degenerate() || !self.overlaps_bounds(other) {
            return vec![self.clone()];
        }
        let mut rest = self.clone();
        let mut out = Vec::new();
        for (a, b) in other.edges() {
            let outside = rest.clip(a, b, false);
            if !outside.is_empty() {
                out.push(outside);
            }
            rest = rest.clip(a, b, true);
            if rest.is_empty() {
                break;
            }
        }
        out
    }

    /// Open bounding boxes intersect (a necessary condition for interior overlap).
    pub fn overlaps_bounds(&self, other: &ConvexPolygon) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}
