//! Containment predicates against a polygon with holes.

use num_traits::{One, Signed, Zero};

use super::point::{coord, cross, Coord, Point};
use super::polygon::{Bounds, ConvexPolygon, Region};

impl Region {
    /// Even-odd ray crossing, exact.
    ///
    /// Result is unspecified for points on the boundary; callers only ask
    /// about points known to be off it.
    pub fn contains_point(&self, p: &Point) -> bool {
        let mut inside = false;
        for (a, b) in self.boundary_edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = &a.x + (&p.y - &a.y) * (&b.x - &a.x) / (&b.y - &a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// `h ⊆ region`, i.e. no part of the complement overlaps the interior of `h`.
    ///
    /// Holds iff an interior point of `h` lies in the region and no boundary
    /// segment of the region meets the open interior of `h`. Degenerate `h`
    /// is never contained.
    pub fn contains_convex(&self, h: &ConvexPolygon) -> bool {
        let (Some(q), Some(hb)) = (h.interior_point(), h.bounds()) else {
            return false;
        };
        let crosses = self.boundary_edges().any(|(a, b)| {
            segment_bounds(a, b).touches(&hb) && segment_meets_interior(a, b, h)
        });
        !crosses && self.contains_point(&q)
    }
}

fn segment_bounds(a: &Point, b: &Point) -> Bounds {
    let (lx, hx) = if a.x <= b.x { (&a.x, &b.x) } else { (&b.x, &a.x) };
    let (ly, hy) = if a.y <= b.y { (&a.y, &b.y) } else { (&b.y, &a.y) };
    Bounds {
        lo: Point::new(lx.clone(), ly.clone()),
        hi: Point::new(hx.clone(), hy.clone()),
    }
}

/// Does the closed segment `ab` meet the open interior of convex `h`?
///
/// Liang–Barsky on the closed piece gives the parameter range `[lo, hi]`;
/// a non-empty range meets the interior iff its midpoint is strictly inside
/// (otherwise the whole range runs along one supporting line).
pub(crate) fn segment_meets_interior(a: &Point, b: &Point, h: &ConvexPolygon) -> bool {
    let mut lo = Coord::zero();
    let mut hi = Coord::one();
    for (u, v) in h.edges() {
        let fa = cross(u, v, a);
        let fb = cross(u, v, b);
        let d = &fb - &fa;
        if d.is_zero() {
            if !fa.is_positive() {
                return false;
            }
        } else {
            let t = -&fa / &d;
            if d.is_positive() {
                if t > lo {
                    lo = t;
                }
            } else if t < hi {
                hi = t;
            }
        }
        if lo >= hi {
            return false;
        }
    }
    let mid = (&lo + &hi) / coord(2);
    let m = a.lerp(b, &mid);
    h.edges().all(|(u, v)| cross(u, v, &m).is_positive())
}
