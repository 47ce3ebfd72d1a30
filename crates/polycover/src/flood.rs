//! Flood initializer: grow convex pieces by casting rays from their corners.
//!
//! A flood keeps one convex piece and repeatedly shoots rays from its
//! vertices. Along a ray, candidate points are the intersections with
//! every line through two region vertices, through a region vertex and a
//! piece vertex, or through two piece vertices. The piece absorbs the
//! farthest candidate whose hull with it still fits the region. Hulls
//! grow monotonically along a ray that starts in the piece, so the
//! farthest fitting candidate is found by binary search.
//!
//! [`flood_init`] floods from a tile at every region vertex and closes
//! whatever gap is left with floods of the gap triangles, so the result
//! always passes [`crate::verify::verify`].

use num_traits::{Signed, Zero};

use crate::gap::get_missing_triangles;
use crate::geom::{cross, Coord, ConvexPolygon, Point};
use crate::model::{Cover, Instance};

/// Upper bound on edge rounds per flood. Rounds stop earlier once a round
/// adds no area.
const MAX_ROUNDS: usize = 32;

struct Flooder<'a> {
    instance: &'a Instance,
    cur: ConvexPolygon,
    corners: Vec<Point>,
}

impl<'a> Flooder<'a> {
    fn new(instance: &'a Instance, start: ConvexPolygon) -> Self {
        let corners = instance
            .region()
            .rings()
            .flat_map(|r| r.vertices.iter().cloned())
            .collect();
        Self {
            instance,
            cur: start,
            corners,
        }
    }

    fn hull_with(&self, q: &Point) -> ConvexPolygon {
        let mut points = self.cur.vertices().to_vec();
        points.push(q.clone());
        ConvexPolygon::hull(&points)
    }

    /// Ray parameters `t > 0` where `p + t (dir - p)` meets a candidate line.
    fn hits(&self, p: &Point, dir: &Point) -> Vec<Coord> {
        let piece = self.cur.vertices();
        let corners = &self.corners;
        let mut lines: Vec<(&Point, &Point)> = Vec::new();
        for (k, a) in corners.iter().enumerate() {
            lines.extend(corners[k + 1..].iter().map(|b| (a, b)));
            lines.extend(piece.iter().map(|b| (a, b)));
        }
        for (k, a) in piece.iter().enumerate() {
            lines.extend(piece[k + 1..].iter().map(|b| (a, b)));
        }

        let mut ts: Vec<Coord> = lines
            .into_iter()
            .filter(|(a, b)| a != b)
            .filter_map(|(a, b)| {
                let fp = cross(a, b, p);
                let denom = cross(a, b, dir) - &fp;
                if denom.is_zero() {
                    return None;
                }
                let t = -fp / denom;
                t.is_positive().then_some(t)
            })
            .collect();
        ts.sort();
        ts.dedup();
        ts
    }

    /// Absorb the farthest point on the ray from `p` through `dir` that keeps
    /// the piece inside the region. Returns whether the piece changed.
    fn raycast(&mut self, p: &Point, dir: &Point) -> bool {
        if p == dir {
            return false;
        }
        let ts = self.hits(p, dir);
        let region = self.instance.region();
        let k = ts.partition_point(|t| {
            let hull = self.hull_with(&p.lerp(dir, t));
            region.contains_convex(&hull)
        });
        if k == 0 {
            return false;
        }
        let grown = self.hull_with(&p.lerp(dir, &ts[k - 1]));
        if grown == self.cur {
            return false;
        }
        self.cur = grown;
        true
    }

    fn run(mut self) -> ConvexPolygon {
        let interior = self.cur.vertices()[0].clone();
        for dir in self.corners.clone() {
            self.raycast(&interior, &dir);
        }
        for round in 0..MAX_ROUNDS {
            let area = self.cur.area();
            let edges: Vec<(Point, Point)> = self
                .cur
                .edges()
                .map(|(a, b)| (a.clone(), b.clone()))
                .collect();
            for (a, b) in &edges {
                self.raycast(a, b);
                self.raycast(b, a);
            }
            if self.cur.area() <= area {
                tracing::trace!(round, vertices = self.cur.len(), "flood settled");
                break;
            }
        }
        self.cur
    }
}

/// Grow `start` inside the instance region by ray casting.
///
/// The result contains `start`. A degenerate `start`, or one that does
/// not fit the region, comes back unchanged.
pub fn flood(instance: &Instance, start: &ConvexPolygon) -> ConvexPolygon {
    if start.is_degenerate() || !instance.region().contains_convex(start) {
        tracing::debug!(instance = instance.name(), "flood start does not fit");
        return start.clone();
    }
    Flooder::new(instance, start.clone()).run()
}

/// A total cover built from floods.
///
/// One flood starts at a tile touching each region vertex (outer boundary
/// first, then holes). Floods of the remaining gap triangles, largest
/// first, close the gap. Duplicate pieces are dropped.
pub fn flood_init(instance: &Instance) -> Cover {
    let tiles = instance.tiles();
    let mut pieces: Vec<ConvexPolygon> = Vec::new();
    let corners: Vec<&Point> = instance
        .region()
        .rings()
        .flat_map(|r| r.vertices.iter())
        .collect();
    for v in corners {
        let Some(seed) = tiles.iter().find(|t| t.vertices().contains(v)) else {
            continue;
        };
        let grown = flood(instance, seed);
        if !pieces.contains(&grown) {
            pieces.push(grown);
        }
    }

    let mut gap = get_missing_triangles(instance, &pieces);
    gap.sort_by(|a, b| b.area().cmp(&a.area()));
    let from_vertices = pieces.len();
    for t in gap {
        if pieces.iter().any(|p| p.contains_all(t.vertices())) {
            continue;
        }
        pieces.push(flood(instance, &t));
    }
    tracing::debug!(
        instance = instance.name(),
        pieces = pieces.len(),
        gap_floods = pieces.len() - from_vertices,
        "flood init"
    );
    Cover::new(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{holed_instance, l_shape, pts, region_of};
    use crate::geom::coord;
    use crate::removal::{try_remove_all, RemovalCfg};
    use crate::verify::verify;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_instance() -> Instance {
        Instance::new("square", region_of(&[(0, 0), (4, 0), (4, 4), (0, 4)], &[])).unwrap()
    }

    #[test]
    fn triangle_in_square_floods_to_the_square() {
        let instance = square_instance();
        let start = ConvexPolygon::hull(&pts(&[(0, 0), (4, 0), (4, 4)]));
        let grown = flood(&instance, &start);
        assert_eq!(grown, ConvexPolygon::hull(&pts(&[(0, 0), (4, 0), (4, 4), (0, 4)])));
        assert_eq!(grown.area(), coord(16));
    }

    #[test]
    fn flood_stays_inside_the_l_shape() {
        let (instance, _) = l_shape();
        let start = ConvexPolygon::hull(&pts(&[(0, 0), (1, 0), (0, 1)]));
        let grown = flood(&instance, &start);
        assert!(instance.region().contains_convex(&grown));
        assert!(grown.is_convex());
        assert!(grown.contains_all(start.vertices()));
        assert!(grown.area() > start.area());
    }

    #[test]
    fn unfit_start_is_returned_unchanged() {
        let instance = holed_instance();
        let over_hole = ConvexPolygon::hull(&pts(&[(3, 3), (7, 3), (7, 7), (3, 7)]));
        assert_eq!(flood(&instance, &over_hole), over_hole);
        let sliver = ConvexPolygon::hull(&pts(&[(0, 0), (1, 1)]));
        assert_eq!(flood(&instance, &sliver), sliver);
    }

    #[test]
    fn flood_init_covers_are_valid() {
        let (l, _) = l_shape();
        for instance in [square_instance(), l, holed_instance()] {
            let cover = flood_init(&instance);
            assert!(verify(&instance, &cover).is_ok(), "{}", instance.name());
        }
        assert_eq!(flood_init(&square_instance()).len(), 1);
    }

    #[test]
    fn removal_sweep_keeps_a_flooded_cover_valid() {
        let instance = holed_instance();
        let mut cover = flood_init(&instance);
        let before = cover.len();
        let mut rng = StdRng::seed_from_u64(5);
        try_remove_all(&instance, &mut cover, &RemovalCfg::default(), &mut rng);
        assert!(cover.len() <= before);
        assert!(verify(&instance, &cover).is_ok());
    }
}
