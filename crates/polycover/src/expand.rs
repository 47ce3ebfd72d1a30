//! Growing and shrinking single cover pieces.

use crate::gap::get_missing_removal;
use crate::geom::{ConvexPolygon, Point};
use crate::model::{Cover, Instance};

/// Result of [`greedy_expand`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    pub polygon: ConvexPolygon,
    /// True iff `polygon` contains every target point.
    pub all_covered: bool,
}

/// Grow `poly` to the hull of its vertices and `targets`, if that hull fits the region.
///
/// All or nothing: either every target is absorbed or `poly` comes back
/// unchanged. `poly` may be empty, in which case the hull of the targets
/// alone is tried.
pub fn greedy_expand(instance: &Instance, poly: &ConvexPolygon, targets: &[Point]) -> Expansion {
    if !poly.is_degenerate() && poly.contains_all(targets) {
        return Expansion {
            polygon: poly.clone(),
            all_covered: true,
        };
    }
    let mut points: Vec<Point> = Vec::with_capacity(poly.len() + targets.len());
    points.extend_from_slice(poly.vertices());
    points.extend_from_slice(targets);
    let hull = ConvexPolygon::hull(&points);
    if instance.region().contains_convex(&hull) {
        Expansion {
            polygon: hull,
            all_covered: true,
        }
    } else {
        Expansion {
            polygon: poly.clone(),
            all_covered: false,
        }
    }
}

/// What piece `i` must still cover for the cover to stay total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Necessity {
    /// The rest of the cover already covers everything piece `i` does.
    NoActionNeeded,
    Polygon(ConvexPolygon),
}

impl Necessity {
    /// The required polygon; empty when nothing is needed.
    pub fn into_polygon(self) -> ConvexPolygon {
        match self {
            Necessity::NoActionNeeded => ConvexPolygon::empty(),
            Necessity::Polygon(p) => p,
        }
    }
}

/// Smallest convex piece that keeps the cover total in place of piece `i`:
/// the hull of the gap left by dropping it.
pub fn minimize_to_necessary(instance: &Instance, cover: &Cover, i: usize) -> Necessity {
    let gap = get_missing_removal(instance, cover, i);
    if gap.is_empty() {
        return Necessity::NoActionNeeded;
    }
    let points: Vec<Point> = gap
        .iter()
        .flat_map(|g| g.vertices().iter().cloned())
        .collect();
    Necessity::Polygon(ConvexPolygon::hull(&points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{holed_instance, pts, two_triangle_square};
    use crate::gap::get_missing;
    use crate::geom::coord;

    #[test]
    fn triangle_absorbs_its_neighbour() {
        let (instance, cover) = two_triangle_square();
        let [a, b] = [&cover.pieces()[0], &cover.pieces()[1]];
        let out = greedy_expand(&instance, a, b.vertices());
        assert!(out.all_covered);
        assert_eq!(out.polygon.len(), 4);
        assert_eq!(out.polygon.area(), coord(1));
    }

    #[test]
    fn expansion_into_hole_is_refused() {
        let instance = holed_instance();
        let piece = ConvexPolygon::hull(&pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]));
        let out = greedy_expand(&instance, &piece, &pts(&[(10, 10)]));
        assert!(!out.all_covered);
        assert_eq!(out.polygon, piece);
    }

    #[test]
    fn targets_already_inside_keep_the_piece() {
        let instance = holed_instance();
        let piece = ConvexPolygon::hull(&pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]));
        let out = greedy_expand(&instance, &piece, &pts(&[(1, 1), (4, 4)]));
        assert!(out.all_covered);
        assert_eq!(out.polygon, piece);
    }

    #[test]
    fn empty_piece_expands_to_target_hull() {
        let instance = holed_instance();
        let out = greedy_expand(
            &instance,
            &ConvexPolygon::empty(),
            &pts(&[(0, 0), (3, 0), (0, 3)]),
        );
        assert!(out.all_covered);
        assert_eq!(out.polygon.area(), coord(9) / coord(2));
    }

    #[test]
    fn redundant_piece_needs_nothing() {
        let (instance, mut cover) = two_triangle_square();
        cover.push(ConvexPolygon::hull(&pts(&[(0, 0), (1, 0), (1, 1), (0, 1)])));
        assert_eq!(
            minimize_to_necessary(&instance, &cover, 2),
            Necessity::NoActionNeeded
        );
        assert!(minimize_to_necessary(&instance, &cover, 2)
            .into_polygon()
            .is_empty());
    }

    #[test]
    fn minimize_then_expand_keeps_coverage() {
        let instance = holed_instance();
        let left = ConvexPolygon::hull(&pts(&[(0, 0), (4, 0), (4, 10), (0, 10)]));
        let bottom = ConvexPolygon::hull(&pts(&[(0, 0), (10, 0), (10, 4), (0, 4)]));
        let right = ConvexPolygon::hull(&pts(&[(6, 0), (10, 0), (10, 10), (6, 10)]));
        let top = ConvexPolygon::hull(&pts(&[(0, 6), (10, 6), (10, 10), (0, 10)]));
        let mut cover = Cover::new(vec![left, bottom, right, top]);
        assert!(get_missing(&instance, cover.pieces()).is_empty());

        // Left strip is only needed for x in 0..4, y in 4..6.
        let needed = match minimize_to_necessary(&instance, &cover, 0) {
            Necessity::Polygon(p) => p,
            Necessity::NoActionNeeded => panic!("left strip is needed"),
        };
        assert_eq!(needed.area(), coord(8));

        let out = greedy_expand(&instance, &needed, needed.vertices());
        assert!(out.all_covered);
        cover.replace(0, out.polygon);
        assert!(get_missing(&instance, cover.pieces()).is_empty());
        assert!(crate::verify::verify(&instance, &cover).is_ok());
    }
}
