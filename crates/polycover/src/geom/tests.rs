use super::*;
use crate::fixtures::{holed_square, pts};
use num_traits::Zero;
use proptest::prelude::*;

fn square(lo: i64, hi: i64) -> Vec<Point> {
    pts(&[(lo, lo), (hi, lo), (hi, hi), (lo, hi)])
}

#[test]
fn hull_drops_interior_and_collinear_points() {
    let input = pts(&[(0, 0), (2, 0), (4, 0), (4, 4), (0, 4), (2, 2), (0, 2)]);
    let hull = convex_hull(&input);
    assert_eq!(hull, pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]));
    let line = convex_hull(&pts(&[(0, 0), (1, 1), (3, 3)]));
    assert_eq!(line.len(), 2);
}

#[test]
fn region_normalizes_orientation_and_area() {
    let mut outer = square(0, 10);
    outer.reverse();
    let r = Region::new(
        SimplePolygon::new(outer),
        vec![SimplePolygon::new(square(4, 6))],
    );
    assert!(r.outer().signed_area2() > Coord::zero());
    assert!(r.holes()[0].signed_area2() < Coord::zero());
    assert_eq!(r.area(), coord(96));
    assert_eq!(r.vertex_count(), 8);
}

#[test]
fn clip_square_by_diagonal() {
    let sq = ConvexPolygon::hull(&square(0, 2));
    let (a, b) = (Point::from_ints(0, 0), Point::from_ints(2, 2));
    let left = sq.clip(&a, &b, true);
    let right = sq.clip(&a, &b, false);
    assert_eq!(left.len(), 3);
    assert_eq!(right.len(), 3);
    assert_eq!(left.area() + right.area(), sq.area());
    // A line missing the square entirely keeps or drops all of it.
    let far = (Point::from_ints(5, 0), Point::from_ints(5, 1));
    assert_eq!(sq.clip(&far.0, &far.1, true), sq);
    assert!(sq.clip(&far.0, &far.1, false).is_empty());
}

#[test]
fn subtract_conserves_area() {
    let p = ConvexPolygon::hull(&square(0, 4));
    let c = ConvexPolygon::hull(&pts(&[(1, 1), (3, 1), (2, 3)]));
    let pieces = p.subtract(&c);
    assert!(!pieces.is_empty());
    let total: Coord = pieces.iter().map(ConvexPolygon::area).sum();
    assert_eq!(total, coord(14));
    assert!(pieces.iter().all(ConvexPolygon::is_convex));
    // Nothing of the difference lies inside the subtracted triangle.
    for piece in &pieces {
        let q = piece.interior_point().unwrap();
        assert!(!c.contains_point(&q));
    }
}

#[test]
fn subtract_disjoint_and_covering() {
    let p = ConvexPolygon::hull(&square(0, 1));
    let far = ConvexPolygon::hull(&square(5, 6));
    assert_eq!(p.subtract(&far), vec![p.clone()]);
    let big = ConvexPolygon::hull(&square(-1, 2));
    assert!(p.subtract(&big).is_empty());
    // Edge-adjacent pieces do not eat each other.
    let next = ConvexPolygon::hull(&pts(&[(1, 0), (2, 0), (2, 1), (1, 1)]));
    assert_eq!(p.subtract(&next), vec![p.clone()]);
}

#[test]
fn fan_of_pentagon() {
    let p = ConvexPolygon::hull(&pts(&[(0, 0), (2, 0), (3, 2), (1, 3), (-1, 2)]));
    let tris = p.fan();
    assert_eq!(tris.len(), 3);
    let total: Coord = tris.iter().map(ConvexPolygon::area).sum();
    assert_eq!(total, p.area());
}

#[test]
fn point_containment_with_hole() {
    let r = holed_square();
    assert!(r.contains_point(&Point::from_ints(1, 1)));
    assert!(r.contains_point(&Point::from_ints(8, 5)));
    assert!(!r.contains_point(&Point::from_ints(5, 5)));
    assert!(!r.contains_point(&Point::from_ints(11, 5)));
}

#[test]
fn convex_containment_with_hole() {
    let r = holed_square();
    assert!(r.contains_convex(&ConvexPolygon::hull(&square(0, 3))));
    assert!(r.contains_convex(&ConvexPolygon::hull(&pts(&[(7, 0), (10, 0), (10, 10), (7, 10)]))));
    // Touching the hole along an edge is fine.
    assert!(r.contains_convex(&ConvexPolygon::hull(&pts(&[(0, 4), (4, 4), (4, 6), (0, 6)]))));
    // Swallowing part of the hole is not.
    assert!(!r.contains_convex(&ConvexPolygon::hull(&pts(&[(0, 0), (10, 0), (0, 10)]))));
    // Whole piece outside.
    assert!(!r.contains_convex(&ConvexPolygon::hull(&pts(&[(11, 0), (12, 0), (11, 1)]))));
    // Entirely inside the hole.
    assert!(!r.contains_convex(&ConvexPolygon::hull(&pts(&[(4, 4), (6, 4), (5, 6)]))));
    // Degenerate pieces are never contained.
    assert!(!r.contains_convex(&ConvexPolygon::hull(&pts(&[(1, 1), (2, 2)]))));
}

#[test]
fn from_loop_orients_and_flags_reflex() {
    let cw = ConvexPolygon::from_loop(pts(&[(0, 0), (0, 1), (1, 1), (1, 0)]));
    assert!(cw.is_convex());
    assert!(cw.area() > Coord::zero());
    let l_shape = ConvexPolygon::from_loop(pts(&[(0, 0), (2, 0), (2, 1), (1, 1), (1, 2), (0, 2)]));
    assert!(!l_shape.is_convex());
}

proptest! {
    #[test]
    fn hull_contains_its_input(raw in prop::collection::vec((-20i64..20, -20i64..20), 3..24)) {
        let input = pts(&raw);
        let hull = ConvexPolygon::hull(&input);
        prop_assume!(!hull.is_degenerate());
        prop_assert!(hull.is_convex());
        prop_assert!(hull.contains_all(&input));
    }

    #[test]
    fn subtract_partitions_area(
        a in prop::collection::vec((-10i64..10, -10i64..10), 3..10),
        b in prop::collection::vec((-10i64..10, -10i64..10), 3..10),
    ) {
        let p = ConvexPolygon::hull(&pts(&a));
        let c = ConvexPolygon::hull(&pts(&b));
        prop_assume!(!p.is_degenerate() && !c.is_degenerate());
        let pieces = p.subtract(&c);
        let outside: Coord = pieces.iter().map(ConvexPolygon::area).sum();
        // area(P) = area(P \ C) + area(P ∩ C), with P ∩ C clipped edge by edge.
        let mut inter = p.clone();
        for (u, v) in c.edges() {
            inter = inter.clip(u, v, true);
        }
        prop_assert_eq!(outside + inter.area(), p.area());
    }
}
