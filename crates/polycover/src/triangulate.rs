//! Initial cover: constrained Delaunay triangulation + nesting-level domains.
//!
//! Purpose
//! - Build a valid (if large) convex cover: one triangle per face of the
//!   constrained triangulation that lies inside the region.
//!
//! Model
//! - Every boundary and hole edge is a constraint. Faces are labelled by a
//!   breadth-first sweep from the unbounded face (level 0): crossing a free
//!   edge keeps the level, crossing a constraint starts a new sweep at
//!   level + 1. Odd levels are inside, which alternates correctly through
//!   holes and islands within holes.
//! - The constrained-edge set lives for one call only.
//!
//! The kernel runs on `f64` positions (input coordinates are integers, so
//! the conversion is exact); triangles are emitted with the exact points
//! they were built from.

use std::collections::{HashSet, VecDeque};

use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, HasPosition, Point2, Triangulation};

use crate::error::CoverError;
use crate::geom::{ConvexPolygon, Point, Region};
use crate::model::{Cover, Instance};

/// Triangulation vertex carrying the index of its exact point.
#[derive(Clone, Copy, Debug)]
struct Corner {
    position: Point2<f64>,
    index: usize,
}

impl HasPosition for Corner {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

type Cdt = ConstrainedDelaunayTriangulation<Corner>;
type EdgeSet = HashSet<(FixedVertexHandle, FixedVertexHandle)>;

/// The instance's initial cover: its in-region triangles, in unspecified order.
pub fn basic_triangulation(instance: &Instance) -> Cover {
    let cover = Cover::new(instance.tiles().to_vec());
    tracing::debug!(
        instance = instance.name(),
        triangles = cover.len(),
        "basic triangulation"
    );
    cover
}

/// Triangulate a polygon with holes into CCW triangles covering it exactly.
pub fn triangulate_region(region: &Region) -> Result<Vec<ConvexPolygon>, CoverError> {
    let mut cdt = Cdt::new();
    let mut exact: Vec<Point> = Vec::with_capacity(region.vertex_count());
    let mut rings: Vec<Vec<FixedVertexHandle>> = Vec::new();
    for ring in region.rings() {
        let mut handles = Vec::with_capacity(ring.len());
        for p in &ring.vertices {
            let v = p.to_vec2();
            let corner = Corner {
                position: Point2::new(v.x, v.y),
                index: exact.len(),
            };
            exact.push(p.clone());
            let handle = cdt
                .insert(corner)
                .map_err(|e| CoverError::triangulation(format!("vertex {p}: {e:?}")))?;
            handles.push(handle);
        }
        rings.push(handles);
    }

    let mut constrained = EdgeSet::new();
    for handles in &rings {
        for (k, &from) in handles.iter().enumerate() {
            let to = handles[(k + 1) % handles.len()];
            if from == to || constrained.contains(&(from, to)) {
                continue;
            }
            if !cdt.can_add_constraint(from, to) {
                return Err(CoverError::triangulation(format!(
                    "boundary edge {} - {} crosses another boundary edge",
                    exact[cdt.vertex(from).data().index],
                    exact[cdt.vertex(to).data().index]
                )));
            }
            cdt.add_constraint(from, to);
            constrained.insert((from, to));
            constrained.insert((to, from));
        }
    }

    let levels = nesting_levels(&cdt, &constrained);
    let tiles: Vec<ConvexPolygon> = cdt
        .inner_faces()
        .filter(|face| levels[face.fix().index()] % 2 == 1)
        .map(|face| {
            let verts = face.vertices().map(|v| exact[v.data().index].clone());
            ConvexPolygon::from_ccw_unchecked(verts.to_vec())
        })
        .collect();
    Ok(tiles)
}

/// Nesting level per face index (outer face included).
fn nesting_levels(cdt: &Cdt, constrained: &EdgeSet) -> Vec<u32> {
    let n = cdt.num_all_faces();
    let mut neighbours: Vec<Vec<(usize, bool)>> = vec![Vec::new(); n];
    for edge in cdt.directed_edges() {
        let here = edge.face().fix().index();
        let there = edge.rev().face().fix().index();
        let is_constraint = constrained.contains(&(edge.from().fix(), edge.to().fix()));
        neighbours[here].push((there, is_constraint));
    }

    let mut level: Vec<Option<u32>> = vec![None; n];
    let mut border: VecDeque<(usize, u32)> = VecDeque::new();
    border.push_back((cdt.outer_face().fix().index(), 0));
    while let Some((start, index)) = border.pop_front() {
        if level[start].is_some() {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        while let Some(f) = queue.pop_front() {
            if level[f].is_some() {
                continue;
            }
            level[f] = Some(index);
            for &(g, is_constraint) in &neighbours[f] {
                if level[g].is_some() {
                    continue;
                }
                if is_constraint {
                    border.push_back((g, index + 1));
                } else {
                    queue.push_back(g);
                }
            }
        }
    }
    level.into_iter().map(|l| l.unwrap_or(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{holed_square, pts, region_of};
    use crate::geom::{Coord, SimplePolygon};
    use proptest::prelude::*;

    #[test]
    fn convex_polygon_gives_v_minus_two_triangles() {
        let hexagon = region_of(&[(0, 0), (2, 0), (3, 1), (2, 2), (0, 2), (-1, 1)], &[]);
        let tiles = triangulate_region(&hexagon).unwrap();
        assert_eq!(tiles.len(), 4);
        let total: Coord = tiles.iter().map(ConvexPolygon::area).sum();
        assert_eq!(total, hexagon.area());
    }

    #[test]
    fn hole_faces_are_excluded() {
        let region = holed_square();
        let tiles = triangulate_region(&region).unwrap();
        // n + 2h - 2 triangles for n boundary vertices and h holes.
        assert_eq!(tiles.len(), 8);
        let total: Coord = tiles.iter().map(ConvexPolygon::area).sum();
        assert_eq!(total, region.area());
        for t in &tiles {
            assert!(t.is_convex());
            let q = t.interior_point().unwrap();
            assert!(region.contains_point(&q), "triangle {t:?} lies in the hole");
        }
    }

    #[test]
    fn wide_hole_leaves_thin_annulus() {
        // Hole interior is level 2 and stays out.
        let region = region_of(
            &[(0, 0), (12, 0), (12, 12), (0, 12)],
            &[&[(2, 2), (10, 2), (10, 10), (2, 10)]],
        );
        let tiles = triangulate_region(&region).unwrap();
        let total: Coord = tiles.iter().map(ConvexPolygon::area).sum();
        assert_eq!(total, region.area());
    }

    #[test]
    fn nonconvex_outer_boundary() {
        let region = region_of(&[(0, 0), (4, 0), (4, 4), (2, 1), (0, 4)], &[]);
        let tiles = triangulate_region(&region).unwrap();
        assert_eq!(tiles.len(), 3);
        for t in &tiles {
            assert!(region.contains_convex(t));
        }
    }

    #[test]
    fn crossing_boundary_is_an_error() {
        // Bow-tie outer loop.
        let region = Region::new(
            SimplePolygon::new(pts(&[(0, 0), (2, 2), (2, 0), (0, 2)])),
            Vec::new(),
        );
        assert!(matches!(
            triangulate_region(&region),
            Err(CoverError::Triangulation { .. })
        ));
    }

    proptest! {
        #[test]
        fn random_convex_regions(raw in prop::collection::vec((-30i64..30, -30i64..30), 3..20)) {
            let hull = ConvexPolygon::hull(&pts(&raw));
            prop_assume!(!hull.is_degenerate());
            let region = Region::new(SimplePolygon::new(hull.vertices().to_vec()), Vec::new());
            let tiles = triangulate_region(&region).unwrap();
            prop_assert_eq!(tiles.len(), hull.len() - 2);
        }
    }
}
