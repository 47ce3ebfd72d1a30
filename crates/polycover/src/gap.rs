//! Coverage gap: what of the region a partial cover leaves uncovered.
//!
//! The gap is kept as interior-disjoint convex pieces. It starts from the
//! instance's triangulation tiles and subtracts every cover piece in turn,
//! so each intermediate state is a valid convex decomposition.

use crate::geom::ConvexPolygon;
use crate::model::{Cover, Instance};

/// Region minus the union of `partial`. Empty means fully covered.
pub fn get_missing<'a, I>(instance: &Instance, partial: I) -> Vec<ConvexPolygon>
where
    I: IntoIterator<Item = &'a ConvexPolygon>,
{
    let mut missing: Vec<ConvexPolygon> = instance.tiles().to_vec();
    for piece in partial {
        if missing.is_empty() {
            break;
        }
        if piece.is_degenerate() {
            continue;
        }
        missing = missing
            .into_iter()
            .flat_map(|m| {
                if m.overlaps_bounds(piece) {
                    m.subtract(piece)
                } else {
                    vec![m]
                }
            })
            .collect();
    }
    missing
}

/// The gap as triangles, ready to be inserted into a cover.
pub fn get_missing_triangles<'a, I>(instance: &Instance, partial: I) -> Vec<ConvexPolygon>
where
    I: IntoIterator<Item = &'a ConvexPolygon>,
{
    get_missing(instance, partial)
        .iter()
        .flat_map(ConvexPolygon::fan)
        .collect()
}

/// What would be uncovered if piece `i` were dropped.
pub fn get_missing_removal(instance: &Instance, cover: &Cover, i: usize) -> Vec<ConvexPolygon> {
    get_missing(instance, cover.without(i))
}

/// Approximate total area of gap pieces.
pub fn missing_area(pieces: &[ConvexPolygon]) -> f64 {
    pieces.iter().map(ConvexPolygon::area_f64).sum()
}
