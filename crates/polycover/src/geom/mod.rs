//! Exact 2D geometry kernel (rational coordinates).
//!
//! Purpose
//! - Provide the primitives the cover search orchestrates: orientation,
//!   convex hull, half-plane clipping, convex difference, point and
//!   convex-polygon containment in a polygon with holes.
//! - Everything is exact (`BigRational`); floats only appear in the
//!   `*_f64` views used for triangulation input and ranking heuristics.
//!
//! Conventions
//! - Convex pieces are CCW, strictly convex (no duplicate or collinear
//!   vertices). An empty vertex list means "no polygon".
//! - Region outer boundaries are CCW, holes CW.
//! - Containment of a convex polygon is decided on interiors: a piece may
//!   touch the region boundary, it may not cross it.

mod clip;
mod contain;
mod hull;
mod point;
mod polygon;

pub use hull::convex_hull;
pub use point::{coord, cross, Coord, Point};
pub use polygon::{Bounds, ConvexPolygon, Region, SimplePolygon};

#[cfg(test)]
mod tests;
