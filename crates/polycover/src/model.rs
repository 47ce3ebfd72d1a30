//! Instance (region to cover) and Cover (the solution being improved).

use crate::error::CoverError;
use crate::geom::{ConvexPolygon, Region};
use crate::triangulate::triangulate_region;

/// Named region, immutable once built.
///
/// Construction triangulates the region once; the tiles seed every gap
/// computation.
#[derive(Clone, Debug)]
pub struct Instance {
    name: String,
    region: Region,
    tiles: Vec<ConvexPolygon>,
}

impl Instance {
    pub fn new(name: impl Into<String>, region: Region) -> Result<Self, CoverError> {
        let tiles = triangulate_region(&region)?;
        if tiles.is_empty() {
            return Err(CoverError::EmptyRegion);
        }
        Ok(Self {
            name: name.into(),
            region,
            tiles,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// In-region triangles of the constrained triangulation.
    #[inline]
    pub fn tiles(&self) -> &[ConvexPolygon] {
        &self.tiles
    }
}

/// Ordered collection of convex pieces.
///
/// Target invariant: union of pieces equals the instance region. It may be
/// temporarily broken inside the conflict optimizer; committed covers
/// always satisfy it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cover {
    pieces: Vec<ConvexPolygon>,
}

impl Cover {
    #[inline]
    pub fn new(pieces: Vec<ConvexPolygon>) -> Self {
        Self { pieces }
    }

    #[inline]
    pub fn pieces(&self) -> &[ConvexPolygon] {
        &self.pieces
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&ConvexPolygon> {
        self.pieces.get(i)
    }

    #[inline]
    pub fn push(&mut self, piece: ConvexPolygon) {
        self.pieces.push(piece);
    }

    /// Overwrite piece `i`.
    #[inline]
    pub fn replace(&mut self, i: usize, piece: ConvexPolygon) {
        self.pieces[i] = piece;
    }

    /// O(1) removal: the last piece takes slot `i`.
    #[inline]
    pub fn swap_remove(&mut self, i: usize) -> ConvexPolygon {
        self.pieces.swap_remove(i)
    }

    /// All pieces except `i`.
    pub fn without(&self, i: usize) -> impl Iterator<Item = &ConvexPolygon> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(k, _)| *k != i)
            .map(|(_, p)| p)
    }
}
