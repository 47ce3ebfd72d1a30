//! Validity oracle gating every persisted cover.

use num_traits::Signed;

use crate::error::CoverError;
use crate::gap::{get_missing, missing_area};
use crate::model::{Cover, Instance};

/// Check that `cover` is a valid convex cover of the instance.
///
/// Checks, in order, per piece: at least three vertices with positive
/// area, strict convexity, containment in the region. Then: nothing of
/// the region is left uncovered. The first failure is returned.
pub fn verify(instance: &Instance, cover: &Cover) -> Result<(), CoverError> {
    for (index, piece) in cover.pieces().iter().enumerate() {
        if piece.is_degenerate() || !piece.area().is_positive() {
            return Err(CoverError::DegeneratePiece { index });
        }
        if !piece.is_convex() {
            return Err(CoverError::NotConvex { index });
        }
        if !instance.region().contains_convex(piece) {
            return Err(CoverError::OutsideRegion { index });
        }
    }
    let missing = get_missing(instance, cover.pieces());
    if !missing.is_empty() {
        return Err(CoverError::Uncovered {
            pieces: missing.len(),
            area: missing_area(&missing),
        });
    }
    Ok(())
}

#[inline]
pub fn is_valid(instance: &Instance, cover: &Cover) -> bool {
    verify(instance, cover).is_ok()
}
