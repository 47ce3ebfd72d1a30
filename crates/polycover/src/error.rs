//! Error type shared by instance construction and verification.

use std::fmt;

/// Why an instance could not be built or a cover is not valid.
///
/// Local search failures are not errors; they are reported through `bool`
/// or report structs.
#[derive(Clone, Debug, PartialEq)]
pub enum CoverError {
    /// The triangulation kernel rejected the input (degenerate or crossing boundary).
    Triangulation { reason: String },
    /// The region has no area.
    EmptyRegion,
    /// Piece with fewer than three vertices or zero area.
    DegeneratePiece { index: usize },
    /// Piece with a reflex or straight turn.
    NotConvex { index: usize },
    /// Piece reaching outside the region (into a hole or past the outer boundary).
    OutsideRegion { index: usize },
    /// Part of the region is left uncovered.
    Uncovered { pieces: usize, area: f64 },
}

impl CoverError {
    pub(crate) fn triangulation(reason: impl Into<String>) -> Self {
        Self::Triangulation {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triangulation { reason } => write!(f, "triangulation failed: {reason}"),
            Self::EmptyRegion => write!(f, "region has no area"),
            Self::DegeneratePiece { index } => write!(f, "polygon {index} is degenerate"),
            Self::NotConvex { index } => write!(f, "polygon {index} is not convex"),
            Self::OutsideRegion { index } => {
                write!(f, "polygon {index} is not contained in the region")
            }
            Self::Uncovered { pieces, area } => write!(
                f,
                "region not fully covered: {pieces} uncovered piece(s), area ≈ {area}"
            ),
        }
    }
}

impl std::error::Error for CoverError {}
