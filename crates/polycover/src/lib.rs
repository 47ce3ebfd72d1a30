//! Cover a polygon with holes by few convex pieces.
//!
//! Pipeline
//! - `triangulate`: constrained Delaunay triangulation gives a valid but
//!   large starting cover.
//! - `flood`: ray-cast growth from every region vertex, an alternative
//!   starting cover with fewer, larger pieces.
//! - `removal`: local search that deletes pieces by growing neighbours
//!   over them.
//! - `conflict`: randomized ruin-and-recreate for further reductions.
//! - `verify`: oracle every persisted cover must pass.
//!
//! All geometry is exact (`BigRational` coordinates). Randomized routines
//! take an explicit `rand::Rng`; see [`rng::ReplayToken`] for reproducible
//! per-instance streams.

pub mod conflict;
pub mod error;
pub mod expand;
pub mod flood;
pub mod gap;
pub mod geom;
pub mod model;
pub mod removal;
pub mod rng;
pub mod triangulate;
pub mod verify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::CoverError;
pub use model::{Cover, Instance};

/// Common exports for callers driving the solver.
pub mod prelude {
    pub use crate::conflict::{conflict_optimizer, ConflictCfg, ConflictReport};
    pub use crate::error::CoverError;
    pub use crate::flood::{flood, flood_init};
    pub use crate::geom::{coord, Coord, ConvexPolygon, Point, Region, SimplePolygon};
    pub use crate::model::{Cover, Instance};
    pub use crate::removal::{try_remove_all, RemovalCfg, RemovalOrder};
    pub use crate::rng::ReplayToken;
    pub use crate::triangulate::basic_triangulation;
    pub use crate::verify::{is_valid, verify};
}
