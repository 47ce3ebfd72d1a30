//! Removal local search: delete a piece by growing a neighbour over it.
//!
//! Model
//! - `try_removal(i)` picks the points piece `i` is responsible for (its
//!   vertices, or with `minimize` the hull of the gap its removal would
//!   leave) and asks each other piece in turn to absorb them via
//!   [`greedy_expand`](crate::expand::greedy_expand). The first success is
//!   written back; piece `i` itself stays.
//! - `removal_if_possible(i)` also drops piece `i` (swap with last, pop).
//! - `try_remove_all` is one sweep over the current pieces, not a fixed
//!   point; a second sweep may remove more.
//!
//! A failed attempt leaves the cover untouched.

mod search;
mod types;

pub use search::{
    removal_if_possible, removal_score, removal_score_with, try_remove_all, try_removal,
};
pub use types::{RemovalCfg, RemovalOrder};

#[cfg(test)]
mod tests;
