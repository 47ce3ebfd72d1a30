use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{RemovalCfg, RemovalOrder};
use crate::expand::{greedy_expand, minimize_to_necessary, Necessity};
use crate::gap::{get_missing, get_missing_removal, missing_area};
use crate::geom::{ConvexPolygon, Point};
use crate::model::{Cover, Instance};

/// Try to make piece `i` redundant by growing another piece over it.
///
/// On success the grown piece is written back and `true` is returned; piece
/// `i` is left in place for the caller to drop. On failure `cover` is not
/// touched. An out-of-range `i` fails.
pub fn try_removal<R: Rng + ?Sized>(
    instance: &Instance,
    cover: &mut Cover,
    i: usize,
    cfg: &RemovalCfg,
    rng: &mut R,
) -> bool {
    let Some(piece) = cover.get(i) else {
        return false;
    };
    let mut desired: Vec<Point> = piece.vertices().to_vec();
    // With `minimize`, piece `i` replaced by what it must still cover.
    let mut shrunk_cover: Option<Cover> = None;
    if cfg.minimize {
        match minimize_to_necessary(instance, cover, i) {
            Necessity::NoActionNeeded => return true,
            Necessity::Polygon(needed) => {
                desired = needed.vertices().to_vec();
                let mut m = cover.clone();
                m.replace(i, needed);
                shrunk_cover = Some(m);
            }
        }
    }

    let mut candidates: Vec<usize> = (0..cover.len()).filter(|&j| j != i).collect();
    if cfg.randomize {
        candidates.shuffle(rng);
    }
    if cfg.replacement_choices > 0 {
        candidates.truncate(cfg.replacement_choices);
    }

    for j in candidates {
        let shrunk: ConvexPolygon;
        let base = match &shrunk_cover {
            Some(m) => {
                shrunk = minimize_to_necessary(instance, m, j).into_polygon();
                &shrunk
            }
            None => &cover.pieces()[j],
        };
        let out = greedy_expand(instance, base, &desired);
        if out.all_covered {
            cover.replace(j, out.polygon);
            return true;
        }
    }
    false
}

/// [`try_removal`], then drop piece `i` (the last piece takes its slot).
pub fn removal_if_possible<R: Rng + ?Sized>(
    instance: &Instance,
    cover: &mut Cover,
    i: usize,
    cfg: &RemovalCfg,
    rng: &mut R,
) -> bool {
    if try_removal(instance, cover, i, cfg, rng) {
        cover.swap_remove(i);
        true
    } else {
        false
    }
}

/// How harmless dropping piece `i` outright would be; higher is better.
///
/// `8 * (area lost) - 4 * (extra gap pieces)`, both measured against the
/// current gap. On a total cover a redundant piece scores 0 and every
/// other piece scores below 0.
pub fn removal_score(instance: &Instance, cover: &Cover, i: usize) -> f64 {
    let current = get_missing(instance, cover.pieces());
    removal_score_with(instance, cover, i, &current)
}

/// [`removal_score`] against a precomputed gap of the whole `cover`.
pub fn removal_score_with(
    instance: &Instance,
    cover: &Cover,
    i: usize,
    current_gap: &[ConvexPolygon],
) -> f64 {
    let next = get_missing_removal(instance, cover, i);
    let area_delta = missing_area(current_gap) - missing_area(&next);
    let count_delta = next.len() as f64 - current_gap.len() as f64;
    8.0 * area_delta - 4.0 * count_delta
}

/// One removal sweep over the current pieces. Returns how many were removed.
pub fn try_remove_all<R: Rng + ?Sized>(
    instance: &Instance,
    cover: &mut Cover,
    cfg: &RemovalCfg,
    rng: &mut R,
) -> usize {
    let before = cover.len();
    tracing::info!(instance = instance.name(), pieces = before, "removal sweep");

    let mut order: Vec<usize> = (0..before).rev().collect();
    match cfg.order {
        RemovalOrder::Reverse => {}
        RemovalOrder::Shuffled => order.shuffle(rng),
        RemovalOrder::ByScore => {
            let current = get_missing(instance, cover.pieces());
            let scores: Vec<f64> = (0..before)
                .map(|i| removal_score_with(instance, cover, i, &current))
                .collect();
            order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        }
    }
    if cfg.removal_attempts > 0 {
        order.truncate(cfg.removal_attempts);
    }

    for (attempt, &i) in order.iter().enumerate() {
        // Earlier removals shrink the cover; indices past the end are gone.
        if i >= cover.len() {
            tracing::trace!(attempt, index = i, "stale index");
            continue;
        }
        let removed = removal_if_possible(instance, cover, i, cfg, rng);
        tracing::debug!(attempt, index = i, removed, pieces = cover.len(), "try remove");
    }

    let removed = before - cover.len();
    tracing::info!(
        instance = instance.name(),
        pieces = cover.len(),
        removed,
        "removal sweep finished"
    );
    removed
}
