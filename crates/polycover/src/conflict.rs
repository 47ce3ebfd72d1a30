//! Conflict optimizer: randomized ruin-and-recreate over whole covers.
//!
//! State
//! - `cover`: the working cover, allowed to be invalid mid-attempt.
//! - `restore`: the last committed (valid) cover.
//! - `uncovered`: the current gap, as triangles.
//!
//! One iteration drops a random piece, lets the remaining pieces grow over
//! the gap for a bounded number of greedy rounds, and if a gap is left
//! inserts one random gap triangle as a new piece. An attempt commits as
//! soon as the gap is empty with fewer pieces than `restore`, and aborts
//! once the cover outgrows `max_cover_size`. Every attempt, committed or
//! not, starts again from `restore`, so the best cover never gets worse.

use rand::Rng;

use crate::expand::greedy_expand;
use crate::gap::get_missing_triangles;
use crate::geom::{ConvexPolygon, Coord};
use crate::model::{Cover, Instance};

#[derive(Clone, Debug)]
pub struct ConflictCfg {
    pub max_attempts: usize,
    /// Iterations per attempt.
    pub max_iters: usize,
    /// Greedy re-cover rounds per iteration.
    pub max_greedy_update: usize,
    /// Abort an attempt once the cover grows past this; 0 = no limit.
    pub max_cover_size: usize,
    /// Pieces tried per gap triangle, nearest first; 0 = all.
    pub max_candidates: usize,
}

impl Default for ConflictCfg {
    fn default() -> Self {
        Self {
            max_attempts: 16,
            max_iters: 64,
            max_greedy_update: 8,
            max_cover_size: 0,
            max_candidates: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub attempts: usize,
    pub commits: usize,
    pub aborted: usize,
    pub start_size: usize,
    pub best_size: usize,
}

enum Outcome {
    Committed,
    Aborted,
    Exhausted,
}

/// Shrink `cover` by ruin-and-recreate; on return it is the best committed cover.
///
/// `cover` is expected to be total. It is never left larger than it came in.
pub fn conflict_optimizer<R: Rng + ?Sized>(
    instance: &Instance,
    cover: &mut Cover,
    cfg: &ConflictCfg,
    rng: &mut R,
) -> ConflictReport {
    let mut report = ConflictReport {
        start_size: cover.len(),
        ..ConflictReport::default()
    };
    let mut restore = cover.clone();
    for attempt in 0..cfg.max_attempts {
        if restore.len() <= 1 {
            break;
        }
        report.attempts += 1;
        match run_attempt(instance, cover, restore.len(), cfg, rng) {
            Outcome::Committed => {
                restore.clone_from(cover);
                report.commits += 1;
                tracing::info!(
                    instance = instance.name(),
                    attempt,
                    pieces = restore.len(),
                    "conflict optimizer commit"
                );
            }
            Outcome::Aborted => {
                report.aborted += 1;
                tracing::debug!(attempt, pieces = cover.len(), "attempt aborted");
            }
            Outcome::Exhausted => {
                tracing::debug!(attempt, pieces = cover.len(), "attempt exhausted");
            }
        }
        cover.clone_from(&restore);
    }
    report.best_size = cover.len();
    report
}

fn run_attempt<R: Rng + ?Sized>(
    instance: &Instance,
    cover: &mut Cover,
    best: usize,
    cfg: &ConflictCfg,
    rng: &mut R,
) -> Outcome {
    for _ in 0..cfg.max_iters {
        if cover.is_empty() {
            return Outcome::Exhausted;
        }
        let victim = rng.gen_range(0..cover.len());
        cover.swap_remove(victim);

        let mut uncovered = get_missing_triangles(instance, cover.pieces());
        let mut rounds = 0;
        while !uncovered.is_empty() && rounds < cfg.max_greedy_update {
            rounds += 1;
            if greedy_cover(instance, cover, &uncovered, cfg.max_candidates) == 0 {
                break;
            }
            uncovered = get_missing_triangles(instance, cover.pieces());
        }
        if !uncovered.is_empty() {
            // Gap triangles are interior-disjoint; the rest stay uncovered.
            let k = rng.gen_range(0..uncovered.len());
            cover.push(uncovered.swap_remove(k));
        }

        if cfg.max_cover_size > 0 && cover.len() > cfg.max_cover_size {
            return Outcome::Aborted;
        }
        if uncovered.is_empty() && cover.len() < best {
            return Outcome::Committed;
        }
    }
    Outcome::Exhausted
}

/// Let existing pieces grow over gap triangles. Returns how many grew.
///
/// Triangles are visited largest first (ties by vertex order). Each is
/// offered to the pieces nearest to it, by centroid distance, and taken by
/// the first whose expansion fits the region. Triangles already inside a
/// piece are skipped.
pub fn greedy_cover(
    instance: &Instance,
    cover: &mut Cover,
    triangles: &[ConvexPolygon],
    max_candidates: usize,
) -> usize {
    let areas: Vec<Coord> = triangles.iter().map(ConvexPolygon::area).collect();
    let mut order: Vec<usize> = (0..triangles.len()).collect();
    order.sort_by(|&a, &b| {
        areas[b]
            .cmp(&areas[a])
            .then_with(|| triangles[a].vertices().cmp(triangles[b].vertices()))
    });

    let mut grown = 0;
    for t in order.into_iter().map(|k| &triangles[k]) {
        let targets = t.vertices();
        if cover.pieces().iter().any(|p| p.contains_all(targets)) {
            continue;
        }
        let c = t.centroid_f64();
        let mut candidates: Vec<(f64, usize)> = cover
            .pieces()
            .iter()
            .enumerate()
            .map(|(j, p)| ((p.centroid_f64() - c).norm_squared(), j))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        if max_candidates > 0 {
            candidates.truncate(max_candidates);
        }
        for (_, j) in candidates {
            let out = greedy_expand(instance, &cover.pieces()[j], targets);
            if out.all_covered {
                cover.replace(j, out.polygon);
                grown += 1;
                break;
            }
        }
    }
    grown
}
