use super::*;
use crate::fixtures::{holed_instance, l_shape, pts, two_triangle_square};
use crate::geom::{coord, ConvexPolygon};
use crate::verify::verify;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xC0FE)
}

#[test]
fn either_triangle_of_split_square_can_go() {
    for i in 0..2 {
        let (instance, mut cover) = two_triangle_square();
        let cfg = RemovalCfg::default();
        assert!(removal_if_possible(&instance, &mut cover, i, &cfg, &mut rng()));
        assert_eq!(cover.len(), 1);
        assert_eq!(cover.pieces()[0].len(), 4);
        assert_eq!(cover.pieces()[0].area(), coord(1));
        assert!(verify(&instance, &cover).is_ok());
    }
}

#[test]
fn failed_removal_leaves_cover_untouched() {
    let (instance, cover) = l_shape();
    for minimize in [false, true] {
        let cfg = RemovalCfg {
            minimize,
            ..RemovalCfg::default()
        };
        for i in 0..cover.len() {
            let mut work = cover.clone();
            assert!(!try_removal(&instance, &mut work, i, &cfg, &mut rng()));
            assert_eq!(work, cover);
            assert!(!removal_if_possible(&instance, &mut work, i, &cfg, &mut rng()));
            assert_eq!(work, cover);
        }
    }
}

#[test]
fn out_of_range_index_fails() {
    let (instance, mut cover) = two_triangle_square();
    let before = cover.clone();
    assert!(!try_removal(&instance, &mut cover, 7, &RemovalCfg::default(), &mut rng()));
    assert_eq!(cover, before);
}

#[test]
fn redundant_piece_goes_without_replacement() {
    let (instance, mut cover) = two_triangle_square();
    cover.push(ConvexPolygon::hull(&pts(&[(0, 0), (1, 0), (1, 1), (0, 1)])));
    let cfg = RemovalCfg {
        minimize: true,
        ..RemovalCfg::default()
    };
    let before = cover.clone();
    assert!(try_removal(&instance, &mut cover, 2, &cfg, &mut rng()));
    assert_eq!(cover, before);
    assert!(removal_if_possible(&instance, &mut cover, 2, &cfg, &mut rng()));
    assert_eq!(cover.len(), 2);
    assert!(verify(&instance, &cover).is_ok());
}

#[test]
fn minimized_removal_keeps_coverage() {
    let (instance, mut cover) = two_triangle_square();
    let cfg = RemovalCfg {
        minimize: true,
        ..RemovalCfg::default()
    };
    assert!(removal_if_possible(&instance, &mut cover, 0, &cfg, &mut rng()));
    assert_eq!(cover.len(), 1);
    assert!(verify(&instance, &cover).is_ok());
}

#[test]
fn score_prefers_redundant_pieces() {
    let (instance, mut cover) = two_triangle_square();
    assert!(removal_score(&instance, &cover, 0) < 0.0);
    cover.push(ConvexPolygon::hull(&pts(&[(0, 0), (1, 0), (1, 1), (0, 1)])));
    assert_eq!(removal_score(&instance, &cover, 2), 0.0);
}

#[test]
fn shared_gap_scores_match_fresh_scores() {
    let instance = holed_instance();
    let mut cover = crate::triangulate::basic_triangulation(&instance);
    cover.swap_remove(0);
    let current = crate::gap::get_missing(&instance, cover.pieces());
    assert!(!current.is_empty());
    for i in 0..cover.len() {
        assert_eq!(
            removal_score_with(&instance, &cover, i, &current),
            removal_score(&instance, &cover, i)
        );
    }
}

#[test]
fn sweep_respects_attempt_cap() {
    let (instance, mut cover) = two_triangle_square();
    let cfg = RemovalCfg {
        removal_attempts: 1,
        ..RemovalCfg::default()
    };
    assert_eq!(try_remove_all(&instance, &mut cover, &cfg, &mut rng()), 1);
    assert_eq!(cover.len(), 1);
}

#[test]
fn sweeps_never_break_the_cover() {
    let instance = holed_instance();
    let cfgs = [
        RemovalCfg::default(),
        RemovalCfg::randomized(),
        RemovalCfg {
            minimize: true,
            replacement_choices: 3,
            ..RemovalCfg::randomized()
        },
        RemovalCfg {
            order: RemovalOrder::ByScore,
            ..RemovalCfg::default()
        },
    ];
    for cfg in &cfgs {
        let mut cover = crate::triangulate::basic_triangulation(&instance);
        let before = cover.len();
        let mut r = rng();
        let removed = try_remove_all(&instance, &mut cover, cfg, &mut r);
        assert_eq!(cover.len(), before - removed);
        assert!(verify(&instance, &cover).is_ok(), "{cfg:?}");
        // A second sweep only ever helps.
        let again = cover.len();
        try_remove_all(&instance, &mut cover, cfg, &mut r);
        assert!(cover.len() <= again);
        assert!(verify(&instance, &cover).is_ok(), "{cfg:?}");
    }
}

#[test]
fn seeded_sweeps_replay() {
    let instance = holed_instance();
    let cfg = RemovalCfg::randomized();
    let run = || {
        let mut cover = crate::triangulate::basic_triangulation(&instance);
        try_remove_all(&instance, &mut cover, &cfg, &mut rng());
        cover
    };
    assert_eq!(run(), run());
}
