//! Tests for z-score deviation and heuristic ranking.

use space_ranker::encoder::HOURS_PER_DAY;
use space_ranker::scoring::{deviation_stats, score, score_denominator, z_scores};
use space_ranker::{
    encode_spaces, merge_all, rank_combinations, space_combinations, Combination,
    CombinationKey, Interval, RankError, Space, Weights,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

const EPS: f64 = 1e-12;

fn interval(start: &str, end: &str) -> Interval {
    Interval::new(start.parse().unwrap(), end.parse().unwrap())
}

fn key(ids: &[&str]) -> CombinationKey {
    CombinationKey::new(ids.iter().copied())
}

fn combinations_of(spaces: &[Space]) -> Vec<Combination> {
    let encoded = encode_spaces(spaces, HOURS_PER_DAY).unwrap();
    let keys = space_combinations(&encoded.keys().collect::<Vec<_>>());
    merge_all(&keys, &encoded).unwrap()
}

/// Three spaces, five free hours each, never overlapping.
fn three_spaces() -> Vec<Space> {
    vec![
        Space::new(
            "A1",
            true,
            vec![interval("2026-03-16T09:00:00", "2026-03-16T14:00:00")],
        ),
        Space::new(
            "A2",
            false,
            vec![interval("2026-03-16T14:00:00", "2026-03-16T19:00:00")],
        ),
        Space::new(
            "A3",
            true,
            vec![interval("2026-03-17T09:00:00", "2026-03-17T14:00:00")],
        ),
    ]
}

fn paper_weights() -> Weights {
    Weights::new(0.1, 0.3, 0.6)
}

// ── End-to-end reference values ─────────────────────────────────────────────

#[test]
fn reference_population_statistics() {
    let combos = combinations_of(&three_spaces());
    let totals: Vec<u32> = combos.iter().map(|c| c.total_time_range).collect();
    assert_eq!(totals, vec![5, 5, 5, 10, 10, 10, 15]);

    let stats = deviation_stats(&combos).unwrap();
    // mean = 60 / 7, variance = 600 / 49
    assert!((stats.mean - 8.571428571428571).abs() < EPS);
    assert!((stats.std_dev - 3.499271061118826).abs() < EPS);
}

#[test]
fn reference_z_scores() {
    let combos = combinations_of(&three_spaces());
    let zs = z_scores(&combos, 8.0);

    let expected = [
        -0.8573214099741123,
        -0.8573214099741123,
        -0.8573214099741123,
        0.5715476066494082,
        0.5715476066494082,
        0.5715476066494082,
        2.000416623272929,
    ];
    for (z, e) in zs.iter().zip(expected) {
        assert!((z - e).abs() < EPS, "z = {}, expected {}", z, e);
    }
}

#[test]
fn reference_ranking() {
    let ranked = rank_combinations(combinations_of(&three_spaces()), 8.0, &paper_weights()).unwrap();

    let a1_a3 = ranked.iter().find(|s| *s.key() == key(&["A1", "A3"])).unwrap();
    assert_eq!(a1_a3.combination.num_spaces, 2);
    assert_eq!(a1_a3.combination.num_cancellable_spaces, 2);
    assert_eq!(a1_a3.combination.total_time_range, 10);
    assert!((a1_a3.z_score - 0.5715476066494082).abs() < EPS);
    assert!((a1_a3.score - 0.538458087166606).abs() < EPS);

    let order: Vec<CombinationKey> = ranked.iter().map(|s| s.key().clone()).collect();
    assert_eq!(
        order,
        vec![
            key(&["A1", "A2"]),
            key(&["A2", "A3"]),
            key(&["A1", "A3"]),
            key(&["A1", "A2", "A3"]),
            key(&["A1"]),
            key(&["A3"]),
            key(&["A2"]),
        ]
    );

    let scores: Vec<f64> = ranked.iter().map(|s| s.score).collect();
    let expected = [
        0.7954470135968581,
        0.7954470135968581,
        0.538458087166606,
        0.43477473316207327,
        -0.09525793444156805,
        -0.09525793444156805,
        -0.28577380332470415,
    ];
    for (s, e) in scores.iter().zip(expected) {
        assert!((s - e).abs() < EPS, "score = {}, expected {}", s, e);
    }
}

// ── Score formula ───────────────────────────────────────────────────────────

#[test]
fn positive_z_uses_reciprocal_branch() {
    let w = paper_weights();
    let s = score(1.0, 2, 1, &w);
    assert!((s - 1.0 / (0.6 + 0.6 + 0.1)).abs() < EPS);
}

#[test]
fn non_positive_z_uses_ratio_branch() {
    let w = paper_weights();
    let s = score(-2.0, 1, 0, &w);
    assert!((s - (-0.2 / 0.3)).abs() < EPS);
}

#[test]
fn zero_z_scores_zero() {
    // The reciprocal branch is not taken at exactly zero.
    assert_eq!(score(0.0, 3, 2, &paper_weights()), 0.0);
}

// ── Degenerate inputs ───────────────────────────────────────────────────────

#[test]
fn zero_std_gives_zero_z_scores() {
    let spaces = vec![
        Space::new("A", false, vec![interval("2026-03-16T09:00:00", "2026-03-16T12:00:00")]),
        Space::new("B", false, vec![interval("2026-03-16T09:00:00", "2026-03-16T12:00:00")]),
    ];
    let combos = combinations_of(&spaces);
    assert!(combos.iter().all(|c| c.total_time_range == 3));

    assert_eq!(deviation_stats(&combos).unwrap().std_dev, 0.0);
    assert_eq!(z_scores(&combos, 8.0), vec![0.0; 3]);

    let ranked = rank_combinations(combos, 8.0, &paper_weights()).unwrap();
    assert!(ranked.iter().all(|s| s.z_score == 0.0 && s.score == 0.0));
    // All tied: canonical key order decides.
    assert_eq!(*ranked[0].key(), key(&["A"]));
    assert_eq!(*ranked[1].key(), key(&["A", "B"]));
    assert_eq!(*ranked[2].key(), key(&["B"]));
}

#[test]
fn empty_input_ranks_to_empty_output() {
    assert!(deviation_stats(&[]).is_none());
    assert!(rank_combinations(Vec::new(), 8.0, &paper_weights()).unwrap().is_empty());
}

#[test]
fn zero_space_and_cancellable_weights_are_rejected() {
    let combos = combinations_of(&three_spaces());
    let err = rank_combinations(combos, 8.0, &Weights::new(1.0, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, RankError::InvalidWeights(_)));
}

#[test]
fn zero_space_weight_with_non_cancellable_member_is_rejected() {
    // Both spaces are non-cancellable, so with spaces = 0 the singletons
    // have a zero denominator even though the weights themselves validate.
    let spaces = vec![
        Space::new("A", false, vec![interval("2026-03-16T09:00:00", "2026-03-16T10:00:00")]),
        Space::new("B", false, vec![interval("2026-03-17T09:00:00", "2026-03-17T17:00:00")]),
    ];
    let weights = Weights::new(0.1, 0.0, 0.6);
    assert!(weights.validate_heuristic().is_ok());

    let err = rank_combinations(combinations_of(&spaces), 8.0, &weights).unwrap_err();
    match err {
        RankError::InvalidWeights(message) => {
            assert!(message.contains("zero score denominator"), "{}", message);
            assert!(message.contains("(A)") || message.contains("(B)"), "{}", message);
        }
        other => panic!("expected InvalidWeights, got {:?}", other),
    }
}

#[test]
fn zero_space_weight_is_fine_when_every_member_is_cancellable() {
    let spaces = vec![
        Space::new("A", true, vec![interval("2026-03-16T09:00:00", "2026-03-16T10:00:00")]),
        Space::new("B", true, vec![interval("2026-03-17T09:00:00", "2026-03-17T17:00:00")]),
    ];
    let ranked = rank_combinations(combinations_of(&spaces), 8.0, &Weights::new(0.1, 0.0, 0.6)).unwrap();
    assert!(ranked.iter().all(|s| s.score.is_finite()));
}

#[test]
fn zero_deviation_weight_guards_the_reciprocal_branch() {
    let w = Weights::new(0.0, 0.0, 1.0);
    // z > 0 with no cancellable member: 0 * 1 + 0 * 2 + 0 * z.
    assert_eq!(score_denominator(1.5, 2, 0, &w), 0.0);
    assert_eq!(score_denominator(1.5, 2, 1, &w), 1.0);
    // z <= 0 ignores the deviation term.
    assert_eq!(score_denominator(-1.0, 2, 1, &Weights::new(0.5, 0.0, 1.0)), 1.0);
}

#[test]
fn negative_or_nan_weights_are_rejected() {
    assert!(Weights::new(-0.1, 0.3, 0.6).validate().is_err());
    assert!(Weights::new(f64::NAN, 0.3, 0.6).validate().is_err());
    assert!(Weights::new(0.0, 0.0, 0.0).validate().is_err());
    assert!(Weights::new(0.0, 0.0, 1.0).validate_heuristic().is_ok());
}

#[test]
fn non_positive_target_is_rejected() {
    let err = rank_combinations(Vec::new(), 0.0, &paper_weights()).unwrap_err();
    assert!(matches!(err, RankError::InvalidConfig(_)));
}

#[test]
fn ranking_is_idempotent() {
    let first = rank_combinations(combinations_of(&three_spaces()), 8.0, &paper_weights()).unwrap();
    let second = rank_combinations(combinations_of(&three_spaces()), 8.0, &paper_weights()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
