//! Scoring and progression integration tests.

use blockfall::core::{DropKind, LevelChanged, ProgressionJudge, ScoreJudge};
use blockfall::types::{ShapeKind, TechnicalKind, SCORE_MAX};

#[test]
fn test_fresh_tetris_scenario() {
    // Level 1, clear 4 lines, no technical, no perfect clear, counters at
    // -1: combo and back-to-back both start their chains, and the points
    // are (800 * 1 + 0) * 1 with no multiplier on the establishing clear.
    let mut judge = ScoreJudge::new();
    assert_eq!(judge.combo(), -1);
    assert_eq!(judge.back_to_back(), -1);

    let result = judge.add_score_by_lock(1, 4, None, false);
    assert_eq!(result.total, 800);
    assert_eq!(judge.combo(), 0);
    assert_eq!(judge.back_to_back(), 0);
    assert_eq!(judge.score(), 800);
}

#[test]
fn test_score_monotonicity() {
    let mut judge = ScoreJudge::new();
    let mut last = 0;

    for i in 0..200 {
        match i % 4 {
            0 => {
                judge.add_score_by_lock(3, (i % 5).min(4), None, false);
            }
            1 => {
                judge.add_score_by_drop(i as u32, DropKind::Soft);
            }
            2 => {
                judge.add_score_by_lock(1, 0, Some(TechnicalKind::Mini), false);
            }
            _ => {
                judge.add_score_by_drop(i as u32, DropKind::Hard);
            }
        }
        assert!(judge.score() >= last, "score decreased at step {}", i);
        assert!(judge.score() <= SCORE_MAX);
        last = judge.score();
    }
}

#[test]
fn test_b2b_chain_with_technical_clears() {
    let mut judge = ScoreJudge::new();

    // Tetris establishes the chain.
    judge.add_score_by_lock(1, 4, None, false);
    // Full technical single extends it, with the 3/2 multiplier.
    let result = judge.add_score_by_lock(1, 1, Some(TechnicalKind::Full), false);
    assert!(result.b2b_applied);
    assert_eq!(result.clear_points, 1200);

    // Plain single breaks the chain.
    judge.add_score_by_lock(1, 1, None, false);
    assert_eq!(judge.back_to_back(), -1);
}

#[test]
fn test_combo_counts_only_clears() {
    let mut judge = ScoreJudge::new();

    judge.add_score_by_lock(1, 1, None, false);
    judge.add_score_by_lock(1, 2, None, false);
    assert_eq!(judge.combo(), 1);

    judge.add_score_by_lock(1, 0, None, false);
    assert_eq!(judge.combo(), -1);
}

#[test]
fn test_progression_carry_over_scenario() {
    // Start level 1, quota target 10: 25 lines in one call is two full
    // increments with 5 carried over.
    let mut judge = ProgressionJudge::new(1);

    let change = judge.add_lines_cleared(25);
    assert_eq!(change, Some(LevelChanged { new_level: 3 }));
    assert_eq!(judge.level(), 3);
    assert_eq!(judge.quota_current(), 5);
}

#[test]
fn test_progression_exact_multiples_leave_no_remainder() {
    let mut judge = ProgressionJudge::new(1);
    let change = judge.add_lines_cleared(30);
    assert_eq!(change, Some(LevelChanged { new_level: 4 }));
    assert_eq!(judge.quota_current(), 0);
}

#[test]
fn test_kind_set_is_the_full_seven() {
    // Guards the bag contract's id set.
    assert_eq!(ShapeKind::ALL.len(), 7);
}
