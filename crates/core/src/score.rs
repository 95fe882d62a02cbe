//! Score module - points for locks and drops
//!
//! The judge owns the combo and back-to-back counters and turns each lock
//! into points. Both counters are -1-based: -1 means "no chain", 0 means
//! the chain just started (no bonus yet), and positive values pay out.
//!
//! Lock points follow `(clear_points * b2b_multiplier + combo_bonus) * level`
//! with a 3/2 back-to-back multiplier once the counter is positive. Drop
//! points are flat per-cell awards outside that formula. The total score
//! saturates at `SCORE_MAX`.

use blockfall_types::{TechnicalKind, COMBO_BASE, HARD_DROP_POINTS, SCORE_MAX, SOFT_DROP_POINTS};

/// Kind of drop being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Soft,
    Hard,
}

/// Breakdown of one lock's scoring, mostly for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockScore {
    /// Clear points after the back-to-back multiplier, before combo/level.
    pub clear_points: u32,
    /// Combo bonus before the level multiplier.
    pub combo_bonus: u32,
    /// Perfect-clear bonus before the level multiplier.
    pub perfect_bonus: u32,
    /// Points actually added to the total.
    pub total: u32,
    pub b2b_applied: bool,
}

/// Tracks score, combo and back-to-back state.
#[derive(Debug, Clone)]
pub struct ScoreJudge {
    score: u32,
    combo: i32,
    back_to_back: i32,
}

impl ScoreJudge {
    pub fn new() -> Self {
        Self {
            score: 0,
            combo: -1,
            back_to_back: -1,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current combo counter (-1 = no combo chain).
    pub fn combo(&self) -> i32 {
        self.combo
    }

    /// Current back-to-back counter (-1 = broken).
    pub fn back_to_back(&self) -> i32 {
        self.back_to_back
    }

    /// Score a lock: updates combo/back-to-back and adds the points.
    ///
    /// `perfect` means the grid ended completely empty after the clear.
    pub fn add_score_by_lock(
        &mut self,
        level: u32,
        lines: usize,
        technical: Option<TechnicalKind>,
        perfect: bool,
    ) -> LockScore {
        let mut result = LockScore::default();

        if lines == 0 {
            // A clear-less lock breaks the combo chain; back-to-back only
            // breaks on a non-qualifying clear, so it survives here. A
            // no-line technical still pays its flat award.
            self.combo = -1;
            if let Some(kind) = technical {
                let points = base_clear_points(0, Some(kind));
                result.clear_points = points;
                result.total = points.saturating_mul(level.max(1));
                self.add_saturating(result.total);
            }
            return result;
        }

        self.combo += 1;

        let qualifies = lines == 4 || technical.is_some();
        if qualifies {
            self.back_to_back += 1;
        } else {
            self.back_to_back = -1;
        }

        let base = base_clear_points(lines, technical);
        let b2b_applied = qualifies && self.back_to_back > 0;
        result.b2b_applied = b2b_applied;
        result.clear_points = if b2b_applied {
            base.saturating_mul(3) / 2
        } else {
            base
        };

        result.combo_bonus = (self.combo.max(0) as u32).saturating_mul(COMBO_BASE);

        if perfect {
            result.perfect_bonus = perfect_clear_bonus(lines);
        }

        result.total = result
            .clear_points
            .saturating_add(result.combo_bonus)
            .saturating_add(result.perfect_bonus)
            .saturating_mul(level.max(1));
        self.add_saturating(result.total);
        result
    }

    /// Score a drop: flat per-cell award, no combo or level interaction.
    pub fn add_score_by_drop(&mut self, units: u32, kind: DropKind) -> u32 {
        let rate = match kind {
            DropKind::Soft => SOFT_DROP_POINTS,
            DropKind::Hard => HARD_DROP_POINTS,
        };
        let points = units.saturating_mul(rate);
        self.add_saturating(points);
        points
    }

    fn add_saturating(&mut self, points: u32) {
        self.score = self.score.saturating_add(points).min(SCORE_MAX);
    }
}

impl Default for ScoreJudge {
    fn default() -> Self {
        Self::new()
    }
}

/// Base line-clear points before multipliers.
///
/// Mini and full are distinguished on 0/1/2-line clears; any technical
/// triple collapses to the 1600 full rate (observed rule, kept as-is).
fn base_clear_points(lines: usize, technical: Option<TechnicalKind>) -> u32 {
    match (lines, technical) {
        (0, Some(TechnicalKind::Full)) => 400,
        (0, Some(TechnicalKind::Mini)) => 100,
        (0, None) => 0,
        (1, None) => 100,
        (1, Some(TechnicalKind::Mini)) => 200,
        (1, Some(TechnicalKind::Full)) => 800,
        (2, None) => 300,
        (2, Some(TechnicalKind::Mini)) => 400,
        (2, Some(TechnicalKind::Full)) => 1200,
        (3, None) => 500,
        (3, Some(_)) => 1600,
        (4, _) => 800,
        _ => 0,
    }
}

/// Additive perfect-clear bonus per lines cleared.
fn perfect_clear_bonus(lines: usize) -> u32 {
    match lines {
        1 => 800,
        2 => 1000,
        3 => 1800,
        4 => 2000,
        _ => 0,
    }
}
