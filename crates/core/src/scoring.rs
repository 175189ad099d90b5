//! Scoring module - stats, levelling and the guideline scoring table
//!
//! Scores are expressed in base units: the final line-clear score is
//! `units × 100 × level`, and the same `units` are subtracted from the goal.
//! Combo bonus (combo ≥ 1) is `(20 if single else 50) × combo × level`.

use std::time::Duration;

use crate::types::TSpin;

/// Base units indexed by `[lines_cleared][t_spin.index()]`
///
/// Columns: no T-spin, mini T-spin, T-spin.
pub const SCORES: [[u32; 3]; 5] = [
    [0, 1, 4],
    [1, 2, 8],
    [3, 4, 12],
    [5, 5, 16],
    [8, 8, 8],
];

/// Display name per number of cleared lines
pub const LINES_CLEAR_NAME: [&str; 5] = ["", "SINGLE", "DOUBLE", "TRIPLE", "TETRIS"];

/// Base units for a lock
pub fn score_units(lines_cleared: usize, t_spin: TSpin) -> u32 {
    SCORES[lines_cleared.min(4)][t_spin.index()]
}

/// Combo bonus, 0 when there is no combo
pub fn combo_score(combo: i32, lines_cleared: usize, level: u32) -> u32 {
    if combo < 1 {
        return 0;
    }
    let base = if lines_cleared == 1 { 20 } else { 50 };
    base * combo as u32 * level
}

/// Gravity period for a level, `base × (0.8 − (level − 1)·0.007)^(level − 1)`
pub fn fall_delay(base: Duration, level: u32) -> Duration {
    let steps = level.saturating_sub(1) as i32;
    base.mul_f64((0.8 - steps as f64 * 0.007).powi(steps))
}

/// Lock delay for a level, shrinking by 10% per level past 15
pub fn lock_delay(base: Duration, level: u32) -> Duration {
    if level > 15 {
        base.mul_f64(0.9f64.powi((level - 15) as i32))
    } else {
        base
    }
}

/// Result of scoring one lock
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockScore {
    /// Pattern text, e.g. "T-SPIN\nDOUBLE", empty when nothing scored
    pub pattern_name: String,
    pub pattern_score: u32,
    pub combo: i32,
    pub combo_score: u32,
}

/// Level, score and timing state of a game
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub level: u32,
    score: u64,
    pub high_score: u64,
    /// Units left before the next level, can go negative
    pub goal: i64,
    pub lines_cleared: u32,
    /// -1 outside a streak of clearing locks
    pub combo: i32,
    /// Elapsed seconds
    pub time: u32,
    pub fall_delay: Duration,
    pub lock_delay: Duration,
    base_fall_delay: Duration,
    base_lock_delay: Duration,
}

impl Stats {
    pub fn new(base_fall_delay: Duration, base_lock_delay: Duration) -> Self {
        Self {
            level: 0,
            score: 0,
            high_score: 0,
            goal: 0,
            lines_cleared: 0,
            combo: -1,
            time: 0,
            fall_delay: base_fall_delay,
            lock_delay: base_lock_delay,
            base_fall_delay,
            base_lock_delay,
        }
    }

    /// Reset for a new game; the high score survives
    pub fn new_game(&mut self) {
        self.level = 0;
        self.score = 0;
        self.goal = 0;
        self.lines_cleared = 0;
        self.combo = -1;
        self.time = 0;
        self.fall_delay = self.base_fall_delay;
        self.lock_delay = self.base_lock_delay;
    }

    /// Advance one level and recompute the delay curve
    pub fn new_level(&mut self) {
        self.level += 1;
        self.goal += 5 * self.level as i64;
        if self.level <= 20 {
            self.fall_delay = fall_delay(self.base_fall_delay, self.level);
        }
        self.lock_delay = lock_delay(self.base_lock_delay, self.level);
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Add to the score, tracking the high score
    pub fn add_to_score(&mut self, delta: u64) {
        self.score += delta;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    pub fn update_time(&mut self) {
        self.time += 1;
    }

    /// Score a lock: update combo, goal, lines and score
    pub fn locks_down(&mut self, t_spin: TSpin, lines_cleared: usize) -> LockScore {
        let mut names: Vec<&str> = Vec::with_capacity(2);
        if let Some(name) = t_spin.name() {
            names.push(name);
        }

        if lines_cleared > 0 {
            names.push(LINES_CLEAR_NAME[lines_cleared.min(4)]);
            self.combo += 1;
            self.lines_cleared += lines_cleared as u32;
        } else {
            self.combo = -1;
        }

        let mut pattern_score = 0;
        if lines_cleared > 0 || t_spin != TSpin::None {
            let units = score_units(lines_cleared, t_spin);
            self.goal -= units as i64;
            pattern_score = units * 100 * self.level;
        }

        let combo_score = combo_score(self.combo, lines_cleared, self.level);
        self.add_to_score(pattern_score as u64 + combo_score as u64);

        LockScore {
            pattern_name: names.join("\n"),
            pattern_score,
            combo: self.combo,
            combo_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Stats {
        let mut stats = Stats::new(Duration::from_secs(1), Duration::from_millis(500));
        stats.new_game();
        stats.new_level();
        stats
    }

    #[test]
    fn test_first_level() {
        let stats = stats();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.goal, 5);
        assert_eq!(stats.combo, -1);
        assert_eq!(stats.fall_delay, Duration::from_secs(1));
        assert_eq!(stats.lock_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_single_line_at_level_one() {
        let mut stats = stats();
        let result = stats.locks_down(TSpin::None, 1);
        assert_eq!(result.pattern_name, "SINGLE");
        assert_eq!(result.pattern_score, 100);
        assert_eq!(result.combo, 0);
        assert_eq!(result.combo_score, 0);
        assert_eq!(stats.goal, 4);
        assert_eq!(stats.score(), 100);
        assert_eq!(stats.lines_cleared, 1);
    }

    #[test]
    fn test_tetris_units() {
        assert_eq!(score_units(4, TSpin::None), 8);
        let mut stats = stats();
        let result = stats.locks_down(TSpin::None, 4);
        assert_eq!(result.pattern_name, "TETRIS");
        assert_eq!(result.pattern_score, 800);
        assert_eq!(stats.goal, -3);
    }

    #[test]
    fn test_t_spin_units() {
        assert_eq!(score_units(0, TSpin::Mini), 1);
        assert_eq!(score_units(0, TSpin::Full), 4);
        assert_eq!(score_units(1, TSpin::Mini), 2);
        assert_eq!(score_units(1, TSpin::Full), 8);
        assert_eq!(score_units(2, TSpin::Full), 12);
        assert_eq!(score_units(3, TSpin::Full), 16);
    }

    #[test]
    fn test_t_spin_without_lines_scores_and_breaks_combo() {
        let mut stats = stats();
        stats.locks_down(TSpin::None, 1);
        let result = stats.locks_down(TSpin::Full, 0);
        assert_eq!(result.pattern_name, "T-SPIN");
        assert_eq!(result.pattern_score, 400);
        assert_eq!(result.combo, -1);
        assert_eq!(stats.score(), 500);
    }

    #[test]
    fn test_mini_t_spin_single_name() {
        let mut stats = stats();
        let result = stats.locks_down(TSpin::Mini, 1);
        assert_eq!(result.pattern_name, "MINI\nT-SPIN\nSINGLE");
        assert_eq!(result.pattern_score, 200);
    }

    #[test]
    fn test_combo_bonus() {
        let mut stats = stats();
        stats.locks_down(TSpin::None, 1);
        let second = stats.locks_down(TSpin::None, 1);
        assert_eq!(second.combo, 1);
        assert_eq!(second.combo_score, 20);
        let third = stats.locks_down(TSpin::None, 2);
        assert_eq!(third.combo, 2);
        assert_eq!(third.combo_score, 100);
        assert_eq!(stats.score(), 100 + 120 + 400);

        let miss = stats.locks_down(TSpin::None, 0);
        assert_eq!(miss.combo, -1);
        assert_eq!(miss.pattern_name, "");
        assert_eq!(miss.pattern_score, 0);
    }

    #[test]
    fn test_high_score_tracks_max() {
        let mut stats = stats();
        stats.high_score = 150;
        stats.add_to_score(100);
        assert_eq!(stats.high_score, 150);
        stats.add_to_score(100);
        assert_eq!(stats.high_score, 200);
        stats.new_game();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.high_score, 200);
    }

    #[test]
    fn test_fall_delay_curve() {
        let base = Duration::from_secs(1);
        assert_eq!(fall_delay(base, 1), base);
        let level2 = fall_delay(base, 2).as_secs_f64();
        assert!((level2 - 0.793).abs() < 1e-6);
        let level3 = fall_delay(base, 3).as_secs_f64();
        assert!((level3 - 0.786f64.powi(2)).abs() < 1e-6);
        assert!(fall_delay(base, 20) < fall_delay(base, 19));
    }

    #[test]
    fn test_lock_delay_curve() {
        let base = Duration::from_millis(500);
        assert_eq!(lock_delay(base, 15), base);
        let level16 = lock_delay(base, 16).as_secs_f64();
        assert!((level16 - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_goal_accumulates_per_level() {
        let mut stats = stats();
        stats.goal = -2;
        stats.new_level();
        assert_eq!(stats.level, 2);
        assert_eq!(stats.goal, 8);
    }

    #[test]
    fn test_fall_delay_frozen_past_level_20() {
        let mut stats = stats();
        for _ in 0..19 {
            stats.new_level();
        }
        assert_eq!(stats.level, 20);
        let at_20 = stats.fall_delay;
        stats.new_level();
        assert_eq!(stats.fall_delay, at_20);
    }
}
