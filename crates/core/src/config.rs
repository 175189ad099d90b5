//! Engine configuration and the display layout derived from it

use std::time::Duration;

use anyhow::{bail, Result};

use crate::types::{
    Coord, AUTOREPEAT_DELAY_MS, AUTOREPEAT_PERIOD_MS, COLUMNS, FALL_DELAY_MS, HIDDEN_LINES, LINES,
    LOCK_DELAY_MS, NEXT_PIECES,
};

/// Everything the engine is built from. The engine never reads files or the
/// environment; hosts fill this in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub columns: u8,
    /// Visible lines
    pub lines: u8,
    pub next_pieces: usize,
    /// Gravity period at level 1
    pub fall_delay: Duration,
    /// Lock delay up to level 15
    pub lock_delay: Duration,
    pub autorepeat_delay: Duration,
    pub autorepeat_period: Duration,
    /// Level used by `new_game` when none is given
    pub start_level: u32,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: COLUMNS,
            lines: LINES,
            next_pieces: NEXT_PIECES,
            fall_delay: Duration::from_millis(FALL_DELAY_MS),
            lock_delay: Duration::from_millis(LOCK_DELAY_MS),
            autorepeat_delay: Duration::from_millis(AUTOREPEAT_DELAY_MS),
            autorepeat_period: Duration::from_millis(AUTOREPEAT_PERIOD_MS),
            start_level: 1,
            seed: 1,
        }
    }
}

impl EngineConfig {
    /// Reject layouts that do not fit the `i8` coordinate space or leave no
    /// room for a piece
    pub fn validate(&self) -> Result<()> {
        if !(4..=64).contains(&self.columns) {
            bail!("columns must be within 4..=64, got {}", self.columns);
        }
        if !(4..=64).contains(&self.lines) {
            bail!("lines must be within 4..=64, got {}", self.lines);
        }
        if !(1..=12).contains(&self.next_pieces) {
            bail!("next_pieces must be within 1..=12, got {}", self.next_pieces);
        }
        if self.start_level == 0 {
            bail!("start_level must be at least 1");
        }
        for (name, delay) in [
            ("fall_delay", self.fall_delay),
            ("lock_delay", self.lock_delay),
            ("autorepeat_delay", self.autorepeat_delay),
            ("autorepeat_period", self.autorepeat_period),
        ] {
            if delay.is_zero() {
                bail!("{} must be positive", name);
            }
        }
        Ok(())
    }

    /// Anchor of a freshly generated piece, just above the visible area
    pub fn spawn_coord(&self) -> Coord {
        Coord::new(((self.columns - 1) / 2) as i8, self.lines as i8)
    }

    /// Display anchor of next-queue slot `n`, right of the matrix
    pub fn next_piece_coord(&self, n: usize) -> Coord {
        Coord::new(
            self.columns as i8 + 6,
            self.lines as i8 - 4 * n as i8 - HIDDEN_LINES as i8,
        )
    }

    /// Display anchor of the hold slot, left of the matrix
    pub fn held_coord(&self) -> Coord {
        Coord::new(-7, self.lines as i8 - HIDDEN_LINES as i8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spawn_coord(), Coord::new(4, 20));
        assert_eq!(config.held_coord(), Coord::new(-7, 17));
        assert_eq!(config.next_piece_coord(0), Coord::new(16, 17));
        assert_eq!(config.next_piece_coord(4), Coord::new(16, 1));
    }

    #[test]
    fn test_validate_rejects_bad_layouts() {
        let mut config = EngineConfig::default();
        config.columns = 3;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.lines = 100;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.next_pieces = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.autorepeat_period = Duration::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("autorepeat_period"));

        let mut config = EngineConfig::default();
        config.start_level = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spawn_is_centered() {
        let config = EngineConfig {
            columns: 6,
            lines: 8,
            ..EngineConfig::default()
        };
        assert_eq!(config.spawn_coord(), Coord::new(2, 8));
    }
}
