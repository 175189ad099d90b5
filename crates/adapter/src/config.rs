//! Host configuration from environment variables

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::core::EngineConfig;

/// Default host tick (milliseconds)
pub const TICK_MS: u64 = 16;

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub engine: EngineConfig,
    /// Where the high-score blob lives; kept in memory when unset
    pub high_score_path: Option<PathBuf>,
    /// Period of the clock feeding the engine
    pub tick: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            high_score_path: None,
            tick: Duration::from_millis(TICK_MS),
        }
    }
}

impl HostConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from any variable lookup; unparsable values fall back to the
    /// defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            var: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            var(key).and_then(|s| s.trim().parse().ok())
        }

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            columns: parsed(&var, "TETRIS_COLUMNS").unwrap_or(defaults.columns),
            lines: parsed(&var, "TETRIS_LINES").unwrap_or(defaults.lines),
            next_pieces: parsed(&var, "TETRIS_NEXT_PIECES").unwrap_or(defaults.next_pieces),
            start_level: parsed(&var, "TETRIS_LEVEL").unwrap_or(defaults.start_level),
            seed: parsed(&var, "TETRIS_SEED").unwrap_or_else(clock_seed),
            ..defaults
        };

        let high_score_path = var("TETRIS_HIGH_SCORE_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from);

        let tick = parsed(&var, "TETRIS_TICK_MS")
            .filter(|ms: &u64| *ms > 0)
            .unwrap_or(TICK_MS);

        Self {
            engine,
            high_score_path,
            tick: Duration::from_millis(tick),
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_host_config_from_vars() {
        let config = HostConfig::from_vars(vars(&[
            ("TETRIS_COLUMNS", "12"),
            ("TETRIS_LINES", "24"),
            ("TETRIS_NEXT_PIECES", "3"),
            ("TETRIS_LEVEL", "4"),
            ("TETRIS_SEED", "42"),
            ("TETRIS_HIGH_SCORE_PATH", " /tmp/hs.bin "),
            ("TETRIS_TICK_MS", "8"),
        ]));
        assert_eq!(config.engine.columns, 12);
        assert_eq!(config.engine.lines, 24);
        assert_eq!(config.engine.next_pieces, 3);
        assert_eq!(config.engine.start_level, 4);
        assert_eq!(config.engine.seed, 42);
        assert_eq!(config.high_score_path, Some(PathBuf::from("/tmp/hs.bin")));
        assert_eq!(config.tick, Duration::from_millis(8));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = HostConfig::from_vars(vars(&[
            ("TETRIS_COLUMNS", "wide"),
            ("TETRIS_TICK_MS", "0"),
            ("TETRIS_HIGH_SCORE_PATH", "  "),
        ]));
        assert_eq!(config.engine.columns, 10);
        assert_eq!(config.tick, Duration::from_millis(TICK_MS));
        assert_eq!(config.high_score_path, None);
    }

    #[test]
    fn test_host_config_from_env() {
        let config = HostConfig::from_env();
        assert!(config.tick > Duration::ZERO);
    }
}
