//! Presenter module - what the engine reports, and where the high score lives
//!
//! The presentation layer implements [`Presenter`]; every hook is required so
//! a missing one is a compile error rather than a silent no-op. Hooks only
//! receive shared references: the presenter reads engine state, it never
//! mutates it.
//!
//! [`EventLog`] is a ready-made presenter that records owned [`GameEvent`]s,
//! used by the host adapter and by tests.

use crate::matrix::Matrix;
use crate::pieces::Tetromino;
use crate::scoring::LockScore;
use crate::types::{Coord, Shape};

/// Engine → presentation callbacks
pub trait Presenter {
    fn on_new_game(&mut self, matrix: &Matrix, next_pieces: &[Tetromino]);

    fn on_new_level(&mut self, level: u32);

    /// A piece left the next queue and now falls
    fn on_generation(&mut self, falling: &Tetromino, ghost: &Tetromino, next_pieces: &[Tetromino]);

    /// The piece (re)enters the falling phase, e.g. after a hold swap
    fn on_falling(&mut self, falling: &Tetromino);

    /// The piece touched down and its lock delay started
    fn on_locked(&mut self, falling: &Tetromino);

    /// The piece was merged into the matrix, before line clears and scoring
    fn on_locks_down(&mut self, matrix: &Matrix, piece: &Tetromino);

    /// Rows about to be removed, bottom to top
    fn on_animate(&mut self, matrix: &Matrix, lines_to_remove: &[usize]);

    /// Rows were removed
    fn on_eliminate(&mut self, matrix: &Matrix, lines_removed: &[usize]);

    /// Score of the last lock
    fn on_completion(&mut self, score: &LockScore);

    /// Transient text such as "LEVEL\n2" or "COMBO x2\n40"
    fn show_text(&mut self, text: &str);

    fn on_hold(&mut self, held: &Tetromino);

    fn on_pause(&mut self);

    fn on_resume(&mut self);

    fn on_game_over(&mut self);
}

/// Storage for the encoded high score
pub trait HighScoreStore {
    /// Blob saved by a previous game, if any
    fn load(&mut self) -> Option<Vec<u8>>;

    fn save(&mut self, blob: &[u8]);
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    pub blob: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self { blob: Some(blob) }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Option<Vec<u8>> {
        self.blob.clone()
    }

    fn save(&mut self, blob: &[u8]) {
        self.blob = Some(blob.to_vec());
    }
}

/// Owned record of a presenter callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    NewGame {
        next: Vec<Shape>,
    },
    NewLevel {
        level: u32,
    },
    Generation {
        falling: Shape,
        cells: [Coord; 4],
        ghost: [Coord; 4],
        next: Vec<Shape>,
    },
    Falling {
        shape: Shape,
    },
    Locked {
        shape: Shape,
        cells: [Coord; 4],
    },
    LocksDown {
        shape: Shape,
        cells: [Coord; 4],
    },
    Animate {
        rows: Vec<usize>,
    },
    Eliminate {
        rows: Vec<usize>,
    },
    Completion(LockScore),
    Text(String),
    Hold {
        shape: Shape,
    },
    Pause,
    Resume,
    GameOver,
}

/// Presenter that records every callback
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Texts shown so far
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|event| matches(event)).count()
    }
}

fn shapes(pieces: &[Tetromino]) -> Vec<Shape> {
    pieces.iter().map(|piece| piece.shape).collect()
}

impl Presenter for EventLog {
    fn on_new_game(&mut self, _matrix: &Matrix, next_pieces: &[Tetromino]) {
        self.events.push(GameEvent::NewGame {
            next: shapes(next_pieces),
        });
    }

    fn on_new_level(&mut self, level: u32) {
        self.events.push(GameEvent::NewLevel { level });
    }

    fn on_generation(&mut self, falling: &Tetromino, ghost: &Tetromino, next_pieces: &[Tetromino]) {
        self.events.push(GameEvent::Generation {
            falling: falling.shape,
            cells: falling.cells(),
            ghost: ghost.cells(),
            next: shapes(next_pieces),
        });
    }

    fn on_falling(&mut self, falling: &Tetromino) {
        self.events.push(GameEvent::Falling {
            shape: falling.shape,
        });
    }

    fn on_locked(&mut self, falling: &Tetromino) {
        self.events.push(GameEvent::Locked {
            shape: falling.shape,
            cells: falling.cells(),
        });
    }

    fn on_locks_down(&mut self, _matrix: &Matrix, piece: &Tetromino) {
        self.events.push(GameEvent::LocksDown {
            shape: piece.shape,
            cells: piece.cells(),
        });
    }

    fn on_animate(&mut self, _matrix: &Matrix, lines_to_remove: &[usize]) {
        self.events.push(GameEvent::Animate {
            rows: lines_to_remove.to_vec(),
        });
    }

    fn on_eliminate(&mut self, _matrix: &Matrix, lines_removed: &[usize]) {
        self.events.push(GameEvent::Eliminate {
            rows: lines_removed.to_vec(),
        });
    }

    fn on_completion(&mut self, score: &LockScore) {
        self.events.push(GameEvent::Completion(score.clone()));
    }

    fn show_text(&mut self, text: &str) {
        self.events.push(GameEvent::Text(text.to_string()));
    }

    fn on_hold(&mut self, held: &Tetromino) {
        self.events.push(GameEvent::Hold { shape: held.shape });
    }

    fn on_pause(&mut self) {
        self.events.push(GameEvent::Pause);
    }

    fn on_resume(&mut self) {
        self.events.push(GameEvent::Resume);
    }

    fn on_game_over(&mut self) {
        self.events.push(GameEvent::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), None);
        store.save(&[1, 2, 3]);
        assert_eq!(store.load(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_event_log_drain() {
        let mut log = EventLog::new();
        log.on_new_level(3);
        log.show_text("LEVEL\n3");
        assert_eq!(log.texts(), vec!["LEVEL\n3"]);
        assert_eq!(log.count(|e| matches!(e, GameEvent::NewLevel { .. })), 1);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.events().is_empty());
    }
}
