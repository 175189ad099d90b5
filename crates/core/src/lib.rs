//! Core rules module - pure, deterministic, and testable
//!
//! This crate contains every rule of the game: the matrix, the piece catalog,
//! the bag generator, scoring and the phase state machine. It has **no**
//! dependency on a clock, a terminal or a file system, which makes it:
//!
//! - **Deterministic**: the same seed and the same inputs replay the same game
//! - **Testable**: a virtual-clock scheduler drives time in tests
//! - **Portable**: any host provides timers, rendering and storage through traits
//!
//! # Module Structure
//!
//! - [`matrix`]: playfield grid with collision queries and row removal
//! - [`pieces`]: static shape catalog, SRS kick tables, [`Tetromino`]
//! - [`rng`]: 7-bag random shape generation
//! - [`scoring`]: level, goal, combo and score bookkeeping
//! - [`high_score`]: opaque high-score blob codec
//! - [`scheduler`]: timed-task contract and a manual virtual clock
//! - [`presenter`]: presentation callbacks and high-score storage
//! - [`config`]: engine configuration and display layout
//! - [`logic`]: the [`TetrisLogic`] phase state machine
//! - [`snapshot`]: read-only copy of the game for hosts
//!
//! # Host Contract
//!
//! The host calls the player actions on [`TetrisLogic`] and forwards fired
//! timers to [`TetrisLogic::run_task`]. The engine calls back into the
//! [`Scheduler`] to arm its own timers and into the [`Presenter`] to report
//! every state change.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tetrislogic_core::{EngineConfig, EventLog, ManualScheduler, MemoryStore, TetrisLogic};
//! use tetrislogic_types::Phase;
//!
//! let mut game = TetrisLogic::new(
//!     EngineConfig::default(),
//!     ManualScheduler::new(),
//!     EventLog::new(),
//!     MemoryStore::new(),
//! )
//! .unwrap();
//! game.new_game(1);
//!
//! game.move_right();
//! game.rotate_clockwise();
//! game.hard_drop();
//! assert!(game.score() > 0);
//!
//! // One second of gravity
//! game.advance(Duration::from_secs(1));
//! assert_eq!(game.phase(), Phase::Falling);
//! ```

pub mod config;
pub mod high_score;
pub mod logic;
pub mod matrix;
pub mod pieces;
pub mod presenter;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;

pub use tetrislogic_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use logic::TetrisLogic;
pub use matrix::Matrix;
pub use pieces::{Mino, Tetromino};
pub use presenter::{EventLog, GameEvent, HighScoreStore, MemoryStore, Presenter};
pub use rng::RandomBag;
pub use scheduler::{ManualScheduler, Scheduler};
pub use scoring::{LockScore, Stats};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
