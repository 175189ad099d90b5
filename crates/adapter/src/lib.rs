//! Adapter module - headless host speaking line-delimited JSON
//!
//! The adapter owns everything the rules engine refuses to know about: the
//! wall clock, standard input and output, the environment and the file
//! system.
//!
//! # Protocol Overview
//!
//! Input, one object per line:
//!
//! - **player actions**: `{"action":"moveLeft","state":"press"}` and the
//!   matching `"release"`; `state` defaults to `"press"`. Actions are
//!   `moveLeft`, `moveRight`, `softDrop`, `hardDrop`, `rotateCw`,
//!   `rotateCcw`, `hold`.
//! - **host commands**: `pause`, `resume`, `newGame` (optional `level`),
//!   `quit`.
//!
//! Output, one object per line tagged by `type`: one line per engine event
//! (`newGame`, `newLevel`, `generation`, `falling`, `locked`, `locksDown`,
//! `animate`, `eliminate`, `completion`, `text`, `hold`, `pause`, `resume`,
//! `gameOver`), a `state` line whenever the game changed, and `error` lines
//! for rejected input.
//!
//! # Environment Variables
//!
//! - `TETRIS_COLUMNS`, `TETRIS_LINES`: matrix size (default 10x20)
//! - `TETRIS_NEXT_PIECES`: next-queue length (default 5)
//! - `TETRIS_LEVEL`: start level (default 1)
//! - `TETRIS_SEED`: bag seed (default: from the clock)
//! - `TETRIS_HIGH_SCORE_PATH`: high-score file (default: kept in memory)
//! - `TETRIS_TICK_MS`: host clock period (default 16)
//!
//! # Example Session
//!
//! ```text
//! -> {"action":"moveLeft","state":"press"}
//! <- {"type":"state","phase":"falling",...}
//! -> {"action":"moveLeft","state":"release"}
//! -> {"action":"hardDrop"}
//! <- {"type":"locksDown","shape":"t","cells":[[2,0],[3,0],[3,1],[4,0]]}
//! <- {"type":"generation",...}
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod store;

pub use tetrislogic_core as core;
pub use tetrislogic_types as types;

pub use config::HostConfig;
pub use protocol::{parse_input, HostCommand, OutputEvent, StateMessage};
pub use runtime::{run, Host};
pub use store::FileStore;
