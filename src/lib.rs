//! Tetris rules engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tetrislogic::{types, core, adapter}`.

pub use tetrislogic_adapter as adapter;
pub use tetrislogic_core as core;
pub use tetrislogic_types as types;
