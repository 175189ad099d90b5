//! Protocol module - line-delimited JSON messages of the host
//!
//! Every input line is one object naming an action and, for player actions,
//! the key state. Every output line is one object tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::core::{GameEvent, GameSnapshot};
use crate::types::{Action, Color, Coord, Shape};

// ============== Input ==============

/// Name carried by the `action` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Game(Action),
    Pause,
    Resume,
    NewGame,
    Quit,
}

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if let Some(action) = Action::from_str(s) {
            Ok(Self::Game(action))
        } else if s.eq_ignore_ascii_case("pause") {
            Ok(Self::Pause)
        } else if s.eq_ignore_ascii_case("resume") {
            Ok(Self::Resume)
        } else if s.eq_ignore_ascii_case("newGame") {
            Ok(Self::NewGame)
        } else if s.eq_ignore_ascii_case("quit") {
            Ok(Self::Quit)
        } else {
            Err(serde::de::Error::custom("unknown action"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    #[default]
    Press,
    Release,
}

/// One input line
#[derive(Debug, Clone, Deserialize)]
pub struct InputMessage {
    pub action: ActionName,
    #[serde(default)]
    pub state: KeyState,
    /// Start level for `newGame`
    #[serde(default)]
    pub level: Option<u32>,
}

/// What the host does with an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Press(Action),
    Release(Action),
    Pause,
    Resume,
    NewGame { level: Option<u32> },
    Quit,
}

impl InputMessage {
    /// Releases only matter for player actions
    pub fn into_command(self) -> Option<HostCommand> {
        match (self.action, self.state) {
            (ActionName::Game(action), KeyState::Press) => Some(HostCommand::Press(action)),
            (ActionName::Game(action), KeyState::Release) => Some(HostCommand::Release(action)),
            (_, KeyState::Release) => None,
            (ActionName::Pause, _) => Some(HostCommand::Pause),
            (ActionName::Resume, _) => Some(HostCommand::Resume),
            (ActionName::NewGame, _) => Some(HostCommand::NewGame { level: self.level }),
            (ActionName::Quit, _) => Some(HostCommand::Quit),
        }
    }
}

/// Parse one input line
pub fn parse_input(line: &str) -> Result<Option<HostCommand>, serde_json::Error> {
    let message: InputMessage = serde_json::from_str(line)?;
    Ok(message.into_command())
}

// ============== Output ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidCommand,
}

/// Falling, ghost or queued piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceState {
    pub shape: &'static str,
    pub orientation: u8,
    pub x: i8,
    pub y: i8,
    pub cells: Vec<[i8; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardState {
    pub width: u8,
    pub height: u8,
    /// Visible rows, top row first; 0 = empty, 1-7 = color
    pub cells: Vec<Vec<u8>>,
}

/// Full game state, sent whenever it changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMessage {
    pub phase: &'static str,
    pub playable: bool,
    pub game_over: bool,
    pub board: BoardState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub falling: Option<PieceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghost: Option<PieceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<&'static str>,
    pub can_hold: bool,
    pub next: Vec<&'static str>,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub goal: i64,
    pub lines: u32,
    pub combo: i32,
    pub time: u32,
}

/// One output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputEvent {
    NewGame {
        next: Vec<&'static str>,
    },
    NewLevel {
        level: u32,
    },
    Generation {
        falling: &'static str,
        cells: Vec<[i8; 2]>,
        ghost: Vec<[i8; 2]>,
        next: Vec<&'static str>,
    },
    Falling {
        shape: &'static str,
    },
    Locked {
        shape: &'static str,
        cells: Vec<[i8; 2]>,
    },
    LocksDown {
        shape: &'static str,
        cells: Vec<[i8; 2]>,
    },
    Animate {
        rows: Vec<usize>,
    },
    Eliminate {
        rows: Vec<usize>,
    },
    Completion {
        pattern_name: String,
        pattern_score: u32,
        combo: i32,
        combo_score: u32,
    },
    Text {
        text: String,
    },
    Hold {
        shape: &'static str,
    },
    Pause,
    Resume,
    GameOver,
    State(StateMessage),
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl OutputEvent {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}

fn cells(coords: [Coord; 4]) -> Vec<[i8; 2]> {
    coords.iter().map(|c| [c.x, c.y]).collect()
}

fn shapes(shapes: &[Shape]) -> Vec<&'static str> {
    shapes.iter().map(|s| s.as_str()).collect()
}

/// Wire code of a placed mino
pub fn color_code(color: Option<Color>) -> u8 {
    match color {
        None => 0,
        Some(Color::Yellow) => 1,
        Some(Color::Cyan) => 2,
        Some(Color::Magenta) => 3,
        Some(Color::Orange) => 4,
        Some(Color::Blue) => 5,
        Some(Color::Green) => 6,
        Some(Color::Red) => 7,
    }
}

impl From<GameEvent> for OutputEvent {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::NewGame { next } => Self::NewGame {
                next: shapes(&next),
            },
            GameEvent::NewLevel { level } => Self::NewLevel { level },
            GameEvent::Generation {
                falling,
                cells: falling_cells,
                ghost,
                next,
            } => Self::Generation {
                falling: falling.as_str(),
                cells: cells(falling_cells),
                ghost: cells(ghost),
                next: shapes(&next),
            },
            GameEvent::Falling { shape } => Self::Falling {
                shape: shape.as_str(),
            },
            GameEvent::Locked { shape, cells: c } => Self::Locked {
                shape: shape.as_str(),
                cells: cells(c),
            },
            GameEvent::LocksDown { shape, cells: c } => Self::LocksDown {
                shape: shape.as_str(),
                cells: cells(c),
            },
            GameEvent::Animate { rows } => Self::Animate { rows },
            GameEvent::Eliminate { rows } => Self::Eliminate { rows },
            GameEvent::Completion(score) => Self::Completion {
                pattern_name: score.pattern_name,
                pattern_score: score.pattern_score,
                combo: score.combo,
                combo_score: score.combo_score,
            },
            GameEvent::Text(text) => Self::Text { text },
            GameEvent::Hold { shape } => Self::Hold {
                shape: shape.as_str(),
            },
            GameEvent::Pause => Self::Pause,
            GameEvent::Resume => Self::Resume,
            GameEvent::GameOver => Self::GameOver,
        }
    }
}

impl From<&GameSnapshot> for StateMessage {
    fn from(s: &GameSnapshot) -> Self {
        let piece = |p: &crate::core::ActiveSnapshot| PieceState {
            shape: p.shape.as_str(),
            orientation: p.orientation,
            x: p.x,
            y: p.y,
            cells: cells(p.cells),
        };
        let board = BoardState {
            width: s.columns,
            height: s.lines,
            cells: (0..s.lines as usize)
                .rev()
                .map(|y| {
                    (0..s.columns as usize)
                        .map(|x| color_code(s.cell(x, y)))
                        .collect()
                })
                .collect(),
        };
        Self {
            phase: s.phase.as_str(),
            playable: s.playable(),
            game_over: s.game_over(),
            board,
            falling: s.falling.as_ref().map(piece),
            ghost: s.ghost.as_ref().map(piece),
            hold: s.held.map(|shape| shape.as_str()),
            can_hold: s.can_hold,
            next: shapes(&s.next),
            level: s.level,
            score: s.score,
            high_score: s.high_score,
            goal: s.goal,
            lines: s.lines_cleared,
            combo: s.combo,
            time: s.time,
        }
    }
}
