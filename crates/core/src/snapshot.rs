use crate::pieces::Tetromino;
use crate::types::{Color, Coord, Phase, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub shape: Shape,
    pub orientation: u8,
    pub x: i8,
    pub y: i8,
    /// Absolute cells
    pub cells: [Coord; 4],
}

impl From<&Tetromino> for ActiveSnapshot {
    fn from(value: &Tetromino) -> Self {
        Self {
            shape: value.shape,
            orientation: value.orientation,
            x: value.coord.x,
            y: value.coord.y,
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub columns: u8,
    pub lines: u8,
    /// Row-major, row 0 at the bottom, hidden rows included
    pub board: Vec<Option<Color>>,
    pub falling: Option<ActiveSnapshot>,
    pub ghost: Option<ActiveSnapshot>,
    pub held: Option<Shape>,
    pub next: Vec<Shape>,
    pub can_hold: bool,
    pub phase: Phase,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub goal: i64,
    pub lines_cleared: u32,
    pub combo: i32,
    pub time: u32,
}

impl GameSnapshot {
    /// Cell at (x, y), `None` when empty or out of range
    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.columns as usize {
            return None;
        }
        self.board
            .get(y * self.columns as usize + x)
            .copied()
            .flatten()
    }

    pub fn playable(&self) -> bool {
        self.phase.is_active()
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::Over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            columns: 0,
            lines: 0,
            board: Vec::new(),
            falling: None,
            ghost: None,
            held: None,
            next: Vec::new(),
            can_hold: false,
            phase: Phase::Starting,
            level: 0,
            score: 0,
            high_score: 0,
            goal: 0,
            lines_cleared: 0,
            combo: -1,
            time: 0,
        }
    }
}
