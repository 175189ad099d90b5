//! Core types module - shared primitives and default constants
//!
//! Everything here is plain data with no external dependencies, so the rules
//! engine, the host adapter and the tests can all share it.
//!
//! # Coordinates
//!
//! The matrix origin is the bottom-left cell. `x` grows to the right, `y` grows
//! upward, so [`Movement::DOWN`] is `(0, -1)`. Pieces spawn above the visible
//! area at `(4, LINES)` and the matrix keeps 3 hidden rows on top of the
//! visible ones.
//!
//! # Default Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FALL_DELAY_MS` | 1000 | Gravity period at level 1 |
//! | `LOCK_DELAY_MS` | 500 | Grace period before a grounded piece locks |
//! | `AUTOREPEAT_DELAY_MS` | 300 | Hold time before lateral autorepeat kicks in |
//! | `AUTOREPEAT_PERIOD_MS` | 10 | Interval between autorepeated actions |
//!
//! # Examples
//!
//! ```
//! use tetrislogic_types::{Coord, Movement, Shape, Spin};
//!
//! let anchor = Coord::new(4, 20);
//! assert_eq!(anchor + Movement::DOWN, Coord::new(4, 19));
//!
//! // Clockwise rotation of a mino offset
//! assert_eq!(Coord::new(0, 1).rotate(Spin::Clockwise), Coord::new(1, 0));
//!
//! assert_eq!(Shape::from_str("t"), Some(Shape::T));
//! ```

use std::ops::{Add, AddAssign};

/// Visible lines of the matrix
pub const LINES: u8 = 20;

/// Columns of the matrix
pub const COLUMNS: u8 = 10;

/// Hidden lines kept above the visible area
pub const HIDDEN_LINES: u8 = 3;

/// Length of the next queue
pub const NEXT_PIECES: usize = 5;

/// Gravity period at level 1 (milliseconds)
pub const FALL_DELAY_MS: u64 = 1000;

/// Lock delay up to level 15 (milliseconds)
pub const LOCK_DELAY_MS: u64 = 500;

/// Delay before lateral autorepeat starts (milliseconds)
pub const AUTOREPEAT_DELAY_MS: u64 = 300;

/// Period between autorepeated actions (milliseconds)
pub const AUTOREPEAT_PERIOD_MS: u64 = 10;

/// Period of the elapsed-time counter (milliseconds)
pub const TIME_TICK_MS: u64 = 1000;

/// Integer offset on the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Rotate a mino offset around the piece anchor: `(x, y) -> (s·y, -s·x)`
    /// where `s` is `+1` clockwise and `-1` counter-clockwise.
    pub fn rotate(self, spin: Spin) -> Self {
        let s = spin.sign();
        Self {
            x: s * self.y,
            y: -s * self.x,
        }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, other: Coord) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// Unit translations
pub struct Movement;

impl Movement {
    pub const LEFT: Coord = Coord::new(-1, 0);
    pub const RIGHT: Coord = Coord::new(1, 0);
    pub const DOWN: Coord = Coord::new(0, -1);
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// `+1` for clockwise, `-1` for counter-clockwise
    pub fn sign(self) -> i8 {
        match self {
            Spin::Clockwise => 1,
            Spin::CounterClockwise => -1,
        }
    }

    /// Row of the kick tables for this direction
    pub fn index(self) -> usize {
        match self {
            Spin::Clockwise => 0,
            Spin::CounterClockwise => 1,
        }
    }

    /// Orientation reached from `orientation` (both in 0..4)
    pub fn next_orientation(self, orientation: u8) -> u8 {
        ((orientation as i8 + self.sign()).rem_euclid(4)) as u8
    }

    pub fn inverse(self) -> Self {
        match self {
            Spin::Clockwise => Spin::CounterClockwise,
            Spin::CounterClockwise => Spin::Clockwise,
        }
    }
}

/// Mino colors, one per shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Yellow,
    Cyan,
    Magenta,
    Orange,
    Blue,
    Green,
    Red,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Cyan => "cyan",
            Color::Magenta => "magenta",
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Red => "red",
        }
    }
}

/// The seven tetromino shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    O,
    I,
    T,
    L,
    J,
    S,
    Z,
}

impl Shape {
    /// All shapes, in catalog order
    pub const ALL: [Shape; 7] = [
        Shape::O,
        Shape::I,
        Shape::T,
        Shape::L,
        Shape::J,
        Shape::S,
        Shape::Z,
    ];

    /// Parse shape from string (case-insensitive)
    ///
    /// ```
    /// use tetrislogic_types::Shape;
    ///
    /// assert_eq!(Shape::from_str("I"), Some(Shape::I));
    /// assert_eq!(Shape::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(Shape::O),
            "i" => Some(Shape::I),
            "t" => Some(Shape::T),
            "l" => Some(Shape::L),
            "j" => Some(Shape::J),
            "s" => Some(Shape::S),
            "z" => Some(Shape::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::O => "o",
            Shape::I => "i",
            Shape::T => "t",
            Shape::L => "l",
            Shape::J => "j",
            Shape::S => "s",
            Shape::Z => "z",
        }
    }
}

/// T-spin classification of a lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TSpin {
    None,
    Mini,
    Full,
}

impl TSpin {
    /// Column of the scoring table
    pub fn index(self) -> usize {
        match self {
            TSpin::None => 0,
            TSpin::Mini => 1,
            TSpin::Full => 2,
        }
    }

    /// Display name, `None` when there is nothing to show
    pub fn name(self) -> Option<&'static str> {
        match self {
            TSpin::None => None,
            TSpin::Mini => Some("MINI\nT-SPIN"),
            TSpin::Full => Some("T-SPIN"),
        }
    }
}

/// Phases of the game state machine
///
/// `Generation` and `Pattern` are transient: they run to completion inside a
/// single engine call, so observers mostly see `Falling`, `Lock`, `Paused`
/// and `Over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Starting,
    Generation,
    Falling,
    Lock,
    Pattern,
    Paused,
    Over,
}

impl Phase {
    /// Phases in which the player may act on the falling piece
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Falling | Phase::Lock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Starting => "starting",
            Phase::Generation => "generation",
            Phase::Falling => "falling",
            Phase::Lock => "lock",
            Phase::Pattern => "pattern",
            Phase::Paused => "paused",
            Phase::Over => "over",
        }
    }
}

/// Player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateClockwise,
    RotateCounterClockwise,
    Hold,
}

impl Action {
    /// Actions that repeat while their key is held
    pub fn is_autorepeatable(self) -> bool {
        matches!(self, Action::MoveLeft | Action::MoveRight | Action::SoftDrop)
    }

    /// Parse action from camelCase (case-insensitive)
    ///
    /// ```
    /// use tetrislogic_types::Action;
    ///
    /// assert_eq!(Action::from_str("moveLeft"), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_str("rotateCcw"), Some(Action::RotateCounterClockwise));
    /// assert_eq!(Action::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Action::MoveLeft),
            "moveright" => Some(Action::MoveRight),
            "softdrop" => Some(Action::SoftDrop),
            "harddrop" => Some(Action::HardDrop),
            "rotatecw" | "rotateclockwise" => Some(Action::RotateClockwise),
            "rotateccw" | "rotatecounterclockwise" => Some(Action::RotateCounterClockwise),
            "hold" => Some(Action::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::SoftDrop => "softDrop",
            Action::HardDrop => "hardDrop",
            Action::RotateClockwise => "rotateCw",
            Action::RotateCounterClockwise => "rotateCcw",
            Action::Hold => "hold",
        }
    }
}

/// Named timed tasks the engine submits to its scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Gravity tick
    Fall,
    /// Lock delay expiry
    Lock,
    /// Autorepeat of the most recent held action
    RepeatAction,
    /// Elapsed-time counter
    UpdateTime,
}

impl Task {
    pub const ALL: [Task; 4] = [Task::Fall, Task::Lock, Task::RepeatAction, Task::UpdateTime];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_rotation_round_trip() {
        let c = Coord::new(-1, 1);
        let cw = c.rotate(Spin::Clockwise);
        assert_eq!(cw, Coord::new(1, 1));
        assert_eq!(cw.rotate(Spin::CounterClockwise), c);

        let mut four = c;
        for _ in 0..4 {
            four = four.rotate(Spin::Clockwise);
        }
        assert_eq!(four, c);
    }

    #[test]
    fn spin_orientation_wraps() {
        assert_eq!(Spin::Clockwise.next_orientation(3), 0);
        assert_eq!(Spin::CounterClockwise.next_orientation(0), 3);
        assert_eq!(Spin::Clockwise.next_orientation(1), 2);
    }

    #[test]
    fn default_timing() {
        assert_eq!(FALL_DELAY_MS, 1000);
        assert_eq!(LOCK_DELAY_MS, 500);
        assert_eq!(AUTOREPEAT_DELAY_MS, 300);
        assert_eq!(AUTOREPEAT_PERIOD_MS, 10);
    }

    #[test]
    fn only_lateral_moves_and_soft_drop_repeat() {
        assert!(Action::MoveLeft.is_autorepeatable());
        assert!(Action::MoveRight.is_autorepeatable());
        assert!(Action::SoftDrop.is_autorepeatable());
        assert!(!Action::HardDrop.is_autorepeatable());
        assert!(!Action::RotateClockwise.is_autorepeatable());
        assert!(!Action::Hold.is_autorepeatable());
    }
}
