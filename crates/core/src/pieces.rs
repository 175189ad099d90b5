//! Pieces module - static shape catalog and SRS kick tables
//!
//! Every shape is described by data only (mino offsets, color, kick tables);
//! there is a single [`Tetromino`] type parameterized by its [`Shape`].
//! Reference: https://tetris.wiki/SRS
//!
//! Mino offsets are relative to the piece anchor and rotate around it with
//! [`Coord::rotate`]. Because the I piece does not rotate around a cell
//! center, its kick table folds the pivot correction into every entry, which
//! is why its first attempt is never `(0, 0)`.

use crate::types::{Color, Coord, Shape, Spin};

/// Kick attempts for one (direction, orientation) pair
pub type Kicks = &'static [Coord];

/// Kick table indexed by `[spin.index()][orientation]`
pub type KickTable = [[Kicks; 4]; 2];

/// Static description of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeDescriptor {
    pub shape: Shape,
    pub color: Color,
    /// Mino offsets in spawn orientation
    pub minoes: [Coord; 4],
    pub kicks: &'static KickTable,
    /// Only T pieces are classified for T-spins
    pub can_spin: bool,
}

const fn c(x: i8, y: i8) -> Coord {
    Coord::new(x, y)
}

const NO_KICKS: KickTable = [[&[], &[], &[], &[]], [&[], &[], &[], &[]]];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const SRS_KICKS: KickTable = [
    // Clockwise
    [
        // 0 -> 1
        &[c(0, 0), c(-1, 0), c(-1, 1), c(0, -2), c(-1, -2)],
        // 1 -> 2
        &[c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)],
        // 2 -> 3
        &[c(0, 0), c(1, 0), c(1, 1), c(0, -2), c(1, -2)],
        // 3 -> 0
        &[c(0, 0), c(-1, 0), c(-1, -1), c(0, 2), c(-1, 2)],
    ],
    // Counter-clockwise
    [
        // 0 -> 3
        &[c(0, 0), c(1, 0), c(1, 1), c(0, -2), c(1, -2)],
        // 1 -> 0
        &[c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)],
        // 2 -> 1
        &[c(0, 0), c(-1, 0), c(-1, 1), c(0, -2), c(-1, -2)],
        // 3 -> 2
        &[c(0, 0), c(-1, 0), c(-1, -1), c(0, 2), c(-1, 2)],
    ],
];

/// I piece kick table (pivot correction included)
const I_KICKS: KickTable = [
    // Clockwise
    [
        &[c(1, 0), c(-1, 0), c(2, 0), c(-1, -1), c(2, 2)],
        &[c(0, -1), c(-1, -1), c(2, -1), c(-1, 1), c(2, -2)],
        &[c(-1, 0), c(1, 0), c(-2, 0), c(1, 1), c(-2, -2)],
        &[c(0, 1), c(1, 1), c(-2, 1), c(1, -1), c(-2, 2)],
    ],
    // Counter-clockwise
    [
        &[c(0, -1), c(-1, -1), c(2, -1), c(-1, 1), c(2, -2)],
        &[c(-1, 0), c(1, 0), c(-2, 0), c(1, 1), c(-2, -2)],
        &[c(0, 1), c(1, 1), c(-2, 1), c(1, -1), c(-2, 2)],
        &[c(1, 0), c(-1, 0), c(2, 0), c(-1, -1), c(2, 2)],
    ],
];

/// The shape catalog, built once, never mutated
pub static CATALOG: [ShapeDescriptor; 7] = [
    ShapeDescriptor {
        shape: Shape::O,
        color: Color::Yellow,
        minoes: [c(0, 0), c(1, 0), c(0, 1), c(1, 1)],
        kicks: &NO_KICKS,
        can_spin: false,
    },
    ShapeDescriptor {
        shape: Shape::I,
        color: Color::Cyan,
        minoes: [c(-1, 0), c(0, 0), c(1, 0), c(2, 0)],
        kicks: &I_KICKS,
        can_spin: false,
    },
    ShapeDescriptor {
        shape: Shape::T,
        color: Color::Magenta,
        minoes: [c(-1, 0), c(0, 0), c(0, 1), c(1, 0)],
        kicks: &SRS_KICKS,
        can_spin: true,
    },
    ShapeDescriptor {
        shape: Shape::L,
        color: Color::Orange,
        minoes: [c(-1, 0), c(0, 0), c(1, 0), c(1, 1)],
        kicks: &SRS_KICKS,
        can_spin: false,
    },
    ShapeDescriptor {
        shape: Shape::J,
        color: Color::Blue,
        minoes: [c(-1, 1), c(-1, 0), c(0, 0), c(1, 0)],
        kicks: &SRS_KICKS,
        can_spin: false,
    },
    ShapeDescriptor {
        shape: Shape::S,
        color: Color::Green,
        minoes: [c(-1, 0), c(0, 0), c(0, 1), c(1, 1)],
        kicks: &SRS_KICKS,
        can_spin: false,
    },
    ShapeDescriptor {
        shape: Shape::Z,
        color: Color::Red,
        minoes: [c(-1, 1), c(0, 1), c(0, 0), c(1, 0)],
        kicks: &SRS_KICKS,
        can_spin: false,
    },
];

/// Look up the descriptor of a shape
pub fn descriptor(shape: Shape) -> &'static ShapeDescriptor {
    let index = match shape {
        Shape::O => 0,
        Shape::I => 1,
        Shape::T => 2,
        Shape::L => 3,
        Shape::J => 4,
        Shape::S => 5,
        Shape::Z => 6,
    };
    &CATALOG[index]
}

/// A single cell of a piece or of the matrix
///
/// While part of a piece, `coord` is relative to the piece anchor; once
/// placed in the matrix it is the absolute cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mino {
    pub color: Color,
    pub coord: Coord,
}

/// A piece: 4 minoes around an anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    pub shape: Shape,
    pub coord: Coord,
    pub minoes: [Mino; 4],
    pub orientation: u8,
    /// Kick attempt (1..=5) used by the last successful rotation, cleared by
    /// any translation other than falling
    pub last_rotation_point_used: Option<u8>,
    pub hold_enabled: bool,
    /// Set while the lock delay is running
    pub prelocked: bool,
}

impl Tetromino {
    /// Create a piece in spawn orientation at `coord`
    pub fn new(shape: Shape, coord: Coord) -> Self {
        let desc = descriptor(shape);
        Self {
            shape,
            coord,
            minoes: desc.minoes.map(|offset| Mino {
                color: desc.color,
                coord: offset,
            }),
            orientation: 0,
            last_rotation_point_used: None,
            hold_enabled: true,
            prelocked: false,
        }
    }

    pub fn descriptor(&self) -> &'static ShapeDescriptor {
        descriptor(self.shape)
    }

    pub fn color(&self) -> Color {
        self.descriptor().color
    }

    /// Mino offsets relative to the anchor
    pub fn minoes_coords(&self) -> [Coord; 4] {
        self.minoes.map(|mino| mino.coord)
    }

    /// Absolute cells occupied on the matrix
    pub fn cells(&self) -> [Coord; 4] {
        self.minoes.map(|mino| self.coord + mino.coord)
    }

    /// Mino offsets after a rotation in `spin` direction
    pub fn rotated_minoes_coords(&self, spin: Spin) -> [Coord; 4] {
        self.minoes_coords().map(|coord| coord.rotate(spin))
    }

    /// Kick attempts for rotating from the current orientation
    pub fn kicks(&self, spin: Spin) -> Kicks {
        self.descriptor().kicks[spin.index()][self.orientation as usize]
    }

    pub fn set_minoes_coords(&mut self, coords: [Coord; 4]) {
        for (mino, coord) in self.minoes.iter_mut().zip(coords) {
            mino.coord = coord;
        }
    }

    /// Back to spawn orientation, e.g. when sent to the hold slot
    pub fn reset_orientation(&mut self) {
        self.set_minoes_coords(self.descriptor().minoes);
        self.orientation = 0;
        self.last_rotation_point_used = None;
        self.prelocked = false;
    }

    /// A copy with the same shape, position and orientation
    pub fn ghost(&self) -> Self {
        let mut ghost = Self::new(self.shape, self.coord);
        ghost.minoes = self.minoes;
        ghost.orientation = self.orientation;
        ghost
    }
}
