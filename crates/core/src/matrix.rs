//! Matrix module - the playfield grid
//!
//! The matrix holds `lines + 3` rows of `columns` cells (3 hidden rows above
//! the visible area). Cells live in a flat row-major vector, row 0 at the
//! bottom: index = `y * columns + x`.
//! Removing a row shifts everything above it down and appends a fresh empty
//! row at the top, so the row count never changes.

use arrayvec::ArrayVec;

use crate::pieces::Mino;
use crate::types::{Coord, HIDDEN_LINES};

/// A matrix cell: empty or holding a placed mino
pub type Cell = Option<Mino>;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    columns: u8,
    lines: u8,
    cells: Vec<Cell>,
}

impl Matrix {
    /// Create an empty matrix with `lines` visible lines
    pub fn new(columns: u8, lines: u8) -> Self {
        let rows = lines as usize + HIDDEN_LINES as usize;
        Self {
            columns,
            lines,
            cells: vec![None; rows * columns as usize],
        }
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Visible lines
    pub fn lines(&self) -> u8 {
        self.lines
    }

    /// Total rows, hidden ones included
    pub fn rows(&self) -> usize {
        self.lines as usize + HIDDEN_LINES as usize
    }

    #[inline(always)]
    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.x < 0
            || coord.x as u8 >= self.columns
            || coord.y < 0
            || coord.y as usize >= self.rows()
        {
            return None;
        }
        Some(coord.y as usize * self.columns as usize + coord.x as usize)
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    /// Cell at `coord`, `None` if out of bounds
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Set a cell, returns false if out of bounds
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        match self.index(coord) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True when `coord` is inside the side walls, not below the floor and
    /// empty. Cells above the top row count as free.
    pub fn cell_is_free(&self, coord: Coord) -> bool {
        if coord.x < 0 || coord.x as u8 >= self.columns || coord.y < 0 {
            return false;
        }
        match self.index(coord) {
            Some(idx) => self.cells[idx].is_none(),
            None => true,
        }
    }

    /// True iff every mino offset placed at `potential_coord` is free
    pub fn space_to_move(&self, potential_coord: Coord, minoes_coords: &[Coord]) -> bool {
        minoes_coords
            .iter()
            .all(|&mino_coord| self.cell_is_free(potential_coord + mino_coord))
    }

    /// Copy minoes placed at `anchor` into the grid; cells above the matrix
    /// are dropped
    pub fn place(&mut self, anchor: Coord, minoes: &[Mino]) {
        for mino in minoes {
            let coord = anchor + mino.coord;
            self.set(
                coord,
                Some(Mino {
                    color: mino.color,
                    coord,
                }),
            );
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.rows() {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = self.columns as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Full rows, scanned bottom to top
    ///
    /// A single lock can complete at most 4 rows.
    pub fn full_rows(&self) -> ArrayVec<usize, 4> {
        let mut rows = ArrayVec::new();
        for y in 0..self.rows() {
            if self.is_row_full(y) && rows.try_push(y).is_err() {
                break;
            }
        }
        rows
    }

    /// Remove row `y` and append an empty row at the top
    pub fn remove_row(&mut self, y: usize) {
        if y >= self.rows() {
            return;
        }
        let width = self.columns as usize;
        let start = (y + 1) * width;
        let len = self.cells.len();
        self.cells.copy_within(start..len, y * width);
        self.cells[len - width..].fill(None);
    }

    /// Remove the given rows (any order)
    pub fn remove_rows(&mut self, rows: &[usize]) {
        let mut sorted: ArrayVec<usize, 4> = rows.iter().copied().take(4).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        for y in sorted {
            self.remove_row(y);
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
