// grid.rs - Square toroidal grid for Conway's Game of Life

use std::ops::Index;

use crate::LifeError;

// Default grid size (60x60 playing area)
pub const DEFAULT_GRID_SIZE: usize = 60;

// Moore neighbourhood offsets as (row, col)
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Wrap a possibly out-of-range coordinate onto a torus of `size` cells.
///
/// -1 becomes `size - 1` and `size` becomes 0; anything already in range is
/// returned unchanged. Offsets further out wrap as well.
#[inline]
pub fn wrap(index: isize, size: usize) -> usize {
    index.rem_euclid(size as isize) as usize
}

/// Conway's rule (B3/S23) for one cell.
#[inline]
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    match (alive, neighbours) {
        (true, 2) | (true, 3) => true,   // Survival
        (false, 3)            => true,   // Birth
        _                     => false,  // Death or stays dead
    }
}

/// An N×N matrix of cells stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-dead grid of `size` x `size` cells.
    pub fn new(size: usize) -> Result<Self, LifeError> {
        if size == 0 {
            return Err(LifeError::InvalidSize);
        }
        Ok(Self { size, cells: vec![false; size * size] })
    }

    /// Build a grid from rows. Every row must be as long as there are rows.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, LifeError> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return Err(LifeError::InvalidSize);
        }
        Ok(Self { size, cells: rows.concat() })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.offset(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let offset = self.offset(row, col);
        self.cells[offset] = alive;
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks_exact(self.size)
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }

    /// Live cells among the 8 neighbours of `(row, col)`, with the left/right
    /// and top/bottom edges joined.
    pub fn live_neighbours(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for &(dr, dc) in &NEIGHBOUR_OFFSETS {
            let nr = wrap(row as isize + dr, self.size);
            let nc = wrap(col as isize + dc, self.size);
            if self.get(nr, nc) { count += 1; }
        }
        count
    }

    /// The next generation. Every count is taken from `self`, which is left
    /// untouched.
    pub fn step(&self) -> Grid {
        let mut next = vec![false; self.cells.len()];
        for row in 0..self.size {
            for col in 0..self.size {
                next[row * self.size + col] =
                    next_state(self.get(row, col), self.live_neighbours(row, col));
            }
        }
        Grid { size: self.size, cells: next }
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) is outside a {0}x{0} grid",
            self.size
        );
        row * self.size + col
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = bool;

    fn index(&self, (row, col): (usize, usize)) -> &bool {
        &self.cells[self.offset(row, col)]
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {}x{}", self.size, self.size)?;
        for row in self.rows() {
            let line: String = row.iter().map(|&alive| if alive { 'O' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
