// population.rs - The simulation state: one grid plus its bookkeeping

use std::fmt;

use rand::Rng;

use crate::{Grid, LifeError, Pattern};

/// A Game of Life universe.
///
/// A population starts unseeded and all dead. It has to be seeded (randomly,
/// from an explicit grid, or from a pattern) before it can be advanced or
/// read; the alive count and generation always describe the grid it holds.
pub struct Population {
    cells: Grid,
    alive: usize,
    generation: u64,
    seeded: bool,
}

/// The grid, generation and live-cell count of one generation, captured
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub cells: Grid,
    pub generation: u64,
    pub alive: usize,
}

impl Population {
    /// An empty, unseeded population on a `size` x `size` torus.
    pub fn new(size: usize) -> Result<Self, LifeError> {
        Ok(Self {
            cells: Grid::new(size)?,
            alive: 0,
            generation: 0,
            seeded: false,
        })
    }

    /// A seeded population at generation 0 holding exactly `grid`.
    pub fn from_grid(grid: Grid) -> Self {
        let alive = grid.alive_count();
        Self { cells: grid, alive, generation: 0, seeded: true }
    }

    /// A seeded population with `pattern` placed in the middle of the grid.
    pub fn from_pattern(size: usize, pattern: &Pattern) -> Result<Self, LifeError> {
        let mut grid = Grid::new(size)?;
        let row = (size / 2).saturating_sub(pattern.height() / 2);
        let col = (size / 2).saturating_sub(pattern.width() / 2);
        pattern.place(&mut grid, row, col);
        Ok(Self::from_grid(grid))
    }

    pub fn size(&self) -> usize {
        self.cells.size()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alive_count(&self) -> usize {
        self.alive
    }

    /// Fill the grid at random, each cell alive with probability 1/2, and
    /// restart at generation 0.
    pub fn seed(&mut self) {
        self.seed_with(&mut rand::thread_rng());
    }

    /// Like [`seed`](Self::seed) but drawing from `rng`, so tests can pin the
    /// starting grid.
    pub fn seed_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.size();
        for row in 0..size {
            for col in 0..size {
                self.cells.set(row, col, rng.gen_bool(0.5));
            }
        }
        self.alive = self.cells.alive_count();
        self.generation = 0;
        self.seeded = true;
    }

    /// Replace the grid with the next generation.
    pub fn advance(&mut self) -> Result<(), LifeError> {
        self.ensure_seeded()?;
        self.cells = self.cells.step();
        self.alive = self.cells.alive_count();
        self.generation += 1;
        Ok(())
    }

    /// A copy of the current grid that shares nothing with the population.
    pub fn snapshot(&self) -> Result<Grid, LifeError> {
        self.ensure_seeded()?;
        Ok(self.cells.clone())
    }

    pub fn frame(&self) -> Result<Frame, LifeError> {
        Ok(Frame {
            cells: self.snapshot()?,
            generation: self.generation,
            alive: self.alive,
        })
    }

    fn ensure_seeded(&self) -> Result<(), LifeError> {
        if self.seeded { Ok(()) } else { Err(LifeError::Unseeded) }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation #{}", self.generation)?;
        writeln!(f, "Alive: {}", self.alive)?;
        for row in self.cells.rows() {
            let line: String = row.iter().map(|&alive| if alive { 'O' } else { ' ' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
