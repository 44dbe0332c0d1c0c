// lib.rs - Conway's Game of Life on a toroidal grid
//
// The engine (grid + population) is plain synchronous code; the simulation
// module drives it from a tokio task and hands out consistent frames to
// whoever renders them.

pub mod error;
pub mod grid;
pub mod patterns;
pub mod population;
pub mod simulation;

pub use error::LifeError;
pub use grid::{Grid, DEFAULT_GRID_SIZE};
pub use patterns::{Pattern, PATTERNS};
pub use population::{Frame, Population};
pub use simulation::{Controls, Seeding, SharedPopulation, Simulation, Speed};
