//! Core engine of a hexagonal XOR-chain puzzle.
//!
//! The player walks a cursor across an unbounded hex grid of numeric
//! targets, building a chain whose values XOR to all zeros or all ones.
//! `engine` holds the grid, the solution generator and the session state
//! machine; `modes` holds difficulty definitions, configuration and save data.

pub mod engine;
pub mod modes;

pub use engine::hex::{Coord, Direction};
pub use engine::session::{MoveOutcome, Session};
pub use modes::GameMode;
