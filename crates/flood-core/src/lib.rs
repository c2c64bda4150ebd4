//! Core engine for the flood puzzle.
//!
//! A board is a rectangle of colored cells with a fixed pivot at its
//! center. Each move recolors the pivot's connected region; the puzzle is
//! solved when the whole board is one color. This crate owns the board
//! model, the flood fill, the greedy solver used for hints and challenge
//! budgets, and the flat-text save codec. Game modes, terminals, and files
//! are the interface crate's business.

mod grid;
mod rng;
mod serial;
mod solver;

pub use grid::{Color, Grid, GridError, MAX_COLORS, MAX_DIMENSION};
pub use serial::{export, import, Progress, SaveData};
