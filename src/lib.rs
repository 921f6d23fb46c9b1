//! **labyrinth** generates, solves and draws perfect mazes on rectangular grids.
//!
//! A `Maze` stores which orthogonally adjacent cells have a passage between them. The
//! `generators` turn a fully walled grid into a spanning tree, the solvers in `pathing` find
//! routes through it and `displays` draw it as box drawing text.

pub mod cells;
pub mod displays;
pub mod errors;
pub mod generators;
pub mod maze;
pub mod pathing;
pub mod units;
pub mod utils;
