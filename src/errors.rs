// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get at everything `error_chain!` creates.
use error_chain::error_chain;

use crate::cells::Cell;

error_chain! {
    errors {
        OutOfBounds(cell: Cell, height: usize, width: usize) {
            description("cell outside of the maze grid")
            display("cell {} lies outside of the {}x{} maze grid", cell, height, width)
        }
        NotAdjacent(a: Cell, b: Cell) {
            description("cells are not orthogonal neighbours")
            display("cells {} and {} are not orthogonal neighbours", a, b)
        }
        NoPathFound(start: Cell, goal: Cell) {
            description("goal cell unreachable")
            display("no path from {} to {}", start, goal)
        }
        UnknownAlgorithm(name: String) {
            description("unknown maze generation algorithm")
            display("unknown maze generation algorithm '{}'", name)
        }
        UnknownSolver(name: String) {
            description("unknown maze solver")
            display("unknown maze solver '{}'", name)
        }
    }
}
