use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument, trace};

use crate::cells::{Cell, Direction};
use crate::errors::*;
use crate::maze::{CellSmallVec, GridMode, Maze};
use crate::units::{Height, Width};
use crate::utils;

/// The maze generation algorithms on offer, for callers that pick one at runtime.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Algorithm {
    BinaryTree,
    Sidewinder,
    Fusion,
    Exploration,
    Wilson,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [Algorithm::BinaryTree,
                                     Algorithm::Sidewinder,
                                     Algorithm::Fusion,
                                     Algorithm::Exploration,
                                     Algorithm::Wilson];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BinaryTree => "btree",
            Algorithm::Sidewinder => "sidewinder",
            Algorithm::Fusion => "fusion",
            Algorithm::Exploration => "exploration",
            Algorithm::Wilson => "wilson",
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, height: Height, width: Width, rng: &mut R) -> Maze {
        match self {
            Algorithm::BinaryTree => binary_tree(height, width, rng),
            Algorithm::Sidewinder => sidewinder(height, width, rng),
            Algorithm::Fusion => fusion(height, width, rng),
            Algorithm::Exploration => exploration(height, width, rng),
            Algorithm::Wilson => wilson(height, width, rng),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Algorithm> {
        Algorithm::ALL
            .iter()
            .cloned()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| ErrorKind::UnknownAlgorithm(s.to_owned()).into())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Apply the binary tree maze generation algorithm to a full grid.
/// Every cell carves a passage either east or south, picked by a coin flip when both exist.
/// Cells on the last row can only go east and cells on the last column can only go south, so
/// those two edges end up as long unbroken corridors. The south east corner carves nothing.
#[instrument(level = "debug", skip(rng))]
pub fn binary_tree<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Maze {
    let mut maze = Maze::new(height, width, GridMode::Full);

    for cell in maze.iter() {
        let neighbours = [Direction::East, Direction::South]
            .iter()
            .filter_map(|&dir| maze.neighbour_at_direction(cell, dir))
            .collect::<CellSmallVec>();

        if let Some(&link_cell) = neighbours.choose(rng) {
            maze.link(cell, link_cell);
        }
    }

    debug!(passages = maze.passages_count(), "binary tree maze generated");
    maze
}

/// Apply the sidewinder maze generation algorithm to a full grid.
/// Each row, except the last, is visited west to east while collecting a run of cells. A coin
/// flip either carves east, extending the run, or closes the run out by carving south from a
/// random member of it. The last cell of a row always closes out its run.
/// The last row has no south neighbours, so it becomes one corridor joining every run.
#[instrument(level = "debug", skip(rng))]
pub fn sidewinder<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Maze {
    let mut maze = Maze::new(height, width, GridMode::Full);
    let rows_count = maze.height();
    if maze.size() == 0 {
        return maze;
    }

    for row_cells in maze.iter_row().take(rows_count - 1) {
        let mut run = vec![];

        if let Some((&last_cell, run_cells)) = row_cells.split_last() {
            for &cell in run_cells {
                run.push(cell);

                let carve_east = rng.gen::<bool>(); // coin flip
                if carve_east {
                    if let Some(east) = maze.neighbour_at_direction(cell, Direction::East) {
                        maze.link(cell, east);
                    }
                } else {
                    close_out_run(&mut maze, &mut run, rng);
                }
            }

            run.push(last_cell);
            close_out_run(&mut maze, &mut run, rng);
        }
    }

    if let Some(last_row) = maze.iter_row().last() {
        for (&west, &east) in last_row.iter().tuple_windows() {
            maze.link(west, east);
        }
    }

    debug!(passages = maze.passages_count(), "sidewinder maze generated");
    maze
}

fn close_out_run<R: Rng + ?Sized>(maze: &mut Maze, run: &mut Vec<Cell>, rng: &mut R) {
    if let Some(&run_member) = run.choose(rng) {
        if let Some(south) = maze.neighbour_at_direction(run_member, Direction::South) {
            maze.link(run_member, south);
        }
    }
    run.clear();
}

/// Apply the fusion (randomised Kruskal) maze generation algorithm to a full grid.
/// Every cell starts with its own label. Walls are visited in a shuffled order and a wall
/// comes down only when the cells either side of it carry different labels, after which the
/// second cell's label is merged into the first's across the whole grid.
#[instrument(level = "debug", skip(rng))]
pub fn fusion<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Maze {
    let mut maze = Maze::new(height, width, GridMode::Full);
    let mut labels = (0..maze.size()).collect::<Vec<usize>>();
    let required_merges = maze.size().saturating_sub(1);
    let mut merges = 0;

    let mut walls = maze.walls();
    walls.shuffle(rng);

    for (a, b) in walls {
        if merges == required_merges {
            break;
        }

        let new_label = labels[maze.row_major_index(a)];
        let old_label = labels[maze.row_major_index(b)];
        if new_label != old_label {
            maze.link(a, b);
            for label in labels.iter_mut().filter(|label| **label == old_label) {
                *label = new_label;
            }
            merges += 1;
        }
    }

    debug!(passages = maze.passages_count(), "fusion maze generated");
    maze
}

/// Apply the exploration (randomised depth first, recursive backtracker) maze generation
/// algorithm to a full grid.
/// Starting from a random cell, keep carving into a random unvisited neighbour of the cell on
/// top of the stack, backtracking whenever the top cell has no unvisited neighbours left.
#[instrument(level = "debug", skip(rng))]
pub fn exploration<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Maze {
    let mut maze = Maze::new(height, width, GridMode::Full);
    let start = match maze.random_cell(rng) {
        Some(cell) => cell,
        None => return maze,
    };

    let mut visited = BitSet::with_capacity(maze.size());
    visited.insert(maze.row_major_index(start));
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let unvisited_neighbours = maze.neighbours(current)
            .into_iter()
            .filter(|&neighbour| !visited.contains(maze.row_major_index(neighbour)))
            .collect::<CellSmallVec>();

        match unvisited_neighbours.choose(rng) {
            Some(&next) => {
                maze.link(current, next);
                visited.insert(maze.row_major_index(next));
                stack.push(next);
            }
            None => {
                let _ = stack.pop();
            }
        }
    }

    debug!(passages = maze.passages_count(), "exploration maze generated");
    maze
}

/// Apply Wilson's maze generation algorithm to a full grid.
/// One random cell seeds the maze. Then, while cells remain outside the maze, a loop-erased
/// random walk from a random outside cell runs until it touches the maze, and the walk is
/// carved in. Every spanning tree of the grid is equally likely to come out.
#[instrument(level = "debug", skip(rng))]
pub fn wilson<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Maze {
    let mut maze = Maze::new(height, width, GridMode::Full);
    let first = match maze.random_cell(rng) {
        Some(cell) => cell,
        None => return maze,
    };

    let mut in_maze = BitSet::with_capacity(maze.size());
    in_maze.insert(maze.row_major_index(first));
    let mut unvisited = maze.iter().filter(|&cell| cell != first).collect::<Vec<Cell>>();

    while let Some(&walk_start) = unvisited.choose(rng) {
        let walk = loop_erased_walk(&maze, walk_start, &in_maze, rng);

        for (&a, &b) in walk.iter().tuple_windows() {
            maze.link(a, b);
        }
        // The final cell of a walk is already part of the maze.
        for &cell in &walk[..walk.len() - 1] {
            in_maze.insert(maze.row_major_index(cell));
        }
        unvisited.retain(|&cell| !in_maze.contains(maze.row_major_index(cell)));
    }

    debug!(passages = maze.passages_count(), "wilson maze generated");
    maze
}

/// Random walk over contiguous cells, ignoring walls, from `start` until a cell of `in_maze` is
/// reached. Whenever the walk crosses itself the loop just made is erased.
fn loop_erased_walk<R: Rng + ?Sized>(maze: &Maze,
                                     start: Cell,
                                     in_maze: &BitSet,
                                     rng: &mut R)
                                     -> Vec<Cell> {
    let mut walk = vec![start];
    let mut walk_positions = utils::fnv_hashmap(maze.size());
    walk_positions.insert(start, 0);
    let mut current = start;

    while !in_maze.contains(maze.row_major_index(current)) {
        let next = match maze.neighbours(current).choose(rng) {
            Some(&cell) => cell,
            None => break,
        };

        if let Some(&loop_start) = walk_positions.get(&next) {
            for erased in walk.drain(loop_start + 1..) {
                let _ = walk_positions.remove(&erased);
            }
            trace!(at = %next, walk_length = walk.len(), "loop erased");
        } else {
            walk_positions.insert(next, walk.len());
            walk.push(next);
        }
        current = next;
    }

    walk
}

#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::quickcheck;

    use super::*;
    use crate::utils::seeded_rng;

    fn is_perfect(maze: &Maze) -> bool {
        let graph = maze.as_graph();
        maze.passages_count() == maze.size() - 1 &&
        connected_components(&graph) == 1 &&
        !is_cyclic_undirected(&graph) &&
        maze.first_incoherence().is_none()
    }

    fn gc(row: u32, col: u32) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn every_algorithm_makes_perfect_mazes() {
        for &algorithm in Algorithm::ALL.iter() {
            for &(h, w) in &[(1, 1), (1, 7), (7, 1), (2, 2), (4, 4), (15, 15), (12, 25)] {
                for seed in 0..5 {
                    let mut rng = seeded_rng(seed);
                    let maze = algorithm.generate(Height(h), Width(w), &mut rng);
                    assert_eq!((maze.height(), maze.width()), (h, w));
                    assert!(is_perfect(&maze),
                            "{} on {}x{} with seed {} is not perfect",
                            algorithm, h, w, seed);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        for &algorithm in Algorithm::ALL.iter() {
            let a = algorithm.generate(Height(10), Width(8), &mut seeded_rng(99));
            let b = algorithm.generate(Height(10), Width(8), &mut seeded_rng(99));
            assert_eq!(a, b, "{} is not reproducible", algorithm);
        }
    }

    #[test]
    fn zero_sized_grids() {
        for &algorithm in Algorithm::ALL.iter() {
            let maze = algorithm.generate(Height(0), Width(4), &mut seeded_rng(1));
            assert_eq!(maze.size(), 0);
            assert_eq!(maze.passages_count(), 0);
        }
    }

    #[test]
    fn binary_tree_edges_are_corridors() {
        let maze = binary_tree(Height(4), Width(4), &mut seeded_rng(3));
        for col in 0..3 {
            assert!(maze.is_linked(gc(3, col), gc(3, col + 1)));
        }
        for row in 0..3 {
            assert!(maze.is_linked(gc(row, 3), gc(row + 1, 3)));
        }
        // Every cell but the south east corner carved east or south.
        for cell in maze.iter().filter(|&cell| cell != gc(3, 3)) {
            assert!(maze.is_neighbour_linked(cell, Direction::East) ||
                    maze.is_neighbour_linked(cell, Direction::South));
        }
    }

    #[test]
    fn sidewinder_last_row_is_open() {
        let maze = sidewinder(Height(6), Width(9), &mut seeded_rng(11));
        for col in 0..8 {
            assert!(maze.is_linked(gc(5, col), gc(5, col + 1)));
        }
        // Each run closes out south exactly once, so no row above the last is all wall below.
        for row in 0..5 {
            assert!((0..9).any(|col| maze.is_neighbour_linked(gc(row, col), Direction::South)));
        }
    }

    #[test]
    fn algorithm_names() {
        for &algorithm in Algorithm::ALL.iter() {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        match "kruskal".parse::<Algorithm>() {
            Err(Error(ErrorKind::UnknownAlgorithm(name), _)) => assert_eq!(name, "kruskal"),
            other => panic!("expected UnknownAlgorithm, got {:?}", other),
        }
    }

    #[test]
    fn loop_erased_walk_ends_in_maze() {
        let maze = Maze::new(Height(6), Width(6), GridMode::Full);
        let mut in_maze = BitSet::with_capacity(36);
        in_maze.insert(maze.row_major_index(gc(0, 0)));
        let mut rng = seeded_rng(5);
        for _ in 0..20 {
            let walk = loop_erased_walk(&maze, gc(5, 5), &in_maze, &mut rng);
            assert_eq!(walk.first(), Some(&gc(5, 5)));
            assert_eq!(walk.last(), Some(&gc(0, 0)));
            // No loops left and every step is to a contiguous cell.
            let distinct = walk.iter().collect::<crate::utils::FnvHashSet<_>>();
            assert_eq!(distinct.len(), walk.len());
            for (a, b) in walk.iter().tuple_windows() {
                assert_eq!(a.manhattan_distance(*b), 1);
            }
        }
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn p(h: u8, w: u8, seed: u64) -> bool {
            let (h, w) = (usize::from(h % 12) + 1, usize::from(w % 12) + 1);
            Algorithm::ALL.iter().all(|algorithm| {
                let maze = algorithm.generate(Height(h), Width(w), &mut seeded_rng(seed));
                is_perfect(&maze)
            })
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }
}
