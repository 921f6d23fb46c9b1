use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::cells::{Cell, Direction};
use crate::errors::*;
use crate::maze::Maze;
use crate::utils::{self, FnvHashMap};

// Wall follower scan order. Starting out facing south, the right hand touches the west wall.
const RIGHT_HAND_ORDER: [Direction; 4] = [Direction::West,
                                          Direction::South,
                                          Direction::East,
                                          Direction::North];

/// Every cell seen by a search, mapped to the cell it was first reached from.
type Predecessors = FnvHashMap<Cell, Option<Cell>>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Solver {
    DepthFirst,
    BreadthFirst,
    RightHandRule,
}

impl Solver {
    pub const ALL: [Solver; 3] = [Solver::DepthFirst, Solver::BreadthFirst, Solver::RightHandRule];

    pub fn name(self) -> &'static str {
        match self {
            Solver::DepthFirst => "dfs",
            Solver::BreadthFirst => "bfs",
            Solver::RightHandRule => "rhr",
        }
    }
}

impl FromStr for Solver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Solver> {
        Solver::ALL
            .iter()
            .cloned()
            .find(|solver| solver.name() == s)
            .ok_or_else(|| ErrorKind::UnknownSolver(s.to_owned()).into())
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// The only difference between the depth and breadth first searches is the order in which
// cells waiting to be explored come back out.
trait Frontier {
    fn starting_at(cell: Cell) -> Self;
    fn add(&mut self, cell: Cell);
    fn take(&mut self) -> Option<Cell>;
}

impl Frontier for Vec<Cell> {
    fn starting_at(cell: Cell) -> Self {
        vec![cell]
    }
    fn add(&mut self, cell: Cell) {
        self.push(cell);
    }
    fn take(&mut self) -> Option<Cell> {
        self.pop()
    }
}

impl Frontier for VecDeque<Cell> {
    fn starting_at(cell: Cell) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(cell);
        queue
    }
    fn add(&mut self, cell: Cell) {
        self.push_back(cell);
    }
    fn take(&mut self) -> Option<Cell> {
        self.pop_front()
    }
}

impl Maze {
    /// Path from `start` to `goal`, found with a depth first search.
    ///
    /// Paths never include `start` and always end with `goal`, so the path from a cell to
    /// itself is empty. Not necessarily the shortest path when the maze has loops.
    pub fn solve_dfs(&self, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
        self.search::<Vec<Cell>>(start, goal)
    }

    /// Shortest path from `start` to `goal`, found with a breadth first search.
    pub fn solve_bfs(&self, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
        self.search::<VecDeque<Cell>>(start, goal)
    }

    /// Walk from `start` to `goal` keeping a hand on the right wall.
    ///
    /// At each step the directions are scanned clockwise from the current right hand side and
    /// the first open, not yet visited, neighbour is entered. The orientation turns by as many
    /// directions as were skipped. With nowhere new to go the walker steps back to the cell it
    /// came from. The returned trail holds every step taken, back steps included.
    pub fn solve_rhr(&self, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
        self.check_bounds(start)?;
        self.check_bounds(goal)?;

        let mut predecessors: Predecessors = utils::fnv_hashmap(self.size());
        predecessors.insert(start, None);
        let mut trail = vec![];
        let mut orientation = 0;
        let mut current = start;

        while current != goal {
            let ahead = (0..RIGHT_HAND_ORDER.len()).find_map(|turn| {
                let dir = RIGHT_HAND_ORDER[(orientation + turn) % RIGHT_HAND_ORDER.len()];
                self.neighbour_at_direction(current, dir)
                    .filter(|&neighbour| {
                        self.is_linked(current, neighbour) &&
                        !predecessors.contains_key(&neighbour)
                    })
                    .map(|neighbour| (turn, neighbour))
            });

            let next = match ahead {
                Some((turn, neighbour)) => {
                    orientation = (orientation + turn) % RIGHT_HAND_ORDER.len();
                    predecessors.insert(neighbour, Some(current));
                    neighbour
                }
                None => {
                    match predecessors.get(&current) {
                        Some(&Some(previous)) => previous,
                        _ => {
                            debug!(%start, %goal, steps = trail.len(), "wall follower exhausted the maze");
                            return Err(ErrorKind::NoPathFound(start, goal).into());
                        }
                    }
                }
            };

            trail.push(next);
            current = next;
        }

        Ok(trail)
    }

    pub fn solve(&self, solver: Solver, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
        match solver {
            Solver::DepthFirst => self.solve_dfs(start, goal),
            Solver::BreadthFirst => self.solve_bfs(start, goal),
            Solver::RightHandRule => self.solve_rhr(start, goal),
        }
    }

    /// Steps along the depth first path between two cells.
    ///
    /// Only the shortest distance on perfect mazes, where there is a single path. See
    /// `distance_shortest` for mazes with loops.
    pub fn distance_geo(&self, a: Cell, b: Cell) -> Result<usize> {
        self.solve_dfs(a, b).map(|path| path.len())
    }

    /// Steps along the shortest path between two cells.
    pub fn distance_shortest(&self, a: Cell, b: Cell) -> Result<usize> {
        self.solve_bfs(a, b).map(|path| path.len())
    }

    /// Steps between two cells if there were no walls at all. A lower bound on both
    /// `distance_geo` and `distance_shortest`.
    pub fn distance_man(&self, a: Cell, b: Cell) -> Result<usize> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        Ok(a.manhattan_distance(b))
    }

    fn search<F: Frontier>(&self, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
        self.check_bounds(start)?;
        self.check_bounds(goal)?;

        let mut predecessors: Predecessors = utils::fnv_hashmap(self.size());
        predecessors.insert(start, None);
        let mut frontier = F::starting_at(start);

        while let Some(cell) = frontier.take() {
            if cell == goal {
                return reconstruct_path(&predecessors, start, goal);
            }

            for &neighbour in self.links(cell).iter() {
                if !predecessors.contains_key(&neighbour) {
                    predecessors.insert(neighbour, Some(cell));
                    frontier.add(neighbour);
                }
            }
        }

        debug!(%start, %goal, explored = predecessors.len(), "goal unreachable");
        Err(ErrorKind::NoPathFound(start, goal).into())
    }
}

fn reconstruct_path(predecessors: &Predecessors, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
    let mut path = vec![];
    let mut current = goal;

    while current != start {
        path.push(current);
        current = match predecessors.get(&current) {
            Some(&Some(previous)) => previous,
            // Broken predecessor chain, the goal was never really reached.
            _ => return Err(ErrorKind::NoPathFound(start, goal).into()),
        };
    }

    path.reverse();
    Ok(path)
}
