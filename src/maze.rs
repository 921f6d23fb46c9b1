use std::fmt;

use bit_set::BitSet;
use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cell, Direction};
use crate::errors::*;
use crate::units::{ColumnIndex, Height, RowIndex, Width};

pub type CellSmallVec = SmallVec<[Cell; 4]>;

// Every wall is reported once, from the cell to its west or north.
static CANONICAL_DIRECTIONS: [Direction; 2] = [Direction::East, Direction::South];

const PASSAGE_BITS_PER_CELL: usize = 4;

/// Initial wall layout of a new maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridMode {
    /// Every wall present, no passages.
    Full,
    /// Every orthogonal passage open, no interior walls.
    Empty,
}

impl Default for GridMode {
    fn default() -> Self {
        GridMode::Full
    }
}

/// A rectangular grid of cells where each orthogonal pair of cells is either separated by a
/// wall or joined by a passage.
///
/// Passages are held as 4 bits per cell, one per direction. Opening or closing a passage
/// always writes the bits of both cells so that `b` is reachable from `a` exactly when `a` is
/// reachable from `b`.
#[derive(Clone, PartialEq, Eq)]
pub struct Maze {
    height: usize,
    width: usize,
    passages: BitSet,
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Maze :: height: {:?}, width: {:?}, passages: {:?}",
               self.height, self.width, self.passages_count())
    }
}

impl Maze {
    pub fn new(height: Height, width: Width, mode: GridMode) -> Maze {
        let (Height(h), Width(w)) = (height, width);
        let mut maze = Maze {
            height: h,
            width: w,
            passages: BitSet::with_capacity(h * w * PASSAGE_BITS_PER_CELL),
        };
        if mode == GridMode::Empty {
            maze.reset_empty();
        }
        maze
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells in the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.height * self.width
    }

    /// Is the cell within the grid's dimensions?
    #[inline]
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        (cell.row as usize) < self.height && (cell.col as usize) < self.width
    }

    /// Convert a cell to a one dimensional index in the range 0..maze.size().
    /// Returns None if the cell is outside the grid.
    #[inline]
    pub fn cell_to_index(&self, cell: Cell) -> Option<usize> {
        if self.is_valid_cell(cell) {
            Some(self.row_major_index(cell))
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_cell(&self, index: usize) -> Option<Cell> {
        if index < self.size() {
            Some(Cell::from_row_major_index(index, Width(self.width)))
        } else {
            None
        }
    }

    /// Close the passage between two cells, if there is one.
    pub fn add_wall(&mut self, a: Cell, b: Cell) -> Result<()> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;

        // Cells that are not orthogonal neighbours can never share a passage.
        if let Some(dir) = a.direction_to(b) {
            self.set_passage(a, b, dir, false);
        }
        Ok(())
    }

    /// Open a passage between two orthogonally adjacent cells.
    pub fn remove_wall(&mut self, a: Cell, b: Cell) -> Result<()> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;

        let dir = a.direction_to(b).ok_or(ErrorKind::NotAdjacent(a, b))?;
        self.set_passage(a, b, dir, true);
        Ok(())
    }

    /// Wall off every cell from every other cell.
    pub fn fill(&mut self) {
        self.passages.clear();
    }

    /// Open every passage on the grid.
    pub fn reset_empty(&mut self) {
        self.passages.clear();
        let pairs = self.iter_canonical_pairs().collect::<Vec<_>>();
        for (cell, neighbour) in pairs {
            if let Some(dir) = cell.direction_to(neighbour) {
                self.set_passage(cell, neighbour, dir, true);
            }
        }
    }

    /// Cells that are to the North, South, West or East of a cell, but not necessarily linked
    /// by a passage.
    pub fn contiguous_cells(&self, cell: Cell) -> Result<CellSmallVec> {
        self.check_bounds(cell)?;
        Ok(self.neighbours(cell))
    }

    /// Contiguous cells that can be entered from `cell` without crossing a wall.
    pub fn reachable_cells(&self, cell: Cell) -> Result<CellSmallVec> {
        self.check_bounds(cell)?;
        Ok(self.links(cell))
    }

    /// Are two cells joined by a passage?
    pub fn is_linked(&self, a: Cell, b: Cell) -> bool {
        if !self.is_valid_cell(a) || !self.is_valid_cell(b) {
            return false;
        }
        a.direction_to(b)
            .map_or(false, |dir| self.has_passage(a, dir))
    }

    pub fn neighbour_at_direction(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        cell.offset(direction)
            .filter(|&neighbour| self.is_valid_cell(neighbour))
    }

    pub fn is_neighbour_linked(&self, cell: Cell, direction: Direction) -> bool {
        self.is_valid_cell(cell) &&
        self.neighbour_at_direction(cell, direction).is_some() &&
        self.has_passage(cell, direction)
    }

    /// Every wall segment as a pair of cells, the second strictly east or strictly south of
    /// the first. Row-major order, east before south.
    pub fn walls(&self) -> Vec<(Cell, Cell)> {
        self.iter_walls().collect()
    }

    pub fn iter_walls(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.iter_canonical_pairs()
            .filter(move |&(cell, neighbour)| !self.is_linked(cell, neighbour))
    }

    /// Every open passage once, in the same orientation and order as `walls`.
    pub fn iter_passages(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.iter_canonical_pairs()
            .filter(move |&(cell, neighbour)| self.is_linked(cell, neighbour))
    }

    /// Number of open passages (undirected edges).
    #[inline]
    pub fn passages_count(&self) -> usize {
        // Each passage is stored once per endpoint.
        self.passages.len() / 2
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        if self.size() == 0 {
            return None;
        }
        let index = rng.gen_range(0..self.size());
        self.index_to_cell(index)
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: self.size(),
            width: self.width,
        }
    }

    pub fn iter_row(&self) -> RowIter {
        RowIter {
            current_row: 0,
            rows_count: self.height,
            width: self.width,
        }
    }

    /// The first pair of cells whose passage bits disagree, if any.
    ///
    /// A passage recorded on only one side, or pointing off the grid, is corrupt.
    pub fn first_incoherence(&self) -> Option<(Cell, Cell)> {
        for cell in self.iter() {
            for &dir in Direction::ALL.iter() {
                if !self.has_passage(cell, dir) {
                    continue;
                }
                match self.neighbour_at_direction(cell, dir) {
                    Some(neighbour) if self.has_passage(neighbour, dir.opposite()) => {}
                    Some(neighbour) => return Some((cell, neighbour)),
                    None => return Some((cell, cell.offset(dir).unwrap_or(cell))),
                }
            }
        }
        None
    }

    /// Human readable report of the grid's dimensions, each cell's open neighbours and
    /// whether the passages are coherent.
    pub fn info(&self) -> String {
        let mut txt = String::from("**Maze information**\n");
        txt.push_str(&format!("- Grid dimensions: {} x {}\n", self.height, self.width));
        txt.push_str("- Neighbours:\n");
        for cell in self.iter() {
            let links = self.links(cell).iter().join(", ");
            txt.push_str(&format!("  {}: [{}]\n", cell, links));
        }
        match self.first_incoherence() {
            None => txt.push_str("- Coherent structure\n"),
            Some((a, b)) => txt.push_str(&format!("- Incoherent structure: {} X {}\n", a, b)),
        }
        txt
    }

    /// The passages as a petgraph undirected graph. Node `i` is the cell with row-major
    /// index `i`.
    pub fn as_graph(&self) -> UnGraph<Cell, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.passages_count());
        for cell in self.iter() {
            let _ = graph.add_node(cell);
        }
        for (a, b) in self.iter_passages() {
            if let (Some(a_index), Some(b_index)) = (self.cell_to_index(a), self.cell_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }

    /// Unchecked in-grid neighbours, in `Direction::ALL` order.
    pub(crate) fn neighbours(&self, cell: Cell) -> CellSmallVec {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(cell, dir))
            .collect()
    }

    /// Unchecked open neighbours, in `Direction::ALL` order.
    pub(crate) fn links(&self, cell: Cell) -> CellSmallVec {
        Direction::ALL
            .iter()
            .filter(|&&dir| self.has_passage(cell, dir))
            .filter_map(|&dir| self.neighbour_at_direction(cell, dir))
            .collect()
    }

    /// Open the passage between two in-grid orthogonal neighbours. Anything else is ignored.
    pub(crate) fn link(&mut self, a: Cell, b: Cell) {
        debug_assert!(self.is_valid_cell(a) && self.is_valid_cell(b));
        if let Some(dir) = a.direction_to(b) {
            if self.is_valid_cell(a) && self.is_valid_cell(b) {
                self.set_passage(a, b, dir, true);
            }
        }
    }

    /// Row-major index of a cell already known to be inside the grid.
    #[inline]
    pub(crate) fn row_major_index(&self, cell: Cell) -> usize {
        cell.row as usize * self.width + cell.col as usize
    }

    pub(crate) fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.is_valid_cell(cell) {
            Ok(())
        } else {
            Err(ErrorKind::OutOfBounds(cell, self.height, self.width).into())
        }
    }

    fn iter_canonical_pairs(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.iter().flat_map(move |cell| {
            CANONICAL_DIRECTIONS
                .iter()
                .filter_map(move |&dir| {
                    self.neighbour_at_direction(cell, dir).map(|neighbour| (cell, neighbour))
                })
        })
    }

    #[inline]
    fn passage_bit(&self, cell: Cell, direction: Direction) -> usize {
        self.row_major_index(cell) * PASSAGE_BITS_PER_CELL + direction.bit()
    }

    #[inline]
    fn has_passage(&self, cell: Cell, direction: Direction) -> bool {
        self.passages.contains(self.passage_bit(cell, direction))
    }

    // Both cells must be valid and `b` must be the neighbour of `a` in `direction`.
    fn set_passage(&mut self, a: Cell, b: Cell, direction: Direction, open: bool) {
        let a_bit = self.passage_bit(a, direction);
        let b_bit = self.passage_bit(b, direction.opposite());
        if open {
            self.passages.insert(a_bit);
            self.passages.insert(b_bit);
        } else {
            self.passages.remove(a_bit);
            self.passages.remove(b_bit);
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    width: usize,
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cell;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let cell = Cell::from_row_major_index(self.current_cell_number, Width(self.width));
            self.current_cell_number += 1;
            Some(cell)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    rows_count: usize,
    width: usize,
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<Cell>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row < self.rows_count {
            let row = self.current_row;
            let cells = (0..self.width)
                .map(|col| Cell::from_row_column_indices(RowIndex(row), ColumnIndex(col)))
                .collect();
            self.current_row += 1;
            Some(cells)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows_count - self.current_row;
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a Maze {
    type Item = Cell;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
