use std::fmt;

use crate::units::{ColumnIndex, RowIndex, Width};

/// A cell position on the maze grid. Rows grow southwards, columns eastwards.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// The order in which contiguous cells are reported: north, south, west, east.
    pub const ALL: [Direction; 4] = [Direction::North,
                                     Direction::South,
                                     Direction::West,
                                     Direction::East];

    /// Bit position of this direction inside a cell's 4 passage bits.
    #[inline]
    pub fn bit(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Cell {
        Cell { row, col }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> Cell {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        Cell::new(row as u32, col as u32)
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> Cell {
        let Width(w) = width;
        Cell::new((index / w) as u32, (index % w) as u32)
    }

    /// Creates a new `Cell` offset 1 cell away in the given direction.
    /// Returns None if the offset would need a negative coordinate. The result is not checked
    /// against any grid's dimensions.
    pub fn offset(self, dir: Direction) -> Option<Cell> {
        let (row, col) = (self.row, self.col);
        match dir {
            Direction::North => row.checked_sub(1).map(|r| Cell::new(r, col)),
            Direction::South => row.checked_add(1).map(|r| Cell::new(r, col)),
            Direction::East => col.checked_add(1).map(|c| Cell::new(row, c)),
            Direction::West => col.checked_sub(1).map(|c| Cell::new(row, c)),
        }
    }

    /// The direction to take from this cell to reach an orthogonally adjacent cell.
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .iter()
            .cloned()
            .find(|&dir| self.offset(dir) == Some(other))
    }

    /// Steps between two cells on an open grid, ignoring walls.
    #[inline]
    pub fn manhattan_distance(self, other: Cell) -> usize {
        let row_steps = (i64::from(self.row) - i64::from(other.row)).abs();
        let col_steps = (i64::from(self.col) - i64::from(other.col)).abs();
        (row_steps + col_steps) as usize
    }
}

impl From<(u32, u32)> for Cell {
    fn from(row_col_pair: (u32, u32)) -> Cell {
        Cell::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
