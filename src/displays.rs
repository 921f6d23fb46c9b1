use std::fmt;

use crate::cells::Cell;
use crate::maze::Maze;
use crate::utils::{self, FnvHashMap, FnvHashSet};

const WALL_LR_3: &str = "━━━";
const OPEN_LR_3: &str = "   ";
const WALL_UD: char = '┃';
const OPEN_UD: char = ' ';
const WALL_RD: char = '┏';
const WALL_LRD: char = '┳';
const WALL_LD: char = '┓';
const WALL_RUD: char = '┣';
const WALL_LRUD: char = '╋';
const WALL_LUD: char = '┫';
const WALL_RU: char = '┗';
const WALL_LRU: char = '┻';
const WALL_LU: char = '┛';

/// Content shown inside the body of a cell when rendering a maze as text.
pub trait CellDisplay {
    /// The character to centre in the cell, `None` leaves the cell blank.
    fn render_cell_body(&self, cell: Cell) -> Option<char>;
}

impl<'a, T: CellDisplay + ?Sized> CellDisplay for &'a T {
    fn render_cell_body(&self, cell: Cell) -> Option<char> {
        (**self).render_cell_body(cell)
    }
}

impl CellDisplay for FnvHashMap<Cell, char> {
    fn render_cell_body(&self, cell: Cell) -> Option<char> {
        self.get(&cell).cloned()
    }
}

struct Blank;
impl CellDisplay for Blank {
    fn render_cell_body(&self, _: Cell) -> Option<char> {
        None
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_cells: FnvHashSet<Cell>,
    mark: char,
}
impl PathDisplay {
    pub fn new(path: &[Cell], mark: char) -> Self {
        let mut on_path_cells = utils::fnv_hashset(path.len());
        on_path_cells.extend(path.iter().cloned());
        PathDisplay { on_path_cells, mark }
    }
}
impl CellDisplay for PathDisplay {
    fn render_cell_body(&self, cell: Cell) -> Option<char> {
        if self.on_path_cells.contains(&cell) {
            Some(self.mark)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: Cell,
    end: Cell,
}
impl StartEndPointsDisplay {
    pub fn new(start: Cell, end: Cell) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl CellDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, cell: Cell) -> Option<char> {
        if cell == self.start {
            Some('S')
        } else if cell == self.end {
            Some('E')
        } else {
            None
        }
    }
}

/// Shows the `top` content wherever it has any, otherwise the `bottom` content.
#[derive(Debug)]
pub struct Layered<Top, Bottom> {
    top: Top,
    bottom: Bottom,
}
impl<Top: CellDisplay, Bottom: CellDisplay> Layered<Top, Bottom> {
    pub fn new(top: Top, bottom: Bottom) -> Self {
        Layered { top, bottom }
    }
}
impl<Top: CellDisplay, Bottom: CellDisplay> CellDisplay for Layered<Top, Bottom> {
    fn render_cell_body(&self, cell: Cell) -> Option<char> {
        self.top
            .render_cell_body(cell)
            .or_else(|| self.bottom.render_cell_body(cell))
    }
}

impl Maze {
    /// Box drawing text rendering with the given content shown in the cell bodies.
    ///
    /// Each cell is three characters wide. Every row of cell bodies is followed by a line
    /// drawing the walls to the south of it, and wall junctions are always drawn in full.
    /// A maze without cells renders as an empty string.
    pub fn overlay(&self, content: &dyn CellDisplay) -> String {
        if self.size() == 0 {
            return String::new();
        }
        let width = self.width();
        let mut output = String::with_capacity((2 * self.height() + 1) * (4 * width + 2) * 3);

        push_border(&mut output, width, WALL_RD, WALL_LRD, WALL_LD);

        let mut previous_row: Option<Vec<Cell>> = None;
        for row in self.iter_row() {
            if let Some(ref above) = previous_row {
                output.push(WALL_RUD);
                for (index, (&north, &south)) in above.iter().zip(row.iter()).enumerate() {
                    output.push_str(if self.is_linked(north, south) { OPEN_LR_3 } else { WALL_LR_3 });
                    output.push(if index + 1 == width { WALL_LUD } else { WALL_LRUD });
                }
                output.push('\n');
            }

            output.push(WALL_UD);
            for (index, &cell) in row.iter().enumerate() {
                output.push(' ');
                output.push(content.render_cell_body(cell).unwrap_or(' '));
                output.push(' ');
                let east_open = row.get(index + 1)
                    .map_or(false, |&east| self.is_linked(cell, east));
                output.push(if east_open { OPEN_UD } else { WALL_UD });
            }
            output.push('\n');

            previous_row = Some(row);
        }

        push_border(&mut output, width, WALL_RU, WALL_LRU, WALL_LU);
        output
    }

    pub fn overlay_map(&self, content: &FnvHashMap<Cell, char>) -> String {
        self.overlay(content)
    }
}

fn push_border(output: &mut String, width: usize, left: char, join: char, right: char) {
    output.push(left);
    for column in 0..width {
        output.push_str(WALL_LR_3);
        output.push(if column + 1 == width { right } else { join });
    }
    output.push('\n');
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.overlay(&Blank))
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;

    use super::*;
    use crate::generators::Algorithm;
    use crate::maze::GridMode;
    use crate::units::{Height, Width};
    use crate::utils::{fnv_hashmap, seeded_rng};

    fn gc(row: u32, col: u32) -> Cell {
        Cell::new(row, col)
    }

    fn corner_maze() -> Maze {
        let mut m = Maze::new(Height(2), Width(2), GridMode::Full);
        m.remove_wall(gc(0, 0), gc(0, 1)).unwrap();
        m.remove_wall(gc(0, 0), gc(1, 0)).unwrap();
        m
    }

    #[test]
    fn full_maze_render() {
        let m = Maze::new(Height(2), Width(3), GridMode::Full);
        let expected = "┏━━━┳━━━┳━━━┓\n\
                        ┃   ┃   ┃   ┃\n\
                        ┣━━━╋━━━╋━━━┫\n\
                        ┃   ┃   ┃   ┃\n\
                        ┗━━━┻━━━┻━━━┛\n";
        assert_eq!(m.to_string(), expected);
    }

    #[test]
    fn empty_maze_render() {
        let m = Maze::new(Height(2), Width(2), GridMode::Empty);
        let expected = "┏━━━┳━━━┓\n\
                        ┃       ┃\n\
                        ┣   ╋   ┫\n\
                        ┃       ┃\n\
                        ┗━━━┻━━━┛\n";
        assert_eq!(m.to_string(), expected);
    }

    #[test]
    fn single_column_render() {
        let m = Maze::new(Height(2), Width(1), GridMode::Empty);
        assert_eq!(m.to_string(), "┏━━━┓\n┃   ┃\n┣   ┫\n┃   ┃\n┗━━━┛\n");
    }

    #[test]
    fn no_cells_render_nothing() {
        assert_eq!(Maze::new(Height(0), Width(5), GridMode::Full).to_string(), "");
        assert_eq!(Maze::new(Height(3), Width(0), GridMode::Empty).to_string(), "");
    }

    #[test]
    fn start_end_overlay() {
        let m = corner_maze();
        let expected = "┏━━━┳━━━┓\n\
                        ┃ S     ┃\n\
                        ┣   ╋━━━┫\n\
                        ┃   ┃ E ┃\n\
                        ┗━━━┻━━━┛\n";
        assert_eq!(m.overlay(&StartEndPointsDisplay::new(gc(0, 0), gc(1, 1))), expected);
    }

    #[test]
    fn map_overlay() {
        let m = corner_maze();
        let mut content = fnv_hashmap(2);
        content.insert(gc(0, 1), '1');
        content.insert(gc(1, 0), '2');
        let expected = "┏━━━┳━━━┓\n\
                        ┃     1 ┃\n\
                        ┣   ╋━━━┫\n\
                        ┃ 2 ┃   ┃\n\
                        ┗━━━┻━━━┛\n";
        assert_eq!(m.overlay_map(&content), expected);
    }

    #[test]
    fn layered_path_under_end_points() {
        let m = corner_maze();
        let path = [gc(0, 0), gc(0, 1), gc(1, 1)];
        let layers = Layered::new(StartEndPointsDisplay::new(gc(0, 0), gc(1, 1)),
                                  PathDisplay::new(&path, '.'));
        assert_eq!(layers.render_cell_body(gc(0, 0)), Some('S'));
        assert_eq!(layers.render_cell_body(gc(0, 1)), Some('.'));
        assert_eq!(layers.render_cell_body(gc(1, 1)), Some('E'));
        assert_eq!(layers.render_cell_body(gc(1, 0)), None);
        assert!(m.overlay(&layers).contains("┃ S   . ┃"));
    }

    #[test]
    fn blank_overlay_matches_plain_render() {
        let mut rng = seeded_rng(7);
        for algorithm in Algorithm::ALL.iter() {
            let m = algorithm.generate(Height(6), Width(9), &mut rng);
            assert_eq!(m.overlay_map(&fnv_hashmap(0)), m.to_string());
        }
    }

    #[test]
    fn quickcheck_render_shape() {
        fn p(h: u8, w: u8, seed: u64) -> bool {
            let (h, w) = (usize::from(h % 12) + 1, usize::from(w % 12) + 1);
            let m = Algorithm::Wilson.generate(Height(h), Width(w), &mut seeded_rng(seed));
            let text = m.to_string();
            let lines = text.lines().collect::<Vec<_>>();
            let wall_segments = text.matches(WALL_LR_3).count();
            let horizontal_walls = m.walls()
                .iter()
                .filter(|&&(a, b)| a.col == b.col)
                .count();

            lines.len() == 2 * h + 1 &&
            lines.iter().all(|line| line.chars().count() == 4 * w + 1) &&
            wall_segments == 2 * w + horizontal_walls
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }
}
