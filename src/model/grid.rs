use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{Cell, KindId, Position};

/// Column-major cell storage. Dimensions are fixed after construction; all
/// access is bounds-checked. Out-of-bounds access from inside the crate is a
/// programming error and panics; callers of the public API are validated
/// with [`Grid::is_in_bounds`] first.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.is_in_bounds(pos),
            "position {} out of bounds for {}x{} grid",
            pos,
            self.width,
            self.height
        );
        pos.col * self.height + pos.row
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.index(pos);
        self.cells[index] = cell;
    }

    pub fn swap(&mut self, first: Position, second: Position) {
        let first_index = self.index(first);
        let second_index = self.index(second);
        self.cells.swap(first_index, second_index);
    }

    /// Tile kind at `pos`, or `None` for empty cells, obstacles, and
    /// out-of-bounds positions. The tolerance for out-of-bounds makes the
    /// neighbor probing in the match detectors uniform.
    pub fn kind_at(&self, pos: Position) -> Option<KindId> {
        if self.is_in_bounds(pos) {
            self.get(pos).kind()
        } else {
            None
        }
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.is_in_bounds(pos) && self.get(pos).is_obstacle()
    }

    /// In-bounds position at `(col + delta_col, row + delta_row)`, if any.
    pub fn offset(&self, pos: Position, delta_col: isize, delta_row: isize) -> Option<Position> {
        let col = pos.col.checked_add_signed(delta_col)?;
        let row = pos.row.checked_add_signed(delta_row)?;
        let candidate = Position::new(col, row);
        if self.is_in_bounds(candidate) {
            Some(candidate)
        } else {
            None
        }
    }

    /// All positions in column-major order (column 0 bottom-to-top first).
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..self.width)
            .cartesian_product(0..self.height)
            .map(|(col, row)| Position::new(col, row))
    }

    /// Positions currently holding a tile, column-major, with their kinds.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, KindId)> + '_ {
        self.positions()
            .filter_map(|pos| self.get(pos).kind().map(|kind| (pos, kind)))
    }

    /// Build a grid from the `Debug` text form: one row per line, top row
    /// first, `#` obstacle, `.` empty, a lowercase letter for a tile kind.
    #[cfg(test)]
    pub fn parse(input: &str) -> Self {
        let lines: Vec<&str> = input.lines().filter(|line| !line.is_empty()).collect();
        let height = lines.len();
        let width = lines[0].chars().count();
        let mut grid = Grid::new(width, height);
        for (line_index, line) in lines.iter().enumerate() {
            let row = height - 1 - line_index;
            for (col, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    '#' => Cell::Obstacle,
                    '.' => Cell::Empty,
                    letter => Cell::Tile(
                        KindId::from_letter(letter)
                            .unwrap_or_else(|| panic!("bad cell symbol {:?}", letter)),
                    ),
                };
                grid.set(Position::new(col, row), cell);
            }
        }
        grid
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for row in (0..self.height).rev() {
            for col in 0..self.width {
                write!(f, "{}", self.get(Position::new(col, row)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_maps_text_rows_top_down() {
        let grid = Grid::parse(
            "\
ab#
.cd",
        );
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        // text row 0 is the top of the board
        assert_eq!(grid.get(Position::new(0, 1)), Cell::Tile(KindId(0)));
        assert_eq!(grid.get(Position::new(2, 1)), Cell::Obstacle);
        assert_eq!(grid.get(Position::new(0, 0)), Cell::Empty);
        assert_eq!(grid.get(Position::new(2, 0)), Cell::Tile(KindId(3)));
    }

    #[test]
    fn test_debug_round_trips_parse() {
        let text = "\
ab#
.cd";
        let grid = Grid::parse(text);
        let rendered = format!("{:?}", grid);
        assert_eq!(rendered.trim(), text);
    }

    #[test]
    fn test_swap_exchanges_cells() {
        let mut grid = Grid::parse("ab");
        grid.swap(Position::new(0, 0), Position::new(1, 0));
        assert_eq!(grid.kind_at(Position::new(0, 0)), Some(KindId(1)));
        assert_eq!(grid.kind_at(Position::new(1, 0)), Some(KindId(0)));
    }

    #[test]
    fn test_kind_at_tolerates_out_of_bounds() {
        let grid = Grid::parse("ab");
        assert_eq!(grid.kind_at(Position::new(5, 5)), None);
        assert!(!grid.is_obstacle(Position::new(5, 5)));
        assert_eq!(grid.offset(Position::new(0, 0), -1, 0), None);
        assert_eq!(
            grid.offset(Position::new(0, 0), 1, 0),
            Some(Position::new(1, 0))
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        let grid = Grid::new(2, 2);
        grid.get(Position::new(2, 0));
    }

    #[test]
    fn test_tiles_are_column_major() {
        let grid = Grid::parse(
            "\
b.
ac",
        );
        let tiles: Vec<(Position, KindId)> = grid.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                (Position::new(0, 0), KindId(0)),
                (Position::new(0, 1), KindId(1)),
                (Position::new(1, 0), KindId(2)),
            ]
        );
    }
}
