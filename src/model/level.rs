use super::{BoardError, Position};

/// What a level-text character asks for at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCell {
    /// `'.'`: a tile whose kind is chosen by the refill policy at setup.
    Box,
    /// `'#'`: permanently immovable, unmatchable.
    Obstacle,
    /// Any other character; the cell stays empty.
    Blank,
}

/// A parsed level layout: dimensions plus one [`LevelCell`] per position.
/// Text rows are given top-to-bottom, so text row 0 becomes grid row
/// `height - 1`.
#[derive(Debug, Clone)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    cells: Vec<LevelCell>, // column-major, row 0 = bottom
}

impl Level {
    pub fn parse(text: &str) -> Result<Level, BoardError> {
        let lines: Vec<&str> = text.lines().collect();
        let height = lines.len();
        if height == 0 {
            return Err(BoardError::MalformedLevel("empty level text".to_string()));
        }
        let width = lines[0].chars().count();
        if width == 0 {
            return Err(BoardError::MalformedLevel("empty first row".to_string()));
        }

        let mut cells = vec![LevelCell::Blank; width * height];
        for (line_index, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                return Err(BoardError::MalformedLevel(format!(
                    "row {} has {} cells, expected {}",
                    line_index,
                    line.chars().count(),
                    width
                )));
            }
            let row = height - 1 - line_index;
            for (col, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    '#' => LevelCell::Obstacle,
                    '.' => LevelCell::Box,
                    _ => LevelCell::Blank,
                };
                cells[col * height + row] = cell;
            }
        }

        Ok(Level {
            width,
            height,
            cells,
        })
    }

    pub fn cell(&self, pos: Position) -> LevelCell {
        self.cells[pos.col * self.height + pos.row]
    }
}
