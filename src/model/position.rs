use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position {
    pub col: usize, // 0 = leftmost column
    pub row: usize, // 0 = bottom row
}

impl Position {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// 4-adjacency: Manhattan distance exactly 1.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let delta_col = self.col.abs_diff(other.col);
        let delta_row = self.row.abs_diff(other.row);
        (delta_col == 1 && delta_row == 0) || (delta_col == 0 && delta_row == 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}
