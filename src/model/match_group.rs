use serde::{Deserialize, Serialize};

use super::{KindId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A contiguous same-kind run along one axis, already known to meet the
/// match threshold. Positions are in scan order (left-to-right or
/// bottom-to-top).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchGroup {
    pub kind: KindId,
    pub axis: Axis,
    pub positions: Vec<Position>,
}

impl MatchGroup {
    pub fn new(kind: KindId, axis: Axis, positions: Vec<Position>) -> Self {
        debug_assert!(positions.len() >= 2);
        debug_assert!(match axis {
            Axis::Horizontal => positions.windows(2).all(|pair| {
                pair[0].row == pair[1].row && pair[1].col == pair[0].col + 1
            }),
            Axis::Vertical => positions.windows(2).all(|pair| {
                pair[0].col == pair[1].col && pair[1].row == pair[0].row + 1
            }),
        });
        Self {
            kind,
            axis,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
