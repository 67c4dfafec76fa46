use log::trace;

use crate::model::{BoardError, Cell, Grid, Position, TileMove};

/// Settle every tile the board can absorb: straight falls within each
/// column segment (obstacles split segments), then diagonal redirection
/// into holes directly beneath obstacles, pulling from a horizontally
/// adjacent column with the left side preferred. Iterates to a fixed point;
/// the pass cap turns a contradictory obstacle layout into an error instead
/// of a hang.
pub fn collapse(grid: &mut Grid) -> Result<Vec<TileMove>, BoardError> {
    let mut moves = Vec::new();
    let max_passes = grid.width() * grid.height();
    for _ in 0..=max_passes {
        let pass_moves = collapse_pass(grid);
        if pass_moves.is_empty() {
            trace!(target: "gravity", "collapse settled with {} moves", moves.len());
            return Ok(moves);
        }
        moves.extend(pass_moves);
    }
    Err(BoardError::BoardInconsistent(
        "collapse failed to reach a fixed point",
    ))
}

fn collapse_pass(grid: &mut Grid) -> Vec<TileMove> {
    let mut moves = Vec::new();

    // straight falls: each hole pulls the nearest tile above it that is not
    // separated from it by an obstacle
    for col in 0..grid.width() {
        for row in 0..grid.height() {
            let hole = Position::new(col, row);
            if grid.get(hole) != Cell::Empty {
                continue;
            }
            let mut above = row + 1;
            while above < grid.height() {
                let from = Position::new(col, above);
                match grid.get(from) {
                    Cell::Obstacle => break,
                    Cell::Empty => above += 1,
                    Cell::Tile(kind) => {
                        grid.set(hole, Cell::Tile(kind));
                        grid.set(from, Cell::Empty);
                        moves.push(TileMove { from, to: hole });
                        break;
                    }
                }
            }
        }
    }

    // diagonal redirection: a hole directly beneath an obstacle has no
    // column-local supply, so it borrows from a neighboring column
    for col in 0..grid.width() {
        for row in (1..grid.height()).rev() {
            if !grid.get(Position::new(col, row)).is_obstacle() {
                continue;
            }
            let hole = Position::new(col, row - 1);
            if grid.get(hole) != Cell::Empty {
                continue;
            }
            let left = col.checked_sub(1).map(|c| Position::new(c, row));
            let right = (col + 1 < grid.width()).then(|| Position::new(col + 1, row));
            let donor = [left, right]
                .into_iter()
                .flatten()
                .find(|&candidate| grid.get(candidate).is_tile());
            if let Some(from) = donor {
                let cell = grid.get(from);
                grid.set(hole, cell);
                grid.set(from, Cell::Empty);
                moves.push(TileMove { from, to: hole });
            }
        }
    }

    moves
}
