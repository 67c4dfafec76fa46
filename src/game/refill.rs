use log::trace;
use rand::Rng;

use crate::model::{BoardError, BoardEvent, Cell, Grid, KindId, Position};

use super::gravity;

/// Uniformly random kind from the configured kind set.
pub fn random_kind(rng: &mut impl Rng, n_kinds: u8) -> KindId {
    KindId(rng.random_range(0..n_kinds))
}

/// Fill the board from above: every column whose top cell is empty (not an
/// obstacle) receives a new random-kind tile at the top row, the board
/// settles, and the sweep repeats until no column accepts a tile, that is,
/// until each column is full up to its first obstacle or the top. Returns
/// the ordered Refill/Collapse events of the whole fill.
pub fn refill_board(
    grid: &mut Grid,
    rng: &mut impl Rng,
    n_kinds: u8,
) -> Result<Vec<BoardEvent>, BoardError> {
    let mut events = Vec::new();
    let top_row = grid.height() - 1;

    loop {
        let mut spawned = 0usize;
        for col in 0..grid.width() {
            let top = Position::new(col, top_row);
            if grid.get(top) == Cell::Empty {
                let kind = random_kind(rng, n_kinds);
                grid.set(top, Cell::Tile(kind));
                events.push(BoardEvent::Refill {
                    position: top,
                    kind,
                });
                spawned += 1;
            }
        }
        if spawned == 0 {
            break;
        }
        trace!(target: "refill", "spawned {} tiles into the top row", spawned);

        let moves = gravity::collapse(grid)?;
        if !moves.is_empty() {
            events.push(BoardEvent::Collapse { moves });
        }
    }

    Ok(events)
}
