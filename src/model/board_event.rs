use serde::{Deserialize, Serialize};

use super::{KindId, Position};

/// One tile settling from one cell to another during collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TileMove {
    pub from: Position,
    pub to: Position,
}

/// A state-affecting action, emitted in order by the controller. Each
/// carries enough position and kind data for a renderer to replay the
/// operation deterministically; moves batched into one event happened
/// "simultaneously" and may be animated concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum BoardEvent {
    /// Two adjacent cells exchanged tentatively.
    Swap { first: Position, second: Position },
    /// The tentative swap produced no match and was undone.
    SwapReverted { first: Position, second: Position },
    /// A match group was removed from the board.
    Explode {
        kind: KindId,
        positions: Vec<Position>,
    },
    /// One gravity pass worth of settle moves.
    Collapse { moves: Vec<TileMove> },
    /// A new tile entered from above the top row.
    Refill { position: Position, kind: KindId },
    /// No potential match remains; a shuffle follows.
    Deadlock,
    /// Tiles were redistributed; `placements` is the full new assignment of
    /// kinds to the shuffled positions.
    Shuffle {
        placements: Vec<(Position, KindId)>,
    },
}
