use super::Position;

/// Errors surfaced by board construction and play.
///
/// Construction-time errors abort board creation. During play,
/// `InvalidSwap` is a rejected no-op, while `BoardInconsistent` and
/// `UnshuffleableBoard` halt the session rather than continuing with
/// corrupted state. Out-of-bounds access *inside* the core is a programming
/// error and panics; the variant here covers caller-supplied positions at
/// the public API boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Level text could not be parsed (unequal row lengths or empty grid).
    #[error("malformed level: {0}")]
    MalformedLevel(String),

    /// A caller-supplied position is outside the board.
    #[error("position {0} is out of board bounds")]
    OutOfBounds(Position),

    /// Collapse or cascade exceeded its safety iteration bound; the
    /// obstacle layout is contradictory.
    #[error("board inconsistent: {0}")]
    BoardInconsistent(&'static str),

    /// No permutation within the retry bound yields a playable board. A
    /// legitimate terminal state for a level with too few kinds or too many
    /// obstacles, not a bug.
    #[error("no playable shuffle found after {attempts} attempts")]
    UnshuffleableBoard { attempts: u32 },

    /// Swap rejected: the two positions are not adjacent tiles. No state
    /// change, no events.
    #[error("invalid swap between {0} and {1}")]
    InvalidSwap(Position, Position),
}
