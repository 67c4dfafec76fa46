use serde::{Deserialize, Serialize};

/// The "color" of a tile. Equality is the only semantics matching needs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct KindId(pub u8);

impl KindId {
    pub fn letter(&self) -> char {
        (b'a' + self.0) as char
    }

    pub fn from_letter(letter: char) -> Option<KindId> {
        let lower = letter.to_ascii_lowercase();
        if lower.is_ascii_lowercase() {
            Some(KindId(lower as u8 - b'a'))
        } else {
            None
        }
    }
}

impl std::fmt::Display for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl std::fmt::Debug for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One board cell. Obstacles never change membership for the life of a
/// board; tile cells cycle through Empty and Tile as cascades resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Cell {
    Empty,
    Tile(KindId),
    Obstacle,
}

impl Cell {
    pub fn kind(&self) -> Option<KindId> {
        match self {
            Cell::Tile(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_tile(&self) -> bool {
        matches!(self, Cell::Tile(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Obstacle)
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Tile(kind) => kind.letter(),
            Cell::Obstacle => '#',
        }
    }
}
