mod board_config;
mod board_event;
mod cell;
mod error;
mod grid;
mod level;
mod match_group;
mod position;

pub use board_config::BoardConfig;
pub use board_event::{BoardEvent, TileMove};
pub use cell::{Cell, KindId};
pub use error::BoardError;
pub use grid::Grid;
pub use level::{Level, LevelCell};
pub use match_group::{Axis, MatchGroup};
pub use position::Position;
