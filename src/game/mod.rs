pub mod board_controller;
pub mod gravity;
pub mod match_finder;
pub mod refill;
pub mod shuffler;

pub use board_controller::{BoardController, ControllerState};
