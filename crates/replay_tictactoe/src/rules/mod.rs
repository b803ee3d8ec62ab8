//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating game state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage and from session bookkeeping so they can be tested in
//! isolation over arbitrary boards.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{evaluate, WinResult};
