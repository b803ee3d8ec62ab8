//! Draw detection logic for tic-tac-toe.

use super::win::evaluate;
use crate::types::Board;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner indicates a draw.
#[instrument]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// Checks if the board is a draw: full with no completed line.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && evaluate(board).winner.is_none()
}
