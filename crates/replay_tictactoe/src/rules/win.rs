//! Win detection logic for tic-tac-toe.

use crate::position::Position;
use crate::types::{Board, Player, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The eight winning lines, in evaluation order: rows top-to-bottom,
/// columns left-to-right, then the two diagonals.
///
/// The order is load-bearing: [`evaluate`] reports the first completed
/// line in this enumeration, which keeps the result deterministic for
/// arbitrary boards where several lines complete at once.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Verdict of evaluating a board for a win.
///
/// `winner` and `line` are always both present or both absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    /// The winning player, if any line is complete.
    pub winner: Option<Player>,
    /// The line that produced the win.
    pub line: Option<[Position; 3]>,
}

impl WinResult {
    /// Checks whether the given position lies on the winning line.
    pub fn is_winning(&self, pos: Position) -> bool {
        self.line.is_some_and(|line| line.contains(&pos))
    }
}

/// Evaluates a board for a winner.
///
/// Total over all boards: any 9-square configuration yields a verdict,
/// including positions unreachable in a legal game. A full board with
/// no completed line reports no winner; callers distinguish a draw from
/// an ongoing game with [`super::is_full`].
#[instrument]
pub fn evaluate(board: &Board) -> WinResult {
    for line in LINES {
        let [a, b, c] = line;
        let sq = board.get(a);
        if let Square::Occupied(player) = sq
            && sq == board.get(b)
            && sq == board.get(c)
        {
            return WinResult {
                winner: Some(player),
                line: Some(line),
            };
        }
    }

    WinResult {
        winner: None,
        line: None,
    }
}
