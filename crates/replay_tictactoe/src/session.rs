//! Replay session: move history, time-travel cursor, and derived views.
//!
//! A [`Session`] records every board state the game has passed through
//! as an immutable [`Snapshot`] and keeps a cursor selecting which
//! snapshot is currently displayed. Whose turn it is next is always
//! re-derived from cursor parity, never stored, so jumping around the
//! history cannot desynchronize the turn order.

use crate::position::Position;
use crate::rules::{self, WinResult};
use crate::types::{Board, Player, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One immutable recorded board state.
///
/// `last_move` is the position filled to produce this board; the root
/// snapshot (the empty board) has no last move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) board: Board,
    pub(crate) last_move: Option<Position>,
}

impl Snapshot {
    /// Returns the recorded board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the position filled to produce this board.
    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }
}

/// Display order of the move list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Game start first.
    Ascending,
    /// Latest move first.
    Descending,
}

impl SortOrder {
    /// Returns the opposite order.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Error rejecting a move. The session is unchanged on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The displayed board already has a winner.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// Error rejecting a history jump. The session is unchanged on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum JumpError {
    /// The requested step does not exist in the history.
    #[display("Step {} is out of range (history has {} entries)", step, len)]
    OutOfRange {
        /// The requested step.
        step: usize,
        /// Current history length.
        len: usize,
    },
}

impl std::error::Error for JumpError {}

/// Game status derived from the displayed board and cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// A player completed a line.
    Won(Player),
    /// Board full, no line.
    Draw,
    /// Game ongoing; this player moves next.
    NextPlayer(Player),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Won(player) => write!(f, "Winner: {}", player),
            Status::Draw => write!(f, "Draw"),
            Status::NextPlayer(player) => write!(f, "Next player: {}", player),
        }
    }
}

/// One entry of the derived move list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEntry {
    /// History step this entry jumps to.
    pub step: usize,
    /// Human-readable label, e.g. "Go to move #3 (2, 1)".
    pub label: String,
    /// Whether this entry is the currently displayed step.
    pub selected: bool,
}

/// A tic-tac-toe session with full move history and a time-travel cursor.
///
/// Invariants (checked in debug builds after every transition):
/// - the cursor always indexes into the history,
/// - the root snapshot is the empty board,
/// - consecutive snapshots differ by exactly one parity-correct mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) history: Vec<Snapshot>,
    pub(crate) cursor: usize,
    pub(crate) sort_order: SortOrder,
}

impl Session {
    /// Creates a new session holding only the empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            history: vec![Snapshot {
                board: Board::new(),
                last_move: None,
            }],
            cursor: 0,
            sort_order: SortOrder::Ascending,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    /// Places the next player's mark at the given position.
    ///
    /// Making a move while the cursor sits on a non-latest snapshot
    /// abandons the later snapshots: the history is truncated to the
    /// cursor before the new snapshot is appended.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameOver`] if the displayed board already
    /// has a winner, or [`MoveError::SquareOccupied`] if the square is
    /// taken. The session is unchanged in both cases.
    #[instrument(skip(self), fields(cursor = self.cursor))]
    pub fn apply_move(&mut self, pos: Position) -> Result<(), MoveError> {
        let current = &self.history[self.cursor];

        if rules::evaluate(&current.board).winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if !current.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }

        let mut board = current.board.clone();
        board.set(pos, Square::Occupied(self.to_move()));

        self.history.truncate(self.cursor + 1);
        self.history.push(Snapshot {
            board,
            last_move: Some(pos),
        });
        self.cursor = self.history.len() - 1;

        self.assert_invariants();
        Ok(())
    }

    /// Moves the cursor to the given history step.
    ///
    /// Only the cursor changes; the history is never altered by a jump.
    ///
    /// # Errors
    ///
    /// Returns [`JumpError::OutOfRange`] if the step does not exist.
    /// The session is unchanged in that case.
    #[instrument(skip(self))]
    pub fn jump_to(&mut self, step: usize) -> Result<(), JumpError> {
        if step >= self.history.len() {
            return Err(JumpError::OutOfRange {
                step,
                len: self.history.len(),
            });
        }
        self.cursor = step;

        self.assert_invariants();
        Ok(())
    }

    /// Flips the display order of the move list.
    ///
    /// Purely presentational: history, cursor, and board are untouched.
    #[instrument(skip(self))]
    pub fn toggle_sort(&mut self) {
        self.sort_order = self.sort_order.toggled();
    }

    // ─────────────────────────────────────────────────────────────
    //  Derived views
    // ─────────────────────────────────────────────────────────────

    /// Returns the currently displayed board.
    pub fn board(&self) -> &Board {
        &self.history[self.cursor].board
    }

    /// Returns the full snapshot history, oldest first.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Returns the current cursor step.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the current move-list display order.
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Returns the player to move next, derived from cursor parity.
    ///
    /// Even steps are X's turn. This holds after any jump because the
    /// cursor counts the moves already on the displayed board.
    pub fn to_move(&self) -> Player {
        if self.cursor % 2 == 0 {
            Player::X
        } else {
            Player::O
        }
    }

    /// Evaluates the displayed board for a winner.
    pub fn win(&self) -> WinResult {
        rules::evaluate(self.board())
    }

    /// Returns the game status of the displayed snapshot.
    ///
    /// A cursor of 9 means nine accepted moves, hence a full board;
    /// full with no winner is a draw.
    pub fn status(&self) -> Status {
        match self.win().winner {
            Some(winner) => Status::Won(winner),
            None if self.cursor == 9 => Status::Draw,
            None => Status::NextPlayer(self.to_move()),
        }
    }

    /// Builds the move list in the current sort order.
    ///
    /// Labels use 1-based (column, row) coordinates of the move that
    /// produced each snapshot; the root entry reads "Go to game start".
    pub fn moves(&self) -> Vec<MoveEntry> {
        let mut entries: Vec<MoveEntry> = self
            .history
            .iter()
            .enumerate()
            .map(|(step, snapshot)| {
                let label = match snapshot.last_move {
                    Some(pos) if step > 0 => format!(
                        "Go to move #{} ({}, {})",
                        step,
                        pos.column() + 1,
                        pos.row() + 1
                    ),
                    _ => "Go to game start".to_string(),
                };
                MoveEntry {
                    step,
                    label,
                    selected: step == self.cursor,
                }
            })
            .collect();

        if self.sort_order == SortOrder::Descending {
            entries.reverse();
        }
        entries
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        use crate::invariants::{InvariantSet, SessionInvariants};
        if let Err(violations) = SessionInvariants::check_all(self) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            panic!("session invariant violated: {}", descriptions);
        }
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_shows_empty_board() {
        let session = Session::new();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.to_move(), Player::X);
        assert_eq!(session.status(), Status::NextPlayer(Player::X));
    }

    #[test]
    fn test_first_move_is_x() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();

        assert_eq!(
            session.board().get(Position::Center),
            Square::Occupied(Player::X)
        );
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.status(), Status::NextPlayer(Player::O));
        assert_eq!(session.status().to_string(), "Next player: O");
    }

    #[test]
    fn test_occupied_square_rejected_without_state_change() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        let before = session.clone();

        let result = session.apply_move(Position::Center);
        assert_eq!(result, Err(MoveError::SquareOccupied(Position::Center)));
        assert_eq!(session, before);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_move_after_win_rejected() {
        let mut session = Session::new();
        // X: 0, O: 1, X: 4, O: 2, X: 8 - X wins the TL-BR diagonal
        for pos in [
            Position::TopLeft,
            Position::TopCenter,
            Position::Center,
            Position::TopRight,
            Position::BottomRight,
        ] {
            session.apply_move(pos).unwrap();
        }

        let win = session.win();
        assert_eq!(win.winner, Some(Player::X));
        assert_eq!(
            win.line,
            Some([Position::TopLeft, Position::Center, Position::BottomRight])
        );
        assert_eq!(session.status().to_string(), "Winner: X");

        let before = session.clone();
        assert_eq!(
            session.apply_move(Position::MiddleLeft),
            Err(MoveError::GameOver)
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut session = Session::new();
        // X:0 O:1 X:2 O:4 X:3 O:5 X:7 O:6 X:8 - no line completes
        for pos in [
            Position::TopLeft,
            Position::TopCenter,
            Position::TopRight,
            Position::Center,
            Position::MiddleLeft,
            Position::MiddleRight,
            Position::BottomCenter,
            Position::BottomLeft,
            Position::BottomRight,
        ] {
            session.apply_move(pos).unwrap();
        }

        assert_eq!(session.cursor(), 9);
        assert_eq!(session.win().winner, None);
        assert_eq!(session.status(), Status::Draw);
        assert_eq!(session.status().to_string(), "Draw");
    }

    #[test]
    fn test_jump_rederives_turn_parity() {
        let mut session = Session::new();
        for pos in [
            Position::TopLeft,
            Position::Center,
            Position::TopRight,
            Position::BottomLeft,
            Position::MiddleLeft,
        ] {
            session.apply_move(pos).unwrap();
        }

        session.jump_to(2).unwrap();
        assert_eq!(session.cursor(), 2);
        // Even cursor means X to move.
        assert_eq!(session.to_move(), Player::X);
        assert_eq!(session.status(), Status::NextPlayer(Player::X));

        session.jump_to(3).unwrap();
        assert_eq!(session.to_move(), Player::O);
    }

    #[test]
    fn test_jump_does_not_alter_history() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.apply_move(Position::TopLeft).unwrap();

        let history_before = session.history().to_vec();
        session.jump_to(0).unwrap();
        assert_eq!(session.history(), history_before.as_slice());
    }

    #[test]
    fn test_move_after_jump_truncates_abandoned_branch() {
        let mut session = Session::new();
        for pos in [
            Position::TopLeft,
            Position::Center,
            Position::TopRight,
            Position::BottomLeft,
            Position::MiddleLeft,
        ] {
            session.apply_move(pos).unwrap();
        }
        assert_eq!(session.history().len(), 6);

        session.jump_to(2).unwrap();
        session.apply_move(Position::BottomRight).unwrap();

        assert_eq!(session.history().len(), 4);
        assert_eq!(session.cursor(), 3);
        // The abandoned step 5 is gone.
        assert_eq!(
            session.jump_to(5),
            Err(JumpError::OutOfRange { step: 5, len: 4 })
        );
        assert_eq!(session.cursor(), 3);
    }

    #[test]
    fn test_out_of_range_jump_rejected() {
        let mut session = Session::new();
        let before = session.clone();
        assert_eq!(
            session.jump_to(1),
            Err(JumpError::OutOfRange { step: 1, len: 1 })
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_move_list_labels() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.apply_move(Position::BottomLeft).unwrap();

        let moves = session.moves();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].label, "Go to game start");
        assert_eq!(moves[1].label, "Go to move #1 (2, 2)");
        assert_eq!(moves[2].label, "Go to move #2 (1, 3)");
        assert!(moves[2].selected);
        assert!(!moves[0].selected);
    }

    #[test]
    fn test_toggle_sort_reverses_move_list_only() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.apply_move(Position::TopLeft).unwrap();

        let ascending = session.moves();
        let history_before = session.history().to_vec();
        let cursor_before = session.cursor();

        session.toggle_sort();
        assert_eq!(session.sort_order(), SortOrder::Descending);

        let descending = session.moves();
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);

        assert_eq!(session.history(), history_before.as_slice());
        assert_eq!(session.cursor(), cursor_before);

        session.toggle_sort();
        assert_eq!(session.sort_order(), SortOrder::Ascending);
        assert_eq!(session.moves(), ascending);
    }

    #[test]
    fn test_selected_follows_cursor_after_jump() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.apply_move(Position::TopLeft).unwrap();
        session.jump_to(1).unwrap();

        let moves = session.moves();
        assert!(moves[1].selected);
        assert!(!moves[2].selected);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.toggle_sort();

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
