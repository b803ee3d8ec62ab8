//! First-class invariants for the replay session.
//!
//! Invariants are logical properties that must hold throughout session
//! execution. They are testable independently and serve as documentation
//! of system guarantees; transitions check them in debug builds.

use crate::session::Session;
use crate::types::{Board, Player, Square};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// The full invariant set checked after every session transition.
pub type SessionInvariants = (CursorInBounds, RootIsEmpty, StepwiseHistory);

// ─────────────────────────────────────────────────────────────
//  Cursor bounds
// ─────────────────────────────────────────────────────────────

/// Invariant: The cursor indexes into the history.
pub struct CursorInBounds;

impl Invariant<Session> for CursorInBounds {
    fn holds(session: &Session) -> bool {
        session.cursor < session.history.len()
    }

    fn description() -> &'static str {
        "Cursor indexes into the history (0 <= cursor < len)"
    }
}

// ─────────────────────────────────────────────────────────────
//  Root snapshot
// ─────────────────────────────────────────────────────────────

/// Invariant: History starts from the empty board with no last move.
pub struct RootIsEmpty;

impl Invariant<Session> for RootIsEmpty {
    fn holds(session: &Session) -> bool {
        match session.history.first() {
            Some(root) => root.board == Board::new() && root.last_move.is_none(),
            None => false,
        }
    }

    fn description() -> &'static str {
        "History starts from the empty board"
    }
}

// ─────────────────────────────────────────────────────────────
//  Stepwise consistency
// ─────────────────────────────────────────────────────────────

/// Invariant: Each snapshot adds exactly one parity-correct mark.
///
/// For consecutive snapshots i and i+1, exactly one square changes,
/// from Empty to Occupied by the player whose turn step i is (even
/// steps are X), at the position recorded as the later snapshot's
/// last move. Squares are never overwritten or cleared.
pub struct StepwiseHistory;

impl Invariant<Session> for StepwiseHistory {
    fn holds(session: &Session) -> bool {
        for (step, window) in session.history.windows(2).enumerate() {
            let (prev, next) = (&window[0], &window[1]);

            let Some(played) = next.last_move else {
                return false;
            };
            let mover = if step % 2 == 0 { Player::X } else { Player::O };

            // Replaying the recorded move onto the previous board must
            // reproduce the next board.
            if prev.board.get(played) != Square::Empty {
                return false;
            }
            let mut expected = prev.board.clone();
            expected.set(played, Square::Occupied(mover));
            if expected != next.board {
                return false;
            }
        }
        true
    }

    fn description() -> &'static str {
        "Consecutive snapshots differ by one parity-correct mark"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::session::Snapshot;

    #[test]
    fn test_fresh_session_holds() {
        let session = Session::new();
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_played_session_holds() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.apply_move(Position::TopLeft).unwrap();
        session.jump_to(1).unwrap();
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_dangling_cursor_violates() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        session.cursor = 5;
        assert!(!CursorInBounds::holds(&session));
    }

    #[test]
    fn test_marked_root_violates() {
        let mut session = Session::new();
        session.history[0]
            .board
            .set(Position::Center, Square::Occupied(Player::O));
        assert!(!RootIsEmpty::holds(&session));
    }

    #[test]
    fn test_overwritten_square_violates() {
        let mut session = Session::new();
        session.apply_move(Position::Center).unwrap();
        // Corrupt the latest snapshot: flip the mark to the wrong player.
        session.history[1]
            .board
            .set(Position::Center, Square::Occupied(Player::O));
        assert!(!StepwiseHistory::holds(&session));
    }

    #[test]
    fn test_snapshot_without_last_move_violates() {
        let mut session = Session::new();
        session.history.push(Snapshot {
            board: Board::new(),
            last_move: None,
        });
        assert!(!StepwiseHistory::holds(&session));
    }

    #[test]
    fn test_violations_carry_descriptions() {
        let mut session = Session::new();
        session.cursor = 3;
        let violations = SessionInvariants::check_all(&session).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].description,
            CursorInBounds::description()
        );
    }
}
