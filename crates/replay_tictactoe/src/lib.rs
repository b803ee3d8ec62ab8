//! Pure tic-tac-toe game logic with move history and time-travel replay.
//!
//! The crate is a small state-transition core with no I/O:
//!
//! - **Rules**: pure win/draw evaluation over arbitrary boards
//! - **Session**: the ordered history of board snapshots plus a cursor
//!   selecting the displayed snapshot, with operations to apply a move,
//!   jump to any prior step, and toggle the move-list sort order
//! - **Invariants**: first-class session properties checked in debug
//!   builds after every transition
//!
//! # Example
//!
//! ```
//! use replay_tictactoe::{Position, Session, Status, Player};
//!
//! let mut session = Session::new();
//! session.apply_move(Position::Center)?;
//! assert_eq!(session.status(), Status::NextPlayer(Player::O));
//!
//! // Time travel: revisit the empty board, then branch from it.
//! session.jump_to(0)?;
//! session.apply_move(Position::TopLeft)?;
//! assert_eq!(session.history().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod invariants;
mod position;
mod rules;
mod session;
mod types;

pub use invariants::{
    CursorInBounds, Invariant, InvariantSet, InvariantViolation, RootIsEmpty, SessionInvariants,
    StepwiseHistory,
};
pub use position::Position;
pub use rules::{evaluate, is_draw, is_full, WinResult};
pub use session::{JumpError, MoveEntry, MoveError, Session, Snapshot, SortOrder, Status};
pub use types::{Board, Player, Square};
