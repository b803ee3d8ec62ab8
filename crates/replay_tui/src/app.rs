//! Application state and input handling.

use crossterm::event::KeyCode;
use replay_tictactoe::{Position, Session};
use tracing::debug;

/// Main application state: the game session plus view-only selection.
pub struct App {
    session: Session,
    /// History step highlighted in the move list; jumps on Enter.
    selection: usize,
    message: String,
}

impl App {
    /// Creates a new application with a fresh session.
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            selection: 0,
            message: "Press 1-9 to move, Up/Down + Enter to time-travel, s to sort, q to quit."
                .to_string(),
        }
    }

    /// Gets the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Gets the history step currently highlighted in the move list.
    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Gets the transient message line.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Handles a key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('s') => {
                self.session.toggle_sort();
                self.message = "Move list order changed.".to_string();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(pos) = Position::from_index(index) {
                    self.make_move(pos);
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => self.jump_to_selection(),
            _ => {}
        }
        false
    }

    fn make_move(&mut self, pos: Position) {
        debug!(?pos, "Making move");

        match self.session.apply_move(pos) {
            Ok(()) => {
                self.selection = self.session.cursor();
                self.message = self.session.status().to_string();
            }
            Err(e) => {
                self.message = format!("Invalid move: {}. Try again.", e);
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let last = self.session.history().len() - 1;
        let step = self.selection.saturating_add_signed(delta).min(last);
        self.selection = step;
    }

    fn jump_to_selection(&mut self) {
        debug!(step = self.selection, "Jumping to step");

        match self.session.jump_to(self.selection) {
            Ok(()) => {
                self.message = self.session.status().to_string();
            }
            Err(e) => {
                self.message = format!("Cannot jump: {}", e);
            }
        }
    }

    fn restart(&mut self) {
        debug!("Restarting game");
        self.session = Session::new();
        self.selection = 0;
        self.message = "New game. Player X's turn.".to_string();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
