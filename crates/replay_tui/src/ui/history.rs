//! Status line and time-travel move list rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

/// Renders the status line and the move list.
pub fn render_history(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let status = Paragraph::new(app.session().status().to_string())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[0]);

    let items: Vec<ListItem> = app
        .session()
        .moves()
        .into_iter()
        .map(|entry| {
            let marker = if entry.step == app.selection() {
                "▸ "
            } else {
                "  "
            };
            let mut style = Style::default();
            if entry.selected {
                // The step currently shown on the board.
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(entry.label, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Moves (Enter to jump, s to sort)"),
    );
    f.render_widget(list, chunks[1]);
}
