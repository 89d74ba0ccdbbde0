//! Panel 5 — Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

const BINDINGS: &[(&str, &str)] = &[
    ("q", "Quit"),
    ("1-5 / Tab", "Switch panel"),
    ("e", "Error history"),
    ("", ""),
    ("Days", ""),
    ("j/k, Enter", "Pick a trading day"),
    ("r", "Rescan data directory"),
    ("", ""),
    ("Chart", ""),
    ("←/→ (h/l)", "Step selection through snapshots"),
    ("Home/End (g/G)", "Jump to first/last snapshot"),
    ("[ / ]", "Previous / next trade"),
    ("m", "Toggle trade markers"),
    ("u", "Toggle underlying overlay"),
    ("Esc", "Clear selection"),
    ("", ""),
    ("Positions", ""),
    ("j/k", "Scroll the book"),
    ("", ""),
    ("Trades", ""),
    ("j/k, Enter", "Browse the tape, select on chart"),
];

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for (key, action) in BINDINGS {
        if key.is_empty() && action.is_empty() {
            lines.push(Line::from(""));
        } else if action.is_empty() {
            lines.push(Line::from(Span::styled(*key, theme::accent_bold())));
        } else {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<16}"), theme::accent()),
                Span::styled(*action, theme::secondary()),
            ]));
        }
    }
    f.render_widget(Paragraph::new(lines), area);
}
