//! Overlays — welcome screen and error history, drawn over the panels.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

use super::centered_rect;

pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" pnlscope ")
        .title_style(theme::accent_bold());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "A trading day's P&L, trade by trade.",
            theme::secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pick a day in panel 1, then explore the chart in panel 2:",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "arrows step through snapshots, [ and ] jump between trades.",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to start.", theme::accent())),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(" Errors ({}) — j/k scroll, Esc close ", app.error_history.len()))
        .title_style(theme::negative());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut lines: Vec<Line> = Vec::new();
    if app.error_history.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("No errors recorded.", theme::muted())));
    }
    for record in app.error_history.iter().skip(app.error_scroll) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", record.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", record.category.label()), theme::warning()),
            Span::styled(record.message.clone(), theme::secondary()),
            Span::styled(
                if record.context.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", record.context)
                },
                theme::muted(),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
