//! Bottom status bar — panel hints, loaded day, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    // Panel hints
    spans.push(Span::styled(
        " 1:Days 2:Chart 3:Positions 4:Trades 5:Help e:Errors",
        theme::muted(),
    ));

    if let Some(day) = app.day.as_ref() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(day.date.to_string(), theme::accent()));
        spans.push(Span::styled(
            format!(" {:+.2}", day.summary.final_pnl),
            theme::pnl_style(day.summary.final_pnl),
        ));
    }
    if app.loading.is_some() {
        spans.push(Span::styled(" | loading...", theme::warning()));
    }

    // Status message
    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    let line = Line::from(spans);
    let para = Paragraph::new(line);
    f.render_widget(para, area);
}
