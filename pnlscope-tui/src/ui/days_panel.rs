//! Panel 1 — Days: available trading days plus the loaded day's summary.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(18), Constraint::Min(20)])
        .split(area);

    render_date_list(f, chunks[0], app);
    render_summary(f, chunks[1], app);
}

fn render_date_list(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    if app.days.scanning {
        lines.push(Line::from(Span::styled("Scanning...", theme::muted())));
    } else if app.days.dates.is_empty() {
        lines.push(Line::from(Span::styled("No day files in", theme::muted())));
        lines.push(Line::from(Span::styled(
            format!("{}/", app.data_dir.display()),
            theme::secondary(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("[r] rescan", theme::muted())));
    }

    let visible_height = area.height as usize;
    let start = app.days.cursor.saturating_sub(visible_height.saturating_sub(1));
    for (i, date) in app.days.dates.iter().enumerate().skip(start).take(visible_height) {
        let is_cursor = i == app.days.cursor;
        let is_loaded = app.day.as_ref().is_some_and(|d| d.date == *date);

        let style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else if is_loaded {
            theme::accent()
        } else {
            theme::secondary()
        };
        let tag = if is_loaded { "●" } else { " " };
        lines.push(Line::from(Span::styled(format!("{tag} {date}"), style)));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    let Some(day) = app.day.as_ref() else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Select a day and press Enter to load it.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    };
    let s = &day.summary;

    lines.push(Line::from(vec![
        Span::styled("Day      ", theme::muted()),
        Span::styled(s.date.to_string(), theme::accent_bold()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Snapshots ", theme::muted()),
        Span::styled(format!("{:>8}", s.total_snapshots), theme::secondary()),
        Span::styled("    Trades ", theme::muted()),
        Span::styled(format!("{:>4}", s.total_trades), theme::warning()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Final P&L ", theme::muted()),
        Span::styled(format!("{:>+12.2}", s.final_pnl), theme::pnl_style(s.final_pnl)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Range     ", theme::muted()),
        Span::styled(format!("{:>+12.2}", s.min_pnl), theme::pnl_style(s.min_pnl)),
        Span::styled(" .. ", theme::muted()),
        Span::styled(format!("{:+.2}", s.max_pnl), theme::pnl_style(s.max_pnl)),
    ]));
    if let (Some(open), Some(close)) = (&s.market_open, &s.market_close) {
        lines.push(Line::from(vec![
            Span::styled("Session   ", theme::muted()),
            Span::styled(format!("{open} – {close}"), theme::secondary()),
        ]));
    }
    if let Some(range) = &s.underlying_range {
        lines.push(Line::from(vec![
            Span::styled("Underlying ", theme::muted()),
            Span::styled(
                format!(
                    "{:.1} → {:.1}  (lo {:.1} / hi {:.1})",
                    range.open, range.close, range.min, range.max
                ),
                theme::secondary(),
            ),
        ]));
    }
    if !app.filter_keys.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Filters   ", theme::muted()),
            Span::styled(app.filter_keys.join(", "), theme::warning()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
