//! Panel 3 — Positions: the book at the selected snapshot (or the
//! latest one when nothing is selected).

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use pnlscope_core::domain::InstrumentKind;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let (snapshot, label) = match app.selected_snapshot() {
        Some(snapshot) => (Some(snapshot), "selected"),
        None => (
            app.day
                .as_ref()
                .and_then(|d| d.series.last())
                .map(|p| &p.snapshot),
            "latest",
        ),
    };

    let Some(snapshot) = snapshot else {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("No day loaded.", theme::muted())),
        ];
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} ({label}) ", snapshot.timestamp.format("%H:%M:%S")),
            theme::accent_bold(),
        ),
        Span::styled("| total ", theme::muted()),
        Span::styled(
            format!("{:+.2}", snapshot.total_pnl),
            theme::pnl_style(snapshot.total_pnl),
        ),
    ]));
    lines.push(Line::from(""));

    if snapshot.positions.is_empty() {
        lines.push(Line::from(Span::styled(
            "Book is flat at this instant.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:<22} {:>4} {:>7} {:>9} {:>9} {:>10} {:>10} {:>10}",
            "Symbol", "Kind", "Qty", "Avg", "Last", "Booked", "Unbooked", "P&L"
        ),
        theme::accent_bold(),
    )));

    let visible_height = area.height.saturating_sub(3) as usize;
    let start = app.positions.scroll.min(snapshot.positions.len().saturating_sub(1));
    for (i, pos) in snapshot
        .positions
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_height)
    {
        let is_cursor = i == app.positions.scroll;
        let style = if is_cursor {
            theme::secondary().add_modifier(Modifier::REVERSED)
        } else {
            theme::secondary()
        };
        let pnl = pos.pnl();
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{:<22} {:>4} {:>7} {:>9.2} {:>9.2} {:>10.2} {:>10.2} ",
                    truncate(&pos.instrument.symbol, 22),
                    kind_label(pos.instrument.kind),
                    pos.quantity,
                    pos.avg_price,
                    pos.last_price,
                    pos.booked_pnl,
                    pos.unbooked_pnl,
                ),
                style,
            ),
            Span::styled(
                format!("{pnl:>+10.2}"),
                if is_cursor { style } else { theme::pnl_style(pnl) },
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn kind_label(kind: InstrumentKind) -> &'static str {
    match kind {
        InstrumentKind::Call => "CE",
        InstrumentKind::Put => "PE",
        InstrumentKind::Future => "FUT",
        InstrumentKind::Other => "?",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}.", &s[..max - 1])
    }
}
