//! Panel 4 — Trades: the day's trade tape with per-trade change detail.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use pnlscope_core::domain::{ChangeKind, MarkerKind};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let trades = app.trade_points();
    let mut lines: Vec<Line> = Vec::new();

    if app.day.is_none() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("No day loaded.", theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }
    if trades.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No trades on this day.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(vec![
        Span::styled(format!("{} trades", trades.len()), theme::accent()),
        Span::styled("  [j/k]scroll [Enter]select on chart", theme::muted()),
    ]));
    lines.push(Line::from(""));

    // Leave room for the change detail of the cursor trade.
    let detail_height = 6usize;
    let list_height = (area.height as usize).saturating_sub(2 + detail_height).max(1);
    let start = app.trades.cursor.saturating_sub(list_height.saturating_sub(1));

    for (i, point) in trades.iter().enumerate().skip(start).take(list_height) {
        let marker = match point.snapshot.trade_marker.as_ref() {
            Some(m) => m,
            None => continue,
        };
        let is_cursor = i == app.trades.cursor;
        let style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::secondary()
        };
        let kind_style = if is_cursor {
            style
        } else {
            match marker.kind {
                MarkerKind::SquareUp => theme::negative(),
                _ => theme::warning(),
            }
        };
        let kind_label = match marker.kind {
            MarkerKind::SquareUp => "SQUARE-UP ",
            MarkerKind::Adjustment => "ADJUSTMENT",
            MarkerKind::None => "          ",
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", point.snapshot.timestamp.format("%H:%M:%S")),
                style,
            ),
            Span::styled(format!("{kind_label} "), kind_style),
            Span::styled(marker.summary.clone(), style),
        ]));
    }

    // Change detail for the trade under the cursor.
    if let Some(point) = trades.get(app.trades.cursor) {
        if let Some(marker) = point.snapshot.trade_marker.as_ref() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Changes:", theme::accent_bold())));
            for change in marker.changes.iter().take(detail_height.saturating_sub(2)) {
                lines.push(Line::from(Span::styled(
                    format!(
                        "  {:<22} {:<15} qty {} → {}  avg {:.2} → {:.2}",
                        change.instrument_symbol,
                        change_label(change.change),
                        change.old_quantity,
                        change.new_quantity,
                        change.old_price,
                        change.new_price,
                    ),
                    theme::secondary(),
                )));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn change_label(change: ChangeKind) -> &'static str {
    match change {
        ChangeKind::New => "new",
        ChangeKind::Closed => "closed",
        ChangeKind::QuantityChange => "quantity change",
        ChangeKind::PriceChange => "price change",
    }
}
