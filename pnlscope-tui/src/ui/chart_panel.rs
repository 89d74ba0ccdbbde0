//! Panel 2 — Chart: P&L curve with trade markers, optional underlying
//! overlay, and the selection cursor.
//!
//! Ratatui's `Chart` widget has no annotation support, so marker glyphs
//! are written straight into the buffer at computed plot positions after
//! the chart renders. The annotation list arrives ascending by time and
//! is consumed in that order.

use chrono::{TimeZone, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use pnlscope_core::{AnnotationKind, Direction as NavDirection};

use crate::app::{AppState, LoadedDay};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(day) = app.day.as_ref() else {
        render_hint(f, area, "No day loaded. Pick one from Days (press 1).");
        return;
    };
    if day.series.is_empty() {
        render_hint(f, area, &format!("No snapshots recorded for {}.", day.date));
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    render_chart(f, chunks[0], app, day);
    render_footer(f, chunks[1], app);
}

fn render_hint(f: &mut Frame, area: Rect, hint: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn format_time(time: i64) -> String {
    match Utc.timestamp_opt(time, 0).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => time.to_string(),
    }
}

fn render_chart(f: &mut Frame, area: Rect, app: &AppState, day: &LoadedDay) {
    let pnl_data = day.series.pnl_points();

    // Time axis spans every reconciled point, plottable P&L or not.
    let t0 = day.series.first().map(|p| p.time).unwrap_or(0);
    let t1 = day.series.last().map(|p| p.time).unwrap_or(t0);
    let x_min = t0 as f64;
    let x_max = if t1 > t0 { t1 as f64 } else { t0 as f64 + 1.0 };

    let min_y = pnl_data.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
    let max_y = pnl_data
        .iter()
        .map(|&(_, v)| v)
        .fold(f64::NEG_INFINITY, f64::max);
    let (min_y, max_y) = if pnl_data.is_empty() {
        (0.0, 1.0)
    } else {
        (min_y, max_y)
    };
    let padding = (max_y - min_y).abs() * 0.05;
    let y_lower = min_y - padding.max(1.0);
    let y_upper = max_y + padding.max(1.0);

    // The underlying has its own scale; normalize it into the P&L range
    // so both fit one axis. Its real range shows in the dataset name.
    let underlying_raw = day.series.underlying_points();
    let mut underlying_label = String::new();
    let underlying_data: Vec<(f64, f64)> = if app.chart.show_underlying {
        let u_min = underlying_raw
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::INFINITY, f64::min);
        let u_max = underlying_raw
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::NEG_INFINITY, f64::max);
        if underlying_raw.is_empty() {
            Vec::new()
        } else {
            underlying_label = format!("Underlying {u_min:.0}..{u_max:.0}");
            let u_span = (u_max - u_min).max(f64::EPSILON);
            underlying_raw
                .iter()
                .map(|&(t, u)| (t, y_lower + (u - u_min) / u_span * (y_upper - y_lower)))
                .collect()
        }
    } else {
        Vec::new()
    };

    let mut datasets = vec![Dataset::default()
        .name(format!("P&L {}", day.date))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme::accent())
        .data(&pnl_data)];
    if !underlying_data.is_empty() {
        datasets.push(
            Dataset::default()
                .name(underlying_label)
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(theme::muted())
                .data(&underlying_data),
        );
    }

    let y_mid = (y_lower + y_upper) / 2.0;
    let y_labels = [
        format!("{y_lower:.0}"),
        format!("{y_mid:.0}"),
        format!("{y_upper:.0}"),
    ];
    let label_width = y_labels.iter().map(|l| l.len()).max().unwrap_or(0) as u16;

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("Time", theme::secondary()))
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(format_time(t0), theme::muted()),
                    Span::styled(format_time((t0 + t1) / 2), theme::muted()),
                    Span::styled(format_time(t1), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("P&L", theme::secondary()))
                .style(theme::muted())
                .bounds([y_lower, y_upper])
                .labels(y_labels.iter().map(|l| Span::styled(l.clone(), theme::muted())).collect::<Vec<_>>()),
        );

    f.render_widget(chart, area);

    // Marker glyphs over the plot. The axis labels consume space on the
    // left and bottom; approximate the plot rectangle accordingly.
    let plot_left = area.x + label_width + 1;
    let plot_top = area.y;
    let plot_width = area.width.saturating_sub(label_width + 1);
    let plot_height = area.height.saturating_sub(2);
    if plot_width == 0 || plot_height == 0 {
        return;
    }

    let x_span = (x_max - x_min).max(f64::EPSILON);
    let y_span = (y_upper - y_lower).max(f64::EPSILON);
    let buf = f.buffer_mut();
    for annotation in app.annotations() {
        let x_frac = (annotation.time as f64 - x_min) / x_span;
        if !(0.0..=1.0).contains(&x_frac) {
            continue;
        }
        let px = plot_left + (x_frac * (plot_width - 1) as f64) as u16;
        let py = match annotation.value {
            Some(value) => {
                let y_frac = ((value - y_lower) / y_span).clamp(0.0, 1.0);
                plot_top + (plot_height - 1) - (y_frac * (plot_height - 1) as f64) as u16
            }
            // Nothing plottable at this time: anchor to the plot edge.
            None => plot_top + plot_height - 1,
        };

        let glyph = match annotation.kind {
            AnnotationKind::Adjustment => "◆",
            AnnotationKind::SquareUp => "■",
            AnnotationKind::Selection => "▼",
        };
        if px < area.right() && py >= plot_top && py < plot_top + plot_height {
            buf.set_string(px, py, glyph, theme::marker_style(annotation.kind));
        }
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    match app.selected_point() {
        Some(point) => {
            let snapshot = &point.snapshot;
            let mut spans = vec![
                Span::styled(
                    format!("Selected {} ", format_time(point.time)),
                    theme::accent_bold(),
                ),
                Span::styled(
                    if point.pnl.is_finite() {
                        format!("P&L {:+.2} ", point.pnl)
                    } else {
                        "P&L n/a ".to_string()
                    },
                    theme::pnl_style(point.pnl),
                ),
                Span::styled(
                    format!("| {} positions ", snapshot.position_count),
                    theme::secondary(),
                ),
            ];
            if let Some(marker) = snapshot.trade_marker.as_ref().filter(|_| snapshot.is_trade()) {
                spans.push(Span::styled(format!("| {}", marker.summary), theme::warning()));
            }
            lines.push(Line::from(spans));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No selection — ←/→ browse snapshots, [/] jump between trades",
                theme::muted(),
            )));
        }
    }

    let nav = |available: bool, label: &str| {
        if available {
            Span::styled(label.to_string(), theme::accent())
        } else {
            Span::styled(label.to_string(), theme::muted())
        }
    };
    lines.push(Line::from(vec![
        nav(app.can_navigate(NavDirection::Previous), "[ ‹ prev trade "),
        nav(app.can_navigate(NavDirection::Next), " next trade › ]"),
        Span::styled(
            format!(
                "   m:markers {}  u:underlying {}",
                if app.chart.show_markers { "on" } else { "off" },
                if app.chart.show_underlying { "on" } else { "off" },
            ),
            theme::secondary(),
        ),
    ]));

    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_app, test_snapshots};
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(app: &AppState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, app);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut content = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                content.push_str(buffer.cell((x, y)).unwrap().symbol());
            }
            content.push('\n');
        }
        content
    }

    #[test]
    fn empty_app_renders_hint() {
        let app = test_app();
        let content = render_to_string(&app);
        assert!(content.contains("No day loaded"));
    }

    #[test]
    fn empty_day_renders_empty_plot_message() {
        let mut app = test_app();
        app.install_day(NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(), Vec::new());
        let content = render_to_string(&app);
        assert!(content.contains("No snapshots recorded"));
    }

    #[test]
    fn loaded_day_renders_markers_and_footer() {
        let mut app = test_app();
        app.install_day(
            NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
            test_snapshots(),
        );
        let content = render_to_string(&app);
        // Trade glyphs: one adjustment, one square-up.
        assert!(content.contains('◆'));
        assert!(content.contains('■'));
        assert!(content.contains("No selection"));
    }

    #[test]
    fn selection_renders_cursor_and_detail() {
        let mut app = test_app();
        app.install_day(
            NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
            test_snapshots(),
        );
        app.select_time(60);
        let content = render_to_string(&app);
        assert!(content.contains('▼'));
        assert!(content.contains("Selected 00:01"));
        assert!(content.contains("+150.00"));
    }

    #[test]
    fn markers_toggle_hides_trade_glyphs() {
        let mut app = test_app();
        app.install_day(
            NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
            test_snapshots(),
        );
        app.chart.show_markers = false;
        let content = render_to_string(&app);
        assert!(!content.contains('◆'));
        assert!(!content.contains('■'));
    }
}
