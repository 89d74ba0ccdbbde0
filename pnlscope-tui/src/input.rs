//! Keyboard input dispatch — overlays → global keys → panel-specific
//! handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use pnlscope_core::Direction;

use crate::app::{AppState, Overlay, Panel};
use crate::worker::WorkerCommand;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Days; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Positions; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Trades; return; }
        KeyCode::Char('5') => { app.active_panel = Panel::Help; return; }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Tab => {
            app.active_panel = app.active_panel.next();
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Days => handle_days_key(app, key),
        Panel::Chart => handle_chart_key(app, key),
        Panel::Positions => handle_positions_key(app, key),
        Panel::Trades => handle_trades_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_days_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.days.cursor + 1 < app.days.dates.len() {
                app.days.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.days.cursor = app.days.cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(&date) = app.days.dates.get(app.days.cursor) {
                app.request_day(date);
                app.active_panel = Panel::Chart;
            }
        }
        KeyCode::Char('r') => {
            app.days.scanning = true;
            let _ = app.worker_tx.send(WorkerCommand::ScanDays);
            app.set_status("Rescanning data directory...");
        }
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.step_selection(-1),
        KeyCode::Right | KeyCode::Char('l') => app.step_selection(1),
        KeyCode::Home | KeyCode::Char('g') => app.select_edge(false),
        KeyCode::End | KeyCode::Char('G') => app.select_edge(true),
        KeyCode::Char('[') => app.navigate_trade(Direction::Previous),
        KeyCode::Char(']') => app.navigate_trade(Direction::Next),
        KeyCode::Char('m') => {
            app.chart.show_markers = !app.chart.show_markers;
        }
        KeyCode::Char('u') => {
            app.chart.show_underlying = !app.chart.show_underlying;
        }
        KeyCode::Esc => app.clear_selection(),
        _ => {}
    }
}

fn handle_positions_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app
        .selected_snapshot()
        .or_else(|| app.day.as_ref().and_then(|d| d.series.last()).map(|p| &p.snapshot))
        .map(|s| s.positions.len())
        .unwrap_or(0);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.positions.scroll + 1 < row_count {
                app.positions.scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.positions.scroll = app.positions.scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_trades_key(app: &mut AppState, key: KeyEvent) {
    let trade_count = app.trade_points().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.trades.cursor + 1 < trade_count {
                app.trades.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.trades.cursor = app.trades.cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            let time = app.trade_points().get(app.trades.cursor).map(|p| p.time);
            if let Some(time) = time {
                app.select_time(time);
                app.active_panel = Panel::Chart;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_app, test_snapshots};
    use chrono::NaiveDate;

    fn loaded_app() -> AppState {
        let mut app = test_app();
        app.install_day(
            NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
            test_snapshots(),
        );
        app
    }

    #[test]
    fn quit_on_q() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('2')));
        assert_eq!(app.active_panel, Panel::Chart);
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('4')));
        assert_eq!(app.active_panel, Panel::Trades);
    }

    #[test]
    fn tab_cycles_panels() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Chart);
        handle_key(&mut app, KeyEvent::from(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Days);
    }

    #[test]
    fn welcome_overlay_dismisses_on_any_key() {
        let mut app = test_app();
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('x')));
        assert_eq!(app.overlay, Overlay::None);
        // The key is consumed by the overlay, not dispatched further.
        assert!(app.running);
    }

    #[test]
    fn chart_toggles() {
        let mut app = loaded_app();
        app.active_panel = Panel::Chart;

        handle_key(&mut app, KeyEvent::from(KeyCode::Char('m')));
        assert!(!app.chart.show_markers);
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('u')));
        assert!(app.chart.show_underlying);
    }

    #[test]
    fn chart_arrows_move_selection_and_esc_clears() {
        let mut app = loaded_app();
        app.active_panel = Panel::Chart;

        handle_key(&mut app, KeyEvent::from(KeyCode::Left));
        assert!(app.chart.selected_time.is_some());
        handle_key(&mut app, KeyEvent::from(KeyCode::Esc));
        assert!(app.chart.selected_time.is_none());
    }

    #[test]
    fn bracket_keys_jump_between_trades() {
        let mut app = loaded_app();
        app.active_panel = Panel::Chart;
        app.select_time(60); // the adjustment

        handle_key(&mut app, KeyEvent::from(KeyCode::Char(']')));
        assert_eq!(app.chart.selected_time, Some(240)); // the square-up
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('[')));
        assert_eq!(app.chart.selected_time, Some(60));
        // At the boundary: no-op.
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('[')));
        assert_eq!(app.chart.selected_time, Some(60));
    }

    #[test]
    fn trades_enter_selects_and_switches_to_chart() {
        let mut app = loaded_app();
        app.active_panel = Panel::Trades;
        app.trades.cursor = 1;

        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.active_panel, Panel::Chart);
        assert_eq!(app.chart.selected_time, Some(240));
    }

    #[test]
    fn days_cursor_stays_in_bounds() {
        let mut app = test_app();
        app.days.dates = vec![
            NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 13).unwrap(),
        ];
        app.active_panel = Panel::Days;

        handle_key(&mut app, KeyEvent::from(KeyCode::Down));
        assert_eq!(app.days.cursor, 1);
        handle_key(&mut app, KeyEvent::from(KeyCode::Down));
        assert_eq!(app.days.cursor, 1);
        handle_key(&mut app, KeyEvent::from(KeyCode::Up));
        assert_eq!(app.days.cursor, 0);
    }

    #[test]
    fn error_overlay_opens_and_closes() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('e')));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        handle_key(&mut app, KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }
}
