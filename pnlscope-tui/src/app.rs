//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via
//! channels; every event handler gets `&mut AppState` and runs to
//! completion before the next, so the reconciled series is always fully
//! rebuilt (and stale selection cleared) before any dependent read.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use pnlscope_core::series::build_annotations;
use pnlscope_core::{
    Annotation, DaySummary, Direction, ReconciledSeries, SeriesPoint, Snapshot,
};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Days,
    Chart,
    Positions,
    Trades,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Days => 0,
            Panel::Chart => 1,
            Panel::Positions => 2,
            Panel::Trades => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Days),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Positions),
            3 => Some(Panel::Trades),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Days => "Days",
            Panel::Chart => "Chart",
            Panel::Positions => "Positions",
            Panel::Trades => "Trades",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 5).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 4) % 5).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The snapshot source failed (missing day, unreadable store).
    Source,
    /// The day loaded but its content was unusable.
    Data,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Source => "SRC",
            ErrorCategory::Data => "DATA",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    ErrorHistory,
}

/// Days panel state.
#[derive(Debug, Default)]
pub struct DaysPanelState {
    /// Available trading days, newest first.
    pub dates: Vec<NaiveDate>,
    pub cursor: usize,
    pub scanning: bool,
}

/// Chart panel state — display toggles plus the selection.
#[derive(Debug)]
pub struct ChartPanelState {
    pub show_markers: bool,
    pub show_underlying: bool,
    /// Selected point's time key. Resolved through the series on every
    /// read, so a stale key can never surface a stale snapshot.
    pub selected_time: Option<i64>,
}

impl Default for ChartPanelState {
    fn default() -> Self {
        Self {
            show_markers: true,
            show_underlying: false,
            selected_time: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PositionsPanelState {
    pub scroll: usize,
}

#[derive(Debug, Default)]
pub struct TradesPanelState {
    pub cursor: usize,
}

/// One fully loaded trading day with its derived projection.
///
/// The series is derived exactly once per (day data, filter) change and
/// replaced wholesale — handlers and renderers read this stored
/// projection instead of re-deriving it.
pub struct LoadedDay {
    pub date: NaiveDate,
    pub snapshots: Vec<Snapshot>,
    pub series: ReconciledSeries,
    pub summary: DaySummary,
}

/// A day load in flight, tagged for last-request-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub request_id: u64,
    pub date: NaiveDate,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Panel states
    pub days: DaysPanelState,
    pub chart: ChartPanelState,
    pub positions: PositionsPanelState,
    pub trades: TradesPanelState,

    // Loaded data
    pub day: Option<LoadedDay>,
    pub filter_keys: Vec<String>,
    pub loading: Option<PendingLoad>,
    next_request_id: u64,
    /// Day to auto-load once the first scan completes.
    pub pending_restore: Option<NaiveDate>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    // Paths
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Days,
            running: true,
            days: DaysPanelState::default(),
            chart: ChartPanelState::default(),
            positions: PositionsPanelState::default(),
            trades: TradesPanelState::default(),
            day: None,
            filter_keys: Vec::new(),
            loading: None,
            next_request_id: 0,
            pending_restore: None,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::None,
            data_dir,
        }
    }

    // ── Status and errors ────────────────────────────────────────────

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    // ── Day loading ──────────────────────────────────────────────────

    /// Ask the worker for a day. Supersedes any load in flight: only the
    /// newest request id will be installed when responses arrive.
    pub fn request_day(&mut self, date: NaiveDate) {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.loading = Some(PendingLoad { request_id, date });
        let _ = self.worker_tx.send(WorkerCommand::LoadDay {
            date,
            filters: self.filter_keys.clone(),
            request_id,
        });
        self.set_status(format!("Loading {date}..."));
    }

    /// Install a loaded day: rebuild the series, clear the selection,
    /// reset dependent cursors. One atomic step from the perspective of
    /// every dependent read.
    pub fn install_day(&mut self, date: NaiveDate, snapshots: Vec<Snapshot>) {
        let series = ReconciledSeries::from_snapshots(&snapshots);
        let summary = DaySummary::compute(date, &snapshots);
        self.day = Some(LoadedDay {
            date,
            snapshots,
            series,
            summary,
        });
        // Selection is session state tied to the previous snapshot list.
        self.chart.selected_time = None;
        self.trades.cursor = 0;
        self.positions.scroll = 0;
    }

    /// Handle a day-loaded response. Returns false for a stale response
    /// (superseded request), which is discarded untouched.
    pub fn handle_day_loaded(
        &mut self,
        request_id: u64,
        date: NaiveDate,
        snapshots: Vec<Snapshot>,
    ) -> bool {
        match self.loading {
            Some(pending) if pending.request_id == request_id => {
                self.loading = None;
                let count = snapshots.len();
                self.install_day(date, snapshots);
                if count == 0 {
                    self.set_warning(format!("{date}: day file is empty"));
                } else {
                    self.set_status(format!("{date}: {count} snapshots"));
                }
                true
            }
            _ => false,
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Resolve the current selection through the series. A key that no
    /// longer matches any point yields `None`.
    pub fn selected_point(&self) -> Option<&SeriesPoint> {
        let day = self.day.as_ref()?;
        day.series.point_at(self.chart.selected_time?)
    }

    pub fn selected_snapshot(&self) -> Option<&Snapshot> {
        self.selected_point().map(|p| &p.snapshot)
    }

    /// Select the point plotted at exactly `time`. A lookup miss clears
    /// the selection — that is the designed "selected outside any data
    /// point" behavior, not an error.
    pub fn select_time(&mut self, time: i64) {
        let hit = self
            .day
            .as_ref()
            .is_some_and(|d| d.series.point_at(time).is_some());
        self.chart.selected_time = hit.then_some(time);
    }

    pub fn clear_selection(&mut self) {
        self.chart.selected_time = None;
    }

    /// Step the selection by `delta` points along the series. With no
    /// selection, stepping left starts from the newest point and
    /// stepping right from the oldest.
    pub fn step_selection(&mut self, delta: i64) {
        let Some(day) = self.day.as_ref() else { return };
        if day.series.is_empty() {
            return;
        }
        let last = day.series.len() - 1;
        let index = match self.chart.selected_time.and_then(|t| day.series.index_of(t)) {
            Some(current) => {
                (current as i64 + delta).clamp(0, last as i64) as usize
            }
            None if delta < 0 => last,
            None => 0,
        };
        self.chart.selected_time = Some(day.series.points()[index].time);
    }

    /// Select the first/last plotted point.
    pub fn select_edge(&mut self, end: bool) {
        let Some(day) = self.day.as_ref() else { return };
        let point = if end { day.series.last() } else { day.series.first() };
        self.chart.selected_time = point.map(|p| p.time);
    }

    // ── Trade navigation ─────────────────────────────────────────────

    pub fn can_navigate(&self, direction: Direction) -> bool {
        self.day
            .as_ref()
            .is_some_and(|d| d.series.can_navigate_trade(self.chart.selected_time, direction))
    }

    /// Move the selection to the nearest trade in `direction`. A no-op
    /// at the boundary or with no selection.
    pub fn navigate_trade(&mut self, direction: Direction) {
        let Some(day) = self.day.as_ref() else { return };
        let Some(selected) = self.chart.selected_time else {
            return;
        };
        if let Some(point) = day.series.navigate_trade(selected, direction) {
            self.chart.selected_time = Some(point.time);
        }
    }

    // ── Derived views ────────────────────────────────────────────────

    /// Annotations for the chart overlay, ascending by time.
    pub fn annotations(&self) -> Vec<Annotation> {
        match self.day.as_ref() {
            Some(day) => build_annotations(
                &day.series,
                self.chart.show_markers,
                self.chart.selected_time,
            ),
            None => Vec::new(),
        }
    }

    /// Trade-marked points of the loaded day, ascending.
    pub fn trade_points(&self) -> Vec<&SeriesPoint> {
        self.day
            .as_ref()
            .map(|d| d.series.trade_points().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_app, test_snapshots};
    use pnlscope_core::domain::MarkerKind;

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Days.next(), Panel::Chart);
        assert_eq!(Panel::Help.next(), Panel::Days);
        assert_eq!(Panel::Days.prev(), Panel::Help);
        assert_eq!(Panel::Chart.prev(), Panel::Days);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..5 {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(5).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Data, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn install_day_clears_selection() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, test_snapshots());
        app.select_time(60);
        assert!(app.selected_snapshot().is_some());

        app.install_day(date, test_snapshots());
        assert!(app.chart.selected_time.is_none());
        assert!(app.selected_snapshot().is_none());
    }

    #[test]
    fn select_miss_clears_selection() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, test_snapshots());

        app.select_time(60);
        assert!(app.selected_snapshot().is_some());
        app.select_time(61); // between points: exact match only
        assert!(app.chart.selected_time.is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut app = test_app();
        let date_a = NaiveDate::from_ymd_opt(2024, 8, 13).unwrap();
        let date_b = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();

        app.request_day(date_a);
        let first_id = app.loading.unwrap().request_id;
        app.request_day(date_b);
        let second_id = app.loading.unwrap().request_id;
        assert_ne!(first_id, second_id);

        // The superseded load lands late: discarded, nothing installed.
        assert!(!app.handle_day_loaded(first_id, date_a, test_snapshots()));
        assert!(app.day.is_none());

        // The fresh load installs.
        assert!(app.handle_day_loaded(second_id, date_b, test_snapshots()));
        assert_eq!(app.day.as_ref().unwrap().date, date_b);
        assert!(app.loading.is_none());
    }

    #[test]
    fn step_selection_walks_the_series() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, test_snapshots());

        // No selection: left starts at the newest point.
        app.step_selection(-1);
        let last = app.day.as_ref().unwrap().series.last().unwrap().time;
        assert_eq!(app.chart.selected_time, Some(last));

        app.step_selection(-1);
        assert!(app.chart.selected_time.unwrap() < last);

        // Clamped at the edges.
        app.select_edge(false);
        let first = app.chart.selected_time.unwrap();
        app.step_selection(-1);
        assert_eq!(app.chart.selected_time, Some(first));
    }

    #[test]
    fn trade_navigation_moves_selection() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, test_snapshots());

        let trades: Vec<i64> = app.trade_points().iter().map(|p| p.time).collect();
        assert!(trades.len() >= 2);

        app.select_time(trades[0]);
        assert!(app.can_navigate(Direction::Next));
        app.navigate_trade(Direction::Next);
        assert_eq!(app.chart.selected_time, Some(trades[1]));

        app.navigate_trade(Direction::Previous);
        assert_eq!(app.chart.selected_time, Some(trades[0]));
    }

    #[test]
    fn navigation_unavailable_without_selection() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, test_snapshots());

        assert!(!app.can_navigate(Direction::Previous));
        assert!(!app.can_navigate(Direction::Next));
        app.navigate_trade(Direction::Next);
        assert!(app.chart.selected_time.is_none());
    }

    #[test]
    fn annotations_respect_marker_toggle() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, test_snapshots());

        assert!(!app.annotations().is_empty());
        app.chart.show_markers = false;
        assert!(app.annotations().is_empty());

        app.select_time(60);
        let anns = app.annotations();
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].kind, pnlscope_core::AnnotationKind::Selection);
    }

    #[test]
    fn empty_day_renders_nothing_navigable() {
        let mut app = test_app();
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        app.install_day(date, Vec::new());

        assert!(app.annotations().is_empty());
        assert!(app.trade_points().is_empty());
        assert!(!app.can_navigate(Direction::Next));
        app.step_selection(1);
        assert!(app.chart.selected_time.is_none());
    }

    #[test]
    fn test_snapshots_have_markers() {
        let snapshots = test_snapshots();
        assert!(snapshots
            .iter()
            .any(|s| s.trade_marker.as_ref().is_some_and(|m| m.kind == MarkerKind::SquareUp)));
    }
}
