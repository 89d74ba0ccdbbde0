//! Shared fixtures for unit tests.

use std::path::PathBuf;
use std::sync::mpsc;

use chrono::{TimeZone, Utc};

use pnlscope_core::domain::{MarkerKind, TradeMarker};
use pnlscope_core::Snapshot;

use crate::app::AppState;

/// An AppState wired to dangling channels — good enough for state tests.
pub fn test_app() -> AppState {
    let (tx, _rx) = mpsc::channel();
    let (_tx2, rx2) = mpsc::channel();
    AppState::new(tx, rx2, PathBuf::from("."))
}

/// Five snapshots at one-minute spacing: an adjustment at t=60, a
/// `none` marker at t=120, a square-up at t=240.
pub fn test_snapshots() -> Vec<Snapshot> {
    let snap = |secs: i64, pnl: f64, kind: Option<MarkerKind>| Snapshot {
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        total_pnl: pnl,
        underlying_price: Some(22_400.0 + secs as f64 * 0.1),
        position_count: 0,
        positions: Vec::new(),
        trade_marker: kind.map(|kind| TradeMarker {
            kind,
            changes: Vec::new(),
            summary: match kind {
                MarkerKind::SquareUp => "Square-up: Closed 2 positions".into(),
                MarkerKind::Adjustment => "Adjustment: 1 new".into(),
                MarkerKind::None => "No changes".into(),
            },
        }),
    };

    vec![
        snap(0, 0.0, None),
        snap(60, 150.0, Some(MarkerKind::Adjustment)),
        snap(120, 90.0, Some(MarkerKind::None)),
        snap(180, -40.0, None),
        snap(240, 210.0, Some(MarkerKind::SquareUp)),
    ]
}
