//! Day summary statistics derived from a snapshot list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Snapshot;

/// Min/max/open/close of the underlying over the day, when any quote
/// was present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingRange {
    pub min: f64,
    pub max: f64,
    pub open: f64,
    pub close: f64,
}

/// Aggregate statistics for one trading day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_snapshots: usize,
    /// Count of trade-marked snapshots.
    pub total_trades: usize,
    pub final_pnl: f64,
    pub min_pnl: f64,
    pub max_pnl: f64,
    /// First/last snapshot time, `HH:MM:SS`.
    pub market_open: Option<String>,
    pub market_close: Option<String>,
    pub underlying_range: Option<UnderlyingRange>,
}

impl DaySummary {
    /// Empty-day summary: zeroed statistics, no timings, no range.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_snapshots: 0,
            total_trades: 0,
            final_pnl: 0.0,
            min_pnl: 0.0,
            max_pnl: 0.0,
            market_open: None,
            market_close: None,
            underlying_range: None,
        }
    }

    /// Compute a summary over snapshots in delivery order.
    ///
    /// Non-finite P&L values are excluded from the statistics the same
    /// way the plot excludes them; underlying range covers present,
    /// finite quotes only.
    pub fn compute(date: NaiveDate, snapshots: &[Snapshot]) -> Self {
        if snapshots.is_empty() {
            return Self::empty(date);
        }

        let pnl_values: Vec<f64> = snapshots
            .iter()
            .map(|s| s.total_pnl)
            .filter(|v| v.is_finite())
            .collect();
        let final_pnl = pnl_values.last().copied().unwrap_or(0.0);
        let min_pnl = pnl_values.iter().copied().fold(f64::INFINITY, f64::min);
        let max_pnl = pnl_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let quotes: Vec<f64> = snapshots
            .iter()
            .filter_map(|s| s.underlying_price.filter(|u| u.is_finite()))
            .collect();
        let underlying_range = quotes.first().map(|&open| UnderlyingRange {
            min: quotes.iter().copied().fold(f64::INFINITY, f64::min),
            max: quotes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            open,
            close: *quotes.last().unwrap_or(&open),
        });

        Self {
            date,
            total_snapshots: snapshots.len(),
            total_trades: snapshots.iter().filter(|s| s.is_trade()).count(),
            final_pnl,
            min_pnl: if pnl_values.is_empty() { 0.0 } else { min_pnl },
            max_pnl: if pnl_values.is_empty() { 0.0 } else { max_pnl },
            market_open: snapshots
                .first()
                .map(|s| s.timestamp.format("%H:%M:%S").to_string()),
            market_close: snapshots
                .last()
                .map(|s| s.timestamp.format("%H:%M:%S").to_string()),
            underlying_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarkerKind, TradeMarker};
    use chrono::{TimeZone, Utc};

    fn snap(secs: i64, pnl: f64, underlying: Option<f64>, trade: bool) -> Snapshot {
        Snapshot {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            total_pnl: pnl,
            underlying_price: underlying,
            position_count: 0,
            positions: Vec::new(),
            trade_marker: trade.then(|| TradeMarker {
                kind: MarkerKind::Adjustment,
                changes: Vec::new(),
                summary: String::new(),
            }),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 14).unwrap()
    }

    #[test]
    fn empty_day_is_zeroed() {
        let summary = DaySummary::compute(date(), &[]);
        assert_eq!(summary.total_snapshots, 0);
        assert_eq!(summary.final_pnl, 0.0);
        assert!(summary.market_open.is_none());
        assert!(summary.underlying_range.is_none());
    }

    #[test]
    fn basic_statistics() {
        // 09:15:00 UTC onwards, one-minute spacing.
        let base = Utc
            .with_ymd_and_hms(2024, 8, 14, 9, 15, 0)
            .unwrap()
            .timestamp();
        let snapshots = vec![
            snap(base, -120.0, Some(22_400.0), false),
            snap(base + 60, 340.0, Some(22_450.0), true),
            snap(base + 120, 90.0, Some(22_430.0), false),
        ];
        let summary = DaySummary::compute(date(), &snapshots);
        assert_eq!(summary.total_snapshots, 3);
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.final_pnl, 90.0);
        assert_eq!(summary.min_pnl, -120.0);
        assert_eq!(summary.max_pnl, 340.0);
        assert_eq!(summary.market_open.as_deref(), Some("09:15:00"));
        assert_eq!(summary.market_close.as_deref(), Some("09:17:00"));

        let range = summary.underlying_range.unwrap();
        assert_eq!(range.open, 22_400.0);
        assert_eq!(range.close, 22_430.0);
        assert_eq!(range.min, 22_400.0);
        assert_eq!(range.max, 22_450.0);
    }

    #[test]
    fn non_finite_pnl_excluded_from_statistics() {
        let snapshots = vec![
            snap(0, 100.0, None, false),
            snap(60, f64::NAN, None, false),
            snap(120, 50.0, None, false),
        ];
        let summary = DaySummary::compute(date(), &snapshots);
        assert_eq!(summary.final_pnl, 50.0);
        assert_eq!(summary.min_pnl, 50.0);
        assert_eq!(summary.max_pnl, 100.0);
    }

    #[test]
    fn all_pnl_malformed_yields_zeroes_but_counts_snapshots() {
        let snapshots = vec![snap(0, f64::NAN, Some(22_000.0), false)];
        let summary = DaySummary::compute(date(), &snapshots);
        assert_eq!(summary.total_snapshots, 1);
        assert_eq!(summary.final_pnl, 0.0);
        assert_eq!(summary.min_pnl, 0.0);
        assert_eq!(summary.max_pnl, 0.0);
        assert!(summary.underlying_range.is_some());
    }
}
