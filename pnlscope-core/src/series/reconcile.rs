//! Series reconciliation — dedup by timestamp (last write wins) and
//! ascending time order, plus the plot-series accessors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::Snapshot;

/// Convert a snapshot timestamp to its plot coordinate.
///
/// The series time domain is whole seconds since the UNIX epoch. This is
/// the single conversion between timestamps and plot coordinates: the
/// reconciler keys on it and every selection coordinate is interpreted
/// through the same function, so the equality join in [`ReconciledSeries::point_at`]
/// cannot silently break if upstream precision changes.
pub fn point_time(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp()
}

/// One reconciled point: the plot coordinate, the values to plot, and the
/// snapshot it joins back to.
#[derive(Debug, Clone)]
pub struct SeriesPoint {
    /// Whole seconds since the UNIX epoch; unique within a series.
    pub time: i64,
    /// Raw P&L value. Non-finite values are retained here but excluded
    /// from [`ReconciledSeries::pnl_points`].
    pub pnl: f64,
    pub underlying: Option<f64>,
    pub snapshot: Snapshot,
}

/// Deduplicated, ascending-time projection of a day's snapshots.
///
/// Invariants: no two points share a `time`, and points are sorted
/// ascending by `time`. Both are established here regardless of input
/// order; duplicate timestamps resolve to the entry appearing later in
/// input order.
#[derive(Debug, Clone, Default)]
pub struct ReconciledSeries {
    points: Vec<SeriesPoint>,
}

impl ReconciledSeries {
    /// Build a series from snapshots in delivery order.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Self {
        let mut by_time: BTreeMap<i64, SeriesPoint> = BTreeMap::new();
        for snapshot in snapshots {
            let time = point_time(snapshot.timestamp);
            // Insert overwrites: later input wins for a duplicate time.
            by_time.insert(
                time,
                SeriesPoint {
                    time,
                    pnl: snapshot.total_pnl,
                    underlying: snapshot.underlying_price,
                    snapshot: snapshot.clone(),
                },
            );
        }
        Self {
            points: by_time.into_values().collect(),
        }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// P&L plot series: `(time, value)` ascending, finite values only.
    /// Points with a non-finite P&L stay in the series (their underlying
    /// and marker still render) but do not appear here.
    pub fn pnl_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter(|p| p.pnl.is_finite())
            .map(|p| (p.time as f64, p.pnl))
            .collect()
    }

    /// Underlying plot series, independently filtered to finite quotes.
    pub fn underlying_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.underlying.filter(|u| u.is_finite()).map(|u| (p.time as f64, u)))
            .collect()
    }

    /// Look up the point plotted at exactly `time`, or `None`.
    ///
    /// Exact integer-second equality, no nearest-neighbor fallback: a
    /// miss is the defined signal for "selection cleared". Binary search
    /// over the sorted points, so this is cheap to call per interaction.
    pub fn point_at(&self, time: i64) -> Option<&SeriesPoint> {
        self.points
            .binary_search_by_key(&time, |p| p.time)
            .ok()
            .map(|i| &self.points[i])
    }

    /// Look up the snapshot plotted at exactly `time`.
    pub fn snapshot_at(&self, time: i64) -> Option<&Snapshot> {
        self.point_at(time).map(|p| &p.snapshot)
    }

    /// Index of the point at exactly `time`, if present.
    pub fn index_of(&self, time: i64) -> Option<usize> {
        self.points.binary_search_by_key(&time, |p| p.time).ok()
    }

    /// Trade-marked points in ascending time order.
    pub fn trade_points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter().filter(|p| p.snapshot.is_trade())
    }
}
