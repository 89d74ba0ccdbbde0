//! Trade navigation — previous/next trade-marked point relative to the
//! current selection.

use super::reconcile::{ReconciledSeries, SeriesPoint};

/// Navigation direction through the trade-marked subsequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl ReconciledSeries {
    /// The trade-marked point strictly before/after `selected` in time,
    /// or `None` when the boundary has been reached.
    pub fn navigate_trade(&self, selected: i64, direction: Direction) -> Option<&SeriesPoint> {
        match direction {
            Direction::Next => self
                .points()
                .iter()
                .find(|p| p.time > selected && p.snapshot.is_trade()),
            Direction::Previous => self
                .points()
                .iter()
                .rev()
                .find(|p| p.time < selected && p.snapshot.is_trade()),
        }
    }

    /// Whether [`navigate_trade`](Self::navigate_trade) would move the
    /// selection. Pure query; always agrees with the actual navigation.
    /// No selection → unavailable in both directions.
    pub fn can_navigate_trade(&self, selected: Option<i64>, direction: Direction) -> bool {
        selected.is_some_and(|time| self.navigate_trade(time, direction).is_some())
    }
}
