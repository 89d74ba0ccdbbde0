//! Snapshot sources — where a day's snapshots come from.
//!
//! The `SnapshotSource` trait abstracts over the local day store and the
//! remote dashboard API so the TUI worker and the CLI can swap them and
//! mock for tests. The core only ever observes "data present" vs.
//! "no data"; failures surface as `SourceError`, never as a partially
//! applied series.

mod http;
mod live;
mod store;

pub use http::HttpSource;
pub use live::{InstrumentRegistry, LiveFeed, LivePayload};
pub use store::DayStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Snapshot;

/// Structured error types for snapshot sources, displayable in both CLI
/// and TUI contexts.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no snapshots recorded for {date}")]
    NoSuchDay { date: NaiveDate },

    #[error("day store error: {0}")]
    Store(String),

    #[error("malformed day file: {0}")]
    MalformedDay(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("server rejected request: {0}")]
    ServerError(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

/// A day-scoped snapshot source.
///
/// `fetch_day` returns snapshots in delivery order — callers must not
/// assume uniqueness or chronological order; the Reconciled Series
/// establishes both. Filter keys (see [`crate::filters`]) restrict the
/// book before anything downstream sees it.
pub trait SnapshotSource: Send {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Days this source can serve, newest first.
    fn available_days(&self) -> Result<Vec<NaiveDate>, SourceError>;

    /// All snapshots for one trading day, restricted to `filters` when
    /// non-empty.
    fn fetch_day(&self, date: NaiveDate, filters: &[String])
        -> Result<Vec<Snapshot>, SourceError>;
}
