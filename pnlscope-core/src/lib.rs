//! pnlscope core — domain types, series reconciliation, trade analysis,
//! and snapshot sources for the trading-day P&L dashboard.
//!
//! The heart of this crate is the Reconciled Series: the deduplicated,
//! time-sorted projection of a day's snapshots that the chart, the point
//! lookup, the trade navigation, and the marker overlay all share.
//! Everything around it — trade analysis, day summaries, position
//! filters, the day store and HTTP source — feeds that projection or is
//! derived from it.

pub mod analyzer;
pub mod domain;
pub mod filters;
pub mod series;
pub mod source;
pub mod summary;

pub use domain::{MarkerKind, PositionDetail, Snapshot, TradeMarker};
pub use series::{Annotation, AnnotationKind, Direction, ReconciledSeries, SeriesPoint};
pub use source::{SnapshotSource, SourceError};
pub use summary::DaySummary;
