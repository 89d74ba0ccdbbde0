//! Domain records: snapshots, trade markers, positions, instruments.

mod position;
mod snapshot;

pub use position::{InstrumentInfo, InstrumentKind, PositionDetail};
pub use snapshot::{ChangeKind, MarkerKind, PositionChange, Snapshot, TradeMarker};
