//! Position filters — restrict a day's snapshots to selected
//! (underlying, expiry) groups and recompute the aggregates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{PositionDetail, Snapshot};

/// One selectable (underlying, expiry) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub underlying_symbol: String,
    pub expiry: String,
    /// Join key, `"UNDERLYING|EXPIRY"`.
    pub key: String,
}

fn position_key(position: &PositionDetail) -> String {
    format!(
        "{}|{}",
        position.instrument.underlying_symbol,
        position.instrument.expiry.as_deref().unwrap_or_default()
    )
}

/// Distinct filter options over all positions of the day, sorted by key.
pub fn available_filters(snapshots: &[Snapshot]) -> Vec<FilterOption> {
    let keys: BTreeSet<String> = snapshots
        .iter()
        .flat_map(|s| s.positions.iter().map(position_key))
        .collect();

    keys.into_iter()
        .map(|key| {
            let (underlying, expiry) = key.split_once('|').unwrap_or((key.as_str(), ""));
            FilterOption {
                underlying_symbol: underlying.to_string(),
                expiry: expiry.to_string(),
                key: key.clone(),
            }
        })
        .collect()
}

/// Restrict snapshots to positions matching any of `keys`.
///
/// `total_pnl` is recomputed as the sum of kept positions' booked and
/// unbooked P&L, `underlying_price` comes from the first kept position,
/// and `position_count` is updated. An empty key list leaves the input
/// unchanged. Applied before trade analysis, so markers reflect the
/// filtered book.
pub fn apply_filters(snapshots: &[Snapshot], keys: &[String]) -> Vec<Snapshot> {
    if keys.is_empty() {
        return snapshots.to_vec();
    }

    snapshots
        .iter()
        .map(|snapshot| {
            let positions: Vec<PositionDetail> = snapshot
                .positions
                .iter()
                .filter(|p| keys.contains(&position_key(p)))
                .cloned()
                .collect();

            Snapshot {
                timestamp: snapshot.timestamp,
                total_pnl: positions.iter().map(|p| p.pnl()).sum(),
                underlying_price: positions.first().map(|p| p.underlying_price),
                position_count: positions.len(),
                positions,
                trade_marker: snapshot.trade_marker.clone(),
            }
        })
        .collect()
}
