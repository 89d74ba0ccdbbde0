//! Snapshot — one timestamped record of account P&L, optional underlying
//! quote, and position detail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::position::PositionDetail;

/// Trade-marker kind. `None` is treated identically to an absent marker
/// by every series algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    None,
    Adjustment,
    SquareUp,
}

/// What changed for a single instrument between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Closed,
    QuantityChange,
    PriceChange,
}

/// One position change inside a trade marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionChange {
    pub instrument_id: i64,
    pub instrument_symbol: String,
    pub change: ChangeKind,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub old_price: f64,
    pub new_price: f64,
}

/// Annotation attached to a snapshot describing a position-changing event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMarker {
    pub kind: MarkerKind,
    pub changes: Vec<PositionChange>,
    pub summary: String,
}

/// State of the trading account at one instant (source precision: seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    /// May be non-finite in malformed input; such values stay on the
    /// snapshot but are excluded from every plotted value set.
    #[serde(default = "nan", deserialize_with = "f64_or_nan")]
    pub total_pnl: f64,
    #[serde(default)]
    pub underlying_price: Option<f64>,
    pub position_count: usize,
    #[serde(default)]
    pub positions: Vec<PositionDetail>,
    #[serde(default)]
    pub trade_marker: Option<TradeMarker>,
}

impl Snapshot {
    /// True if this snapshot carries a position-changing event.
    pub fn is_trade(&self) -> bool {
        self.trade_marker
            .as_ref()
            .is_some_and(|m| m.kind != MarkerKind::None)
    }
}

fn nan() -> f64 {
    f64::NAN
}

/// Accept `null` (or a missing field, via the default) for `total_pnl`
/// instead of rejecting the whole snapshot.
fn f64_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
