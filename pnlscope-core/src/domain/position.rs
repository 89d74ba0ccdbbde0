//! Per-position detail carried by each snapshot.

use serde::{Deserialize, Deserializer, Serialize};

/// Instrument kind as reported by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstrumentKind {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
    #[serde(rename = "FUT")]
    Future,
    #[serde(rename = "OTHER")]
    Other,
}

impl<'de> Deserialize<'de> for InstrumentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Venue codes come and go; unknowns stay loadable.
        let code = String::deserialize(deserializer)?;
        Ok(match code.as_str() {
            "CE" => Self::Call,
            "PE" => Self::Put,
            "FUT" => Self::Future,
            _ => Self::Other,
        })
    }
}

/// Static instrument identity. Options carry a strike and expiry;
/// futures carry only an expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub id: i64,
    pub symbol: String,
    pub underlying_symbol: String,
    pub kind: InstrumentKind,
    pub strike: Option<f64>,
    pub expiry: Option<String>,
}

/// One open position at a snapshot instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDetail {
    pub instrument_id: i64,
    pub instrument: InstrumentInfo,
    pub quantity: i64,
    pub avg_price: f64,
    pub last_price: f64,
    pub unbooked_pnl: f64,
    pub booked_pnl: f64,
    pub underlying_price: f64,
}

impl PositionDetail {
    /// Total P&L contribution of this position (booked + unbooked).
    pub fn pnl(&self) -> f64 {
        self.booked_pnl + self.unbooked_pnl
    }
}
