//! Live positions feed — polls a broker snapshot endpoint and converts
//! its payload into a domain [`Snapshot`] for the recorder.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{InstrumentInfo, InstrumentKind, PositionDetail, Snapshot};

use super::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Assigns stable instrument ids per trading symbol within one
/// recording session (the feed itself carries no numeric ids).
#[derive(Debug, Default)]
pub struct InstrumentRegistry {
    by_symbol: HashMap<String, i64>,
}

impl InstrumentRegistry {
    pub fn id_for(&mut self, symbol: &str) -> i64 {
        let next = self.by_symbol.len() as i64 + 1;
        *self.by_symbol.entry(symbol.to_string()).or_insert(next)
    }
}

// Feed payload shapes, as delivered by the venue.

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    success: bool,
    #[serde(default)]
    payload: Option<LivePayload>,
}

#[derive(Debug, Deserialize)]
pub struct LivePayload {
    position_snapshot_data: SnapshotData,
}

#[derive(Debug, Deserialize)]
struct SnapshotData {
    created_at: DateTime<Utc>,
    total_profit: f64,
    #[serde(default)]
    data: Vec<PositionGroup>,
}

#[derive(Debug, Deserialize)]
struct PositionGroup {
    trading_symbol: String,
    #[serde(default)]
    underlying_price: Option<f64>,
    #[serde(default)]
    trades: Vec<FeedTrade>,
}

#[derive(Debug, Deserialize)]
struct FeedTrade {
    trading_symbol: String,
    #[serde(default)]
    instrument_info: FeedInstrumentInfo,
    quantity: i64,
    average_price: f64,
    last_price: f64,
    unbooked_pnl: f64,
    booked_profit_loss: f64,
}

#[derive(Debug, Default, Deserialize)]
struct FeedInstrumentInfo {
    #[serde(default)]
    instrument_type: Option<String>,
    #[serde(default)]
    strike: Option<f64>,
    #[serde(default)]
    expiry: Option<String>,
}

fn kind_from_feed(instrument_type: Option<&str>) -> InstrumentKind {
    match instrument_type {
        Some("CALL") => InstrumentKind::Call,
        Some("PUT") => InstrumentKind::Put,
        Some("FUTURE") | Some("FUT") => InstrumentKind::Future,
        _ => InstrumentKind::Other,
    }
}

/// Convert one feed payload into a domain snapshot.
pub fn snapshot_from_payload(payload: LivePayload, registry: &mut InstrumentRegistry) -> Snapshot {
    let data = payload.position_snapshot_data;

    let mut positions = Vec::new();
    let mut underlying_price = None;
    for group in &data.data {
        if underlying_price.is_none() {
            underlying_price = group.underlying_price;
        }
        for trade in &group.trades {
            let id = registry.id_for(&trade.trading_symbol);
            positions.push(PositionDetail {
                instrument_id: id,
                instrument: InstrumentInfo {
                    id,
                    symbol: trade.trading_symbol.clone(),
                    underlying_symbol: group.trading_symbol.clone(),
                    kind: kind_from_feed(trade.instrument_info.instrument_type.as_deref()),
                    strike: trade.instrument_info.strike,
                    expiry: trade.instrument_info.expiry.clone(),
                },
                quantity: trade.quantity,
                avg_price: trade.average_price,
                last_price: trade.last_price,
                unbooked_pnl: trade.unbooked_pnl,
                booked_pnl: trade.booked_profit_loss,
                underlying_price: group.underlying_price.unwrap_or(f64::NAN),
            });
        }
    }

    Snapshot {
        timestamp: data.created_at,
        total_pnl: data.total_profit,
        underlying_price,
        position_count: positions.len(),
        positions,
        trade_marker: None,
    }
}

/// Blocking poller for the live feed endpoint.
pub struct LiveFeed {
    url: String,
    client: reqwest::blocking::Client,
}

impl LiveFeed {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::NetworkUnreachable(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Fetch one snapshot from the feed.
    pub fn poll(&self, registry: &mut InstrumentRegistry) -> Result<Snapshot, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .header("accept", "application/json, text/plain, */*")
            .send()
            .map_err(|e| SourceError::NetworkUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::ServerError(format!(
                "{}: HTTP {}",
                self.url,
                response.status()
            )));
        }

        let envelope: FeedEnvelope = response
            .json()
            .map_err(|e| SourceError::ResponseFormatChanged(e.to_string()))?;
        if !envelope.success {
            return Err(SourceError::ServerError("feed reported failure".into()));
        }
        let payload = envelope
            .payload
            .ok_or_else(|| SourceError::ResponseFormatChanged("missing payload".into()))?;
        Ok(snapshot_from_payload(payload, registry))
    }
}
