//! Remote dashboard API source.
//!
//! Speaks the day-scoped JSON API: `GET /api/trading-days` and
//! `GET /api/data/{date}?filters=...`, with every response wrapped in a
//! `{success, data, message, error}` envelope.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::Snapshot;

use super::{SnapshotSource, SourceError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP snapshot source.
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TradingDaysPayload {
    available_dates: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct DayPayload {
    timeseries: Vec<Snapshot>,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::NetworkUnreachable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn get_envelope(
        &self,
        url: &str,
        query: &[(&str, &str)],
        date: Option<NaiveDate>,
    ) -> Result<ApiEnvelope, SourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| SourceError::NetworkUnreachable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            if let Some(date) = date {
                return Err(SourceError::NoSuchDay { date });
            }
        }
        if !response.status().is_success() {
            return Err(SourceError::ServerError(format!(
                "{url}: HTTP {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope = response
            .json()
            .map_err(|e| SourceError::ResponseFormatChanged(e.to_string()))?;
        if !envelope.success {
            let detail = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "no detail".into());
            return Err(SourceError::ServerError(detail));
        }
        Ok(envelope)
    }

    fn payload<T: serde::de::DeserializeOwned>(envelope: ApiEnvelope) -> Result<T, SourceError> {
        let data = envelope
            .data
            .ok_or_else(|| SourceError::ResponseFormatChanged("missing data field".into()))?;
        serde_json::from_value(data).map_err(|e| SourceError::ResponseFormatChanged(e.to_string()))
    }
}

impl SnapshotSource for HttpSource {
    fn name(&self) -> &str {
        "dashboard API"
    }

    fn available_days(&self) -> Result<Vec<NaiveDate>, SourceError> {
        let url = format!("{}/api/trading-days", self.base_url);
        let envelope = self.get_envelope(&url, &[], None)?;
        let payload: TradingDaysPayload = Self::payload(envelope)?;
        Ok(payload.available_dates)
    }

    fn fetch_day(
        &self,
        date: NaiveDate,
        filters: &[String],
    ) -> Result<Vec<Snapshot>, SourceError> {
        let url = format!("{}/api/data/{}", self.base_url, date.format("%Y-%m-%d"));
        // Filter keys contain '|' and must be query-encoded.
        let query: Vec<(&str, &str)> = filters.iter().map(|k| ("filters", k.as_str())).collect();
        let envelope = self.get_envelope(&url, &query, Some(date))?;
        let payload: DayPayload = Self::payload(envelope)?;
        Ok(payload.timeseries)
    }
}
