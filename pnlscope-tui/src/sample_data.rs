//! Sample day generator for the demo mode.
//!
//! Produces a realistic-looking trading day: a noisy P&L walk tied to a
//! two-leg short strangle, an underlying drifting around its open, a
//! mid-session quantity adjustment, and a square-up before the close.
//! Markers are NOT pre-attached — the caller runs the trade analyzer,
//! exactly like a day loaded from disk.

use chrono::{NaiveDate, TimeZone, Utc};

use pnlscope_core::domain::{InstrumentInfo, InstrumentKind, PositionDetail};
use pnlscope_core::Snapshot;

const SNAPSHOT_INTERVAL_SECS: i64 = 60;
const SESSION_MINUTES: i64 = 375; // 09:15 to 15:30

pub fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 14).unwrap()
}

/// Deterministic pseudo-random in [-1, 1] via a linear congruential
/// generator, so sample data is reproducible without pulling in `rand`.
struct Lcg(u64);

impl Lcg {
    fn next_noise(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    }
}

/// Build the sample day's snapshots in chronological order.
pub fn sample_day() -> Vec<Snapshot> {
    let open = Utc.with_ymd_and_hms(2024, 8, 14, 9, 15, 0).unwrap();

    let mut rng = Lcg(42);
    let mut underlying = 22_400.0;
    let mut call_unbooked = 0.0;
    let mut put_unbooked = 0.0;

    let mut snapshots = Vec::with_capacity(SESSION_MINUTES as usize);
    for minute in 0..SESSION_MINUTES {
        let timestamp = open + chrono::Duration::seconds(minute * SNAPSHOT_INTERVAL_SECS);

        underlying += rng.next_noise() * 8.0;
        call_unbooked += rng.next_noise() * 120.0 + 2.5;
        put_unbooked += rng.next_noise() * 120.0 + 2.5;

        // Adjustment after two hours: double the call leg.
        let call_quantity = if minute < 120 { -50 } else { -100 };
        // Square up half an hour before the close.
        let squared_up = minute >= SESSION_MINUTES - 30;

        let positions = if squared_up {
            Vec::new()
        } else {
            vec![
                leg(1, "NIFTY2481522600CE", InstrumentKind::Call, 22_600.0,
                    call_quantity, 118.0, call_unbooked, underlying),
                leg(2, "NIFTY2481522200PE", InstrumentKind::Put, 22_200.0,
                    -50, 96.5, put_unbooked, underlying),
            ]
        };

        let booked_after_square_up = 1_850.0;
        let total_pnl = if squared_up {
            booked_after_square_up
        } else {
            positions.iter().map(|p| p.pnl()).sum()
        };

        snapshots.push(Snapshot {
            timestamp,
            total_pnl,
            underlying_price: Some(underlying),
            position_count: positions.len(),
            positions,
            trade_marker: None,
        });
    }

    snapshots
}

#[allow(clippy::too_many_arguments)]
fn leg(
    id: i64,
    symbol: &str,
    kind: InstrumentKind,
    strike: f64,
    quantity: i64,
    avg_price: f64,
    unbooked_pnl: f64,
    underlying: f64,
) -> PositionDetail {
    PositionDetail {
        instrument_id: id,
        instrument: InstrumentInfo {
            id,
            symbol: symbol.into(),
            underlying_symbol: "NIFTY".into(),
            kind,
            strike: Some(strike),
            expiry: Some("2024-08-15".into()),
        },
        quantity,
        avg_price,
        last_price: avg_price - unbooked_pnl / quantity.abs().max(1) as f64,
        unbooked_pnl,
        booked_pnl: 0.0,
        underlying_price: underlying,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnlscope_core::analyzer::annotate_trades;
    use pnlscope_core::domain::MarkerKind;
    use pnlscope_core::ReconciledSeries;

    #[test]
    fn sample_day_is_deterministic() {
        let a = sample_day();
        let b = sample_day();
        assert_eq!(a.len(), b.len());
        assert_eq!(a[100].total_pnl, b[100].total_pnl);
        assert_eq!(a[100].underlying_price, b[100].underlying_price);
    }

    #[test]
    fn sample_day_reconciles_cleanly() {
        let snapshots = sample_day();
        let series = ReconciledSeries::from_snapshots(&snapshots);
        assert_eq!(series.len(), snapshots.len());
        assert_eq!(series.pnl_points().len(), snapshots.len());
    }

    #[test]
    fn analyzer_finds_the_scripted_trades() {
        let snapshots = annotate_trades(sample_day());
        assert!(snapshots[0].trade_marker.is_none());

        let kinds: Vec<MarkerKind> = snapshots
            .iter()
            .filter(|s| s.is_trade())
            .map(|s| s.trade_marker.as_ref().unwrap().kind)
            .collect();
        // The quantity adjustment and the square-up, nothing else.
        assert_eq!(kinds, vec![MarkerKind::Adjustment, MarkerKind::SquareUp]);
    }
}
