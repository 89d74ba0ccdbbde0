//! Trade-marker derivation — compares consecutive snapshots' books and
//! attaches a marker describing what changed.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{
    ChangeKind, MarkerKind, PositionChange, PositionDetail, Snapshot, TradeMarker,
};

/// Average-price drift below this is noise, not a trade.
const PRICE_TOLERANCE: f64 = 0.01;

/// Attach trade markers to a snapshot list by diffing consecutive books.
///
/// The first snapshot never carries a marker. Lists shorter than two
/// snapshots are returned unchanged. Markers are recomputed from the
/// positions, overwriting whatever the source delivered.
pub fn annotate_trades(mut snapshots: Vec<Snapshot>) -> Vec<Snapshot> {
    if snapshots.len() < 2 {
        return snapshots;
    }
    for i in 1..snapshots.len() {
        let marker = compare_books(&snapshots[i - 1], &snapshots[i]);
        snapshots[i].trade_marker = Some(marker);
    }
    snapshots
}

fn compare_books(prev: &Snapshot, curr: &Snapshot) -> TradeMarker {
    let prev_positions: HashMap<i64, &PositionDetail> =
        prev.positions.iter().map(|p| (p.instrument_id, p)).collect();
    let curr_positions: HashMap<i64, &PositionDetail> =
        curr.positions.iter().map(|p| (p.instrument_id, p)).collect();

    // Union of instrument ids, in id order so change lists are stable.
    let all_ids: BTreeSet<i64> = prev_positions
        .keys()
        .chain(curr_positions.keys())
        .copied()
        .collect();

    let mut changes = Vec::new();
    for id in all_ids {
        match (prev_positions.get(&id), curr_positions.get(&id)) {
            (None, Some(curr_pos)) => changes.push(PositionChange {
                instrument_id: id,
                instrument_symbol: curr_pos.instrument.symbol.clone(),
                change: ChangeKind::New,
                old_quantity: 0,
                new_quantity: curr_pos.quantity,
                old_price: 0.0,
                new_price: curr_pos.avg_price,
            }),
            (Some(prev_pos), None) => changes.push(PositionChange {
                instrument_id: id,
                instrument_symbol: prev_pos.instrument.symbol.clone(),
                change: ChangeKind::Closed,
                old_quantity: prev_pos.quantity,
                new_quantity: 0,
                old_price: prev_pos.avg_price,
                new_price: 0.0,
            }),
            (Some(prev_pos), Some(curr_pos)) => {
                let quantity_changed = prev_pos.quantity != curr_pos.quantity;
                let price_changed =
                    (prev_pos.avg_price - curr_pos.avg_price).abs() > PRICE_TOLERANCE;
                if quantity_changed || price_changed {
                    changes.push(PositionChange {
                        instrument_id: id,
                        instrument_symbol: curr_pos.instrument.symbol.clone(),
                        change: if quantity_changed {
                            ChangeKind::QuantityChange
                        } else {
                            ChangeKind::PriceChange
                        },
                        old_quantity: prev_pos.quantity,
                        new_quantity: curr_pos.quantity,
                        old_price: prev_pos.avg_price,
                        new_price: curr_pos.avg_price,
                    });
                }
            }
            (None, None) => unreachable!("id came from one of the maps"),
        }
    }

    if changes.is_empty() {
        return TradeMarker {
            kind: MarkerKind::None,
            changes,
            summary: "No changes".into(),
        };
    }

    // Everything closed and nothing remains: the book was squared up.
    if !prev.positions.is_empty() && curr.positions.is_empty() {
        let summary = format!("Square-up: Closed {} positions", changes.len());
        return TradeMarker {
            kind: MarkerKind::SquareUp,
            changes,
            summary,
        };
    }

    let summary = change_summary(&changes);
    TradeMarker {
        kind: MarkerKind::Adjustment,
        changes,
        summary,
    }
}

fn change_summary(changes: &[PositionChange]) -> String {
    let new = changes.iter().filter(|c| c.change == ChangeKind::New).count();
    let closed = changes.iter().filter(|c| c.change == ChangeKind::Closed).count();
    let modified = changes
        .iter()
        .filter(|c| matches!(c.change, ChangeKind::QuantityChange | ChangeKind::PriceChange))
        .count();

    let mut parts = Vec::new();
    if new > 0 {
        parts.push(format!("{new} new"));
    }
    if closed > 0 {
        parts.push(format!("{closed} closed"));
    }
    if modified > 0 {
        parts.push(format!("{modified} modified"));
    }
    format!("Adjustment: {}", parts.join(", "))
}
