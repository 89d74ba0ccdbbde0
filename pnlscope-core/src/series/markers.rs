//! Chart annotations — trade markers plus the selection cursor.

use crate::domain::MarkerKind;

use super::reconcile::ReconciledSeries;

/// Visual category of an annotation. Square-ups and other trades render
/// differently; the selection cursor is its own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Adjustment,
    SquareUp,
    Selection,
}

/// One annotation to overlay on the plotted series.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub time: i64,
    pub kind: AnnotationKind,
    /// Finite P&L value at this time, when one exists, for vertical
    /// placement. `None` means the renderer anchors the glyph to the
    /// plot edge instead.
    pub value: Option<f64>,
}

/// Build the annotation list for a series.
///
/// With `show_trades` off, trade annotations are omitted entirely; a
/// selection annotation is still produced. A selection at the same time
/// as a trade coexists with it — no duplicate suppression. The result is
/// sorted ascending by time; the rendering layer relies on that order.
pub fn build_annotations(
    series: &ReconciledSeries,
    show_trades: bool,
    selected: Option<i64>,
) -> Vec<Annotation> {
    let mut annotations: Vec<Annotation> = Vec::new();

    if show_trades {
        for point in series.trade_points() {
            let marker = match point.snapshot.trade_marker.as_ref() {
                Some(m) => m,
                None => continue,
            };
            let kind = match marker.kind {
                MarkerKind::SquareUp => AnnotationKind::SquareUp,
                MarkerKind::Adjustment => AnnotationKind::Adjustment,
                MarkerKind::None => continue,
            };
            annotations.push(Annotation {
                time: point.time,
                kind,
                value: point.pnl.is_finite().then_some(point.pnl),
            });
        }
    }

    if let Some(time) = selected {
        let value = series
            .point_at(time)
            .and_then(|p| p.pnl.is_finite().then_some(p.pnl));
        annotations.push(Annotation {
            time,
            kind: AnnotationKind::Selection,
            value,
        });
    }

    // Stable sort: a selection sharing a trade's time stays after it.
    annotations.sort_by_key(|a| a.time);
    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Snapshot, TradeMarker};
    use chrono::{TimeZone, Utc};

    fn snapshot_at(secs: i64, pnl: f64, kind: Option<MarkerKind>) -> Snapshot {
        Snapshot {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            total_pnl: pnl,
            underlying_price: None,
            position_count: 0,
            positions: Vec::new(),
            trade_marker: kind.map(|kind| TradeMarker {
                kind,
                changes: Vec::new(),
                summary: format!("marker at {secs}"),
            }),
        }
    }

    fn series() -> ReconciledSeries {
        ReconciledSeries::from_snapshots(&[
            snapshot_at(30, 3.0, Some(MarkerKind::SquareUp)),
            snapshot_at(10, 1.0, Some(MarkerKind::Adjustment)),
            snapshot_at(20, 2.0, Some(MarkerKind::None)),
        ])
    }

    #[test]
    fn trades_come_out_ascending() {
        let anns = build_annotations(&series(), true, None);
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].time, 10);
        assert_eq!(anns[0].kind, AnnotationKind::Adjustment);
        assert_eq!(anns[1].time, 30);
        assert_eq!(anns[1].kind, AnnotationKind::SquareUp);
    }

    #[test]
    fn none_markers_never_annotate() {
        let anns = build_annotations(&series(), true, None);
        assert!(anns.iter().all(|a| a.time != 20));
    }

    #[test]
    fn flag_off_keeps_only_selection() {
        let anns = build_annotations(&series(), false, Some(20));
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].kind, AnnotationKind::Selection);
        assert_eq!(anns[0].time, 20);
        assert_eq!(anns[0].value, Some(2.0));
    }

    #[test]
    fn selection_coexists_with_trade_at_same_time() {
        let anns = build_annotations(&series(), true, Some(10));
        let at_10: Vec<&Annotation> = anns.iter().filter(|a| a.time == 10).collect();
        assert_eq!(at_10.len(), 2);
        assert_eq!(at_10[0].kind, AnnotationKind::Adjustment);
        assert_eq!(at_10[1].kind, AnnotationKind::Selection);
    }

    #[test]
    fn selection_sorts_into_time_order() {
        // Selection earlier than every trade must end up first.
        let anns = build_annotations(&series(), true, Some(10));
        let times: Vec<i64> = anns.iter().map(|a| a.time).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn non_finite_pnl_gives_unanchored_annotation() {
        let series = ReconciledSeries::from_snapshots(&[snapshot_at(
            10,
            f64::NAN,
            Some(MarkerKind::Adjustment),
        )]);
        let anns = build_annotations(&series, true, Some(10));
        assert_eq!(anns.len(), 2);
        assert!(anns.iter().all(|a| a.value.is_none()));
    }

    #[test]
    fn empty_series_with_selection_still_annotates_selection() {
        let series = ReconciledSeries::from_snapshots(&[]);
        let anns = build_annotations(&series, true, Some(99));
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].kind, AnnotationKind::Selection);
        assert!(anns[0].value.is_none());
    }
}
