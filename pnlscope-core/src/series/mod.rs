//! The Reconciled Series and the operations that share it: point lookup,
//! trade navigation, and chart annotations.
//!
//! The series is purely derived state. It is rebuilt whenever the
//! snapshot list or the active filters change and never mutated in
//! place; every consumer reads the same projection, so the plotted
//! coordinates and the lookup keys can never drift apart.

mod markers;
mod navigate;
mod reconcile;

pub use markers::{build_annotations, Annotation, AnnotationKind};
pub use navigate::Direction;
pub use reconcile::{point_time, ReconciledSeries, SeriesPoint};
