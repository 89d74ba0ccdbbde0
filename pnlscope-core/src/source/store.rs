//! Local day store — one JSON file per trading day.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::Snapshot;
use crate::filters;

use super::{SnapshotSource, SourceError};

const FILE_PREFIX: &str = "pnl-";
const FILE_EXT: &str = ".json";

/// Directory of `pnl-YYYY-MM-DD.json` day files.
#[derive(Debug, Clone)]
pub struct DayStore {
    dir: PathBuf,
}

impl DayStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the day file for `date`.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{FILE_PREFIX}{}{FILE_EXT}", date.format("%Y-%m-%d")))
    }

    /// Load one day's snapshots in file order.
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<Snapshot>, SourceError> {
        let path = self.day_path(date);
        let data = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NoSuchDay { date },
            _ => SourceError::Store(format!("{}: {e}", path.display())),
        })?;
        serde_json::from_str(&data)
            .map_err(|e| SourceError::MalformedDay(format!("{}: {e}", path.display())))
    }

    /// Write one day's snapshots, creating the directory if needed.
    pub fn save_day(&self, date: NaiveDate, snapshots: &[Snapshot]) -> Result<(), SourceError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SourceError::Store(format!("{}: {e}", self.dir.display())))?;
        let json = serde_json::to_string_pretty(snapshots)
            .map_err(|e| SourceError::Store(e.to_string()))?;
        let path = self.day_path(date);
        std::fs::write(&path, json)
            .map_err(|e| SourceError::Store(format!("{}: {e}", path.display())))
    }

    /// Append one snapshot to a day file, creating the day if absent.
    /// Used by the live recorder.
    pub fn append_snapshot(&self, date: NaiveDate, snapshot: Snapshot) -> Result<(), SourceError> {
        let mut snapshots = match self.load_day(date) {
            Ok(existing) => existing,
            Err(SourceError::NoSuchDay { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        snapshots.push(snapshot);
        self.save_day(date, &snapshots)
    }
}

impl SnapshotSource for DayStore {
    fn name(&self) -> &str {
        "day store"
    }

    /// Scan the data directory for day files, newest first. Filenames
    /// that do not parse as dates are skipped.
    fn available_days(&self) -> Result<Vec<NaiveDate>, SourceError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SourceError::Store(format!("{}: {e}", self.dir.display()))),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SourceError::Store(e.to_string()))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(stem) = name
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(FILE_EXT))
            else {
                continue;
            };
            if let Ok(date) = NaiveDate::parse_from_str(stem, "%Y-%m-%d") {
                dates.push(date);
            }
        }
        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }

    fn fetch_day(
        &self,
        date: NaiveDate,
        filter_keys: &[String],
    ) -> Result<Vec<Snapshot>, SourceError> {
        let snapshots = self.load_day(date)?;
        Ok(filters::apply_filters(&snapshots, filter_keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(secs: i64, pnl: f64) -> Snapshot {
        Snapshot {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            total_pnl: pnl,
            underlying_price: None,
            position_count: 0,
            positions: Vec::new(),
            trade_marker: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::new(dir.path());
        let day = date("2024-08-14");

        store
            .save_day(day, &[snapshot(0, 1.0), snapshot(60, 2.0)])
            .unwrap();
        let loaded = store.load_day(day).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].total_pnl, 2.0);
    }

    #[test]
    fn missing_day_is_no_such_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::new(dir.path());
        match store.load_day(date("2024-08-14")) {
            Err(SourceError::NoSuchDay { .. }) => {}
            other => panic!("expected NoSuchDay, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_day_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::new(dir.path());
        let day = date("2024-08-14");
        std::fs::write(store.day_path(day), "not json {{{").unwrap();
        match store.load_day(day) {
            Err(SourceError::MalformedDay(_)) => {}
            other => panic!("expected MalformedDay, got {other:?}"),
        }
    }

    #[test]
    fn scan_skips_foreign_files_and_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::new(dir.path());
        store.save_day(date("2024-08-12"), &[]).unwrap();
        store.save_day(date("2024-08-14"), &[]).unwrap();
        store.save_day(date("2024-08-13"), &[]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("pnl-not-a-date.json"), "[]").unwrap();

        let days = store.available_days().unwrap();
        assert_eq!(
            days,
            vec![date("2024-08-14"), date("2024-08-13"), date("2024-08-12")]
        );
    }

    #[test]
    fn missing_directory_scans_empty() {
        let store = DayStore::new("/nonexistent/pnlscope-data");
        assert!(store.available_days().unwrap().is_empty());
    }

    #[test]
    fn append_creates_then_extends() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::new(dir.path());
        let day = date("2024-08-14");

        store.append_snapshot(day, snapshot(0, 1.0)).unwrap();
        store.append_snapshot(day, snapshot(60, 2.0)).unwrap();
        let loaded = store.load_day(day).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
