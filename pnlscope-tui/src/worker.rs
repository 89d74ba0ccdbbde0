//! Background worker thread — all data loading runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Load
//! responses carry the request id they answer; the main thread installs
//! only the newest (last-request-wins), so a superseded load can never
//! clobber fresher data.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::NaiveDate;

use pnlscope_core::analyzer::annotate_trades;
use pnlscope_core::source::SnapshotSource;
use pnlscope_core::Snapshot;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    ScanDays,
    LoadDay {
        date: NaiveDate,
        filters: Vec<String>,
        request_id: u64,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    DaysScanned {
        dates: Vec<NaiveDate>,
    },
    ScanFailed {
        error: String,
    },
    DayLoaded {
        request_id: u64,
        date: NaiveDate,
        snapshots: Vec<Snapshot>,
    },
    LoadFailed {
        request_id: u64,
        date: NaiveDate,
        error: String,
    },
}

/// Spawn the background worker thread over a snapshot source (the
/// local day store, or the dashboard API).
pub fn spawn_worker(
    source: Box<dyn SnapshotSource>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("pnlscope-worker".into())
        .spawn(move || {
            worker_loop(source.as_ref(), rx, tx);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(source: &dyn SnapshotSource, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => handle_command(source, cmd, &tx),
        }
    }
}

fn handle_command(source: &dyn SnapshotSource, cmd: WorkerCommand, tx: &Sender<WorkerResponse>) {
    match cmd {
        WorkerCommand::ScanDays => match source.available_days() {
            Ok(dates) => {
                let _ = tx.send(WorkerResponse::DaysScanned { dates });
            }
            Err(e) => {
                let _ = tx.send(WorkerResponse::ScanFailed {
                    error: e.to_string(),
                });
            }
        },
        WorkerCommand::LoadDay {
            date,
            filters,
            request_id,
        } => match source.fetch_day(date, &filters) {
            Ok(snapshots) => {
                // Markers are recomputed over the (possibly filtered)
                // book before anything downstream sees the day.
                let snapshots = annotate_trades(snapshots);
                let _ = tx.send(WorkerResponse::DayLoaded {
                    request_id,
                    date,
                    snapshots,
                });
            }
            Err(e) => {
                let _ = tx.send(WorkerResponse::LoadFailed {
                    request_id,
                    date,
                    error: e.to_string(),
                });
            }
        },
        WorkerCommand::Shutdown => {} // handled in loop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnlscope_core::source::DayStore;
    use std::sync::mpsc;
    use std::time::Duration;

    fn temp_store(name: &str) -> DayStore {
        let dir = std::env::temp_dir().join(format!("pnlscope_worker_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        DayStore::new(dir)
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(temp_store("shutdown")), cmd_rx, resp_tx);
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn scan_and_load_roundtrip() {
        let store = temp_store("roundtrip");
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();
        store
            .save_day(date, &crate::test_helpers::test_snapshots())
            .unwrap();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(store), cmd_rx, resp_tx);

        cmd_tx.send(WorkerCommand::ScanDays).unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::DaysScanned { dates } => assert_eq!(dates, vec![date]),
            other => panic!("expected DaysScanned, got {other:?}"),
        }

        cmd_tx
            .send(WorkerCommand::LoadDay {
                date,
                filters: Vec::new(),
                request_id: 7,
            })
            .unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::DayLoaded {
                request_id,
                date: loaded_date,
                snapshots,
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(loaded_date, date);
                assert!(!snapshots.is_empty());
                // First snapshot never carries a marker after analysis.
                assert!(snapshots[0].trade_marker.is_none());
            }
            other => panic!("expected DayLoaded, got {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn missing_day_reports_load_failure() {
        let store = temp_store("missing");
        let date = NaiveDate::from_ymd_opt(2024, 8, 14).unwrap();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(store), cmd_rx, resp_tx);

        cmd_tx
            .send(WorkerCommand::LoadDay {
                date,
                filters: Vec::new(),
                request_id: 1,
            })
            .unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::LoadFailed { request_id, error, .. } => {
                assert_eq!(request_id, 1);
                assert!(error.contains("no snapshots"));
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
