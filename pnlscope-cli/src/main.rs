//! pnlscope CLI — day-store inspection and live capture.
//!
//! Commands:
//! - `days` — list recorded trading days
//! - `show` — print a day's summary and trade tape
//! - `export` — write a day's reconciled series as CSV
//! - `record` — poll a live positions feed into the day store

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use pnlscope_core::analyzer::annotate_trades;
use pnlscope_core::domain::MarkerKind;
use pnlscope_core::filters::available_filters;
use pnlscope_core::source::{DayStore, InstrumentRegistry, LiveFeed, SnapshotSource};
use pnlscope_core::{DaySummary, ReconciledSeries};

#[derive(Parser)]
#[command(name = "pnlscope", about = "pnlscope CLI — trading-day P&L store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recorded trading days.
    Days {
        /// Data directory with day files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Also load each day and print its summary line.
        #[arg(long, default_value_t = false)]
        detail: bool,
    },
    /// Print one day's summary and trade tape.
    Show {
        /// Trading day (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Data directory with day files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Filter keys, e.g. "NIFTY|2024-08-15" (repeatable).
        #[arg(long)]
        filter: Vec<String>,
    },
    /// List the (underlying, expiry) filter keys available on a day.
    Filters {
        /// Trading day (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Data directory with day files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Export one day's reconciled series as CSV.
    Export {
        /// Trading day (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Data directory with day files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output CSV path. Defaults to pnl-<date>.csv.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Poll a live positions feed and append snapshots to today's day file.
    Record {
        /// Feed URL returning a position snapshot payload.
        #[arg(long)]
        url: String,

        /// Data directory for day files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Seconds between polls.
        #[arg(long, default_value_t = 15)]
        interval_secs: u64,

        /// Stop after this many snapshots (0 = run until killed).
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Days { data_dir, detail } => run_days(&data_dir, detail),
        Commands::Show {
            date,
            data_dir,
            filter,
        } => run_show(&date, &data_dir, &filter),
        Commands::Filters { date, data_dir } => run_filters(&date, &data_dir),
        Commands::Export {
            date,
            data_dir,
            out,
        } => run_export(&date, &data_dir, out),
        Commands::Record {
            url,
            data_dir,
            interval_secs,
            count,
        } => run_record(&url, &data_dir, interval_secs, count),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn run_days(data_dir: &Path, detail: bool) -> Result<()> {
    let store = DayStore::new(data_dir);
    let days = store.available_days()?;
    if days.is_empty() {
        println!("No day files in {}", data_dir.display());
        return Ok(());
    }

    for date in days {
        if detail {
            let snapshots = annotate_trades(store.fetch_day(date, &[])?);
            let summary = DaySummary::compute(date, &snapshots);
            println!(
                "{date}  {:>5} snapshots  {:>3} trades  final {:>+12.2}",
                summary.total_snapshots, summary.total_trades, summary.final_pnl
            );
        } else {
            println!("{date}");
        }
    }
    Ok(())
}

fn run_show(date: &str, data_dir: &Path, filter_keys: &[String]) -> Result<()> {
    let date = parse_date(date)?;
    let store = DayStore::new(data_dir);
    let snapshots = annotate_trades(store.fetch_day(date, filter_keys)?);
    let summary = DaySummary::compute(date, &snapshots);
    let series = ReconciledSeries::from_snapshots(&snapshots);

    println!("Trading day {date}");
    if !filter_keys.is_empty() {
        println!("Filters: {}", filter_keys.join(", "));
    }
    println!(
        "  snapshots {}  trades {}  session {}–{}",
        summary.total_snapshots,
        summary.total_trades,
        summary.market_open.as_deref().unwrap_or("-"),
        summary.market_close.as_deref().unwrap_or("-"),
    );
    println!(
        "  P&L final {:+.2}  min {:+.2}  max {:+.2}",
        summary.final_pnl, summary.min_pnl, summary.max_pnl
    );
    if let Some(range) = &summary.underlying_range {
        println!(
            "  underlying {:.1} → {:.1}  (lo {:.1} / hi {:.1})",
            range.open, range.close, range.min, range.max
        );
    }

    let trades: Vec<_> = series.trade_points().collect();
    if trades.is_empty() {
        println!("\nNo trades.");
        return Ok(());
    }
    println!("\nTrade tape:");
    for point in trades {
        let Some(marker) = point.snapshot.trade_marker.as_ref() else {
            continue;
        };
        println!(
            "  {}  {:<10}  {}",
            point.snapshot.timestamp.format("%H:%M:%S"),
            marker_label(marker.kind),
            marker.summary
        );
    }
    Ok(())
}

fn run_filters(date: &str, data_dir: &Path) -> Result<()> {
    let date = parse_date(date)?;
    let store = DayStore::new(data_dir);
    let snapshots = store.load_day(date)?;
    let options = available_filters(&snapshots);
    if options.is_empty() {
        println!("No positions on {date}, nothing to filter.");
        return Ok(());
    }
    for option in options {
        println!(
            "{:<30} {} {}",
            option.key, option.underlying_symbol, option.expiry
        );
    }
    Ok(())
}

fn run_export(date: &str, data_dir: &Path, out: Option<PathBuf>) -> Result<()> {
    let date = parse_date(date)?;
    let store = DayStore::new(data_dir);
    let snapshots = annotate_trades(store.fetch_day(date, &[])?);
    let series = ReconciledSeries::from_snapshots(&snapshots);
    if series.is_empty() {
        bail!("nothing to export for {date}");
    }

    let out = out.unwrap_or_else(|| PathBuf::from(format!("pnl-{date}.csv")));
    let mut writer = csv::Writer::from_path(&out)
        .with_context(|| format!("cannot create {}", out.display()))?;
    writer.write_record([
        "time",
        "timestamp",
        "total_pnl",
        "underlying_price",
        "position_count",
        "marker",
        "marker_summary",
    ])?;

    for point in series.points() {
        let snapshot = &point.snapshot;
        let (marker, summary) = match snapshot.trade_marker.as_ref() {
            Some(m) if m.kind != MarkerKind::None => {
                (marker_label(m.kind), m.summary.as_str())
            }
            _ => ("", ""),
        };
        writer.write_record([
            point.time.to_string(),
            snapshot.timestamp.to_rfc3339(),
            if point.pnl.is_finite() {
                format!("{:.2}", point.pnl)
            } else {
                String::new()
            },
            point
                .underlying
                .filter(|u| u.is_finite())
                .map(|u| format!("{u:.2}"))
                .unwrap_or_default(),
            snapshot.position_count.to_string(),
            marker.to_string(),
            summary.to_string(),
        ])?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", series.len(), out.display());
    Ok(())
}

fn run_record(url: &str, data_dir: &Path, interval_secs: u64, count: u64) -> Result<()> {
    let store = DayStore::new(data_dir);
    let feed = LiveFeed::new(url)?;
    let mut registry = InstrumentRegistry::default();
    let interval = std::time::Duration::from_secs(interval_secs.max(1));

    println!(
        "Recording from {url} every {}s into {} (Ctrl+C to stop)",
        interval.as_secs(),
        data_dir.display()
    );

    let mut recorded = 0u64;
    loop {
        match feed.poll(&mut registry) {
            Ok(snapshot) => {
                let date = snapshot.timestamp.date_naive();
                let stamp = snapshot.timestamp.format("%H:%M:%S");
                let pnl = snapshot.total_pnl;
                let positions = snapshot.position_count;
                store.append_snapshot(date, snapshot)?;
                recorded += 1;
                println!("[{stamp}] pnl {pnl:+.2}  {positions} positions  (#{recorded})");
            }
            Err(e) => {
                eprintln!("[{}] fetch failed: {e}", Utc::now().format("%H:%M:%S"));
            }
        }
        if count > 0 && recorded >= count {
            break;
        }
        std::thread::sleep(interval);
    }
    println!("Recorded {recorded} snapshots.");
    Ok(())
}

fn marker_label(kind: MarkerKind) -> &'static str {
    match kind {
        MarkerKind::Adjustment => "adjustment",
        MarkerKind::SquareUp => "square-up",
        MarkerKind::None => "",
    }
}
