//! `stoat-output`: result and trace writers for the stoat eradication
//! model.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                          |
//! |-----------|---------|------------------------------------------------------------------------|
//! | *(none)*  | CSV     | `realisations.csv`, `hour_trace.csv`, `agent_snapshots.csv`, `trap_kills.csv`, `lure_stations.csv`, `traps.csv`, `trapping_days.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                            |
//!
//! Both implement [`OutputWriter`].  Ensemble results are written directly
//! with [`write_ensemble`]; a single traced realisation is streamed through
//! [`TraceOutputObserver`], which implements `stoat_sim::RealisationObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stoat_output::{CsvWriter, TraceOutputObserver, write_ensemble};
//!
//! let records = run_ensemble(&params, &domain, &traps, &config)?;
//! write_ensemble(&mut CsvWriter::new(Path::new("./out"))?, &records)?;
//!
//! let mut obs = TraceOutputObserver::new(CsvWriter::new(Path::new("./trace"))?, 0, seed);
//! realisation.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceOutputObserver;
pub use row::{AgentSnapshotRow, HourTraceRow, RealisationRow, StationRow, TrapKillRow, TrappingDayRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

use stoat_sim::EnsembleRecord;
use tracing::info;

/// Write one results row per completed realisation and finish the writer.
/// Returns the number of rows written.
pub fn write_ensemble<W: OutputWriter>(writer: &mut W, records: &[EnsembleRecord]) -> OutputResult<usize> {
    let rows = RealisationRow::from_records(records);
    writer.write_realisations(&rows)?;
    writer.finish()?;
    info!(rows = rows.len(), skipped = records.len() - rows.len(), "ensemble results written");
    Ok(rows.len())
}
