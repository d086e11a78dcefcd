//! The `OutputWriter` trait implemented by all backend writers.

use crate::{
    AgentSnapshotRow, HourTraceRow, OutputResult, RealisationRow, StationRow, TrapKillRow, TrappingDayRow,
};

/// Trait implemented by the CSV and SQLite writers.
///
/// Observers driving a writer store its errors internally; see
/// [`TraceOutputObserver::take_error`][crate::TraceOutputObserver::take_error].
pub trait OutputWriter {
    fn write_realisations(&mut self, rows: &[RealisationRow]) -> OutputResult<()>;

    fn write_hour_traces(&mut self, rows: &[HourTraceRow]) -> OutputResult<()>;

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    fn write_trap_kills(&mut self, rows: &[TrapKillRow]) -> OutputResult<()>;

    fn write_lure_stations(&mut self, rows: &[StationRow]) -> OutputResult<()>;

    fn write_traps(&mut self, rows: &[StationRow]) -> OutputResult<()>;

    fn write_trapping_days(&mut self, rows: &[TrappingDayRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
