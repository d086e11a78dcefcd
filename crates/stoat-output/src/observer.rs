//! `TraceOutputObserver<W>`: bridges `RealisationObserver` to an
//! `OutputWriter`.

use stoat_core::{SimClock, SimDay};
use stoat_sim::{ControlLayout, HourSnapshot, Outcome, RealisationObserver};

use crate::row::{AgentSnapshotRow, HourTraceRow, RealisationRow, StationRow, TrapKillRow, TrappingDayRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`RealisationObserver`] that streams one realisation's control layout,
/// hour trace, agent snapshots, daily trap kills and final result row to
/// any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct TraceOutputObserver<W: OutputWriter> {
    writer:      W,
    realisation: u32,
    seed:        u64,
    snapshots:   bool,
    last_error:  Option<OutputError>,
}

impl<W: OutputWriter> TraceOutputObserver<W> {
    /// Observer for realisation `realisation`, built from `seed`.  Agent
    /// snapshots are written every hour.
    pub fn new(writer: W, realisation: u32, seed: u64) -> Self {
        Self {
            writer,
            realisation,
            seed,
            snapshots: true,
            last_error: None,
        }
    }

    /// Turn per-agent snapshot rows on or off (the hour trace is always
    /// written).
    pub fn with_snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = enabled;
        self
    }

    /// Take the stored write error (if any) after `run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> RealisationObserver for TraceOutputObserver<W> {
    fn on_realisation_start(&mut self, layout: &ControlLayout<'_>) {
        let r = self.realisation;
        let result = self.writer.write_lure_stations(&StationRow::from_points(r, layout.lure_stations));
        self.store_err(result);
        let result = self.writer.write_traps(&StationRow::from_points(r, layout.traps));
        self.store_err(result);
        let days: Vec<TrappingDayRow> =
            layout.trapping_days.iter().map(|d| TrappingDayRow { realisation: r, day: d.0 }).collect();
        let result = self.writer.write_trapping_days(&days);
        self.store_err(result);
    }

    fn on_hour_end(&mut self, clock: SimClock, snap: &HourSnapshot<'_>) {
        let row = HourTraceRow {
            realisation:        self.realisation,
            day:                clock.day.0,
            hour:               clock.hour,
            estrus_open:        snap.estrus_open,
            days_since_release: snap.days_since_release,
            live_agents:        snap.population.live_count() as u64,
        };
        let result = self.writer.write_hour_traces(&[row]);
        self.store_err(result);

        if self.snapshots {
            let rows: Vec<AgentSnapshotRow> = snap
                .population
                .iter_live()
                .map(|(slot, agent)| AgentSnapshotRow::new(self.realisation, clock, slot, agent))
                .collect();
            if !rows.is_empty() {
                let result = self.writer.write_snapshots(&rows);
                self.store_err(result);
            }
        }
    }

    fn on_day_end(&mut self, day: SimDay, trap_kills: u32) {
        let row = TrapKillRow { realisation: self.realisation, day: day.0, kills: trap_kills };
        let result = self.writer.write_trap_kills(&[row]);
        self.store_err(result);
    }

    fn on_realisation_end(&mut self, outcome: &Outcome) {
        let row = RealisationRow::new(self.realisation, self.seed, outcome);
        let result = self.writer.write_realisations(&[row]);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
