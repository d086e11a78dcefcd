//! CSV output backend.
//!
//! Creates seven files in the configured output directory:
//! - `realisations.csv`
//! - `hour_trace.csv`
//! - `agent_snapshots.csv`
//! - `trap_kills.csv`
//! - `lure_stations.csv`, `traps.csv`, `trapping_days.csv` (control layout)
//!
//! Missing optional values are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{
    AgentSnapshotRow, HourTraceRow, OutputResult, RealisationRow, StationRow, TrapKillRow, TrappingDayRow,
};

/// Columns of `realisations.csv`.
pub const REALISATION_HEADER: [&str; 14] = [
    "realisation",
    "seed",
    "eradicated",
    "n_add",
    "lure_spacing",
    "n_deployments",
    "alpha_k",
    "coa_spatial_decay",
    "coa_temporal_decay",
    "habituation_days",
    "p_survive",
    "days_simulated",
    "final_population",
    "trap_kills",
];

/// Writes results and traces to CSV files.
pub struct CsvWriter {
    realisations: Writer<File>,
    hours:        Writer<File>,
    snapshots:    Writer<File>,
    trap_kills:   Writer<File>,
    lure_stations: Writer<File>,
    traps:        Writer<File>,
    trapping_days: Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut realisations = Writer::from_path(dir.join("realisations.csv"))?;
        realisations.write_record(REALISATION_HEADER)?;

        let mut hours = Writer::from_path(dir.join("hour_trace.csv"))?;
        hours.write_record(["realisation", "day", "hour", "estrus_open", "days_since_release", "live_agents"])?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record([
            "realisation",
            "day",
            "hour",
            "slot",
            "agent_id",
            "female",
            "parent_id",
            "pregnant_since",
            "x",
            "y",
            "home_x",
            "home_y",
            "bearing",
            "searching",
        ])?;

        let mut trap_kills = Writer::from_path(dir.join("trap_kills.csv"))?;
        trap_kills.write_record(["realisation", "day", "kills"])?;

        let mut lure_stations = Writer::from_path(dir.join("lure_stations.csv"))?;
        lure_stations.write_record(["realisation", "station", "x", "y"])?;

        let mut traps = Writer::from_path(dir.join("traps.csv"))?;
        traps.write_record(["realisation", "trap", "x", "y"])?;

        let mut trapping_days = Writer::from_path(dir.join("trapping_days.csv"))?;
        trapping_days.write_record(["realisation", "day"])?;

        Ok(Self {
            realisations,
            hours,
            snapshots,
            trap_kills,
            lure_stations,
            traps,
            trapping_days,
            finished: false,
        })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(b: bool) -> String {
    (b as u8).to_string()
}

fn write_stations(w: &mut Writer<File>, rows: &[StationRow]) -> OutputResult<()> {
    for row in rows {
        w.write_record(&[row.realisation.to_string(), row.index.to_string(), row.x.to_string(), row.y.to_string()])?;
    }
    Ok(())
}

impl OutputWriter for CsvWriter {
    fn write_realisations(&mut self, rows: &[RealisationRow]) -> OutputResult<()> {
        for row in rows {
            self.realisations.write_record(&[
                row.realisation.to_string(),
                row.seed.to_string(),
                flag(row.eradicated),
                row.n_add.to_string(),
                row.lure_spacing.to_string(),
                row.n_deployments.to_string(),
                row.alpha_k.to_string(),
                row.coa_spatial_decay.to_string(),
                row.coa_temporal_decay.to_string(),
                row.habituation_days.to_string(),
                row.p_survive.to_string(),
                row.days_simulated.to_string(),
                row.final_population.to_string(),
                row.trap_kills.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_hour_traces(&mut self, rows: &[HourTraceRow]) -> OutputResult<()> {
        for row in rows {
            self.hours.write_record(&[
                row.realisation.to_string(),
                row.day.to_string(),
                row.hour.to_string(),
                flag(row.estrus_open),
                opt(row.days_since_release),
                row.live_agents.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.realisation.to_string(),
                row.day.to_string(),
                row.hour.to_string(),
                row.slot.to_string(),
                row.agent_id.to_string(),
                flag(row.female),
                opt(row.parent_id),
                opt(row.pregnant_since),
                row.x.to_string(),
                row.y.to_string(),
                row.home_x.to_string(),
                row.home_y.to_string(),
                row.bearing.to_string(),
                flag(row.searching),
            ])?;
        }
        Ok(())
    }

    fn write_trap_kills(&mut self, rows: &[TrapKillRow]) -> OutputResult<()> {
        for row in rows {
            self.trap_kills.write_record(&[
                row.realisation.to_string(),
                row.day.to_string(),
                row.kills.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_lure_stations(&mut self, rows: &[StationRow]) -> OutputResult<()> {
        write_stations(&mut self.lure_stations, rows)
    }

    fn write_traps(&mut self, rows: &[StationRow]) -> OutputResult<()> {
        write_stations(&mut self.traps, rows)
    }

    fn write_trapping_days(&mut self, rows: &[TrappingDayRow]) -> OutputResult<()> {
        for row in rows {
            self.trapping_days.write_record(&[row.realisation.to_string(), row.day.to_string()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.realisations.flush()?;
        self.hours.flush()?;
        self.snapshots.flush()?;
        self.trap_kills.flush()?;
        self.lure_stations.flush()?;
        self.traps.flush()?;
        self.trapping_days.flush()?;
        Ok(())
    }
}
