//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! the tables `realisations`, `hour_trace`, `agent_snapshots`,
//! `trap_kills`, `lure_stations`, `traps` and `trapping_days`.  Optional
//! values are stored as `NULL`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{
    AgentSnapshotRow, HourTraceRow, OutputResult, RealisationRow, StationRow, TrapKillRow, TrappingDayRow,
};

/// Writes results and traces to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS realisations (
                 realisation        INTEGER PRIMARY KEY,
                 seed               INTEGER NOT NULL,
                 eradicated         INTEGER NOT NULL,
                 n_add              INTEGER NOT NULL,
                 lure_spacing       REAL    NOT NULL,
                 n_deployments      INTEGER NOT NULL,
                 alpha_k            REAL    NOT NULL,
                 coa_spatial_decay  REAL    NOT NULL,
                 coa_temporal_decay REAL    NOT NULL,
                 habituation_days   INTEGER NOT NULL,
                 p_survive          REAL    NOT NULL,
                 days_simulated     INTEGER NOT NULL,
                 final_population   INTEGER NOT NULL,
                 trap_kills         INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS hour_trace (
                 realisation        INTEGER NOT NULL,
                 day                INTEGER NOT NULL,
                 hour               INTEGER NOT NULL,
                 estrus_open        INTEGER NOT NULL,
                 days_since_release INTEGER,
                 live_agents        INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 realisation    INTEGER NOT NULL,
                 day            INTEGER NOT NULL,
                 hour           INTEGER NOT NULL,
                 slot           INTEGER NOT NULL,
                 agent_id       INTEGER NOT NULL,
                 female         INTEGER NOT NULL,
                 parent_id      INTEGER,
                 pregnant_since INTEGER,
                 x              REAL    NOT NULL,
                 y              REAL    NOT NULL,
                 home_x         REAL    NOT NULL,
                 home_y         REAL    NOT NULL,
                 bearing        REAL    NOT NULL,
                 searching      INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS trap_kills (
                 realisation INTEGER NOT NULL,
                 day         INTEGER NOT NULL,
                 kills       INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS lure_stations (
                 realisation INTEGER NOT NULL,
                 station     INTEGER NOT NULL,
                 x           REAL    NOT NULL,
                 y           REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS traps (
                 realisation INTEGER NOT NULL,
                 trap        INTEGER NOT NULL,
                 x           REAL    NOT NULL,
                 y           REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS trapping_days (
                 realisation INTEGER NOT NULL,
                 day         INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    fn insert_stations(&mut self, sql: &str, rows: &[StationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                stmt.execute(rusqlite::params![row.realisation, row.index, row.x, row.y])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_realisations(&mut self, rows: &[RealisationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO realisations \
                 (realisation, seed, eradicated, n_add, lure_spacing, n_deployments, alpha_k, \
                  coa_spatial_decay, coa_temporal_decay, habituation_days, p_survive, \
                  days_simulated, final_population, trap_kills) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.realisation,
                    // SQLite integers are signed; keep the seed's bit pattern.
                    row.seed as i64,
                    row.eradicated as i64,
                    row.n_add,
                    row.lure_spacing,
                    row.n_deployments,
                    row.alpha_k,
                    row.coa_spatial_decay,
                    row.coa_temporal_decay,
                    row.habituation_days,
                    row.p_survive,
                    row.days_simulated,
                    row.final_population as i64,
                    row.trap_kills as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_hour_traces(&mut self, rows: &[HourTraceRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO hour_trace \
                 (realisation, day, hour, estrus_open, days_since_release, live_agents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.realisation,
                    row.day,
                    row.hour,
                    row.estrus_open as i64,
                    row.days_since_release,
                    row.live_agents as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (realisation, day, hour, slot, agent_id, female, parent_id, pregnant_since, \
                  x, y, home_x, home_y, bearing, searching) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.realisation,
                    row.day,
                    row.hour,
                    row.slot,
                    row.agent_id,
                    row.female as i64,
                    row.parent_id,
                    row.pregnant_since,
                    row.x,
                    row.y,
                    row.home_x,
                    row.home_y,
                    row.bearing,
                    row.searching as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_trap_kills(&mut self, rows: &[TrapKillRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trap_kills (realisation, day, kills) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.realisation, row.day, row.kills])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_lure_stations(&mut self, rows: &[StationRow]) -> OutputResult<()> {
        self.insert_stations("INSERT INTO lure_stations (realisation, station, x, y) VALUES (?1, ?2, ?3, ?4)", rows)
    }

    fn write_traps(&mut self, rows: &[StationRow]) -> OutputResult<()> {
        self.insert_stations("INSERT INTO traps (realisation, trap, x, y) VALUES (?1, ?2, ?3, ?4)", rows)
    }

    fn write_trapping_days(&mut self, rows: &[TrappingDayRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached("INSERT INTO trapping_days (realisation, day) VALUES (?1, ?2)")?;
            for row in rows {
                stmt.execute(rusqlite::params![row.realisation, row.day])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
