//! Plain data row types written by output backends.

use stoat_agent::{Agent, Behavior, Sex};
use stoat_core::{Point, SimClock, Slot};
use stoat_sim::{EnsembleRecord, Outcome};

/// Realised parameters and result of one completed realisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealisationRow {
    pub realisation:        u32,
    pub seed:               u64,
    pub eradicated:         bool,
    pub n_add:              u32,
    pub lure_spacing:       f64,
    pub n_deployments:      u32,
    pub alpha_k:            f64,
    pub coa_spatial_decay:  f64,
    pub coa_temporal_decay: f64,
    pub habituation_days:   u32,
    /// Daily survival probability.
    pub p_survive:          f64,
    pub days_simulated:     u32,
    pub final_population:   u64,
    pub trap_kills:         u64,
}

impl RealisationRow {
    pub fn new(realisation: u32, seed: u64, outcome: &Outcome) -> Self {
        let p = &outcome.params;
        Self {
            realisation,
            seed,
            eradicated:         outcome.eradicated,
            n_add:              p.n_add,
            lure_spacing:       p.lure_spacing,
            n_deployments:      p.n_deployments,
            alpha_k:            p.alpha_k,
            coa_spatial_decay:  p.spatial_decay,
            coa_temporal_decay: p.temporal_decay,
            habituation_days:   p.habituation_days,
            p_survive:          p.daily_survival,
            days_simulated:     outcome.days_simulated,
            final_population:   outcome.final_population as u64,
            trap_kills:         outcome.total_trap_kills,
        }
    }

    /// Rows for the completed realisations of an ensemble.  Aborted ones
    /// have no realised outcome and are left out.
    pub fn from_records(records: &[EnsembleRecord]) -> Vec<Self> {
        records
            .iter()
            .filter_map(|r| r.status.outcome().map(|o| Self::new(r.index, r.seed, o)))
            .collect()
    }
}

/// Global state at the end of one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourTraceRow {
    pub realisation: u32,
    pub day:         u32,
    pub hour:        u32,
    pub estrus_open: bool,
    /// `None` before the first release.
    pub days_since_release: Option<u32>,
    pub live_agents: u64,
}

/// One live agent at the end of an hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub realisation: u32,
    pub day:         u32,
    pub hour:        u32,
    pub slot:        u32,
    pub agent_id:    u32,
    pub female:      bool,
    /// Mother's id while dependent.
    pub parent_id:   Option<u32>,
    pub pregnant_since: Option<i32>,
    pub x:           f64,
    pub y:           f64,
    pub home_x:      f64,
    pub home_y:      f64,
    pub bearing:     f64,
    pub searching:   bool,
}

impl AgentSnapshotRow {
    pub fn new(realisation: u32, clock: SimClock, slot: Slot, agent: &Agent) -> Self {
        Self {
            realisation,
            day:            clock.day.0,
            hour:           clock.hour,
            slot:           slot.0,
            agent_id:       agent.id.0,
            female:         agent.sex == Sex::Female,
            parent_id:      agent.parent().map(|p| p.0),
            pregnant_since: agent.pregnant_since,
            x:              agent.pos.x,
            y:              agent.pos.y,
            home_x:         agent.home.x,
            home_y:         agent.home.y,
            bearing:        agent.prev_bearing,
            searching:      agent.behavior == Behavior::Searching,
        }
    }
}

/// Trap removals on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapKillRow {
    pub realisation: u32,
    pub day:         u32,
    pub kills:       u32,
}

/// One lure station or trap of a traced realisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationRow {
    pub realisation: u32,
    /// Position in the realisation's station or trap list.
    pub index:       u32,
    pub x:           f64,
    pub y:           f64,
}

impl StationRow {
    pub fn from_points(realisation: u32, points: &[Point]) -> Vec<Self> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| Self { realisation, index: i as u32, x: p.x, y: p.y })
            .collect()
    }
}

/// A day on which the traps are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrappingDayRow {
    pub realisation: u32,
    pub day:         u32,
}
