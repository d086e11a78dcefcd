//! Realisation observer trait for progress reporting and trace collection.

use stoat_agent::{Agent, AgentPopulation, InteractionLedgers};
use stoat_core::{AgentId, Point, SimClock, SimDay, Slot};
use stoat_schedule::DayEvents;

use crate::Outcome;

/// Read-only view of the world at the end of an hour.
#[derive(Copy, Clone)]
pub struct HourSnapshot<'a> {
    pub estrus_open: bool,
    /// `None` before the first release (or while the lure is dormant).
    pub days_since_release: Option<u32>,
    pub population: &'a AgentPopulation,
    pub ledgers: &'a InteractionLedgers,
}

/// Where the lures and traps of a realisation are, and on which days the
/// traps are set.
#[derive(Copy, Clone, Debug)]
pub struct ControlLayout<'a> {
    pub lure_stations: &'a [Point],
    pub traps: &'a [Point],
    pub trapping_days: &'a [SimDay],
}

/// Callbacks invoked by [`Realisation::run`][crate::Realisation::run] at key
/// points of the day/hour loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: births per day
///
/// ```rust,ignore
/// struct Headcount(Vec<usize>);
///
/// impl RealisationObserver for Headcount {
///     fn on_hour_end(&mut self, clock: SimClock, snap: &HourSnapshot<'_>) {
///         if clock.is_last_hour() {
///             self.0.push(snap.population.live_count());
///         }
///     }
/// }
/// ```
pub trait RealisationObserver {
    /// Called once by `run` before the first simulated day.
    fn on_realisation_start(&mut self, _layout: &ControlLayout<'_>) {}

    /// Called once per day after the day-start events were applied.
    fn on_day_start(&mut self, _day: SimDay, _events: &DayEvents) {}

    /// Called after every processed hour, before the eradication check.
    fn on_hour_end(&mut self, _clock: SimClock, _snapshot: &HourSnapshot<'_>) {}

    /// Called for each stoat removed by a trap (cascaded dependents are not
    /// reported separately).
    fn on_trap_kill(&mut self, _day: SimDay, _agent: AgentId) {}

    /// Called after the end-of-day bookkeeping with the day's trap kills.
    fn on_day_end(&mut self, _day: SimDay, _trap_kills: u32) {}

    /// Called once when the realisation terminates normally.
    fn on_realisation_end(&mut self, _outcome: &Outcome) {}
}

/// A [`RealisationObserver`] that does nothing.
pub struct NoopObserver;

impl RealisationObserver for NoopObserver {}

// ── TraceRecorder ─────────────────────────────────────────────────────────────

/// One traced hour: the global flags plus every live agent.
#[derive(Clone, Debug)]
pub struct HourTrace {
    pub clock: SimClock,
    pub estrus_open: bool,
    pub days_since_release: Option<u32>,
    pub agents: Vec<(Slot, Agent)>,
}

/// Buffers the per-hour trace and the per-day trap-kill counts.
///
/// Memory grows with `hours × live agents`; meant for single diagnostic
/// realisations, not large ensembles.
#[derive(Clone, Debug, Default)]
pub struct TraceRecorder {
    pub hours: Vec<HourTrace>,
    /// Trap kills per simulated day, indexed by day.
    pub trap_kills: Vec<u32>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RealisationObserver for TraceRecorder {
    fn on_day_start(&mut self, _day: SimDay, _events: &DayEvents) {
        self.trap_kills.push(0);
    }

    fn on_hour_end(&mut self, clock: SimClock, snap: &HourSnapshot<'_>) {
        self.hours.push(HourTrace {
            clock,
            estrus_open: snap.estrus_open,
            days_since_release: snap.days_since_release,
            agents: snap.population.iter_live().map(|(s, a)| (s, a.clone())).collect(),
        });
    }

    fn on_trap_kill(&mut self, _day: SimDay, _agent: AgentId) {
        if let Some(today) = self.trap_kills.last_mut() {
            *today += 1;
        }
    }
}
