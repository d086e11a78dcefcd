//! The `Realisation` struct and its day/hour loop.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stoat_core::{SimClock, SimDay, SimRng};
use stoat_schedule::EventCalendar;

use crate::{
    ControlLayout, DailyEventScheduler, DayStart, HourSnapshot, RealisationObserver, RealisedParams, SimResult,
    World,
};

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Why a realisation stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// The last stoat died at the end of this hour.
    Eradicated { day: SimDay, hour: u32 },
    /// The calendar ran out with stoats still alive.
    HorizonReached,
    /// The population guard tripped at the start of `day`.
    PopulationExplosion { day: SimDay, live: usize },
}

/// Result of one completed realisation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub eradicated:        bool,
    pub termination:       Termination,
    pub params:            RealisedParams,
    /// Live stoats when the run stopped.
    pub final_population:  usize,
    pub total_trap_kills:  u64,
    /// Days entered, including a partially simulated last day.
    pub days_simulated:    u32,
}

// ── Realisation ───────────────────────────────────────────────────────────────

/// One stochastic run of the eradication campaign.
///
/// Holds its own RNG stream, so two realisations built from the same seed
/// and inputs produce identical outcomes.
///
/// Create via [`RealisationBuilder`][crate::RealisationBuilder].
pub struct Realisation<'a> {
    pub(crate) params:    RealisedParams,
    pub(crate) events:    EventCalendar,
    pub(crate) scheduler: DailyEventScheduler,
    pub(crate) world:     World<'a>,
    pub(crate) rng:       SimRng,
    pub(crate) clock:     SimClock,
    pub(crate) total_trap_kills: u64,
    pub(crate) finished:  Option<Termination>,
}

impl<'a> Realisation<'a> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until eradication, population explosion, or the end of the
    /// calendar.
    pub fn run<O: RealisationObserver>(&mut self, observer: &mut O) -> SimResult<Outcome> {
        info!(
            n_add = self.params.n_add,
            lure_spacing = self.params.lure_spacing,
            stations = self.world.lures.len(),
            horizon = self.events.horizon(),
            "realisation start"
        );
        observer.on_realisation_start(&self.layout());
        let termination = loop {
            if let Some(t) = self.step_day(observer)? {
                break t;
            }
        };
        let outcome = self.outcome(termination);
        observer.on_realisation_end(&outcome);
        info!(
            eradicated = outcome.eradicated,
            days = outcome.days_simulated,
            survivors = outcome.final_population,
            trap_kills = outcome.total_trap_kills,
            "realisation end"
        );
        Ok(outcome)
    }

    /// Simulate one day.  Returns the termination once the realisation has
    /// stopped (repeatedly, if called again).
    pub fn step_day<O: RealisationObserver>(&mut self, observer: &mut O) -> SimResult<Option<Termination>> {
        if let Some(t) = self.finished {
            return Ok(Some(t));
        }
        let day = self.clock.day;
        if day.0 >= self.events.horizon() {
            return Ok(Some(self.finish(Termination::HorizonReached)));
        }

        let events = self.events.events_on(day);
        let start = self.scheduler.start_day(day, &events, &mut self.world, &mut self.rng)?;
        if let DayStart::PopulationExplosion { live } = start {
            warn!(%day, live, "population explosion, realisation abandoned");
            return Ok(Some(self.finish(Termination::PopulationExplosion { day, live })));
        }
        observer.on_day_start(day, &events);

        loop {
            let clock = self.clock;
            self.scheduler.run_hour(clock, &events, &mut self.world, &mut self.rng, observer)?;
            observer.on_hour_end(clock, &self.snapshot());

            if self.world.population.is_extinct() {
                let kills = self.scheduler.trap_kills_today();
                self.total_trap_kills += kills as u64;
                observer.on_day_end(day, kills);
                return Ok(Some(self.finish(Termination::Eradicated { day, hour: clock.hour })));
            }
            if self.clock.advance() {
                break;
            }
        }

        let kills = self.scheduler.end_day(&mut self.world);
        self.total_trap_kills += kills as u64;
        observer.on_day_end(day, kills);
        Ok(None)
    }

    pub fn snapshot(&self) -> HourSnapshot<'_> {
        HourSnapshot {
            estrus_open:        self.scheduler.estrus_open(),
            days_since_release: self.world.lures.days_since_release(),
            population:         &self.world.population,
            ledgers:            &self.world.ledgers,
        }
    }

    pub fn layout(&self) -> ControlLayout<'_> {
        ControlLayout {
            lure_stations: self.world.lures.stations(),
            traps:         self.world.traps.traps(),
            trapping_days: self.events.trapping.days(),
        }
    }

    pub fn world(&self) -> &World<'a> {
        &self.world
    }

    pub fn params(&self) -> &RealisedParams {
        &self.params
    }

    pub fn events(&self) -> &EventCalendar {
        &self.events
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn termination(&self) -> Option<Termination> {
        self.finished
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn finish(&mut self, t: Termination) -> Termination {
        self.finished = Some(t);
        t
    }

    fn outcome(&self, termination: Termination) -> Outcome {
        let days_simulated = match termination {
            Termination::Eradicated { day, .. } => day.0 + 1,
            Termination::HorizonReached => self.events.horizon(),
            Termination::PopulationExplosion { day, .. } => day.0,
        };
        Outcome {
            eradicated: matches!(termination, Termination::Eradicated { .. }),
            termination,
            params: self.params,
            final_population: self.world.population.live_count(),
            total_trap_kills: self.total_trap_kills,
            days_simulated,
        }
    }
}
