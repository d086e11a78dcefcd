//! The day/hour state machine of a realisation.
//!
//! # Day start (in order)
//!
//! ```text
//!   ① Guard       more than max_population alive → the run is abandoned
//!   ② Release     lure release day → every station refreshed
//!   ③ Estrus      start day opens the season, else end day closes it
//!   ④ Dispersal   dependents and males relocate, dependents mature
//! ```
//!
//! # Hour (every occupied slot, ascending)
//!
//! ```text
//!   ① Behaviour   search or home range
//!   ② Mating      independent males during estrus, first female in range
//!   ③ Birth       birth day, first hour, gestation complete
//!   ④ Lures       first non-habituated station in range is recorded
//!   ⑤ Traps       trapping day, trap in range, Bernoulli removal
//!   ⑥ Mortality   last hour only, Bernoulli(1 - daily survival)
//!   ⑦ Death       cascade to dependents, no movement
//!   ⑧ Movement    independents only
//! ```
//!
//! Slots are visited up to the slot count taken when the hour starts. A kit
//! born into a free slot still ahead of the cursor is visited this hour;
//! one appended past the count waits for the next.

use tracing::{debug, trace};

use stoat_agent::{AgentPopulation, Behavior, InteractionLedgers};
use stoat_behavior::{AttractionSearch, Goal, MovementModel, SearchContext};
use stoat_core::{AgentId, Point, SimClock, SimDay, SimRng, Slot};
use stoat_schedule::DayEvents;
use stoat_spatial::{LureField, SpatialDomain, TrapGrid};

use crate::{ModelParams, RealisationObserver, RealisedParams, SimResult};

// ── World ─────────────────────────────────────────────────────────────────────

/// Everything the scheduler reads and mutates.  The island and the traps
/// are borrowed so an ensemble can share them across realisations.
pub struct World<'a> {
    pub domain:     &'a SpatialDomain,
    pub traps:      &'a TrapGrid,
    pub lures:      LureField,
    pub population: AgentPopulation,
    pub ledgers:    InteractionLedgers,
}

// ── Scheduler parameters ──────────────────────────────────────────────────────

/// Scalar rates and distances the hourly rules use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SchedulerParams {
    pub encounter_distance:       f64,
    pub pregnancy_probability:    f64,
    pub gestation_days:           u32,
    pub mean_litter_size:         f64,
    /// TTL of new mating and lure records.
    pub habituation_days:         u32,
    pub trap_encounter_distance:  f64,
    pub trap_removal_probability: f64,
    pub daily_survival:           f64,
    pub max_population:           usize,
}

impl SchedulerParams {
    pub fn new(params: &ModelParams, realised: &RealisedParams) -> Self {
        Self {
            encounter_distance:       params.encounter_distance,
            pregnancy_probability:    params.pregnancy_probability,
            gestation_days:           params.gestation_days,
            mean_litter_size:         params.mean_litter_size,
            habituation_days:         realised.habituation_days,
            trap_encounter_distance:  params.trap_encounter_distance,
            trap_removal_probability: params.trap_removal_probability,
            daily_survival:           realised.daily_survival,
            max_population:           params.max_population,
        }
    }
}

/// Result of the day-start phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayStart {
    Proceed,
    /// The guard tripped; no events were applied.
    PopulationExplosion { live: usize },
}

// ── DailyEventScheduler ───────────────────────────────────────────────────────

pub struct DailyEventScheduler {
    params:      SchedulerParams,
    attraction:  AttractionSearch,
    movement:    MovementModel,
    estrus_open: bool,
    trap_kills_today: u32,
}

impl DailyEventScheduler {
    pub fn new(params: SchedulerParams, attraction: AttractionSearch, movement: MovementModel) -> Self {
        Self {
            params,
            attraction,
            movement,
            estrus_open: false,
            trap_kills_today: 0,
        }
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    #[inline]
    pub fn estrus_open(&self) -> bool {
        self.estrus_open
    }

    #[inline]
    pub fn trap_kills_today(&self) -> u32 {
        self.trap_kills_today
    }

    // ── Day boundaries ────────────────────────────────────────────────────

    pub fn start_day(
        &mut self,
        day:    SimDay,
        events: &DayEvents,
        world:  &mut World<'_>,
        rng:    &mut SimRng,
    ) -> SimResult<DayStart> {
        let live = world.population.live_count();
        if live > self.params.max_population {
            return Ok(DayStart::PopulationExplosion { live });
        }
        self.trap_kills_today = 0;

        if events.lure_release {
            world.lures.release();
            debug!(%day, stations = world.lures.len(), "lure release");
        }
        if events.estrus_start {
            self.estrus_open = true;
            debug!(%day, "estrus opens");
        } else if events.estrus_end {
            self.estrus_open = false;
            debug!(%day, "estrus closes");
        }
        if events.dispersal {
            world.population.disperse(world.domain, rng)?;
        }
        Ok(DayStart::Proceed)
    }

    /// Age the lure and both ledgers.  Returns the day's trap kills.
    pub fn end_day(&mut self, world: &mut World<'_>) -> u32 {
        world.lures.end_of_day();
        world.ledgers.end_of_day();
        self.trap_kills_today
    }

    // ── Hour ──────────────────────────────────────────────────────────────

    pub fn run_hour<O: RealisationObserver>(
        &mut self,
        clock:    SimClock,
        events:   &DayEvents,
        world:    &mut World<'_>,
        rng:      &mut SimRng,
        observer: &mut O,
    ) -> SimResult<()> {
        let day = clock.day;
        let occupied = world.population.slot_count();

        for i in 0..occupied {
            let slot = Slot(i as u32);
            let Some(agent) = world.population.get(slot) else { continue };
            let (id, pos) = (agent.id, agent.pos);
            let (is_male, independent) = (agent.is_male(), agent.is_independent());
            let pregnant_since = agent.pregnant_since;

            // ① Behaviour
            let searching = self.estrus_open
                && (is_male || (pregnant_since.is_none() && !world.population.has_dependent_offspring(id)));
            if let Some(a) = world.population.get_mut(slot) {
                a.behavior = if searching { Behavior::Searching } else { Behavior::HomeRange };
            }

            // ② Mating
            let mated = is_male && independent && self.estrus_open && self.try_mate(id, pos, day, world, rng)?;

            // ③ Birth
            if !is_male && events.birth && clock.is_first_hour() {
                if let Some(since) = pregnant_since {
                    if day.as_i64() - since as i64 > self.params.gestation_days as i64 {
                        world.population.apply_birth(slot, self.params.mean_litter_size, rng)?;
                    }
                }
            }

            // ④ Lures
            if !mated {
                self.interact_with_lures(id, pos, world)?;
            }

            // ⑤ Traps
            let mut killed = false;
            if events.trapping
                && world.traps.any_within(pos, self.params.trap_encounter_distance)
                && rng.gen_bool(self.params.trap_removal_probability)
            {
                killed = true;
                self.trap_kills_today += 1;
                observer.on_trap_kill(day, id);
            }

            // ⑥ Mortality
            if !killed && clock.is_last_hour() && rng.gen_bool(1.0 - self.params.daily_survival) {
                killed = true;
            }

            // ⑦ Death
            if killed {
                let dead = world.population.kill_and_cascade(slot, &mut world.ledgers);
                trace!(%clock, agent = %id, cascade = dead.len() - 1, "death");
                continue;
            }

            // ⑧ Movement
            if independent {
                self.move_agent(slot, world, rng)?;
            }
        }
        Ok(())
    }

    /// Male `male` at `pos` looks for the first live independent female in
    /// range he has no active mating with.  Returns `true` if a mating took
    /// place (whether or not it led to a pregnancy).
    fn try_mate(
        &self,
        male:  AgentId,
        pos:   Point,
        day:   SimDay,
        world: &mut World<'_>,
        rng:   &mut SimRng,
    ) -> SimResult<bool> {
        let p = &self.params;
        let partner = world
            .population
            .iter_live()
            .find(|(_, f)| {
                f.is_female()
                    && f.is_independent()
                    && !world.ledgers.has_mated(male, f.id)
                    && pos.distance(f.pos) < p.encounter_distance
            })
            .map(|(s, f)| (s, f.id, f.is_pregnant()));
        let Some((female_slot, female, already_pregnant)) = partner else {
            return Ok(false);
        };

        let today = Some(day.0 as i32);
        if !already_pregnant && rng.gen_bool(p.pregnancy_probability) {
            if let Some(f) = world.population.get_mut(female_slot) {
                f.pregnant_since = today;
            }
            for daughter in world.population.dependent_daughters(female) {
                if rng.gen_bool(p.pregnancy_probability) {
                    if let Some(d) = world.population.get_mut(daughter) {
                        d.pregnant_since = today;
                    }
                }
            }
        }
        world.ledgers.record_mating(male, female, p.habituation_days)?;
        trace!(%day, %male, %female, "mating");
        Ok(true)
    }

    /// Record at most one lure visit: the first station in range the agent
    /// is not yet habituated to.
    fn interact_with_lures(&self, agent: AgentId, pos: Point, world: &mut World<'_>) -> SimResult<()> {
        let station = world
            .lures
            .within(pos, self.params.encounter_distance)
            .into_iter()
            .map(|(s, _)| s)
            .find(|&s| !world.ledgers.is_habituated(agent, s));
        if let Some(station) = station {
            world.ledgers.record_habituation(station, agent, self.params.habituation_days)?;
        }
        Ok(())
    }

    fn move_agent(&self, slot: Slot, world: &mut World<'_>, rng: &mut SimRng) -> SimResult<()> {
        let Some(agent) = world.population.get(slot) else { return Ok(()) };
        let goal = match agent.behavior {
            Behavior::HomeRange => Goal::Home(agent.home),
            Behavior::Searching => {
                let ctx = SearchContext::new(&world.population, &world.ledgers, &world.lures);
                match self.attraction.find(agent, &ctx, rng)? {
                    Some(target) => Goal::Attracted(target),
                    None => Goal::Persist,
                }
            }
        };
        let step = self.movement.step(agent.pos, agent.prev_bearing, goal, world.domain, rng)?;
        if let Some(a) = world.population.get_mut(slot) {
            a.pos = step.pos;
            a.prev_bearing = step.bearing;
        }
        Ok(())
    }
}
