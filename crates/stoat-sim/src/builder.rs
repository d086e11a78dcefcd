//! Fluent builder for constructing a [`Realisation`].

use tracing::debug;

use stoat_agent::{AgentPopulation, InteractionLedgers};
use stoat_behavior::{AttractionSearch, MovementModel};
use stoat_core::{SimClock, SimRng};
use stoat_schedule::{Calendar, EventCalendar};
use stoat_spatial::{LureField, SpatialDomain, TrapGrid};

use crate::{DailyEventScheduler, ModelParams, Realisation, SchedulerParams, SimResult, World};

/// Fluent builder for [`Realisation`].
///
/// # Required inputs
///
/// - [`ModelParams`]: calendar, rates, ranges to sample
/// - [`SpatialDomain`]: the island
/// - [`TrapGrid`]: trap locations (use [`TrapGrid::empty`] for none)
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                                 |
/// |-------------------|---------------------------------------------------------|
/// | `.seed(s)` / `.rng(r)` | seed 0                                             |
/// | `.population(p)`  | `n_add` seeded adults at random land points             |
/// | `.lures(f)`       | grid at the sampled spacing over the land cells         |
///
/// # Example
///
/// ```rust,ignore
/// let mut r = RealisationBuilder::new(&params, &domain, &traps)
///     .seed(7)
///     .build()?;
/// let outcome = r.run(&mut NoopObserver)?;
/// ```
pub struct RealisationBuilder<'a> {
    params:     &'a ModelParams,
    domain:     &'a SpatialDomain,
    traps:      &'a TrapGrid,
    rng:        Option<SimRng>,
    population: Option<AgentPopulation>,
    lures:      Option<LureField>,
}

impl<'a> RealisationBuilder<'a> {
    pub fn new(params: &'a ModelParams, domain: &'a SpatialDomain, traps: &'a TrapGrid) -> Self {
        Self {
            params,
            domain,
            traps,
            rng: None,
            population: None,
            lures: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(SimRng::new(seed));
        self
    }

    pub fn rng(mut self, rng: SimRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Start from a hand-built population instead of seeding one.  The
    /// reported `n_add` becomes its live count.
    pub fn population(mut self, population: AgentPopulation) -> Self {
        self.population = Some(population);
        self
    }

    /// Use these stations instead of the sampled grid.
    pub fn lures(mut self, lures: LureField) -> Self {
        self.lures = Some(lures);
        self
    }

    /// Validate the parameters, sample this realisation's values, seed the
    /// population and lay out the lure grid.
    pub fn build(self) -> SimResult<Realisation<'a>> {
        let params = self.params;
        params.validate()?;
        let mut rng = self.rng.unwrap_or_else(|| SimRng::new(0));
        let mut realised = params.sample(&mut rng);

        let population = match self.population {
            Some(p) => {
                realised.n_add = p.live_count() as u32;
                p
            }
            None => {
                let mut p = AgentPopulation::new(params.agent_capacity);
                p.seed_initial(realised.n_add, params.gestation_days, self.domain, &mut rng)?;
                p
            }
        };

        let lures = match self.lures {
            Some(f) => f,
            None => LureField::on_grid(self.domain, realised.lure_spacing)?,
        }
        .with_dormancy(params.lure_dormant_after_days);

        let ledgers = InteractionLedgers::new(population.capacity(), lures.len(), params.ledger_overflow);

        let calendar = Calendar::new(params.start_date, params.end_date)?;
        let events = EventCalendar::new(calendar, &params.event_dates());

        let attraction =
            AttractionSearch::new(params.attraction_params(realised.spatial_decay, realised.temporal_decay))?;
        let movement = MovementModel::new(params.movement_params(realised.alpha_k))?;
        let scheduler = DailyEventScheduler::new(SchedulerParams::new(params, &realised), attraction, movement);

        debug!(?realised, stations = lures.len(), "realisation built");

        Ok(Realisation {
            params: realised,
            events,
            scheduler,
            world: World {
                domain: self.domain,
                traps: self.traps,
                lures,
                population,
                ledgers,
            },
            rng,
            clock: SimClock::new(params.hours_per_day),
            total_trap_kills: 0,
            finished: None,
        })
    }
}
