//! Integration tests for stoat-sim.

use chrono::NaiveDate;

use stoat_agent::{AgentPopulation, Sex};
use stoat_core::Point;
use stoat_schedule::DayMonth;
use stoat_spatial::{LandMask, SpatialDomain};

use crate::{ModelParams, ParamRange};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dm(s: &str) -> DayMonth {
    s.parse().unwrap()
}

/// 2 km × 2 km all-land island.
fn island() -> SpatialDomain {
    SpatialDomain::new(LandMask::from_fn(20, 20, |_, _| true), Point::new(0.0, 2000.0), 100.0).unwrap()
}

/// One 1 km pixel; land is the quarter nearest the pixel's top-left corner.
fn single_pixel_island() -> SpatialDomain {
    SpatialDomain::new(LandMask::from_fn(1, 1, |_, _| true), Point::new(0.0, 1000.0), 1000.0).unwrap()
}

/// Defaults over `days` days from 1 Aug 2021, with no deaths and no
/// scheduled events inside the window unless a test adds them.
fn quiet_params(days: u64) -> ModelParams {
    let start = date(2021, 8, 1);
    ModelParams {
        start_date: start,
        end_date: start + chrono::Days::new(days),
        annual_survival: ParamRange::fixed(1.0),
        lure_release: vec![],
        trapping: vec![],
        estrus_start: dm("1/7"),
        estrus_end: dm("2/7"),
        dispersal: dm("3/7"),
        birth: dm("4/7"),
        ..ModelParams::default()
    }
}

fn pair_at(male: Point, female: Point) -> AgentPopulation {
    let mut pop = AgentPopulation::new(1000);
    pop.spawn(Sex::Male, male).unwrap();
    pop.spawn(Sex::Female, female).unwrap();
    pop
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use stoat_core::SimRng;
    use stoat_schedule::DayMonth;

    use super::{date, dm};
    use crate::{ModelParams, ParamRange, SimError};

    #[test]
    fn defaults_are_valid() {
        ModelParams::default().validate().unwrap();
    }

    #[test]
    fn default_calendar_and_events() {
        let p = ModelParams::default();
        assert_eq!(p.start_date, date(2021, 8, 1));
        assert_eq!(p.end_date, date(2024, 2, 15));
        assert_eq!(p.lure_release, vec![dm("15/9"), dm("15/11")]);
        assert_eq!(p.trapping, vec![dm("20/1"), dm("20/7"), dm("20/11")]);
        assert_eq!(p.event_dates().trap_session_days, 14);
    }

    #[test]
    fn json_round_trip_of_defaults() {
        let p = ModelParams::default();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"15/9\""));
        let back: ModelParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r#"{ "hours_per_day": 12, "lure_spacing": [500, 501], "trapping": ["1/2"] }"#;
        let p: ModelParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.hours_per_day, 12);
        assert_eq!(p.lure_spacing, ParamRange::new(500.0, 501.0));
        assert_eq!(p.trapping, vec![dm("1/2")]);
        assert_eq!(p.gestation_days, ModelParams::default().gestation_days);
    }

    #[test]
    fn bad_date_in_json_is_rejected() {
        assert!(serde_json::from_str::<ModelParams>(r#"{ "birth": "31/4" }"#).is_err());
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let ok = ModelParams::default();
        let cases = [
            ModelParams { hours_per_day: 0, ..ok.clone() },
            ModelParams { end_date: date(2020, 1, 1), ..ok.clone() },
            ModelParams { pregnancy_probability: 1.5, ..ok.clone() },
            ModelParams { min_k: 0.0, ..ok.clone() },
            ModelParams { capture_radius: 0.0, ..ok.clone() },
            ModelParams { alpha_k: ParamRange::new(0.3, 0.2), ..ok.clone() },
            ModelParams { annual_survival: ParamRange::new(0.5, 1.5), ..ok.clone() },
            ModelParams { habituation_days: ParamRange::fixed(0.0), ..ok.clone() },
        ];
        for bad in cases {
            assert!(matches!(bad.validate(), Err(SimError::Config(_) | SimError::Behavior(_))), "{bad:?}");
        }
    }

    #[test]
    fn sampling_follows_the_range_rules() {
        let p = ModelParams {
            initial_population: ParamRange::fixed(6.0),
            lure_spacing: ParamRange::fixed(304.0),
            habituation_days: ParamRange::new(19.0, 20.0),
            annual_survival: ParamRange::fixed(0.5),
            alpha_k: ParamRange::fixed(0.02),
            ..ModelParams::default()
        };
        let r = p.sample(&mut SimRng::new(3));
        assert_eq!(r.n_add, 6);
        assert_eq!(r.lure_spacing, 300.0);
        assert_eq!(r.habituation_days, 19);
        assert_eq!(r.n_deployments, 2);
        assert_eq!(r.alpha_k, 0.02);
        assert!((r.daily_survival - 0.5f64.powf(1.0 / 365.0)).abs() < 1e-12);
    }

    #[test]
    fn spacing_rounds_to_ten_metres_ties_to_even() {
        let spacing = |v: f64| {
            let p = ModelParams { lure_spacing: ParamRange::fixed(v), ..ModelParams::default() };
            p.sample(&mut SimRng::new(1)).lure_spacing
        };
        assert_eq!(spacing(305.0), 300.0);
        assert_eq!(spacing(315.0), 320.0);
        assert_eq!(spacing(306.0), 310.0);
        assert_eq!(spacing(294.9), 290.0);
    }

    #[test]
    fn built_in_dates_are_the_reference_campaign() {
        assert_eq!(crate::params::START_DATE, date(2021, 8, 1));
        assert_eq!(crate::params::END_DATE, date(2024, 2, 15));
        assert!(DayMonth::checked(31, 4).is_none());
        assert!(DayMonth::checked(29, 2).is_some());
        let p = ModelParams::default();
        assert_ne!(p.start_date, chrono::NaiveDate::default());
        assert_eq!(p.end_date.signed_duration_since(p.start_date).num_days(), 928);
    }

    #[test]
    fn sampled_values_stay_in_range() {
        let p = ModelParams::default();
        let mut rng = SimRng::new(11);
        for _ in 0..200 {
            let r = p.sample(&mut rng);
            assert_eq!(r.n_add, 6);
            assert!((0.01..0.0101).contains(&r.spatial_decay));
            assert!((0.005..0.006).contains(&r.temporal_decay));
            assert_eq!(r.lure_spacing, 300.0);
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use stoat_core::{Point, SimClock, SimDay};
    use stoat_spatial::{LureField, TrapGrid};

    use super::{dm, island, pair_at, quiet_params, single_pixel_island};
    use crate::{
        HourSnapshot, ModelParams, NoopObserver, ParamRange, RealisationBuilder, RealisationObserver,
        Termination, TraceRecorder,
    };

    /// One male and one female on a single-pixel island with estrus all
    /// run: they mate on day 0 and the litter is born on the birth day.
    #[test]
    fn scenario_a_pair_breeds_on_tiny_island() {
        let domain = single_pixel_island();
        let traps = TrapGrid::empty();
        let params = ModelParams {
            estrus_start: dm("1/8"),
            birth: dm("10/8"),
            gestation_days: 0,
            pregnancy_probability: 1.0,
            encounter_distance: 1000.0,
            mean_litter_size: 12.0,
            ..quiet_params(30)
        };
        let pop = pair_at(Point::new(100.0, 900.0), Point::new(200.0, 800.0));
        let mut r = RealisationBuilder::new(&params, &domain, &traps)
            .seed(5)
            .population(pop)
            .lures(LureField::empty())
            .build()
            .unwrap();

        // Day 0: the mating is on record and the female is pregnant.
        r.step_day(&mut NoopObserver).unwrap();
        let world = r.world();
        assert_eq!(world.ledgers.mating.len(), 1);
        let female = world.population.iter_live().find(|(_, a)| a.is_female()).unwrap().1;
        assert_eq!(female.pregnant_since, Some(0));

        let outcome = r.run(&mut NoopObserver).unwrap();
        assert_eq!(outcome.termination, Termination::HorizonReached);
        assert!(!outcome.eradicated);
        assert!(outcome.final_population > 2, "no births: {outcome:?}");
        assert_eq!(outcome.params.n_add, 2);

        for (_, a) in r.world().population.iter_live() {
            assert!(domain.is_on_land(a.pos));
        }
    }

    /// Zero survival kills everyone on the last hour of day 0.
    #[test]
    fn scenario_b_zero_survival_eradicates_on_day_zero() {
        let domain = island();
        let traps = TrapGrid::empty();
        let params = ModelParams { annual_survival: ParamRange::fixed(0.0), ..quiet_params(30) };
        let outcome = RealisationBuilder::new(&params, &domain, &traps)
            .seed(9)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();
        assert!(outcome.eradicated);
        assert_eq!(outcome.termination, Termination::Eradicated { day: SimDay(0), hour: params.hours_per_day - 1 });
        assert_eq!(outcome.days_simulated, 1);
        assert_eq!(outcome.final_population, 0);
    }

    /// Certain removal with every stoat in range of a trap clears the
    /// island in the first hour of the first trapping day.
    #[test]
    fn scenario_c_certain_trapping_eradicates_in_first_hour() {
        let domain = island();
        let traps = TrapGrid::new(vec![Point::new(1000.0, 1000.0)]);
        let params = ModelParams {
            trapping: vec![dm("1/8")],
            trap_session_days: 30,
            trap_removal_probability: 1.0,
            trap_encounter_distance: 1.0e6,
            ..quiet_params(30)
        };
        let mut trace = TraceRecorder::new();
        let outcome = RealisationBuilder::new(&params, &domain, &traps)
            .seed(21)
            .build()
            .unwrap()
            .run(&mut trace)
            .unwrap();

        assert_eq!(outcome.termination, Termination::Eradicated { day: SimDay(0), hour: 0 });
        assert_eq!(outcome.total_trap_kills, outcome.params.n_add as u64);
        assert_eq!(trace.trap_kills, vec![outcome.params.n_add]);
        assert_eq!(trace.hours.len(), 1);
        assert!(trace.hours[0].agents.is_empty());
    }

    /// Habituation count per hour.
    struct HabituationLog(Vec<(SimClock, usize)>);

    impl RealisationObserver for HabituationLog {
        fn on_hour_end(&mut self, clock: SimClock, snap: &HourSnapshot<'_>) {
            self.0.push((clock, snap.ledgers.habituation.len()));
        }
    }

    /// A one-day habituation expires overnight and the stoat visits the
    /// same station again the next morning.
    #[test]
    fn scenario_d_habituation_expires_and_renews() {
        let domain = island();
        let traps = TrapGrid::empty();
        let station = Point::new(1000.0, 1000.0);
        let params = ModelParams {
            habituation_days: ParamRange::fixed(1.0),
            encounter_distance: 1.0e4,
            ..quiet_params(5)
        };
        let mut pop = stoat_agent::AgentPopulation::new(10);
        pop.spawn(stoat_agent::Sex::Female, station).unwrap();

        let mut r = RealisationBuilder::new(&params, &domain, &traps)
            .seed(2)
            .population(pop)
            .lures(LureField::new(vec![station]))
            .build()
            .unwrap();
        let mut log = HabituationLog(Vec::new());

        r.step_day(&mut log).unwrap();
        assert!(log.0.iter().all(|&(_, n)| n == 1));
        assert!(r.world().ledgers.habituation.is_empty(), "record outlived its TTL");

        r.step_day(&mut log).unwrap();
        let (clock, n) = log.0[params.hours_per_day as usize];
        assert_eq!((clock.day, clock.hour, n), (SimDay(1), 0, 1));
    }

    #[test]
    fn explosion_guard_abandons_the_run() {
        let domain = island();
        let traps = TrapGrid::empty();
        let params = ModelParams { max_population: 2, ..quiet_params(30) };
        let outcome = RealisationBuilder::new(&params, &domain, &traps)
            .seed(4)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();
        assert!(!outcome.eradicated);
        assert_eq!(outcome.termination, Termination::PopulationExplosion { day: SimDay(0), live: 6 });
        assert_eq!(outcome.days_simulated, 0);
    }

    #[test]
    fn empty_calendar_reaches_horizon_immediately() {
        let domain = island();
        let traps = TrapGrid::empty();
        let params = quiet_params(0);
        let mut r = RealisationBuilder::new(&params, &domain, &traps).seed(1).build().unwrap();
        let outcome = r.run(&mut NoopObserver).unwrap();
        assert_eq!(outcome.termination, Termination::HorizonReached);
        assert_eq!(outcome.days_simulated, 0);
        assert_eq!(outcome.final_population, 6);
        assert_eq!(r.step_day(&mut NoopObserver).unwrap(), Some(Termination::HorizonReached));
    }

    #[test]
    fn same_seed_same_outcome() {
        let domain = island();
        let traps = TrapGrid::new(vec![Point::new(500.0, 500.0), Point::new(1500.0, 1500.0)]);
        let start = chrono::NaiveDate::from_ymd_opt(2021, 8, 1).unwrap();
        let params = ModelParams { end_date: start + chrono::Days::new(150), ..ModelParams::default() };
        let run = |seed| {
            RealisationBuilder::new(&params, &domain, &traps)
                .seed(seed)
                .build()
                .unwrap()
                .run(&mut NoopObserver)
                .unwrap()
        };
        assert_eq!(run(77), run(77));
    }
}

// ── Hourly rules ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod hourly_rules {
    use stoat_agent::{AgentError, AgentPopulation, Behavior, InteractionLedgers, LedgerOverflow, Maturity, Sex};
    use stoat_behavior::{AttractionParams, AttractionSearch, MovementModel, MovementParams};
    use stoat_core::{AgentId, LureId, Point, SimClock, SimDay, SimRng, Slot};
    use stoat_schedule::DayEvents;
    use stoat_spatial::{LureField, SpatialDomain, TrapGrid};

    use super::island;
    use crate::{DailyEventScheduler, NoopObserver, SchedulerParams, SimError, World};

    const HOURS: u32 = 4;

    /// Certain pregnancy, no deaths, no trapping.
    fn rates() -> SchedulerParams {
        SchedulerParams {
            encounter_distance:       50.0,
            pregnancy_probability:    1.0,
            gestation_days:           10,
            mean_litter_size:         20.0,
            habituation_days:         5,
            trap_encounter_distance:  0.0,
            trap_removal_probability: 0.0,
            daily_survival:           1.0,
            max_population:           100,
        }
    }

    fn scheduler(params: SchedulerParams) -> DailyEventScheduler {
        let attraction = AttractionSearch::new(AttractionParams {
            capture_radius: 2500.0,
            spatial_decay:  0.01,
            temporal_decay: 0.005,
            min_k:          0.005,
        })
        .unwrap();
        let movement = MovementModel::new(MovementParams {
            step_scale:              50.0,
            step_shape:              0.9,
            directional_persistence: 3.5,
            alpha_k:                 0.02,
            max_move_attempts:       100_000,
        })
        .unwrap();
        DailyEventScheduler::new(params, attraction, movement)
    }

    fn world<'a>(
        domain: &'a SpatialDomain,
        traps: &'a TrapGrid,
        population: AgentPopulation,
        lures: LureField,
        overflow: LedgerOverflow,
    ) -> World<'a> {
        let ledgers = InteractionLedgers::new(population.capacity(), lures.len(), overflow);
        World { domain, traps, lures, population, ledgers }
    }

    fn open_estrus(s: &mut DailyEventScheduler, w: &mut World<'_>, rng: &mut SimRng) {
        let events = DayEvents { estrus_start: true, ..DayEvents::default() };
        s.start_day(SimDay(0), &events, w, rng).unwrap();
        assert!(s.estrus_open());
    }

    /// A mid-day hour: no birth check, no natural mortality.
    fn mid_hour(day: u32) -> SimClock {
        SimClock::at(SimDay(day), 1, HOURS)
    }

    fn id_of(pop: &AgentPopulation, slot: Slot) -> AgentId {
        pop.get(slot).unwrap().id
    }

    fn make_dependent(pop: &mut AgentPopulation, kit: Slot, mother: Slot) {
        let parent = id_of(pop, mother);
        pop.get_mut(kit).unwrap().maturity = Maturity::Dependent { parent };
    }

    #[test]
    fn estrus_behaviour_by_sex_pregnancy_and_kits() {
        let (domain, traps) = (island(), TrapGrid::empty());
        let mut pop = AgentPopulation::new(10);
        let male = pop.spawn(Sex::Male, Point::new(300.0, 300.0)).unwrap();
        let pregnant = pop.spawn(Sex::Female, Point::new(1700.0, 300.0)).unwrap();
        let mother = pop.spawn(Sex::Female, Point::new(300.0, 1700.0)).unwrap();
        let kit = pop.spawn(Sex::Male, Point::new(300.0, 1700.0)).unwrap();
        let free = pop.spawn(Sex::Female, Point::new(1700.0, 1700.0)).unwrap();
        pop.get_mut(pregnant).unwrap().pregnant_since = Some(0);
        make_dependent(&mut pop, kit, mother);

        let mut w = world(&domain, &traps, pop, LureField::empty(), LedgerOverflow::Abort);
        let mut s = scheduler(rates());
        let mut rng = SimRng::new(1);

        // Closed season: everyone keeps to the home range.
        s.run_hour(mid_hour(0), &DayEvents::default(), &mut w, &mut rng, &mut NoopObserver).unwrap();
        assert!(w.population.iter_live().all(|(_, a)| a.behavior == Behavior::HomeRange));

        open_estrus(&mut s, &mut w, &mut rng);
        s.run_hour(mid_hour(0), &DayEvents::default(), &mut w, &mut rng, &mut NoopObserver).unwrap();
        let behavior = |slot| w.population.get(slot).unwrap().behavior;
        assert_eq!(behavior(male), Behavior::Searching);
        assert_eq!(behavior(pregnant), Behavior::HomeRange);
        assert_eq!(behavior(mother), Behavior::HomeRange);
        assert_eq!(behavior(free), Behavior::Searching);
        assert!(w.ledgers.mating.is_empty());
    }

    #[test]
    fn mating_makes_dependent_daughters_pregnant_too() {
        let (domain, traps) = (island(), TrapGrid::empty());
        let at = Point::new(1000.0, 1000.0);
        let mut pop = AgentPopulation::new(10);
        let male = pop.spawn(Sex::Male, at).unwrap();
        let mother = pop.spawn(Sex::Female, at).unwrap();
        let daughters = [pop.spawn(Sex::Female, at).unwrap(), pop.spawn(Sex::Female, at).unwrap()];
        let son = pop.spawn(Sex::Male, at).unwrap();
        for kit in daughters.into_iter().chain([son]) {
            make_dependent(&mut pop, kit, mother);
        }

        let mut w = world(&domain, &traps, pop, LureField::empty(), LedgerOverflow::Abort);
        let mut s = scheduler(rates());
        let mut rng = SimRng::new(2);
        open_estrus(&mut s, &mut w, &mut rng);
        s.run_hour(mid_hour(3), &DayEvents::default(), &mut w, &mut rng, &mut NoopObserver).unwrap();

        let since = |slot| w.population.get(slot).unwrap().pregnant_since;
        assert_eq!(since(mother), Some(3));
        assert_eq!(since(daughters[0]), Some(3));
        assert_eq!(since(daughters[1]), Some(3));
        assert_eq!(since(son), None);
        assert!(w.ledgers.has_mated(id_of(&w.population, male), id_of(&w.population, mother)));
        assert_eq!(w.ledgers.mating.len(), 1);
    }

    #[test]
    fn no_mating_after_the_season_closes() {
        let (domain, traps) = (island(), TrapGrid::empty());
        let at = Point::new(1000.0, 1000.0);
        let mut pop = AgentPopulation::new(10);
        let male = pop.spawn(Sex::Male, at).unwrap();
        let female = pop.spawn(Sex::Female, at).unwrap();

        let mut w = world(&domain, &traps, pop, LureField::empty(), LedgerOverflow::Abort);
        let mut s = scheduler(rates());
        let mut rng = SimRng::new(3);
        open_estrus(&mut s, &mut w, &mut rng);
        let close = DayEvents { estrus_end: true, ..DayEvents::default() };
        s.start_day(SimDay(1), &close, &mut w, &mut rng).unwrap();
        assert!(!s.estrus_open());

        s.run_hour(mid_hour(1), &close, &mut w, &mut rng, &mut NoopObserver).unwrap();
        assert!(w.ledgers.mating.is_empty());
        assert_eq!(w.population.get(female).unwrap().pregnant_since, None);
        assert_eq!(w.population.get(male).unwrap().behavior, Behavior::HomeRange);
    }

    #[test]
    fn a_male_that_mated_skips_the_lure() {
        let (domain, traps) = (island(), TrapGrid::empty());
        let (p, q) = (Point::new(600.0, 600.0), Point::new(1400.0, 1400.0));
        let mut pop = AgentPopulation::new(10);
        let suitor = pop.spawn(Sex::Male, p).unwrap();
        let female = pop.spawn(Sex::Female, p).unwrap();
        let loner = pop.spawn(Sex::Male, q).unwrap();

        let lures = LureField::new(vec![p, q]);
        let mut w = world(&domain, &traps, pop, lures, LedgerOverflow::Abort);
        let mut s = scheduler(rates());
        let mut rng = SimRng::new(4);
        open_estrus(&mut s, &mut w, &mut rng);
        s.run_hour(mid_hour(0), &DayEvents::default(), &mut w, &mut rng, &mut NoopObserver).unwrap();

        let id = |slot| id_of(&w.population, slot);
        assert_eq!(w.ledgers.mating.len(), 1);
        assert!(!w.ledgers.is_habituated(id(suitor), LureId(0)));
        assert!(w.ledgers.is_habituated(id(female), LureId(0)));
        assert!(w.ledgers.is_habituated(id(loner), LureId(1)));
        assert_eq!(w.ledgers.habituation.len(), 2);
    }

    #[test]
    fn birth_needs_more_than_the_gestation_period() {
        let (domain, traps) = (island(), TrapGrid::empty());
        let mut pop = AgentPopulation::new(100);
        let mother = pop.spawn(Sex::Female, Point::new(1000.0, 1000.0)).unwrap();
        pop.get_mut(mother).unwrap().pregnant_since = Some(0);

        let mut w = world(&domain, &traps, pop, LureField::empty(), LedgerOverflow::Abort);
        let mut s = scheduler(rates());
        let mut rng = SimRng::new(5);
        let birth_day = DayEvents { birth: true, ..DayEvents::default() };

        // day - since == gestation: still pregnant.
        s.run_hour(SimClock::at(SimDay(10), 0, HOURS), &birth_day, &mut w, &mut rng, &mut NoopObserver).unwrap();
        assert_eq!(w.population.live_count(), 1);
        assert_eq!(w.population.get(mother).unwrap().pregnant_since, Some(0));

        // Only the first hour of a birth day counts.
        s.run_hour(SimClock::at(SimDay(11), 1, HOURS), &birth_day, &mut w, &mut rng, &mut NoopObserver).unwrap();
        assert_eq!(w.population.live_count(), 1);

        s.run_hour(SimClock::at(SimDay(11), 0, HOURS), &birth_day, &mut w, &mut rng, &mut NoopObserver).unwrap();
        assert!(w.population.live_count() > 1);
        assert_eq!(w.population.get(mother).unwrap().pregnant_since, None);
        let mother_id = id_of(&w.population, mother);
        assert!(w.population.has_dependent_offspring(mother_id));
    }

    /// Two females at one station; the habituation ledger holds one record.
    fn crowded_station(overflow: LedgerOverflow) -> (Result<(), SimError>, usize) {
        let (domain, traps) = (island(), TrapGrid::empty());
        let at = Point::new(1000.0, 1000.0);
        let mut pop = AgentPopulation::new(10);
        pop.spawn(Sex::Female, at).unwrap();
        pop.spawn(Sex::Female, at).unwrap();

        let mut w = world(&domain, &traps, pop, LureField::new(vec![at]), overflow);
        w.ledgers = InteractionLedgers::new(1, 1, overflow);
        let mut s = scheduler(rates());
        let mut rng = SimRng::new(6);
        let result = s.run_hour(mid_hour(0), &DayEvents::default(), &mut w, &mut rng, &mut NoopObserver);
        (result, w.ledgers.habituation.len())
    }

    #[test]
    fn full_ledger_under_skip_keeps_the_run_going() {
        let (result, recorded) = crowded_station(LedgerOverflow::Skip);
        result.unwrap();
        assert_eq!(recorded, 1);
    }

    #[test]
    fn full_ledger_under_abort_fails_the_hour() {
        let (result, _) = crowded_station(LedgerOverflow::Abort);
        assert!(matches!(result, Err(SimError::Agent(AgentError::LedgerFull { .. }))));
    }
}

// ── Invariants ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use std::collections::HashSet;

    use stoat_core::{Point, SimClock};

    use super::island;
    use crate::{HourSnapshot, ModelParams, RealisationBuilder, RealisationObserver};

    use stoat_spatial::TrapGrid;

    /// Checks the population and ledger invariants after every hour.
    struct Checker {
        hours: usize,
        max_live: usize,
    }

    impl RealisationObserver for Checker {
        fn on_hour_end(&mut self, clock: SimClock, snap: &HourSnapshot<'_>) {
            self.hours += 1;
            let live: Vec<_> = snap.population.iter_live().map(|(_, a)| a.id).collect();
            let ids: HashSet<_> = live.iter().copied().collect();
            assert_eq!(ids.len(), live.len(), "{clock}: duplicate live ids");
            assert_eq!(ids.len(), snap.population.live_count());
            self.max_live = self.max_live.max(ids.len());

            let mut pairs = HashSet::new();
            for rec in snap.ledgers.mating.records() {
                assert_ne!(rec.male, rec.female, "{clock}: self-mating");
                assert!(ids.contains(&rec.male) && ids.contains(&rec.female), "{clock}: dead mate on record");
                assert!(pairs.insert((rec.male, rec.female)), "{clock}: duplicate mating");
            }
            for rec in snap.ledgers.habituation.records() {
                assert!(ids.contains(&rec.agent), "{clock}: dead agent habituated");
            }
            for (_, a) in snap.population.iter_live() {
                if let Some(mother) = a.parent() {
                    assert!(ids.contains(&mother), "{clock}: orphaned dependent");
                }
            }
        }
    }

    #[test]
    fn hold_through_a_breeding_season() {
        let domain = island();
        let traps = TrapGrid::new(vec![Point::new(700.0, 700.0), Point::new(1300.0, 1300.0)]);
        let start = chrono::NaiveDate::from_ymd_opt(2021, 8, 1).unwrap();
        // Covers lure release, estrus, births and a trapping session.
        let params = ModelParams { end_date: start + chrono::Days::new(125), ..ModelParams::default() };

        let mut checker = Checker { hours: 0, max_live: 0 };
        let outcome = RealisationBuilder::new(&params, &domain, &traps)
            .seed(13)
            .build()
            .unwrap()
            .run(&mut checker)
            .unwrap();
        assert!(checker.hours > 0);
        assert!(checker.max_live >= outcome.final_population);
    }
}

// ── Ensemble ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ensemble {
    use super::{date, dm, island, quiet_params};
    use crate::{
        EnsembleConfig, ModelParams, ParamRange, RealisationStatus, TraceRecorder, realisation_seeds,
        run_ensemble, run_ensemble_with,
    };

    use stoat_spatial::TrapGrid;

    #[test]
    fn seeds_are_reproducible_and_distinct() {
        let cfg = EnsembleConfig { realisations: 16, seed: 99 };
        let a = realisation_seeds(&cfg);
        assert_eq!(a, realisation_seeds(&cfg));
        let unique: std::collections::HashSet<_> = a.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn one_record_per_realisation_in_order() {
        let domain = island();
        let traps = TrapGrid::empty();
        let params = ModelParams { annual_survival: ParamRange::fixed(0.0), ..quiet_params(10) };
        let cfg = EnsembleConfig { realisations: 5, seed: 1 };
        let records = run_ensemble(&params, &domain, &traps, &cfg).unwrap();
        assert_eq!(records.len(), 5);
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.index, i as u32);
            assert!(rec.status.outcome().unwrap().eradicated);
        }
    }

    #[test]
    fn aborted_realisations_do_not_stop_the_ensemble() {
        let domain = island();
        let traps = TrapGrid::empty();
        // Six seeded adults fill the arena; the first litter overflows it.
        let params = ModelParams {
            start_date: date(2021, 10, 25),
            end_date: date(2021, 11, 5),
            agent_capacity: 6,
            birth: dm("30/10"),
            ..quiet_params(0)
        };
        let cfg = EnsembleConfig { realisations: 3, seed: 8 };
        let records = run_ensemble(&params, &domain, &traps, &cfg).unwrap();
        assert_eq!(records.len(), 3);
        for rec in &records {
            match &rec.status {
                RealisationStatus::Aborted(msg) => assert!(msg.contains("capacity"), "{msg}"),
                other => panic!("expected abort, got {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_params_fail_the_whole_ensemble() {
        let params = ModelParams { hours_per_day: 0, ..ModelParams::default() };
        let cfg = EnsembleConfig { realisations: 3, seed: 8 };
        assert!(run_ensemble(&params, &island(), &TrapGrid::empty(), &cfg).is_err());
    }

    #[test]
    fn observers_are_made_per_realisation() {
        let domain = island();
        let traps = TrapGrid::empty();
        let params = quiet_params(2);
        let cfg = EnsembleConfig { realisations: 2, seed: 3 };
        let records = run_ensemble_with(&params, &domain, &traps, &cfg, |_| TraceRecorder::new()).unwrap();
        assert!(records.iter().all(|r| r.status.outcome().is_some_and(|o| o.days_simulated == 2)));
    }
}
