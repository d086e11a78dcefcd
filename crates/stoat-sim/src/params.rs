//! Model parameters and per-realisation sampling.
//!
//! [`ModelParams`] is the configuration surface: fixed scalars plus
//! [`ParamRange`]s for quantities that are uncertain and drawn afresh for
//! every realisation.  [`ModelParams::sample`] turns it into the
//! [`RealisedParams`] a single realisation runs with.
//!
//! Every field has a default (the reference Stoat Island parameterisation),
//! so a JSON file only needs the values it changes:
//!
//! ```json
//! {
//!   "end_date": "2023-02-15",
//!   "lure_spacing": [500, 501],
//!   "trapping": ["20/1", "20/11"]
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stoat_agent::{DEFAULT_AGENT_CAPACITY, LedgerOverflow};
use stoat_behavior::{AttractionParams, DEFAULT_MAX_MOVE_ATTEMPTS, MovementParams};
use stoat_core::SimRng;
use stoat_schedule::{DayMonth, EventDates};

use crate::{SimError, SimResult};

// ── ParamRange ────────────────────────────────────────────────────────────────

/// Uniform range `[lo, hi)`, written `[lo, hi]` in JSON.  `lo == hi` fixes
/// the value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ParamRange {
    pub lo: f64,
    pub hi: f64,
}

impl ParamRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub const fn fixed(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    /// Continuous uniform draw.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        if self.hi > self.lo { rng.gen_range(self.lo..self.hi) } else { self.lo }
    }

    /// Integer uniform draw in `[lo, hi)` (just `lo` when the range is a
    /// single integer).
    pub fn sample_int(&self, rng: &mut SimRng) -> u32 {
        let (lo, hi) = (self.lo as u32, self.hi as u32);
        if hi > lo { rng.gen_range(lo..hi) } else { lo }
    }

    fn check(&self, name: &str, min: f64, max: f64) -> SimResult<()> {
        if !(self.lo <= self.hi) || self.lo < min || self.hi > max {
            return Err(SimError::Config(format!(
                "{name} range [{}, {}] must be ordered and within [{min}, {max}]",
                self.lo, self.hi
            )));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for ParamRange {
    fn from([lo, hi]: [f64; 2]) -> Self {
        Self { lo, hi }
    }
}

impl From<ParamRange> for [f64; 2] {
    fn from(r: ParamRange) -> Self {
        [r.lo, r.hi]
    }
}

// ── ModelParams ───────────────────────────────────────────────────────────────

/// Every input of a realisation apart from the island and the traps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    // ── Calendar ──────────────────────────────────────────────────────────
    pub start_date: NaiveDate,
    /// Exclusive: the run covers `end_date - start_date` days.
    pub end_date: NaiveDate,
    pub hours_per_day: u32,

    // ── Population ────────────────────────────────────────────────────────
    /// Initial number of stoats, drawn as `floor(U(lo, hi))`.
    pub initial_population: ParamRange,
    /// Hard cap on live stoats; exceeding it aborts the realisation.
    pub agent_capacity: usize,
    /// A day starting with more live stoats than this ends the run as a
    /// failed eradication.
    pub max_population: usize,
    pub mean_litter_size: f64,
    pub pregnancy_probability: f64,
    pub gestation_days: u32,
    /// Annual survival probability, converted to a daily one.
    pub annual_survival: ParamRange,

    // ── Movement ──────────────────────────────────────────────────────────
    pub step_scale: f64,
    pub step_shape: f64,
    pub directional_persistence: f64,
    pub alpha_k: ParamRange,
    pub max_move_attempts: u32,

    // ── Attraction ────────────────────────────────────────────────────────
    pub capture_radius: f64,
    pub spatial_decay: ParamRange,
    pub temporal_decay: ParamRange,
    pub min_k: f64,
    pub encounter_distance: f64,
    /// Days a mating or lure interaction is remembered.
    pub habituation_days: ParamRange,
    pub ledger_overflow: LedgerOverflow,

    // ── Lures ─────────────────────────────────────────────────────────────
    /// Grid spacing (m), drawn uniformly and rounded to the nearest 10 m
    /// (ties to even).
    pub lure_spacing: ParamRange,
    pub lure_release: Vec<DayMonth>,
    /// Lures stop attracting this many days after a release.  `None` keeps
    /// them active until the next release.
    pub lure_dormant_after_days: Option<u32>,

    // ── Seasons ───────────────────────────────────────────────────────────
    pub estrus_start: DayMonth,
    pub estrus_end: DayMonth,
    pub dispersal: DayMonth,
    pub birth: DayMonth,

    // ── Trapping ──────────────────────────────────────────────────────────
    pub trapping: Vec<DayMonth>,
    pub trap_session_days: u32,
    pub trap_encounter_distance: f64,
    pub trap_removal_probability: f64,
}

// Built-in dates are `const` items: an invalid literal fails the build.

const fn dm(day: u32, month: u32) -> DayMonth {
    match DayMonth::checked(day, month) {
        Some(d) => d,
        None => panic!("invalid built-in day/month"),
    }
}

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid built-in date"),
    }
}

pub(crate) const START_DATE: NaiveDate = ymd(2021, 8, 1);
pub(crate) const END_DATE: NaiveDate = ymd(2024, 2, 15);

const SEP_15: DayMonth = dm(15, 9);
const NOV_15: DayMonth = dm(15, 11);
const JAN_15: DayMonth = dm(15, 1);
const JAN_16: DayMonth = dm(16, 1);
const OCT_30: DayMonth = dm(30, 10);
const JAN_20: DayMonth = dm(20, 1);
const JUL_20: DayMonth = dm(20, 7);
const NOV_20: DayMonth = dm(20, 11);

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            start_date: START_DATE,
            end_date: END_DATE,
            hours_per_day: 16,

            initial_population: ParamRange::new(6.0, 7.0),
            agent_capacity: DEFAULT_AGENT_CAPACITY,
            max_population: 175,
            mean_litter_size: 9.0,
            pregnancy_probability: 0.9,
            gestation_days: 180,
            annual_survival: ParamRange::new(0.5, 0.501),

            step_scale: 50.0,
            step_shape: 0.9,
            directional_persistence: 3.5,
            alpha_k: ParamRange::new(0.02, 0.0201),
            max_move_attempts: DEFAULT_MAX_MOVE_ATTEMPTS,

            capture_radius: 2500.0,
            spatial_decay: ParamRange::new(0.01, 0.0101),
            temporal_decay: ParamRange::new(0.005, 0.006),
            min_k: 0.005,
            encounter_distance: 25.0,
            habituation_days: ParamRange::new(19.0, 20.0),
            ledger_overflow: LedgerOverflow::Abort,

            lure_spacing: ParamRange::new(300.0, 301.0),
            lure_release: vec![SEP_15, NOV_15],
            lure_dormant_after_days: None,

            estrus_start: SEP_15,
            estrus_end: JAN_15,
            dispersal: JAN_16,
            birth: OCT_30,

            trapping: vec![JAN_20, JUL_20, NOV_20],
            trap_session_days: 14,
            trap_encounter_distance: 15.0,
            trap_removal_probability: 0.2,
        }
    }
}

impl ModelParams {
    /// Reject configurations a realisation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        let cfg = |msg: String| Err(SimError::Config(msg));

        if self.end_date < self.start_date {
            return cfg(format!("end date {} precedes start date {}", self.end_date, self.start_date));
        }
        if self.hours_per_day == 0 {
            return cfg("hours_per_day must be > 0".into());
        }
        if self.agent_capacity == 0 {
            return cfg("agent_capacity must be > 0".into());
        }
        for (name, p) in [
            ("pregnancy_probability", self.pregnancy_probability),
            ("trap_removal_probability", self.trap_removal_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return cfg(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        if !(self.mean_litter_size >= 0.0) {
            return cfg(format!("mean_litter_size must be >= 0, got {}", self.mean_litter_size));
        }
        if !(self.encounter_distance >= 0.0) || !(self.trap_encounter_distance >= 0.0) {
            return cfg("encounter distances must be >= 0".into());
        }

        self.initial_population.check("initial_population", 0.0, self.agent_capacity as f64 + 1.0)?;
        self.annual_survival.check("annual_survival", 0.0, 1.0)?;
        self.alpha_k.check("alpha_k", 0.0, f64::INFINITY)?;
        self.spatial_decay.check("spatial_decay", 0.0, f64::INFINITY)?;
        self.temporal_decay.check("temporal_decay", 0.0, f64::INFINITY)?;
        self.habituation_days.check("habituation_days", 1.0, f64::INFINITY)?;
        self.lure_spacing.check("lure_spacing", 1.0, f64::INFINITY)?;

        self.attraction_params(0.0, 0.0).validate()?;
        self.movement_params(0.0).validate()?;
        Ok(())
    }

    /// Draw this realisation's uncertain parameters.
    pub fn sample(&self, rng: &mut SimRng) -> RealisedParams {
        let n_add = self.initial_population.sample(rng).floor() as u32;
        let lure_spacing = (self.lure_spacing.sample(rng) / 10.0).round_ties_even() * 10.0;
        let spatial_decay = self.spatial_decay.sample(rng);
        let temporal_decay = self.temporal_decay.sample(rng);
        let habituation_days = self.habituation_days.sample_int(rng);
        let annual = self.annual_survival.sample(rng);
        let alpha_k = self.alpha_k.sample(rng);
        RealisedParams {
            n_add,
            lure_spacing,
            n_deployments: self.lure_release.len() as u32,
            alpha_k,
            spatial_decay,
            temporal_decay,
            habituation_days,
            daily_survival: annual.powf(1.0 / 365.0),
        }
    }

    pub fn event_dates(&self) -> EventDates {
        EventDates {
            lure_release: self.lure_release.clone(),
            estrus_start: self.estrus_start,
            estrus_end: self.estrus_end,
            dispersal: self.dispersal,
            birth: self.birth,
            trapping: self.trapping.clone(),
            trap_session_days: self.trap_session_days,
        }
    }

    pub fn attraction_params(&self, spatial_decay: f64, temporal_decay: f64) -> AttractionParams {
        AttractionParams {
            capture_radius: self.capture_radius,
            spatial_decay,
            temporal_decay,
            min_k: self.min_k,
        }
    }

    pub fn movement_params(&self, alpha_k: f64) -> MovementParams {
        MovementParams {
            step_scale: self.step_scale,
            step_shape: self.step_shape,
            directional_persistence: self.directional_persistence,
            alpha_k,
            max_move_attempts: self.max_move_attempts,
        }
    }
}

// ── RealisedParams ────────────────────────────────────────────────────────────

/// The values one realisation actually ran with.  Reported alongside its
/// outcome.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealisedParams {
    /// Initial population size.
    pub n_add: u32,
    /// Lure grid spacing (m).
    pub lure_spacing: f64,
    /// Lure releases per year.
    pub n_deployments: u32,
    pub alpha_k: f64,
    pub spatial_decay: f64,
    pub temporal_decay: f64,
    pub habituation_days: u32,
    /// Daily survival probability.
    pub daily_survival: f64,
}
