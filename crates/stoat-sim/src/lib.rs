//! `stoat-sim`: realisation runner and ensemble driver for the stoat
//! eradication model.
//!
//! # Day/hour loop
//!
//! ```text
//! for day in 0..horizon:
//!   ① Day start  explosion guard, lure release, estrus, dispersal
//!   ② Hours      for hour in 0..hours_per_day, every occupied slot:
//!                   behaviour → mating → birth → lures → traps →
//!                   mortality → death cascade | movement
//!                 eradication checked at the end of every hour
//!   ③ Day end    lure ages one day, ledger TTLs count down
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs ensemble realisations on Rayon's thread pool.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use stoat_sim::{EnsembleConfig, ModelParams, NoopObserver, RealisationBuilder, run_ensemble};
//!
//! let params = ModelParams::default();
//! let mut r = RealisationBuilder::new(&params, &domain, &traps).seed(1).build()?;
//! let outcome = r.run(&mut NoopObserver)?;
//!
//! let records = run_ensemble(&params, &domain, &traps, &EnsembleConfig { realisations: 500, seed: 1 })?;
//! ```

pub mod builder;
pub mod ensemble;
pub mod error;
pub mod observer;
pub mod params;
pub mod realisation;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use builder::RealisationBuilder;
pub use ensemble::{
    EnsembleConfig, EnsembleRecord, RealisationStatus, realisation_seeds, run_ensemble, run_ensemble_with,
};
pub use error::{SimError, SimResult};
pub use observer::{ControlLayout, HourSnapshot, HourTrace, NoopObserver, RealisationObserver, TraceRecorder};
pub use params::{ModelParams, ParamRange, RealisedParams};
pub use realisation::{Outcome, Realisation, Termination};
pub use scheduler::{DailyEventScheduler, DayStart, SchedulerParams, World};
