//! Monte-Carlo ensembles of independent realisations.
//!
//! Realisation `i` is seeded from child stream `i` of the ensemble seed, so
//! its result does not depend on how many threads run the ensemble or in
//! which order.  With the `parallel` feature, realisations run on Rayon's
//! thread pool.
//!
//! A realisation that fails (capacity overflow, movement exhaustion, …) is
//! recorded as [`RealisationStatus::Aborted`] and the ensemble carries on.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stoat_core::SimRng;
use stoat_spatial::{SpatialDomain, TrapGrid};

use crate::{ModelParams, NoopObserver, Outcome, RealisationBuilder, RealisationObserver, SimResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    pub realisations: u32,
    pub seed: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self { realisations: 100, seed: 42 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealisationStatus {
    Completed(Outcome),
    /// The error that stopped it.
    Aborted(String),
}

impl RealisationStatus {
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            RealisationStatus::Completed(o) => Some(o),
            RealisationStatus::Aborted(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleRecord {
    pub index:  u32,
    pub seed:   u64,
    pub status: RealisationStatus,
}

/// Per-realisation seeds derived from the ensemble seed.
pub fn realisation_seeds(config: &EnsembleConfig) -> Vec<u64> {
    let mut root = SimRng::new(config.seed);
    (0..config.realisations)
        .map(|i| root.child(i as u64).random::<u64>())
        .collect()
}

/// Run the ensemble without observers.
pub fn run_ensemble(
    params: &ModelParams,
    domain: &SpatialDomain,
    traps:  &TrapGrid,
    config: &EnsembleConfig,
) -> SimResult<Vec<EnsembleRecord>> {
    run_ensemble_with(params, domain, traps, config, |_| NoopObserver)
}

/// Run the ensemble, giving realisation `i` the observer `make_observer(i)`.
///
/// Fails early only on invalid parameters; every other error aborts just
/// the realisation it happened in.  Records come back in index order.
pub fn run_ensemble_with<O, F>(
    params: &ModelParams,
    domain: &SpatialDomain,
    traps:  &TrapGrid,
    config: &EnsembleConfig,
    make_observer: F,
) -> SimResult<Vec<EnsembleRecord>>
where
    O: RealisationObserver,
    F: Fn(u32) -> O + Sync,
{
    params.validate()?;
    let seeds = realisation_seeds(config);
    info!(realisations = config.realisations, seed = config.seed, "ensemble start");

    let run_one = |(index, seed): (usize, u64)| {
        let index = index as u32;
        let mut observer = make_observer(index);
        let status = match RealisationBuilder::new(params, domain, traps)
            .seed(seed)
            .build()
            .and_then(|mut r| r.run(&mut observer))
        {
            Ok(outcome) => RealisationStatus::Completed(outcome),
            Err(e) => {
                warn!(index, seed, error = %e, "realisation aborted");
                RealisationStatus::Aborted(e.to_string())
            }
        };
        EnsembleRecord { index, seed, status }
    };

    #[cfg(not(feature = "parallel"))]
    let records: Vec<EnsembleRecord> = seeds.into_iter().enumerate().map(run_one).collect();

    #[cfg(feature = "parallel")]
    let records: Vec<EnsembleRecord> = {
        use rayon::prelude::*;
        seeds.into_par_iter().enumerate().map(run_one).collect()
    };

    let completed: Vec<&Outcome> = records.iter().filter_map(|r| r.status.outcome()).collect();
    let eradicated = completed.iter().filter(|o| o.eradicated).count();
    info!(
        completed = completed.len(),
        aborted = records.len() - completed.len(),
        eradicated,
        "ensemble end"
    );
    Ok(records)
}
