//! Choice of a centre of attraction for a searching agent.
//!
//! # Kernel
//!
//! Every candidate within `capture_radius` gets the weight
//!
//! ```text
//! mate:  exp(-spatial_decay · d) / min_k
//! lure:  exp(-spatial_decay · d) · exp(-temporal_decay · days_since_release) / min_k
//! ```
//!
//! Mates are the live independent agents of the opposite sex the seeker has
//! not recently mated with; lures are the stations of an active release the
//! seeker is not habituated to.  Mates are listed first (slot order), then
//! stations (station order), and one categorical draw picks the winner.  The
//! winner's raw weight doubles as the von Mises concentration of the next
//! step, so close, fresh targets pull harder.

use tracing::trace;

use stoat_agent::Agent;
use stoat_core::{AgentId, CoreError, LureId, Point, SimRng};

use crate::{BehaviorError, BehaviorResult, SearchContext};

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttractionParams {
    /// Candidates at or beyond this distance (m) are ignored.
    pub capture_radius: f64,
    /// Per-metre decay of the kernel.
    pub spatial_decay: f64,
    /// Per-day decay of a lure's pull since its release.
    pub temporal_decay: f64,
    /// Weight scale; kernels are divided by it.
    pub min_k: f64,
}

impl AttractionParams {
    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.capture_radius > 0.0) {
            return Err(BehaviorError::Config(format!(
                "capture radius must be > 0, got {}",
                self.capture_radius
            )));
        }
        if !(self.min_k > 0.0) {
            return Err(BehaviorError::Config(format!("min_k must be > 0, got {}", self.min_k)));
        }
        Ok(())
    }
}

// ── Attractor ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttractorSource {
    Mate(AgentId),
    Lure(LureId),
}

/// A candidate centre of attraction and its kernel weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attractor {
    pub pos:    Point,
    /// Raw (unnormalised) kernel weight.
    pub kappa:  f64,
    pub source: AttractorSource,
}

// ── AttractionSearch ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct AttractionSearch {
    params: AttractionParams,
}

impl AttractionSearch {
    pub fn new(params: AttractionParams) -> BehaviorResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AttractionParams {
        &self.params
    }

    /// Every weighted candidate for `seeker`, mates first.
    pub fn candidates(&self, seeker: &Agent, ctx: &SearchContext<'_>) -> Vec<Attractor> {
        let AttractionParams { capture_radius, spatial_decay, temporal_decay, min_k } = self.params;
        let wanted = seeker.sex.opposite();
        let mut out = Vec::new();

        for (_, other) in ctx.population.iter_live() {
            if other.sex != wanted || !other.is_independent() {
                continue;
            }
            let d = seeker.pos.distance(other.pos);
            if d < capture_radius && !ctx.ledgers.has_mated(seeker.id, other.id) {
                out.push(Attractor {
                    pos:    other.pos,
                    kappa:  (-spatial_decay * d).exp() / min_k,
                    source: AttractorSource::Mate(other.id),
                });
            }
        }

        if let Some(days) = ctx.lures.days_since_release() {
            let freshness = (-temporal_decay * days as f64).exp();
            for (station, d) in ctx.lures.within(seeker.pos, capture_radius) {
                if ctx.ledgers.is_habituated(seeker.id, station) {
                    continue;
                }
                out.push(Attractor {
                    pos:    ctx.lures.position(station),
                    kappa:  (-spatial_decay * d).exp() * freshness / min_k,
                    source: AttractorSource::Lure(station),
                });
            }
        }
        out
    }

    /// Pick one centre of attraction for `seeker`, or `None` if nothing is in
    /// range.
    pub fn find(
        &self,
        seeker: &Agent,
        ctx: &SearchContext<'_>,
        rng: &mut SimRng,
    ) -> BehaviorResult<Option<Attractor>> {
        let candidates = self.candidates(seeker, ctx);
        if candidates.is_empty() {
            return Ok(None);
        }
        let weights: Vec<f64> = candidates.iter().map(|c| c.kappa).collect();
        let pick = rng.categorical(&weights).map_err(|e| match e {
            CoreError::DegenerateWeights { candidates } => BehaviorError::DegenerateAttraction { candidates },
            other => BehaviorError::Core(other),
        })?;
        let chosen = candidates[pick];
        trace!(agent = %seeker.id, source = ?chosen.source, kappa = chosen.kappa, of = candidates.len(), "attraction");
        Ok(Some(chosen))
    }
}
