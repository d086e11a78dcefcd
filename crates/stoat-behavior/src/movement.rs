//! Hourly movement: a Weibull step length along a von Mises bearing.
//!
//! Where the bearing is centred, and how tightly, depends on the agent's
//! [`Goal`] for the hour:
//!
//! | Goal          | Centre                      | Concentration κ              |
//! |---------------|-----------------------------|------------------------------|
//! | `Persist`     | previous bearing            | `directional_persistence`    |
//! | `Home(p)`     | bearing to the home anchor  | `alpha_k · ln(d + 1)`        |
//! | `Attracted(a)`| bearing to the attractor    | the attractor's raw weight   |
//!
//! Home-range agents are pulled back harder the further they stray.  A step
//! that would leave the island is redrawn from scratch.

use stoat_core::{Point, SimRng};
use stoat_spatial::SpatialDomain;

use crate::{Attractor, BehaviorError, BehaviorResult};

/// Default cap on redraws of an off-land step.
pub const DEFAULT_MAX_MOVE_ATTEMPTS: u32 = 100_000;

/// Fraction of the distance to a nearby attractor used as the step scale, so
/// agents close in without overshooting.
const APPROACH_FRACTION: f64 = 0.95;

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementParams {
    /// Weibull scale of the hourly step (m).
    pub step_scale: f64,
    /// Weibull shape of the hourly step.
    pub step_shape: f64,
    /// κ of the correlated random walk while searching without a target.
    pub directional_persistence: f64,
    /// Home-range attraction strength.
    pub alpha_k: f64,
    pub max_move_attempts: u32,
}

impl MovementParams {
    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.step_scale > 0.0) || !(self.step_shape > 0.0) {
            return Err(BehaviorError::Config(format!(
                "step scale and shape must be > 0, got {} and {}",
                self.step_scale, self.step_shape
            )));
        }
        if self.max_move_attempts == 0 {
            return Err(BehaviorError::Config("max_move_attempts must be > 0".into()));
        }
        Ok(())
    }
}

// ── Goal / Step ───────────────────────────────────────────────────────────────

/// What the agent is moving towards this hour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Goal {
    /// Searching with nothing in range: keep roughly the previous heading.
    Persist,
    /// Home-range behaviour around the anchor.
    Home(Point),
    /// Heading for the chosen centre of attraction.
    Attracted(Attractor),
}

/// An accepted move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub pos:     Point,
    pub bearing: f64,
    pub length:  f64,
    /// Draws needed until the step landed on the island (≥ 1).
    pub attempts: u32,
}

// ── MovementModel ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct MovementModel {
    params: MovementParams,
}

impl MovementModel {
    pub fn new(params: MovementParams) -> BehaviorResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &MovementParams {
        &self.params
    }

    /// Move once from `pos`, redrawing until the end point is on land.
    pub fn step(
        &self,
        pos: Point,
        prev_bearing: f64,
        goal: Goal,
        domain: &SpatialDomain,
        rng: &mut SimRng,
    ) -> BehaviorResult<Step> {
        let p = &self.params;
        let centre = match goal {
            Goal::Persist => None,
            Goal::Home(anchor) => Some(anchor),
            Goal::Attracted(a) => Some(a.pos),
        };
        let dist = centre.map_or(0.0, |c| pos.distance(c));
        let target_bearing = centre.map_or(0.0, |c| pos.bearing_to(c));

        let (mu, kappa) = match goal {
            Goal::Persist => (prev_bearing, p.directional_persistence),
            Goal::Home(_) => (target_bearing, p.alpha_k * (dist + 1.0).ln()),
            Goal::Attracted(a) => (target_bearing, a.kappa),
        };
        let approach = matches!(goal, Goal::Attracted(_)) && dist > 0.0 && dist < p.step_scale;

        for attempt in 1..=p.max_move_attempts {
            let mut length = rng.weibull(p.step_scale, p.step_shape)?;
            if approach {
                length = rng.weibull(APPROACH_FRACTION * dist, p.step_shape)?;
            }
            let bearing = rng.von_mises(mu, kappa);
            let next = pos.step(bearing, length);
            if domain.is_on_land(next) {
                return Ok(Step { pos: next, bearing, length, attempts: attempt });
            }
        }
        Err(BehaviorError::MovementExhausted { attempts: p.max_move_attempts })
    }
}
