//! Deterministic simulation RNG and the model's sampling distributions.
//!
//! # Determinism strategy
//!
//! A realisation draws every random number from one `SimRng` stream, in the
//! fixed order the scheduler visits agents.  Reproducing a realisation
//! therefore only requires its seed.
//!
//! Ensembles derive one child stream per realisation with [`SimRng::child`]:
//!
//!   seed = parent.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space, so
//! realisations never share RNG state and can run on any thread.

use std::f64::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson, StandardNormal, Weibull};

use crate::{CoreError, CoreResult};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Below this concentration the von Mises distribution is sampled as uniform.
const VON_MISES_UNIFORM_KAPPA: f64 = 1e-8;

/// Above this concentration the von Mises distribution is sampled as a
/// wrapped normal with variance `1/kappa`.
const VON_MISES_NORMAL_KAPPA: f64 = 1e6;

/// Realisation-level RNG.
///
/// Used only in single-threaded contexts.  Parallel ensembles give each
/// worker its own `SimRng` seeded from a parent via [`SimRng::child`].
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset, used to seed
    /// each realisation of an ensemble deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A bearing drawn uniformly from `[-π, π)`.
    #[inline]
    pub fn uniform_bearing(&mut self) -> f64 {
        self.0.gen_range(-PI..PI)
    }

    // ── Model distributions ───────────────────────────────────────────────

    /// Weibull-distributed step length.
    pub fn weibull(&mut self, scale: f64, shape: f64) -> CoreResult<f64> {
        let dist = Weibull::new(scale, shape).map_err(|e| {
            CoreError::InvalidDistribution(format!("weibull(scale={scale}, shape={shape}): {e}"))
        })?;
        Ok(dist.sample(&mut self.0))
    }

    /// Poisson-distributed count.  A non-positive mean always yields 0.
    pub fn poisson(&mut self, mean: f64) -> CoreResult<u32> {
        if mean <= 0.0 {
            return Ok(0);
        }
        let dist = Poisson::new(mean).map_err(|e| {
            CoreError::InvalidDistribution(format!("poisson(mean={mean}): {e}"))
        })?;
        let n: f64 = dist.sample(&mut self.0);
        Ok(n as u32)
    }

    /// Von Mises angle with location `mu` and concentration `kappa`, wrapped
    /// to `[-π, π]`.
    ///
    /// Uses the Best–Fisher rejection sampler.  `kappa` near zero degenerates
    /// to a uniform angle; very large `kappa` is sampled as a wrapped normal.
    pub fn von_mises(&mut self, mu: f64, kappa: f64) -> f64 {
        if !(kappa >= VON_MISES_UNIFORM_KAPPA) {
            return PI * (2.0 * self.0.r#gen::<f64>() - 1.0);
        }
        if kappa > VON_MISES_NORMAL_KAPPA {
            let z: f64 = StandardNormal.sample(&mut self.0);
            return wrap_angle(mu + z / kappa.sqrt());
        }

        let s = if kappa < 1e-5 {
            // second-order Taylor expansion around kappa = 0
            1.0 / kappa + kappa
        } else {
            let r = 1.0 + (1.0 + 4.0 * kappa * kappa).sqrt();
            let rho = (r - (2.0 * r).sqrt()) / (2.0 * kappa);
            (1.0 + rho * rho) / (2.0 * rho)
        };

        let w = loop {
            let u: f64 = self.0.r#gen();
            let z = (PI * u).cos();
            let w = (1.0 + s * z) / (s + z);
            let y = kappa * (s - w);
            let v: f64 = self.0.r#gen();
            if y * (2.0 - y) - v >= 0.0 || (y / v).ln() + 1.0 - y >= 0.0 {
                break w;
            }
        };

        let u: f64 = self.0.r#gen();
        let mut angle = w.clamp(-1.0, 1.0).acos();
        if u < 0.5 {
            angle = -angle;
        }
        wrap_angle(angle + mu)
    }

    /// One categorical draw over unnormalised `weights`.
    ///
    /// The weights are normalised to probabilities and a single uniform
    /// variate is located in their cumulative sum.  Fails if no weight is
    /// positive.
    pub fn categorical(&mut self, weights: &[f64]) -> CoreResult<usize> {
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(CoreError::DegenerateWeights { candidates: weights.len() });
        }
        let u: f64 = self.0.r#gen();
        let mut cumulative = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w / total;
            if u < cumulative {
                return Ok(i);
            }
        }
        // Rounding left the cumulative sum just short of 1.
        Ok(weights.iter().rposition(|&w| w > 0.0).unwrap_or(weights.len() - 1))
    }
}

/// Wrap an angle into `[-π, π]`, preserving sign symmetry.
fn wrap_angle(angle: f64) -> f64 {
    let negative = angle < 0.0;
    let wrapped = (angle.abs() + PI).rem_euclid(2.0 * PI) - PI;
    if negative { -wrapped } else { wrapped }
}
