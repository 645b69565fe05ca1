//! Seeded random variate source.
//!
//! # Determinism strategy
//!
//! A run owns exactly one `VariateSource`.  Every draw advances the stream by
//! exactly one `Exp1` sample, so the sequence of values is a pure function of
//! the seed and the order in which the simulation asks for them.  Arrival and
//! service draws share the stream; their interleaving follows event order,
//! which is itself deterministic.
//!
//! Models that want arrivals and service durations on independent streams
//! open one source per channel with [`VariateSource::channel`]; each channel
//! seed is the run seed mixed with the channel number, so channels never
//! share state and adding a channel does not disturb the existing ones.
//!
//! Exponential variates with mean `m` are produced as `m * Exp1`, which is
//! the same distribution as `Exp(1/m)` but lets an infinite mean flow through
//! without a zero-rate special case in `rand_distr`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp1;

use crate::{ConfigError, ConfigResult};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-run source of exponential inter-arrival and service durations.
///
/// A source belongs to exactly one run.  Runs that execute in parallel each
/// construct their own from their own seed.
#[derive(Debug, Clone)]
pub struct VariateSource {
    rng:   SmallRng,
    seed:  u64,
    draws: u64,
}

impl VariateSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    /// Source for draw channel `channel` of a run seeded with `seed`.
    ///
    /// Channel 0 is the plain `seed` stream, identical to `new(seed)`.
    pub fn channel(seed: u64, channel: u64) -> Self {
        Self::new(seed ^ channel.wrapping_mul(MIXING_CONSTANT))
    }

    /// Reset the stream to the start of the sequence for `seed`.
    pub fn seed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Draw one exponentially distributed duration with the given mean.
    ///
    /// Fails if `mean` is NaN or not strictly positive.  `f64::INFINITY` is
    /// accepted and always yields `f64::INFINITY`, after consuming one value
    /// like any other draw.
    pub fn next_exponential(&mut self, mean: f64) -> ConfigResult<f64> {
        if !(mean > 0.0) {
            return Err(ConfigError::NonPositiveMean { what: "exponential mean", value: mean });
        }
        let unit: f64 = self.rng.sample(Exp1);
        self.draws += 1;
        if mean.is_infinite() {
            return Ok(f64::INFINITY);
        }
        Ok(unit * mean)
    }

    /// The seed this stream was last (re)started from.
    #[inline]
    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    /// Number of values consumed since the last (re)seed.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
