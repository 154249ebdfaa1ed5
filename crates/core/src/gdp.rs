//! Estimated GDP arithmetic and the injectable multiplier source.
//!
//! The estimate is `population * m / exchange_rate` where `m` is drawn
//! uniformly from `[GDP_MULTIPLIER_MIN, GDP_MULTIPLIER_MAX)` once per country
//! per refresh. The multiplier sits behind [`GdpMultiplier`] so callers can
//! swap in [`FixedMultiplier`] and get exact values.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound of the random multiplier (inclusive).
pub const GDP_MULTIPLIER_MIN: f64 = 1000.0;

/// Upper bound of the random multiplier (exclusive).
pub const GDP_MULTIPLIER_MAX: f64 = 2000.0;

/// Source of per-country GDP multipliers.
pub trait GdpMultiplier: Send {
    fn next_multiplier(&mut self) -> f64;
}

/// Builds a fresh multiplier source for each refresh.
pub type MultiplierFactory = Arc<dyn Fn() -> Box<dyn GdpMultiplier> + Send + Sync>;

/// Uniform random multiplier in `[GDP_MULTIPLIER_MIN, GDP_MULTIPLIER_MAX)`.
pub struct RandomMultiplier<R = StdRng> {
    rng: R,
}

impl RandomMultiplier<StdRng> {
    /// Seeded from the thread-local generator.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for RandomMultiplier<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomMultiplier<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> GdpMultiplier for RandomMultiplier<R> {
    fn next_multiplier(&mut self) -> f64 {
        self.rng.random_range(GDP_MULTIPLIER_MIN..GDP_MULTIPLIER_MAX)
    }
}

/// Always returns the same multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub f64);

impl GdpMultiplier for FixedMultiplier {
    fn next_multiplier(&mut self) -> f64 {
        self.0
    }
}

/// Factory producing [`RandomMultiplier`]s; the production default.
pub fn random_multiplier_factory() -> MultiplierFactory {
    Arc::new(|| Box::new(RandomMultiplier::new()) as Box<dyn GdpMultiplier>)
}

/// Factory producing [`FixedMultiplier`]s with the given value.
pub fn fixed_multiplier_factory(value: f64) -> MultiplierFactory {
    Arc::new(move || Box::new(FixedMultiplier(value)) as Box<dyn GdpMultiplier>)
}

/// Compute the estimated GDP, rounded to cents.
///
/// Returns `None` for a zero (or negative) rate, which has no meaningful
/// conversion.
pub fn estimate_gdp(population: i64, exchange_rate: f64, multiplier: f64) -> Option<f64> {
    if exchange_rate <= 0.0 {
        return None;
    }
    let raw = population as f64 * multiplier / exchange_rate;
    Some(round_cents(raw))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
