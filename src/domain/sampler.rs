//! Single-draw return sampling for each distribution family.
//!
//! NORMAL:    N(mean, stdev)
//! LOGNORMAL: additive       -> LogNormal(log_mean, log_stdev), used as-is
//!            multiplicative -> N(log_mean, log_stdev), exponentiated by the caller
//! UNIFORM:   U[mean - stdev, mean + stdev]

use crate::domain::distribution::{DistributionKind, SimulationMode};
use crate::domain::error::StocksimError;
use crate::domain::stats::DistributionParams;
use rand::SeedableRng;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand_distr::{Distribution, LogNormal, Normal};

/// A validated distribution ready to draw from.
#[derive(Debug, Clone, Copy)]
pub enum ReturnDistribution {
    Normal(Normal<f64>),
    LogNormal(LogNormal<f64>),
    Uniform(Uniform<f64>),
    /// Zero-width uniform interval.
    Constant(f64),
}

impl ReturnDistribution {
    pub fn new(
        kind: DistributionKind,
        params: &DistributionParams,
        mode: SimulationMode,
    ) -> Result<Self, StocksimError> {
        match kind {
            DistributionKind::Normal => normal(params.mean, params.stdev).map(Self::Normal),
            DistributionKind::Lognormal => match mode {
                SimulationMode::Additive => {
                    check_location(params.log_mean)?;
                    check_scale(params.log_stdev)?;
                    LogNormal::new(params.log_mean, params.log_stdev)
                        .map(Self::LogNormal)
                        .map_err(|e| StocksimError::InvalidParameters {
                            reason: format!("lognormal({}, {}): {}", params.log_mean, params.log_stdev, e),
                        })
                }
                SimulationMode::Multiplicative => {
                    normal(params.log_mean, params.log_stdev).map(Self::Normal)
                }
            },
            DistributionKind::Uniform => {
                let low = params.mean - params.stdev;
                let high = params.mean + params.stdev;
                if !(low.is_finite() && high.is_finite()) || low > high {
                    return Err(StocksimError::InvalidParameters {
                        reason: format!("uniform bounds [{}, {}]", low, high),
                    });
                }
                if low == high {
                    Ok(Self::Constant(low))
                } else {
                    Ok(Self::Uniform(Uniform::new_inclusive(low, high)))
                }
            }
        }
    }

    pub fn draw<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Normal(d) => d.sample(rng),
            Self::LogNormal(d) => d.sample(rng),
            Self::Uniform(d) => d.sample(rng),
            Self::Constant(v) => *v,
        }
    }
}

fn check_location(mean: f64) -> Result<(), StocksimError> {
    if mean.is_finite() {
        Ok(())
    } else {
        Err(StocksimError::InvalidParameters {
            reason: format!("non-finite location {}", mean),
        })
    }
}

/// `rand_distr` only rejects non-finite deviations, so sign is checked here.
fn check_scale(stdev: f64) -> Result<(), StocksimError> {
    if stdev.is_finite() && stdev >= 0.0 {
        Ok(())
    } else {
        Err(StocksimError::InvalidParameters {
            reason: format!("deviation must be finite and non-negative, got {}", stdev),
        })
    }
}

fn normal(mean: f64, stdev: f64) -> Result<Normal<f64>, StocksimError> {
    check_location(mean)?;
    check_scale(stdev)?;
    Normal::new(mean, stdev).map_err(|e| StocksimError::InvalidParameters {
        reason: format!("normal({}, {}): {}", mean, stdev, e),
    })
}

/// Owns the pseudo-random generator; every call is an independent draw.
pub struct ReturnSampler {
    rng: StdRng,
}

impl ReturnSampler {
    /// `Some(seed)` gives a reproducible stream, `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn sample(
        &mut self,
        kind: DistributionKind,
        params: &DistributionParams,
        mode: SimulationMode,
    ) -> Result<f64, StocksimError> {
        let dist = ReturnDistribution::new(kind, params, mode)?;
        Ok(self.draw(&dist))
    }

    pub fn draw(&mut self, dist: &ReturnDistribution) -> f64 {
        dist.draw(&mut self.rng)
    }
}

impl Default for ReturnSampler {
    fn default() -> Self {
        Self::new(None)
    }
}
