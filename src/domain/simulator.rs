//! Forward price path generation.
//!
//! Starting from the last historical close, each of the 30 steps applies one
//! independent draw:
//!   additive:       P[t+1] = P[t] + x
//!   multiplicative: P[t+1] = P[t] * exp(x)
//! The k-th point is dated last_date + k days.

use crate::domain::distribution::{DistributionKind, SimulationMode};
use crate::domain::error::StocksimError;
use crate::domain::price::{HistoricalSeries, PricePoint};
use crate::domain::sampler::{ReturnDistribution, ReturnSampler};
use crate::domain::stats::DistributionParams;
use chrono::{Duration, NaiveDate};

pub const HORIZON_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPath {
    pub points: Vec<PricePoint>,
}

impl SimulatedPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }
}

pub struct PathSimulator {
    sampler: ReturnSampler,
}

impl PathSimulator {
    pub fn new(sampler: ReturnSampler) -> Self {
        Self { sampler }
    }

    pub fn seeded(seed: Option<u64>) -> Self {
        Self::new(ReturnSampler::new(seed))
    }

    pub fn simulate(
        &mut self,
        series: &HistoricalSeries,
        kind: DistributionKind,
        params: &DistributionParams,
        mode: SimulationMode,
    ) -> Result<SimulatedPath, StocksimError> {
        let mut paths = self.simulate_paths(series, kind, params, mode, 1)?;
        paths.pop().ok_or_else(|| StocksimError::NoHistoricalData {
            symbol: series.symbol().to_string(),
        })
    }

    /// `n` independent paths sharing the same start and parameters.
    pub fn simulate_paths(
        &mut self,
        series: &HistoricalSeries,
        kind: DistributionKind,
        params: &DistributionParams,
        mode: SimulationMode,
        n: usize,
    ) -> Result<Vec<SimulatedPath>, StocksimError> {
        let start = series.points().last().ok_or_else(|| StocksimError::NoHistoricalData {
            symbol: series.symbol().to_string(),
        })?;
        let dist = ReturnDistribution::new(kind, params, mode)?;

        let paths = (0..n)
            .map(|_| self.walk(*start, &dist, mode))
            .collect::<Vec<_>>();

        tracing::debug!(
            symbol = series.symbol(),
            distribution = %kind,
            paths = paths.len(),
            "simulated forward paths"
        );
        Ok(paths)
    }

    /// One path from an explicit start point.
    pub fn walk(
        &mut self,
        start: PricePoint,
        dist: &ReturnDistribution,
        mode: SimulationMode,
    ) -> SimulatedPath {
        let mut price = start.price;
        let points = (1..=HORIZON_DAYS)
            .map(|k| {
                let x = self.sampler.draw(dist);
                price = step(price, x, mode);
                PricePoint::new(forward_date(start.date, k), price)
            })
            .collect();
        SimulatedPath { points }
    }
}

pub fn step(price: f64, sample: f64, mode: SimulationMode) -> f64 {
    match mode {
        SimulationMode::Additive => price + sample,
        // exp() of a large negative draw underflows to zero
        SimulationMode::Multiplicative => (price * sample.exp()).max(f64::MIN_POSITIVE),
    }
}

pub fn forward_date(last: NaiveDate, k: usize) -> NaiveDate {
    last + Duration::days(k as i64)
}
