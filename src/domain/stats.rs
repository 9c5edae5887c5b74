//! Distribution parameter estimation from closing prices.
//!
//! All deviations use the sample formula (divisor n - 1) in both modes.
//!
//! Price-level mode:
//!   mean, stdev over the raw prices
//!   log_mean = ln(mean), log_stdev = ln(stdev + 1)
//!
//! Log-return mode:
//!   r[i] = ln(P[i] / P[i-1])
//!   mean, stdev over r
//!   log_mean = mean - stdev^2 / 2, log_stdev = stdev

use crate::domain::distribution::EstimationMode;
use crate::domain::error::StocksimError;
use crate::domain::price::HistoricalSeries;

pub const MIN_PRICES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionParams {
    pub mean: f64,
    pub stdev: f64,
    pub log_mean: f64,
    pub log_stdev: f64,
}

pub fn estimate_series(
    series: &HistoricalSeries,
    mode: EstimationMode,
) -> Result<DistributionParams, StocksimError> {
    estimate(series.symbol(), &series.prices(), mode)
}

pub fn estimate(
    symbol: &str,
    prices: &[f64],
    mode: EstimationMode,
) -> Result<DistributionParams, StocksimError> {
    if prices.len() < MIN_PRICES {
        return Err(StocksimError::InsufficientData {
            symbol: symbol.to_string(),
            points: prices.len(),
            minimum: MIN_PRICES,
        });
    }
    if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(StocksimError::InvalidParameters {
            reason: format!("{} has non-positive price {}", symbol, bad),
        });
    }

    let params = match mode {
        EstimationMode::PriceLevel => {
            let mean = mean(prices);
            let stdev = sample_stdev(prices);
            DistributionParams {
                mean,
                stdev,
                log_mean: mean.ln(),
                log_stdev: (stdev + 1.0).ln(),
            }
        }
        EstimationMode::LogReturn => {
            let returns = log_returns(prices);
            let mean = mean(&returns);
            let stdev = sample_stdev(&returns);
            DistributionParams {
                mean,
                stdev,
                log_mean: mean - 0.5 * stdev * stdev,
                log_stdev: stdev,
            }
        }
    };

    tracing::debug!(
        symbol,
        mode = %mode,
        mean = params.mean,
        stdev = params.stdev,
        "estimated distribution parameters"
    );
    Ok(params)
}

pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). Zero for fewer than two values.
pub fn sample_stdev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum();
    (ss / (n - 1) as f64).sqrt()
}
