//! Per-symbol memoization of price history and estimated parameters.
//!
//! The cache is an ordinary value owned by the caller; nothing here is
//! global. Failed fetches and failed estimates leave no entry behind.

use crate::domain::distribution::EstimationMode;
use crate::domain::error::StocksimError;
use crate::domain::price::HistoricalSeries;
use crate::domain::stats::{self, DistributionParams};
use crate::ports::data_port::DataPort;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SimulationCache {
    history: HashMap<String, HistoricalSeries>,
    params: HashMap<(String, EstimationMode), DistributionParams>,
}

impl SimulationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-fetch. `None` means the symbol has no usable history; the
    /// reason has already been logged.
    pub fn history(&mut self, symbol: &str, data_port: &dyn DataPort) -> Option<&HistoricalSeries> {
        if !self.history.contains_key(symbol) {
            let series = fetch_series(symbol, data_port)?;
            self.history.insert(symbol.to_string(), series);
        } else {
            tracing::debug!(symbol, "history cache hit");
        }
        self.history.get(symbol)
    }

    /// Get-or-compute parameters for `series` under `mode`.
    ///
    /// Entries are keyed by symbol, so only the series this cache holds for
    /// that symbol is memoized. Any other series is estimated every call.
    pub fn params(
        &mut self,
        series: &HistoricalSeries,
        mode: EstimationMode,
    ) -> Result<DistributionParams, StocksimError> {
        if self.history.get(series.symbol()) == Some(series) {
            cached_params(&mut self.params, series, mode)
        } else {
            tracing::debug!(
                symbol = series.symbol(),
                "uncached series, estimating without memoizing"
            );
            stats::estimate_series(series, mode)
        }
    }

    /// History and parameters for `symbol` in one call.
    pub fn load(
        &mut self,
        symbol: &str,
        mode: EstimationMode,
        data_port: &dyn DataPort,
    ) -> Result<Option<(&HistoricalSeries, DistributionParams)>, StocksimError> {
        if !self.history.contains_key(symbol) {
            match fetch_series(symbol, data_port) {
                Some(series) => {
                    self.history.insert(symbol.to_string(), series);
                }
                None => return Ok(None),
            }
        }
        let Some(series) = self.history.get(symbol) else {
            return Ok(None);
        };
        let params = cached_params(&mut self.params, series, mode)?;
        Ok(Some((series, params)))
    }

    pub fn contains_history(&self, symbol: &str) -> bool {
        self.history.contains_key(symbol)
    }

    pub fn contains_params(&self, symbol: &str, mode: EstimationMode) -> bool {
        self.params.contains_key(&(symbol.to_string(), mode))
    }

    pub fn cached_params(&self, symbol: &str, mode: EstimationMode) -> Option<DistributionParams> {
        self.params.get(&(symbol.to_string(), mode)).copied()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn params_len(&self) -> usize {
        self.params.len()
    }
}

fn fetch_series(symbol: &str, data_port: &dyn DataPort) -> Option<HistoricalSeries> {
    tracing::debug!(symbol, "history cache miss, fetching");
    let points = match data_port.fetch_history(symbol) {
        Ok(points) => points,
        Err(e) => {
            tracing::warn!(symbol, error = %e, "fetch failed, treating history as empty");
            return None;
        }
    };
    if points.is_empty() {
        tracing::warn!(symbol, "no historical data");
        return None;
    }
    match HistoricalSeries::new(symbol, points) {
        Ok(series) => Some(series),
        Err(e) => {
            tracing::warn!(symbol, error = %e, "rejected malformed history");
            None
        }
    }
}

fn cached_params(
    cache: &mut HashMap<(String, EstimationMode), DistributionParams>,
    series: &HistoricalSeries,
    mode: EstimationMode,
) -> Result<DistributionParams, StocksimError> {
    let key = (series.symbol().to_string(), mode);
    if let Some(params) = cache.get(&key) {
        tracing::debug!(symbol = series.symbol(), mode = %mode, "params cache hit");
        return Ok(*params);
    }
    let params = stats::estimate_series(series, mode)?;
    cache.insert(key, params);
    Ok(params)
}
