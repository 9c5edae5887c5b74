//! Simulation requests: fetch, estimate, simulate.

use crate::domain::cache::SimulationCache;
use crate::domain::distribution::{DistributionKind, EstimationMode};
use crate::domain::error::StocksimError;
use crate::domain::price::HistoricalSeries;
use crate::domain::simulator::{PathSimulator, SimulatedPath};
use crate::domain::stats::DistributionParams;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub symbol: String,
    pub distribution: DistributionKind,
    pub mode: EstimationMode,
    pub paths: usize,
}

impl SimulationRequest {
    pub fn new(symbol: &str, distribution: DistributionKind) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            distribution,
            mode: EstimationMode::default(),
            paths: 1,
        }
    }
}

/// Outcome of one request. `history` is `None` when the symbol had no data,
/// in which case `paths` is empty.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub symbol: String,
    pub distribution: DistributionKind,
    pub mode: EstimationMode,
    pub history: Option<HistoricalSeries>,
    pub params: Option<DistributionParams>,
    pub paths: Vec<SimulatedPath>,
}

impl SimulationRun {
    fn empty(request: &SimulationRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            distribution: request.distribution,
            mode: request.mode,
            history: None,
            params: None,
            paths: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

pub fn run_simulation(
    cache: &mut SimulationCache,
    data_port: &dyn DataPort,
    simulator: &mut PathSimulator,
    request: &SimulationRequest,
) -> Result<SimulationRun, StocksimError> {
    let Some((series, params)) = cache.load(&request.symbol, request.mode, data_port)? else {
        tracing::warn!(symbol = %request.symbol, "unknown symbol, nothing simulated");
        return Ok(SimulationRun::empty(request));
    };

    let paths = match simulator.simulate_paths(
        series,
        request.distribution,
        &params,
        request.mode.simulation_mode(),
        request.paths,
    ) {
        Ok(paths) => paths,
        Err(StocksimError::NoHistoricalData { symbol }) => {
            tracing::warn!(%symbol, "no historical data, nothing simulated");
            return Ok(SimulationRun::empty(request));
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        symbol = %request.symbol,
        distribution = %request.distribution,
        mode = %request.mode,
        paths = paths.len(),
        "simulation complete"
    );

    Ok(SimulationRun {
        symbol: request.symbol.clone(),
        distribution: request.distribution,
        mode: request.mode,
        history: Some(series.clone()),
        params: Some(params),
        paths,
    })
}

/// String entry point. An unrecognised distribution name fails before any
/// data is fetched or sampled.
pub fn simulate_symbol(
    cache: &mut SimulationCache,
    data_port: &dyn DataPort,
    simulator: &mut PathSimulator,
    symbol: &str,
    distribution: &str,
    mode: EstimationMode,
    paths: usize,
) -> Result<SimulationRun, StocksimError> {
    let distribution: DistributionKind = distribution.parse()?;
    let mut request = SimulationRequest::new(symbol, distribution);
    request.mode = mode;
    request.paths = paths;
    run_simulation(cache, data_port, simulator, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use crate::domain::simulator::HORIZON_DAYS;
    use chrono::NaiveDate;
    use std::cell::Cell;

    struct StaticPort {
        calls: Cell<usize>,
    }

    impl DataPort for StaticPort {
        fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, StocksimError> {
            self.calls.set(self.calls.get() + 1);
            if symbol == "AAPL" {
                Ok(vec![
                    PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100.0),
                    PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 102.0),
                ])
            } else {
                Ok(vec![])
            }
        }

        fn list_symbols(&self) -> Result<Vec<String>, StocksimError> {
            Ok(vec!["AAPL".into()])
        }
    }

    fn port() -> StaticPort {
        StaticPort {
            calls: Cell::new(0),
        }
    }

    #[test]
    fn request_normalises_symbol() {
        let request = SimulationRequest::new(" aapl ", DistributionKind::Normal);
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.paths, 1);
    }

    #[test]
    fn known_symbol_produces_path() {
        let port = port();
        let mut cache = SimulationCache::new();
        let mut sim = PathSimulator::seeded(Some(1));

        let run = simulate_symbol(
            &mut cache,
            &port,
            &mut sim,
            "AAPL",
            "normal",
            EstimationMode::PriceLevel,
            1,
        )
        .unwrap();

        assert_eq!(run.paths.len(), 1);
        assert_eq!(run.paths[0].len(), HORIZON_DAYS);
        assert_eq!(
            run.paths[0].points[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert!(run.history.is_some());
        assert!(run.params.is_some());
    }

    #[test]
    fn unknown_symbol_is_empty_run() {
        let port = port();
        let mut cache = SimulationCache::new();
        let mut sim = PathSimulator::seeded(Some(1));

        let run = simulate_symbol(
            &mut cache,
            &port,
            &mut sim,
            "ZZZZ",
            "normal",
            EstimationMode::LogReturn,
            1,
        )
        .unwrap();

        assert!(run.is_empty());
        assert!(run.history.is_none());
        assert_eq!(run.symbol, "ZZZZ");
    }

    #[test]
    fn unknown_distribution_fails_before_fetch() {
        let port = port();
        let mut cache = SimulationCache::new();
        let mut sim = PathSimulator::seeded(Some(1));

        let err = simulate_symbol(
            &mut cache,
            &port,
            &mut sim,
            "AAPL",
            "poisson",
            EstimationMode::LogReturn,
            1,
        )
        .unwrap_err();

        assert!(matches!(err, StocksimError::UnknownDistribution { .. }));
        assert_eq!(port.calls.get(), 0);
        assert_eq!(cache.history_len(), 0);
    }

    #[test]
    fn repeated_requests_reuse_cache() {
        let port = port();
        let mut cache = SimulationCache::new();
        let mut sim = PathSimulator::seeded(Some(1));
        let request = SimulationRequest::new("AAPL", DistributionKind::Uniform);

        run_simulation(&mut cache, &port, &mut sim, &request).unwrap();
        run_simulation(&mut cache, &port, &mut sim, &request).unwrap();

        assert_eq!(port.calls.get(), 1);
        assert_eq!(cache.params_len(), 1);
    }
}
