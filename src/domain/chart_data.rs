//! Aligns historical and simulated prices on one date axis.
//!
//! Each series spans the full axis; positions outside a series' own region
//! hold `None` so a renderer never interpolates across the boundary.

use crate::domain::price::HistoricalSeries;
use crate::domain::simulator::SimulatedPath;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub dates: Vec<NaiveDate>,
    pub historical: Vec<Option<f64>>,
    pub simulated: Vec<Vec<Option<f64>>>,
}

impl ChartData {
    pub fn from_run(history: &HistoricalSeries, paths: &[SimulatedPath]) -> Self {
        let hist_len = history.len();
        let sim_len = paths.iter().map(SimulatedPath::len).max().unwrap_or(0);

        let mut dates: Vec<NaiveDate> = history.points().iter().map(|p| p.date).collect();
        if let Some(longest) = paths.iter().find(|p| p.len() == sim_len) {
            dates.extend(longest.points.iter().map(|p| p.date));
        }

        let historical = history
            .points()
            .iter()
            .map(|p| Some(p.price))
            .chain(std::iter::repeat_n(None, sim_len))
            .collect();

        let simulated = paths
            .iter()
            .map(|path| {
                let mut values: Vec<Option<f64>> = vec![None; hist_len];
                values.extend(path.points.iter().map(|p| Some(p.price)));
                values.resize(hist_len + sim_len, None);
                values
            })
            .collect();

        Self {
            dates,
            historical,
            simulated,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// (min, max) over every present value, `None` when nothing is present.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.historical
            .iter()
            .chain(self.simulated.iter().flatten())
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
