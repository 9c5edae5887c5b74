//! Chart rendering port.

use crate::domain::chart_data::ChartData;
use crate::domain::error::StocksimError;

/// Captions for a rendered chart.
#[derive(Debug, Clone)]
pub struct ChartLabels {
    pub title: String,
    pub historical: String,
    pub simulated: String,
}

impl ChartLabels {
    pub fn for_symbol(symbol: &str, distribution: &str) -> Self {
        Self {
            title: format!("{} simulated prices ({})", symbol, distribution),
            historical: "Historical".to_string(),
            simulated: "Simulated".to_string(),
        }
    }
}

pub trait ChartPort {
    fn render(
        &self,
        data: &ChartData,
        labels: &ChartLabels,
        output_path: &str,
    ) -> Result<(), StocksimError>;
}
