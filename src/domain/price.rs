//! Dated closing prices and validated historical series.

use crate::domain::error::StocksimError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Non-empty, strictly date-ascending closing prices for one symbol.
///
/// Only constructible through [`HistoricalSeries::new`], so every instance
/// has positive finite prices and no duplicate dates.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn new(symbol: &str, points: Vec<PricePoint>) -> Result<Self, StocksimError> {
        if points.is_empty() {
            return Err(StocksimError::NoHistoricalData {
                symbol: symbol.to_string(),
            });
        }

        if let Some(bad) = points.iter().find(|p| !(p.price.is_finite() && p.price > 0.0)) {
            return Err(StocksimError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("non-positive price {} on {}", bad.price, bad.date),
            });
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(StocksimError::Fetch {
                symbol: symbol.to_string(),
                reason: format!(
                    "dates not strictly ascending: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }

        Ok(Self {
            symbol: symbol.to_string(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }
}
