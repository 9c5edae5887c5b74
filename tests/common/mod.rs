#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use stocksim::domain::chart_data::ChartData;
use stocksim::domain::error::StocksimError;
pub use stocksim::domain::price::PricePoint;
use stocksim::ports::chart_port::{ChartLabels, ChartPort};
use stocksim::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub fetches: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: Cell::new(0),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, StocksimError> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StocksimError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Records every render call instead of drawing.
pub struct RecordingChartPort {
    pub renders: RefCell<Vec<(ChartData, String)>>,
}

impl RecordingChartPort {
    pub fn new() -> Self {
        Self {
            renders: RefCell::new(Vec::new()),
        }
    }
}

impl ChartPort for RecordingChartPort {
    fn render(
        &self,
        data: &ChartData,
        _labels: &ChartLabels,
        output_path: &str,
    ) -> Result<(), StocksimError> {
        self.renders
            .borrow_mut()
            .push((data.clone(), output_path.to_string()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn point(date_str: &str, price: f64) -> PricePoint {
    PricePoint::new(
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        price,
    )
}

pub fn generate_points(start_date: &str, count: usize, start_price: f64) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            PricePoint::new(
                start + chrono::Duration::days(i as i64),
                start_price + i as f64,
            )
        })
        .collect()
}

pub fn aapl_two_points() -> Vec<PricePoint> {
    vec![point("2024-01-01", 100.0), point("2024-01-02", 102.0)]
}
