//! In-process price dataset shipped with the binary.

use crate::domain::error::StocksimError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};

const BUNDLED: &[(&str, [f64; 11])] = &[
    ("AAPL", [170.0, 172.0, 175.0, 178.0, 180.0, 182.0, 185.0, 188.0, 190.0, 192.0, 195.0]),
    ("AMZN", [3200.0, 3220.0, 3250.0, 3280.0, 3300.0, 3320.0, 3350.0, 3380.0, 3400.0, 3420.0, 3450.0]),
    ("META", [250.0, 252.0, 255.0, 258.0, 260.0, 262.0, 265.0, 268.0, 270.0, 272.0, 275.0]),
    ("GOOGL", [2800.0, 2820.0, 2850.0, 2880.0, 2900.0, 2920.0, 2950.0, 2980.0, 3000.0, 3020.0, 3050.0]),
    ("NFLX", [500.0, 505.0, 510.0, 515.0, 520.0, 525.0, 530.0, 535.0, 540.0, 545.0, 550.0]),
];

/// Daily closes dated consecutively from `start_date`.
pub struct BundledDataAdapter {
    start_date: NaiveDate,
}

impl BundledDataAdapter {
    pub fn new() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }

    pub fn with_start_date(start_date: NaiveDate) -> Self {
        Self { start_date }
    }
}

impl Default for BundledDataAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for BundledDataAdapter {
    fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, StocksimError> {
        let symbol = symbol.to_uppercase();
        let points = BUNDLED
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, prices)| {
                prices
                    .iter()
                    .enumerate()
                    .map(|(i, &price)| {
                        PricePoint::new(self.start_date + Duration::days(i as i64), price)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError> {
        let mut symbols: Vec<String> = BUNDLED.iter().map(|(s, _)| s.to_string()).collect();
        symbols.sort();
        Ok(symbols)
    }
}
