//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a `date,close`
//! header and `YYYY-MM-DD` dates.

use crate::domain::error::StocksimError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, StocksimError> {
        let path = self.csv_path(symbol);
        let fetch_err = |reason: String| StocksimError::Fetch {
            symbol: symbol.to_string(),
            reason,
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(fetch_err(format!("failed to read {}: {}", path.display(), e))),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| fetch_err(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| fetch_err("missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| fetch_err(format!("invalid date format: {}", e)))?;

            let price: f64 = record
                .get(1)
                .ok_or_else(|| fetch_err("missing close column".into()))?
                .trim()
                .parse()
                .map_err(|e| fetch_err(format!("invalid close value: {}", e)))?;

            points.push(PricePoint::new(date, price));
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StocksimError::Fetch {
            symbol: "*".into(),
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StocksimError::Fetch {
                symbol: "*".into(),
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
