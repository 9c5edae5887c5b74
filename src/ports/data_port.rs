//! Historical price source port.

use crate::domain::error::StocksimError;
use crate::domain::price::PricePoint;

pub trait DataPort {
    /// Date-ascending closes for `symbol`. An unknown symbol yields an
    /// empty vector rather than an error.
    fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, StocksimError>;

    fn list_symbols(&self) -> Result<Vec<String>, StocksimError>;
}
