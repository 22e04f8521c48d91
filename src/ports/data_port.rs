//! Price data access port trait.

use crate::domain::error::StocksimError;
use crate::domain::price_table::PriceTable;

pub trait DataPort {
    /// Loads the whole table named `name` (a file name for the CSV adapter).
    fn fetch_table(&self, name: &str) -> Result<PriceTable, StocksimError>;
}
