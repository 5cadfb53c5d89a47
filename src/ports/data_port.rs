//! Data access port trait.
//!
//! Supplies the fully materialised price table and the flat trade history a
//! run operates on.

use crate::domain::error::TradeError;
use crate::domain::history::HistoryRow;
use crate::domain::price_table::{PriceTable, RowLabel};

pub trait DataPort<I: RowLabel> {
    fn fetch_prices(&self) -> Result<PriceTable<I, String>, TradeError>;

    fn fetch_history(&self) -> Result<Vec<HistoryRow<I, String>>, TradeError>;
}
