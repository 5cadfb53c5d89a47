//! Trade execution: entry/exit resolution and barrier-driven close.
//!
//! Steps:
//! 1. Resolve the entry row (explicit label, else first row) and the exit row
//!    (explicit label, else last row); every asset must be a table column.
//! 2. Without thresholds the close is the exit row.
//! 3. Otherwise compute combined position PnL relative to the entry row, zero
//!    before entry, and find the first bar where a barrier fires.
//! 4. The close is the earlier of the exit row and that bar.

use tracing::debug;

use crate::domain::barrier::{Barrier, BarrierSearch};
use crate::domain::error::TradeError;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::trade::Trade;
use crate::domain::valuation;

/// Execution parameters shared by every trade in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub search: BarrierSearch,
    /// Execute batches on the rayon pool.
    pub parallel: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            search: BarrierSearch::Linear,
            parallel: false,
        }
    }
}

pub(crate) fn check_assets<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<(), TradeError> {
    match trade.assets().iter().find(|a| !table.contains_column(a)) {
        Some(asset) => Err(TradeError::lookup("asset", asset)),
        None => Ok(()),
    }
}

pub(crate) fn resolve_entry_row<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<usize, TradeError> {
    match trade.entry() {
        Some(label) => table
            .row_position(label)
            .ok_or_else(|| TradeError::lookup("entry", label)),
        None => Ok(0),
    }
}

pub(crate) fn resolve_exit_row<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<usize, TradeError> {
    match trade.exit() {
        Some(label) => table
            .row_position(label)
            .ok_or_else(|| TradeError::lookup("exit", label)),
        None => Ok(table.len() - 1),
    }
}

/// Row position at which `trade` closes.
pub fn resolve_close_row<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
    config: &ExecutionConfig,
) -> Result<usize, TradeError> {
    check_assets(trade, table)?;
    let entry_row = resolve_entry_row(trade, table)?;
    let exit_row = resolve_exit_row(trade, table)?;

    let barrier = Barrier::new(trade.take(), trade.stop());
    if !barrier.is_active() {
        return Ok(exit_row);
    }

    let value = valuation::position_value(trade, table)?;
    let pnl = valuation::relative_to_entry(&value, entry_row);
    let signal = barrier.signal(&pnl, entry_row);

    match config.search.first_trigger(&signal) {
        Some(row) if row < exit_row => {
            debug!(
                row,
                exit_row,
                pnl = pnl[row],
                search = %config.search,
                "Barrier fired before exit"
            );
            Ok(row)
        }
        _ => Ok(exit_row),
    }
}
