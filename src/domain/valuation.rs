//! Lot-weighted position valuation over a price table.

use crate::domain::error::TradeError;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::trade::Trade;

/// `lot[j] * price[row, asset[j]]` for every row of the table and every leg.
///
/// Covers the whole table; entry/exit windows are applied by callers.
pub fn array_value<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<Vec<Vec<f64>>, TradeError> {
    let prices = table.select(trade.assets())?;
    Ok(prices
        .into_iter()
        .map(|row| row.iter().zip(trade.lot()).map(|(p, l)| p * l).collect())
        .collect())
}

/// Combined position value per row (sum across legs).
pub fn position_value<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<Vec<f64>, TradeError> {
    Ok(array_value(trade, table)?
        .iter()
        .map(|row| row.iter().sum())
        .collect())
}

/// `value[row] - value[entry_row]`, forced to zero before `entry_row`.
pub fn relative_to_entry(values: &[f64], entry_row: usize) -> Vec<f64> {
    let base = values[entry_row];
    values
        .iter()
        .enumerate()
        .map(|(row, value)| if row < entry_row { 0.0 } else { value - base })
        .collect()
}
