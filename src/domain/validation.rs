//! Pre-flight trade validation against a price table.
//!
//! Each check is independent and can be switched off through
//! [`ValidationFlags`]. Construction never runs these checks.

use crate::domain::error::TradeError;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::trade::Trade;

/// Which checks to run. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationFlags {
    pub check_asset: bool,
    pub check_index: bool,
    pub check_lot: bool,
    pub check_take: bool,
    pub check_stop: bool,
}

impl Default for ValidationFlags {
    fn default() -> Self {
        ValidationFlags {
            check_asset: true,
            check_index: true,
            check_lot: true,
            check_take: true,
            check_stop: true,
        }
    }
}

/// Run the enabled checks in order (asset, index, lot, take, stop) and return
/// the first failure.
pub fn validate<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
    flags: &ValidationFlags,
) -> Result<(), TradeError> {
    match collect_failures(trade, table, flags).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Run every enabled check and return all failures.
pub fn collect_failures<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
    flags: &ValidationFlags,
) -> Vec<TradeError> {
    let mut failures = Vec::new();
    if flags.check_asset {
        failures.extend(validate_asset(trade, table).err());
    }
    if flags.check_index {
        failures.extend(validate_index(trade, table).err());
    }
    if flags.check_lot {
        failures.extend(validate_lot(trade).err());
    }
    if flags.check_take {
        failures.extend(validate_take(trade).err());
    }
    if flags.check_stop {
        failures.extend(validate_stop(trade).err());
    }
    failures
}

pub fn validate_asset<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<(), TradeError> {
    match trade.assets().iter().find(|a| !table.contains_column(a)) {
        Some(asset) => Err(TradeError::Validation {
            field: "asset",
            value: asset.to_string(),
            reason: "asset is not a column of the price table".into(),
        }),
        None => Ok(()),
    }
}

pub fn validate_index<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    table: &PriceTable<I, A>,
) -> Result<(), TradeError> {
    for (field, label) in [("entry", trade.entry()), ("exit", trade.exit())] {
        if let Some(label) = label {
            if !table.contains_row(label) {
                return Err(TradeError::Validation {
                    field,
                    value: label.to_string(),
                    reason: format!("{} is not a row of the price table", field),
                });
            }
        }
    }
    Ok(())
}

pub fn validate_lot<I, A>(trade: &Trade<I, A>) -> Result<(), TradeError> {
    match trade.lot().iter().find(|lot| !lot.is_finite()) {
        Some(lot) => Err(TradeError::Validation {
            field: "lot",
            value: lot.to_string(),
            reason: "lot must be finite".into(),
        }),
        None => Ok(()),
    }
}

pub fn validate_take<I, A>(trade: &Trade<I, A>) -> Result<(), TradeError> {
    match trade.take() {
        Some(take) if take < 0.0 || take.is_nan() => Err(TradeError::Validation {
            field: "take",
            value: take.to_string(),
            reason: "take must be non-negative".into(),
        }),
        _ => Ok(()),
    }
}

pub fn validate_stop<I, A>(trade: &Trade<I, A>) -> Result<(), TradeError> {
    match trade.stop() {
        Some(stop) if stop > 0.0 || stop.is_nan() => Err(TradeError::Validation {
            field: "stop",
            value: stop.to_string(),
            reason: "stop must be non-positive".into(),
        }),
        _ => Ok(()),
    }
}
