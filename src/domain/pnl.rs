//! Realised PnL of an executed trade.

use crate::domain::error::TradeError;
use crate::domain::execution::resolve_entry_row;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::trade::Trade;
use crate::domain::valuation;

/// Per-bar, per-leg PnL for a trade closed at `close`.
///
/// Rows before entry are zero; every row from the close onward repeats the
/// PnL at the close.
pub fn pnl_path<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    close: &I,
    table: &PriceTable<I, A>,
) -> Result<Vec<Vec<f64>>, TradeError> {
    let value = valuation::array_value(trade, table)?;
    let entry_row = resolve_entry_row(trade, table)?;
    let close_row = table
        .row_position(close)
        .ok_or_else(|| TradeError::lookup("close", close))?;

    let base = value[entry_row].clone();
    let mut path: Vec<Vec<f64>> = value
        .iter()
        .enumerate()
        .map(|(row, legs)| {
            if row < entry_row {
                vec![0.0; legs.len()]
            } else {
                legs.iter().zip(&base).map(|(v, b)| v - b).collect()
            }
        })
        .collect();

    let frozen = path[close_row].clone();
    for row in path.iter_mut().skip(close_row + 1) {
        row.clone_from(&frozen);
    }
    Ok(path)
}

/// PnL per leg at the end of the table (equal to the PnL at the close).
pub fn final_pnl<I: RowLabel, A: AssetId>(
    trade: &Trade<I, A>,
    close: &I,
    table: &PriceTable<I, A>,
) -> Result<Vec<f64>, TradeError> {
    let mut path = pnl_path(trade, close, table)?;
    path.pop().ok_or_else(|| TradeError::PriceTable {
        reason: "table has no rows".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type T = Trade<i64, String>;

    fn universe() -> PriceTable<i64, String> {
        PriceTable::from_columns(
            (0..5).collect(),
            vec![
                ("A0".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0]),
                ("A1".to_string(), vec![2.0, 3.0, 4.0, 5.0, 6.0]),
                ("A2".to_string(), vec![3.0, 4.0, 5.0, 6.0, 7.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn final_pnl_per_leg() {
        let t = T::new(["A0", "A2"], 1.0).unwrap().with_entry(1).with_exit(3);
        assert_eq!(final_pnl(&t, &3, &universe()).unwrap(), vec![2.0, 2.0]);
    }

    #[test]
    fn final_pnl_respects_lot_sign() {
        let t = T::new(["A0", "A2"], [2.0, -3.0])
            .unwrap()
            .with_entry(0)
            .with_exit(4);
        let pnl = final_pnl(&t, &4, &universe()).unwrap();
        assert_relative_eq!(pnl[0], 8.0);
        assert_relative_eq!(pnl[1], -12.0);
    }

    #[test]
    fn path_is_zero_before_entry_and_frozen_after_close() {
        let t = T::new(["A1"], 1.0).unwrap().with_entry(1);
        let path = pnl_path(&t, &3, &universe()).unwrap();
        assert_eq!(path[0], vec![0.0]);
        assert_eq!(path[1], vec![0.0]);
        assert_eq!(path[2], vec![1.0]);
        assert_eq!(path[3], vec![2.0]);
        assert_eq!(path[4], vec![2.0]);
    }

    #[test]
    fn default_entry_is_first_row() {
        let t = T::new(["A0"], 1.0).unwrap();
        assert_eq!(final_pnl(&t, &4, &universe()).unwrap(), vec![4.0]);
    }

    #[test]
    fn close_before_entry_yields_zero() {
        let t = T::new(["A0"], 1.0).unwrap().with_entry(3);
        assert_eq!(final_pnl(&t, &1, &universe()).unwrap(), vec![0.0]);
    }

    #[test]
    fn unknown_close_is_lookup_failure() {
        let t = T::new(["A0"], 1.0).unwrap();
        let err = final_pnl(&t, &99, &universe()).unwrap_err();
        assert!(matches!(err, TradeError::Lookup { field: "close", .. }));
    }
}
