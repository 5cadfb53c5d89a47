//! Bulk loading of trades from a flat history table.
//!
//! One row per (trade, asset) pair. Rows sharing a `trade_id` form one trade:
//! `asset` and `lot` are collected in row order, while `entry`, `exit`, `take`
//! and `stop` come from the group's first row.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::error::TradeError;
use crate::domain::trade::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow<I, A> {
    pub trade_id: String,
    pub asset: A,
    pub lot: f64,
    pub entry: Option<I>,
    pub exit: Option<I>,
    pub take: Option<f64>,
    pub stop: Option<f64>,
}

/// One trade per distinct `trade_id`, in order of first appearance.
pub fn load_history<I: Clone, A: Clone>(
    rows: &[HistoryRow<I, A>],
) -> Result<Vec<Trade<I, A>>, TradeError> {
    Ok(load_history_with_ids(rows)?
        .into_iter()
        .map(|(_, trade)| trade)
        .collect())
}

/// Like [`load_history`], keeping each trade's id.
pub fn load_history_with_ids<I: Clone, A: Clone>(
    rows: &[HistoryRow<I, A>],
) -> Result<Vec<(String, Trade<I, A>)>, TradeError> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&HistoryRow<I, A>>> = HashMap::new();
    for row in rows {
        groups
            .entry(row.trade_id.as_str())
            .or_insert_with(|| {
                order.push(row.trade_id.as_str());
                Vec::new()
            })
            .push(row);
    }

    order
        .into_iter()
        .map(|id| {
            let group = &groups[id];
            let first = group[0];
            let trade = Trade::from_parts(
                group.iter().map(|r| r.asset.clone()).collect(),
                group.iter().map(|r| r.lot).collect::<Vec<_>>(),
                first.entry.clone(),
                first.exit.clone(),
                first.take,
                first.stop,
            )?;
            Ok((id.to_string(), trade))
        })
        .collect()
}
