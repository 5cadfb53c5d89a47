//! Execution of many independent trades against one price table.
//!
//! Trades share only the read-only table, so the batch can run on rayon's
//! pool without coordination.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::error::TradeError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::trade::{ExecutedTrade, Trade};

/// A trade executed as part of a batch, with its realised PnL per leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<I, A> {
    pub trade: ExecutedTrade<I, A>,
    pub pnl: Vec<f64>,
}

#[derive(Debug)]
pub struct BatchOutcome<I, A> {
    pub trade_id: String,
    pub result: Result<Settled<I, A>, TradeError>,
}

impl<I, A> BatchOutcome<I, A> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Execute a single trade and compute its final PnL.
pub fn settle<I: RowLabel, A: AssetId>(
    trade: Trade<I, A>,
    table: &PriceTable<I, A>,
    config: &ExecutionConfig,
) -> Result<Settled<I, A>, TradeError> {
    let trade = trade.execute_with(table, config)?;
    let pnl = trade.final_pnl(table)?;
    Ok(Settled { trade, pnl })
}

/// Settle every trade; a failing trade does not affect the others.
///
/// Outcomes are returned in input order.
pub fn execute_batch<I, A>(
    trades: Vec<(String, Trade<I, A>)>,
    table: &PriceTable<I, A>,
    config: &ExecutionConfig,
) -> Vec<BatchOutcome<I, A>>
where
    I: RowLabel + Send + Sync,
    A: AssetId + Send + Sync,
{
    let run = |(trade_id, trade): (String, Trade<I, A>)| {
        let result = settle(trade, table, config);
        match &result {
            Ok(settled) => debug!(trade_id = %trade_id, close = %settled.trade.close(), "Trade settled"),
            Err(e) => warn!(trade_id = %trade_id, error = %e, "Trade failed"),
        }
        BatchOutcome { trade_id, result }
    };

    if config.parallel {
        trades.into_par_iter().map(run).collect()
    } else {
        trades.into_iter().map(run).collect()
    }
}
