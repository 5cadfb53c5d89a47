//! Trade entity, scaling operators and the Pending → Executed lifecycle.
//!
//! A [`Trade`] is a pending multi-asset order. Executing it against a
//! [`PriceTable`] consumes it and yields an [`ExecutedTrade`], the only type
//! that can report PnL.

use std::fmt;
use std::ops::{Div, Mul, Neg};

use crate::domain::error::TradeError;
use crate::domain::execution::{self, ExecutionConfig};
use crate::domain::lot::Lot;
use crate::domain::pnl;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::valuation;

/// A pending trade: no close has been resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade<I, A> {
    assets: Vec<A>,
    lot: Vec<f64>,
    entry: Option<I>,
    exit: Option<I>,
    take: Option<f64>,
    stop: Option<f64>,
}

impl<I, A> Trade<I, A> {
    /// Create a trade on `assets`, broadcasting `lot` to one quantity per asset.
    ///
    /// Fails with [`TradeError::Shape`] if `assets` is empty or `lot` cannot be
    /// broadcast. Lot values are not checked for finiteness here; see
    /// [`crate::domain::validation`].
    pub fn new(
        assets: impl IntoIterator<Item = impl Into<A>>,
        lot: impl Into<Lot>,
    ) -> Result<Self, TradeError> {
        Self::from_parts(
            assets.into_iter().map(Into::into).collect(),
            lot,
            None,
            None,
            None,
            None,
        )
    }

    /// Create a trade with every field supplied at once.
    pub fn from_parts(
        assets: Vec<A>,
        lot: impl Into<Lot>,
        entry: Option<I>,
        exit: Option<I>,
        take: Option<f64>,
        stop: Option<f64>,
    ) -> Result<Self, TradeError> {
        if assets.is_empty() {
            return Err(TradeError::Shape {
                what: "assets",
                expected: 1,
                actual: 0,
            });
        }
        let lot = lot.into().broadcast(assets.len())?;
        Ok(Self {
            assets,
            lot,
            entry,
            exit,
            take,
            stop,
        })
    }

    pub fn with_entry(mut self, entry: I) -> Self {
        self.entry = Some(entry);
        self
    }

    pub fn with_exit(mut self, exit: I) -> Self {
        self.exit = Some(exit);
        self
    }

    pub fn with_take(mut self, take: f64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn with_stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn assets(&self) -> &[A] {
        &self.assets
    }

    pub fn lot(&self) -> &[f64] {
        &self.lot
    }

    pub fn entry(&self) -> Option<&I> {
        self.entry.as_ref()
    }

    pub fn exit(&self) -> Option<&I> {
        self.exit.as_ref()
    }

    pub fn take(&self) -> Option<f64> {
        self.take
    }

    pub fn stop(&self) -> Option<f64> {
        self.stop
    }

    /// Number of legs.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false: a trade has at least one leg.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<I: Clone, A: Clone> Trade<I, A> {
    /// Return a copy with `lot` multiplied element-wise by `factor`.
    ///
    /// `factor` broadcasts exactly like the constructor's `lot`.
    pub fn scale(&self, factor: impl Into<Lot>) -> Result<Self, TradeError> {
        let factor = factor.into().broadcast(self.lot.len())?;
        let mut scaled = self.clone();
        for (lot, f) in scaled.lot.iter_mut().zip(factor) {
            *lot *= f;
        }
        Ok(scaled)
    }

    fn scaled(&self, factor: f64) -> Self {
        let mut scaled = self.clone();
        scaled.lot.iter_mut().for_each(|lot| *lot *= factor);
        scaled
    }
}

impl<I: RowLabel, A: AssetId> Trade<I, A> {
    /// Lot-weighted value per bar and asset over the whole table.
    pub fn array_value(&self, table: &PriceTable<I, A>) -> Result<Vec<Vec<f64>>, TradeError> {
        valuation::array_value(self, table)
    }

    /// Resolve the close with the default [`ExecutionConfig`].
    pub fn execute(self, table: &PriceTable<I, A>) -> Result<ExecutedTrade<I, A>, TradeError> {
        self.execute_with(table, &ExecutionConfig::default())
    }

    pub fn execute_with(
        self,
        table: &PriceTable<I, A>,
        config: &ExecutionConfig,
    ) -> Result<ExecutedTrade<I, A>, TradeError> {
        let close_row = execution::resolve_close_row(&self, table, config)?;
        let close = table
            .label(close_row)
            .cloned()
            .ok_or_else(|| TradeError::lookup("close", close_row))?;
        Ok(ExecutedTrade { trade: self, close })
    }
}

/// A trade whose close has been resolved against a price table.
///
/// Equality ignores `close`, which is fully determined by the other fields
/// and the table.
#[derive(Debug, Clone)]
pub struct ExecutedTrade<I, A> {
    trade: Trade<I, A>,
    close: I,
}

impl<I, A> ExecutedTrade<I, A> {
    pub(crate) fn from_parts(trade: Trade<I, A>, close: I) -> Self {
        Self { trade, close }
    }

    pub fn trade(&self) -> &Trade<I, A> {
        &self.trade
    }

    pub fn close(&self) -> &I {
        &self.close
    }

    /// Drop the close and return the pending trade.
    pub fn into_pending(self) -> Trade<I, A> {
        self.trade
    }
}

impl<I: Clone, A: Clone> ExecutedTrade<I, A> {
    /// Scale the lot; the close is carried over unchanged.
    pub fn scale(&self, factor: impl Into<Lot>) -> Result<Self, TradeError> {
        Ok(Self {
            trade: self.trade.scale(factor)?,
            close: self.close.clone(),
        })
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            trade: self.trade.scaled(factor),
            close: self.close.clone(),
        }
    }
}

impl<I: RowLabel, A: AssetId> ExecutedTrade<I, A> {
    /// Re-run execution, overwriting the close.
    pub fn execute(self, table: &PriceTable<I, A>) -> Result<ExecutedTrade<I, A>, TradeError> {
        self.trade.execute(table)
    }

    pub fn execute_with(
        self,
        table: &PriceTable<I, A>,
        config: &ExecutionConfig,
    ) -> Result<ExecutedTrade<I, A>, TradeError> {
        self.trade.execute_with(table, config)
    }

    pub fn array_value(&self, table: &PriceTable<I, A>) -> Result<Vec<Vec<f64>>, TradeError> {
        self.trade.array_value(table)
    }

    /// Per-bar, per-asset PnL: zero before entry, frozen from the close onward.
    pub fn pnl_path(&self, table: &PriceTable<I, A>) -> Result<Vec<Vec<f64>>, TradeError> {
        pnl::pnl_path(&self.trade, &self.close, table)
    }

    /// Realised PnL per asset leg.
    pub fn final_pnl(&self, table: &PriceTable<I, A>) -> Result<Vec<f64>, TradeError> {
        pnl::final_pnl(&self.trade, &self.close, table)
    }
}

impl<I: PartialEq, A: PartialEq> PartialEq for ExecutedTrade<I, A> {
    fn eq(&self, other: &Self) -> bool {
        self.trade == other.trade
    }
}

impl<I: PartialEq, A: PartialEq> PartialEq<Trade<I, A>> for ExecutedTrade<I, A> {
    fn eq(&self, other: &Trade<I, A>) -> bool {
        self.trade == *other
    }
}

/// A trade whose lifecycle state is only known at runtime, e.g. after
/// reading a record.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeState<I, A> {
    Pending(Trade<I, A>),
    Executed(ExecutedTrade<I, A>),
}

impl<I, A> TradeState<I, A> {
    pub fn trade(&self) -> &Trade<I, A> {
        match self {
            TradeState::Pending(trade) => trade,
            TradeState::Executed(executed) => executed.trade(),
        }
    }

    pub fn close(&self) -> Option<&I> {
        match self {
            TradeState::Pending(_) => None,
            TradeState::Executed(executed) => Some(executed.close()),
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, TradeState::Executed(_))
    }
}

impl<I: RowLabel, A: AssetId> TradeState<I, A> {
    /// Execute (or re-execute) regardless of the current state.
    pub fn execute(self, table: &PriceTable<I, A>) -> Result<ExecutedTrade<I, A>, TradeError> {
        match self {
            TradeState::Pending(trade) => trade.execute(table),
            TradeState::Executed(executed) => executed.execute(table),
        }
    }

    /// Fails with [`TradeError::InvalidState`] unless executed.
    pub fn final_pnl(&self, table: &PriceTable<I, A>) -> Result<Vec<f64>, TradeError> {
        match self {
            TradeState::Pending(_) => Err(TradeError::InvalidState {
                reason: "PnL requested on a trade that has not been executed".into(),
            }),
            TradeState::Executed(executed) => executed.final_pnl(table),
        }
    }
}

impl<I, A> From<Trade<I, A>> for TradeState<I, A> {
    fn from(trade: Trade<I, A>) -> Self {
        TradeState::Pending(trade)
    }
}

impl<I, A> From<ExecutedTrade<I, A>> for TradeState<I, A> {
    fn from(executed: ExecutedTrade<I, A>) -> Self {
        TradeState::Executed(executed)
    }
}

macro_rules! impl_scalar_ops {
    ($ty:ident) => {
        impl<I: Clone, A: Clone> Mul<f64> for $ty<I, A> {
            type Output = $ty<I, A>;
            fn mul(self, factor: f64) -> Self::Output {
                self.scaled(factor)
            }
        }

        impl<I: Clone, A: Clone> Mul<f64> for &$ty<I, A> {
            type Output = $ty<I, A>;
            fn mul(self, factor: f64) -> Self::Output {
                self.scaled(factor)
            }
        }

        impl<I: Clone, A: Clone> Mul<$ty<I, A>> for f64 {
            type Output = $ty<I, A>;
            fn mul(self, trade: $ty<I, A>) -> Self::Output {
                trade.scaled(self)
            }
        }

        impl<I: Clone, A: Clone> Mul<&$ty<I, A>> for f64 {
            type Output = $ty<I, A>;
            fn mul(self, trade: &$ty<I, A>) -> Self::Output {
                trade.scaled(self)
            }
        }

        impl<I: Clone, A: Clone> Div<f64> for $ty<I, A> {
            type Output = $ty<I, A>;
            fn div(self, divisor: f64) -> Self::Output {
                self.scaled(1.0 / divisor)
            }
        }

        impl<I: Clone, A: Clone> Div<f64> for &$ty<I, A> {
            type Output = $ty<I, A>;
            fn div(self, divisor: f64) -> Self::Output {
                self.scaled(1.0 / divisor)
            }
        }

        impl<I: Clone, A: Clone> Neg for $ty<I, A> {
            type Output = $ty<I, A>;
            fn neg(self) -> Self::Output {
                self.scaled(-1.0)
            }
        }

        impl<I: Clone, A: Clone> Neg for &$ty<I, A> {
            type Output = $ty<I, A>;
            fn neg(self) -> Self::Output {
                self.scaled(-1.0)
            }
        }
    };
}

impl_scalar_ops!(Trade);
impl_scalar_ops!(ExecutedTrade);

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<I: fmt::Display, A: fmt::Display> fmt::Display for Trade<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trade([{}], lot=[{}]", join(&self.assets), join(&self.lot))?;
        if let Some(entry) = &self.entry {
            write!(f, ", entry={}", entry)?;
        }
        if let Some(exit) = &self.exit {
            write!(f, ", exit={}", exit)?;
        }
        if let Some(take) = self.take {
            write!(f, ", take={}", take)?;
        }
        if let Some(stop) = self.stop {
            write!(f, ", stop={}", stop)?;
        }
        write!(f, ")")
    }
}

impl<I: fmt::Display, A: fmt::Display> fmt::Display for ExecutedTrade<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} closed at {}", self.trade, self.close)
    }
}
