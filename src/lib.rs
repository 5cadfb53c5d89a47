//! barrier-trade: multi-asset trades with take-profit and stop-loss barriers.
//!
//! A [`domain::trade::Trade`] holds signed lots in one or more assets, an
//! optional entry and exit label and optional PnL thresholds. Executing it
//! against a [`domain::price_table::PriceTable`] finds the bar where the
//! position closes; the realised PnL is frozen from that bar on.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
