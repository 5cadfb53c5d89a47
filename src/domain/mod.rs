//! Core domain types and logic.

pub mod barrier;
pub mod batch;
pub mod error;
pub mod execution;
pub mod history;
pub mod lot;
pub mod pnl;
pub mod price_table;
pub mod record;
pub mod settings;
pub mod trade;
pub mod validation;
pub mod valuation;
