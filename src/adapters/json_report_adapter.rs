//! JSON report adapter implementing ReportPort.
//!
//! Writes one array with an entry per trade, in batch order. Settled trades
//! carry their executed record and final PnL; failed trades carry the error.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::domain::batch::BatchOutcome;
use crate::domain::error::TradeError;
use crate::domain::record::TradeRecord;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct ReportEntry<'a, I> {
    trade_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<TradeRecord<I, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pnl: Option<&'a [f64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a, I: Clone> ReportEntry<'a, I> {
    fn from_outcome(outcome: &'a BatchOutcome<I, String>) -> Self {
        match &outcome.result {
            Ok(settled) => ReportEntry {
                trade_id: &outcome.trade_id,
                record: Some(settled.trade.to_record()),
                pnl: Some(&settled.pnl),
                error: None,
            },
            Err(e) => ReportEntry {
                trade_id: &outcome.trade_id,
                record: None,
                pnl: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        JsonReportAdapter
    }

    /// Render the report without touching the filesystem.
    pub fn render<I: Serialize + Clone>(
        &self,
        outcomes: &[BatchOutcome<I, String>],
    ) -> Result<String, TradeError> {
        let entries: Vec<ReportEntry<'_, I>> =
            outcomes.iter().map(ReportEntry::from_outcome).collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Serialize + Clone> ReportPort<I> for JsonReportAdapter {
    fn write(
        &self,
        outcomes: &[BatchOutcome<I, String>],
        output_path: &Path,
    ) -> Result<(), TradeError> {
        let content = self.render(outcomes)?;
        fs::write(output_path, content)?;
        Ok(())
    }
}
