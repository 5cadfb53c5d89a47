#![allow(dead_code)]

use barrier_trade::domain::error::TradeError;
use barrier_trade::domain::history::HistoryRow;
use barrier_trade::domain::price_table::PriceTable;
use barrier_trade::domain::trade::Trade;
use barrier_trade::ports::data_port::DataPort;
use std::io::Write;
use std::path::{Path, PathBuf};

pub type T = Trade<i64, String>;

/// Columns A0/A1/A2 holding `[1..7]`, `[2..8]`, `[3..9]` over rows 0..6.
pub fn universe() -> PriceTable<i64, String> {
    PriceTable::from_columns(
        (0..7).collect(),
        vec![
            ("A0".to_string(), (1..=7).map(f64::from).collect()),
            ("A1".to_string(), (2..=8).map(f64::from).collect()),
            ("A2".to_string(), (3..=9).map(f64::from).collect()),
        ],
    )
    .unwrap()
}

/// Columns A0/A2 holding `[1..5]` and `[3..7]` over rows 0..4.
pub fn pair_table() -> PriceTable<i64, String> {
    PriceTable::from_columns(
        (0..5).collect(),
        vec![
            ("A0".to_string(), (1..=5).map(f64::from).collect()),
            ("A2".to_string(), (3..=7).map(f64::from).collect()),
        ],
    )
    .unwrap()
}

/// Single asset whose PnL from row 0 rises past 4, falls back below, then rises again.
pub fn round_trip_table() -> PriceTable<i64, String> {
    PriceTable::from_columns(
        (0..8).collect(),
        vec![(
            "A0".to_string(),
            vec![10.0, 10.0, 13.0, 15.0, 11.0, 9.0, 12.0, 16.0],
        )],
    )
    .unwrap()
}

pub fn history_row(
    id: &str,
    asset: &str,
    lot: f64,
    entry: Option<i64>,
    exit: Option<i64>,
    take: Option<f64>,
    stop: Option<f64>,
) -> HistoryRow<i64, String> {
    HistoryRow {
        trade_id: id.to_string(),
        asset: asset.to_string(),
        lot,
        entry,
        exit,
        take,
        stop,
    }
}

pub struct MockDataPort {
    pub table: PriceTable<i64, String>,
    pub rows: Vec<HistoryRow<i64, String>>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(table: PriceTable<i64, String>) -> Self {
        Self {
            table,
            rows: Vec::new(),
            error: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<HistoryRow<i64, String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort<i64> for MockDataPort {
    fn fetch_prices(&self) -> Result<PriceTable<i64, String>, TradeError> {
        if let Some(reason) = &self.error {
            return Err(TradeError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.table.clone())
    }

    fn fetch_history(&self) -> Result<Vec<HistoryRow<i64, String>>, TradeError> {
        Ok(self.rows.clone())
    }
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    path
}
