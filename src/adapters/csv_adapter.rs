//! CSV file data adapter.
//!
//! Prices: wide layout, first column is the row label, every other column is
//! an asset.
//!
//! ```text
//! date,A0,A1
//! 2024-01-02,10.5,20.1
//! ```
//!
//! History: one row per (trade, asset) pair with header
//! `trade_id,asset,lot,entry,exit,take,stop`; empty cells are unset.

use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::error::TradeError;
use crate::domain::history::HistoryRow;
use crate::domain::price_table::{PriceTable, RowLabel};
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    prices_path: PathBuf,
    history_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(prices_path: PathBuf, history_path: PathBuf) -> Self {
        Self {
            prices_path,
            history_path,
        }
    }

    fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, TradeError> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| TradeError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })
    }
}

impl<I> DataPort<I> for CsvAdapter
where
    I: RowLabel + FromStr + DeserializeOwned,
    <I as FromStr>::Err: Display,
{
    fn fetch_prices(&self) -> Result<PriceTable<I, String>, TradeError> {
        let path = &self.prices_path;
        let mut rdr = Self::reader(path)?;

        let headers = rdr.headers().map_err(|e| TradeError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        if headers.len() < 2 {
            return Err(TradeError::Data {
                reason: format!(
                    "{} needs a label column and at least one asset column",
                    path.display()
                ),
            });
        }
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut rows: Vec<(I, Vec<f64>)> = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TradeError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let raw_label = record.get(0).ok_or_else(|| TradeError::Data {
                reason: format!("missing label on data row {}", line + 1),
            })?;
            let label = raw_label.parse::<I>().map_err(|e| TradeError::Data {
                reason: format!("invalid row label '{}': {}", raw_label, e),
            })?;

            let values = record
                .iter()
                .skip(1)
                .zip(&columns)
                .map(|(cell, asset)| {
                    cell.parse::<f64>().map_err(|e| TradeError::Data {
                        reason: format!("invalid {} price at {}: {}", asset, raw_label, e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rows.push((label, values));
        }

        rows.sort_by(|a, b| a.0.cmp(&b.0));
        let (index, cells) = rows.into_iter().unzip();
        PriceTable::new(index, columns, cells)
    }

    fn fetch_history(&self) -> Result<Vec<HistoryRow<I, String>>, TradeError> {
        let mut rdr = Self::reader(&self.history_path)?;
        rdr.deserialize()
            .map(|result| {
                result.map_err(|e| TradeError::Data {
                    reason: format!("history parse error: {}", e),
                })
            })
            .collect()
    }
}
