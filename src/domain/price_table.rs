//! Read-only, time-ordered price history.
//!
//! Rows are labelled by a strictly ascending [`RowLabel`]; columns by an
//! [`AssetId`]. Cells are stored row-major so a bar's prices sit together.

use crate::domain::error::TradeError;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Label of a price table row (a timestamp, a date, a bar number...).
pub trait RowLabel: Ord + Clone + Display {}

impl<T: Ord + Clone + Display> RowLabel for T {}

/// Identifier of a price table column.
pub trait AssetId: Eq + Hash + Clone + Display {}

impl<T: Eq + Hash + Clone + Display> AssetId for T {}

#[derive(Debug, Clone)]
pub struct PriceTable<I, A> {
    index: Vec<I>,
    columns: Vec<A>,
    column_index: HashMap<A, usize>,
    rows: Vec<Vec<f64>>,
}

impl<I: RowLabel, A: AssetId> PriceTable<I, A> {
    /// Build a table from row-major cells.
    ///
    /// The index must be non-empty and strictly ascending, columns unique, and
    /// every row as wide as `columns`.
    pub fn new(index: Vec<I>, columns: Vec<A>, rows: Vec<Vec<f64>>) -> Result<Self, TradeError> {
        if index.is_empty() {
            return Err(TradeError::PriceTable {
                reason: "table has no rows".into(),
            });
        }
        if let Some(pair) = index.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(TradeError::PriceTable {
                reason: format!(
                    "index must be strictly ascending, found {} before {}",
                    pair[0], pair[1]
                ),
            });
        }
        if rows.len() != index.len() {
            return Err(TradeError::Shape {
                what: "price rows",
                expected: index.len(),
                actual: rows.len(),
            });
        }
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(TradeError::Shape {
                what: "price row width",
                expected: columns.len(),
                actual: row.len(),
            });
        }

        let mut column_index = HashMap::with_capacity(columns.len());
        for (i, asset) in columns.iter().enumerate() {
            if column_index.insert(asset.clone(), i).is_some() {
                return Err(TradeError::PriceTable {
                    reason: format!("duplicate column {}", asset),
                });
            }
        }

        Ok(Self {
            index,
            columns,
            column_index,
            rows,
        })
    }

    /// Build a table from one price series per asset.
    pub fn from_columns(
        index: Vec<I>,
        series: Vec<(A, Vec<f64>)>,
    ) -> Result<Self, TradeError> {
        let n_rows = index.len();
        if let Some((asset, values)) = series.iter().find(|(_, v)| v.len() != n_rows) {
            return Err(TradeError::PriceTable {
                reason: format!(
                    "series {} has {} values for {} rows",
                    asset,
                    values.len(),
                    n_rows
                ),
            });
        }
        let rows = (0..n_rows)
            .map(|r| series.iter().map(|(_, values)| values[r]).collect())
            .collect();
        let columns = series.into_iter().map(|(asset, _)| asset).collect();
        Self::new(index, columns, rows)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false: construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[I] {
        &self.index
    }

    pub fn columns(&self) -> &[A] {
        &self.columns
    }

    pub fn contains_row(&self, label: &I) -> bool {
        self.row_position(label).is_some()
    }

    /// Positional row lookup by label.
    pub fn row_position(&self, label: &I) -> Option<usize> {
        self.index.binary_search(label).ok()
    }

    pub fn label(&self, position: usize) -> Option<&I> {
        self.index.get(position)
    }

    pub fn first_label(&self) -> &I {
        &self.index[0]
    }

    pub fn last_label(&self) -> &I {
        &self.index[self.index.len() - 1]
    }

    pub fn contains_column(&self, asset: &A) -> bool {
        self.column_index.contains_key(asset)
    }

    pub fn column_position(&self, asset: &A) -> Option<usize> {
        self.column_index.get(asset).copied()
    }

    pub fn price(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Extract the given columns over every row, in the order requested.
    ///
    /// Repeated assets yield repeated columns.
    pub fn select(&self, assets: &[A]) -> Result<Vec<Vec<f64>>, TradeError> {
        let positions = assets
            .iter()
            .map(|asset| {
                self.column_position(asset)
                    .ok_or_else(|| TradeError::lookup("asset", asset))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&c| row[c]).collect())
            .collect())
    }
}
