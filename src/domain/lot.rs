//! Lot quantities and broadcasting.

use crate::domain::error::TradeError;

/// A lot as supplied by a caller: one quantity for every leg, or one per leg.
#[derive(Debug, Clone, PartialEq)]
pub enum Lot {
    Scalar(f64),
    PerAsset(Vec<f64>),
}

impl Lot {
    /// Broadcast to exactly `n` legs.
    ///
    /// A scalar, or a single-element vector, repeats; a vector of length `n`
    /// is taken as is.
    pub fn broadcast(&self, n: usize) -> Result<Vec<f64>, TradeError> {
        match self {
            Lot::Scalar(value) => Ok(vec![*value; n]),
            Lot::PerAsset(values) if values.len() == n => Ok(values.clone()),
            Lot::PerAsset(values) if values.len() == 1 => Ok(vec![values[0]; n]),
            Lot::PerAsset(values) => Err(TradeError::Shape {
                what: "lot",
                expected: n,
                actual: values.len(),
            }),
        }
    }
}

impl From<f64> for Lot {
    fn from(value: f64) -> Self {
        Lot::Scalar(value)
    }
}

impl From<Vec<f64>> for Lot {
    fn from(values: Vec<f64>) -> Self {
        Lot::PerAsset(values)
    }
}

impl From<&[f64]> for Lot {
    fn from(values: &[f64]) -> Self {
        Lot::PerAsset(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Lot {
    fn from(values: [f64; N]) -> Self {
        Lot::PerAsset(values.to_vec())
    }
}
