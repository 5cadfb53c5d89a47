//! Canonical plain-record form of a trade and its JSON encoding.
//!
//! Unset `entry`, `exit`, `take` and `stop` are written as `null` so every
//! record has the same keys; `close` only appears once a trade is executed.
//! JSON has no non-finite numbers, so `take`, `stop` and `lot` entries that
//! are NaN or infinite are written as the strings `"NaN"`, `"Infinity"` and
//! `"-Infinity"`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::error::TradeError;
use crate::domain::trade::{ExecutedTrade, Trade, TradeState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord<I, A> {
    pub asset: Vec<A>,
    pub entry: Option<I>,
    pub exit: Option<I>,
    #[serde(default, with = "float_repr::option")]
    pub take: Option<f64>,
    #[serde(default, with = "float_repr::option")]
    pub stop: Option<f64>,
    #[serde(with = "float_repr::seq")]
    pub lot: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<I>,
}

impl<I, A> TradeRecord<I, A> {
    /// Build a pending trade; any `close` is dropped since execution recomputes it.
    pub fn into_trade(self) -> Result<Trade<I, A>, TradeError> {
        Trade::from_parts(
            self.asset, self.lot, self.entry, self.exit, self.take, self.stop,
        )
    }

    /// Build a trade in the state the record describes.
    pub fn into_state(mut self) -> Result<TradeState<I, A>, TradeError> {
        let close = self.close.take();
        let trade = self.into_trade()?;
        Ok(match close {
            Some(close) => TradeState::Executed(ExecutedTrade::from_parts(trade, close)),
            None => TradeState::Pending(trade),
        })
    }
}

impl<I: Clone, A: Clone> Trade<I, A> {
    pub fn to_record(&self) -> TradeRecord<I, A> {
        TradeRecord {
            asset: self.assets().to_vec(),
            entry: self.entry().cloned(),
            exit: self.exit().cloned(),
            take: self.take(),
            stop: self.stop(),
            lot: self.lot().to_vec(),
            close: None,
        }
    }
}

impl<I: Clone, A: Clone> ExecutedTrade<I, A> {
    pub fn to_record(&self) -> TradeRecord<I, A> {
        TradeRecord {
            close: Some(self.close().clone()),
            ..self.trade().to_record()
        }
    }
}

impl<I: Clone, A: Clone> TradeState<I, A> {
    pub fn to_record(&self) -> TradeRecord<I, A> {
        match self {
            TradeState::Pending(trade) => trade.to_record(),
            TradeState::Executed(executed) => executed.to_record(),
        }
    }
}

mod float_repr {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    impl From<f64> for Repr {
        fn from(value: f64) -> Self {
            if value.is_finite() {
                Repr::Number(value)
            } else if value.is_nan() {
                Repr::Text("NaN".into())
            } else if value > 0.0 {
                Repr::Text("Infinity".into())
            } else {
                Repr::Text("-Infinity".into())
            }
        }
    }

    impl Repr {
        fn into_f64<E: Error>(self) -> Result<f64, E> {
            match self {
                Repr::Number(value) => Ok(value),
                Repr::Text(text) => match text.as_str() {
                    "NaN" => Ok(f64::NAN),
                    "Infinity" => Ok(f64::INFINITY),
                    "-Infinity" => Ok(f64::NEG_INFINITY),
                    other => Err(E::custom(format!("invalid number '{}'", other))),
                },
            }
        }
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
            value.map(Repr::from).serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
            Option::<Repr>::deserialize(d)?
                .map(Repr::into_f64)
                .transpose()
        }
    }

    pub mod seq {
        use super::*;

        pub fn serialize<S: Serializer>(values: &[f64], s: S) -> Result<S::Ok, S::Error> {
            values
                .iter()
                .map(|&v| Repr::from(v))
                .collect::<Vec<_>>()
                .serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
            Vec::<Repr>::deserialize(d)?
                .into_iter()
                .map(Repr::into_f64)
                .collect()
        }
    }
}

pub fn to_json<T: Serialize>(record: &T) -> Result<String, TradeError> {
    Ok(serde_json::to_string(record)?)
}

pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T, TradeError> {
    Ok(serde_json::from_str(s)?)
}
