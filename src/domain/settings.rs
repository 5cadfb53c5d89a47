//! Run configuration: validation of the INI keys and the typed result.
//!
//! ```ini
//! [data]
//! prices = prices.csv
//! history = history.csv
//! index = date            ; or integer
//!
//! [execution]
//! barrier_search = linear ; or sorted
//! parallel = false
//!
//! [validation]
//! enabled = true
//! check_lot = true
//!
//! [report]
//! output = report.json
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::barrier::BarrierSearch;
use crate::domain::error::TradeError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::validation::ValidationFlags;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_OUTPUT: &str = "report.json";

/// How row labels in the data files are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    /// `YYYY-MM-DD` dates.
    #[default]
    Date,
    /// Integer bar numbers.
    Integer,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Date => write!(f, "date"),
            IndexKind::Integer => write!(f, "integer"),
        }
    }
}

impl FromStr for IndexKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(IndexKind::Date),
            "integer" | "int" => Ok(IndexKind::Integer),
            other => Err(format!("unknown index kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub prices: PathBuf,
    pub history: PathBuf,
    pub index: IndexKind,
    pub execution: ExecutionConfig,
    /// `None` when `[validation] enabled = false`.
    pub validation: Option<ValidationFlags>,
    pub output: PathBuf,
}

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), TradeError> {
    require(config, "data", "prices")?;
    require(config, "data", "history")?;
    parse_index(config)?;
    parse_search(config)?;
    Ok(())
}

/// Validate and convert the configuration into a [`RunConfig`].
pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, TradeError> {
    validate_run_config(config)?;

    let validation = if config.get_bool("validation", "enabled", true) {
        Some(ValidationFlags {
            check_asset: config.get_bool("validation", "check_asset", true),
            check_index: config.get_bool("validation", "check_index", true),
            check_lot: config.get_bool("validation", "check_lot", true),
            check_take: config.get_bool("validation", "check_take", true),
            check_stop: config.get_bool("validation", "check_stop", true),
        })
    } else {
        None
    };

    Ok(RunConfig {
        prices: PathBuf::from(require(config, "data", "prices")?),
        history: PathBuf::from(require(config, "data", "history")?),
        index: parse_index(config)?,
        execution: ExecutionConfig {
            search: parse_search(config)?,
            parallel: config.get_bool("execution", "parallel", false),
        },
        validation,
        output: config
            .get_string("report", "output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
    })
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, TradeError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(TradeError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn parse_index(config: &dyn ConfigPort) -> Result<IndexKind, TradeError> {
    match config.get_string("data", "index") {
        None => Ok(IndexKind::default()),
        Some(s) => s.parse().map_err(|reason| TradeError::ConfigInvalid {
            section: "data".to_string(),
            key: "index".to_string(),
            reason,
        }),
    }
}

fn parse_search(config: &dyn ConfigPort) -> Result<BarrierSearch, TradeError> {
    match config.get_string("execution", "barrier_search") {
        None => Ok(BarrierSearch::default()),
        Some(s) => s.parse().map_err(|reason| TradeError::ConfigInvalid {
            section: "execution".to_string(),
            key: "barrier_search".to_string(),
            reason,
        }),
    }
}
