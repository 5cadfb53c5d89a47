//! Domain error types.

/// Top-level error type for barrier-trade.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// An asset, or an explicit entry/exit/close label, is absent from the price table.
    #[error("{field} {label} not found in price table")]
    Lookup { field: &'static str, label: String },

    #[error("invalid {field} = {value}: {reason}")]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid trade state: {reason}")]
    InvalidState { reason: String },

    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("malformed price table: {reason}")]
    PriceTable { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeError {
    pub(crate) fn lookup(field: &'static str, label: impl std::fmt::Display) -> Self {
        TradeError::Lookup {
            field,
            label: label.to_string(),
        }
    }

    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            TradeError::Io(_) | TradeError::Data { .. } | TradeError::Json(_) => 1,
            TradeError::ConfigParse { .. }
            | TradeError::ConfigMissing { .. }
            | TradeError::ConfigInvalid { .. } => 2,
            TradeError::Lookup { .. }
            | TradeError::InvalidState { .. }
            | TradeError::Shape { .. }
            | TradeError::PriceTable { .. } => 3,
            TradeError::Validation { .. } => 4,
        }
    }
}

impl From<&TradeError> for std::process::ExitCode {
    fn from(err: &TradeError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
