//! Report generation port trait.

use std::path::Path;

use crate::domain::batch::BatchOutcome;
use crate::domain::error::TradeError;

/// Port for writing the outcome of a batch run.
pub trait ReportPort<I> {
    fn write(
        &self,
        outcomes: &[BatchOutcome<I, String>],
        output_path: &Path,
    ) -> Result<(), TradeError>;
}
