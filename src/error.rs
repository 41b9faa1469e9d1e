//! Errors that stop a run. Bad rows and rejected events are not among
//! them: those are reported through the error handler and skipped.

use crate::reports::{report::report::ReportError, ReportId};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vehicle rates: {0}")]
    Rates(#[from] crate::input::Error),

    #[error("the reports could not be built: the build thread panicked")]
    BuildPanicked,

    #[error("report {report_id} can't be reconciled: {error:?}")]
    Reconciliation {
        report_id: ReportId,
        error: ReportError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
