//! The module contains the errors the engine can produce.
//!
//! - [`EngineError`] for invalid input and state-machine misuse.
//! - [`ParseError`] for a dirty field on a single record. It is never
//!   propagated: normalization recovers from it and records a
//!   [`ParseIssue`](crate::ParseIssue).
//! - [`ExportError`] for a failed artifact rendering or write.
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid period: \"{0}\"")]
    InvalidPeriod(String),
    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        phase: &'static str,
        action: &'static str,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (
                Self::InvalidTransition {
                    phase: a_phase,
                    action: a_action,
                },
                Self::InvalidTransition {
                    phase: b_phase,
                    action: b_action,
                },
            ) => a_phase == b_phase && a_action == b_action,
            (Self::Export(a), Self::Export(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// A recoverable defect found on one field of one record.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing amount")]
    MissingAmount,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("negative amount: {0}")]
    NegativeAmount(i64),
    #[error("missing date")]
    MissingDate,
    #[error("unrecognized date: {0}")]
    InvalidDate(String),
    #[error("missing period")]
    MissingPeriod,
    #[error("missing status")]
    MissingStatus,
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("missing category")]
    MissingCategory,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("missing funding source")]
    MissingFundingSource,
    #[error("unknown funding source: {0}")]
    UnknownFundingSource(String),
}

/// Failure while rendering or delivering an export artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("delimited text error: {0}")]
    Delimited(#[from] csv::Error),
    #[error("document error: {0}")]
    Document(String),
    #[error("amount {0} cannot be stored exactly in a workbook cell")]
    AmountOutOfRange(crate::Money),
    #[error("too many rows for a worksheet: {0}")]
    TooManyRows(usize),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for ExportError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Document(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message() {
        let err = EngineError::InvalidTransition {
            phase: "loading",
            action: "select a period",
        };
        assert_eq!(err.to_string(), "Cannot select a period while loading");
    }

    #[test]
    fn export_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "blocked");
        let err = EngineError::from(ExportError::from(io));
        assert!(matches!(err, EngineError::Export(ExportError::Io(_))));
    }
}
