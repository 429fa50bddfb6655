//! Error types surfaced by the advisor and its ledger collaborators.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Failure reported by a ledger or identity-store backend.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A row came back that the model cannot represent (e.g. an unknown status).
    #[error("corrupt ledger row: {0}")]
    Corrupt(String),
}

/// Everything the advisor operations can return to their caller.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("validation failed: {0}")]
    Validation(String),

    /// A leave request could not be written. Nothing was persisted.
    #[error("leave request submission failed: {0}")]
    Submission(#[source] LedgerError),

    /// A read against the ledger failed while assembling a response.
    #[error("ledger read failed: {0}")]
    Storage(#[source] LedgerError),
}

/// Coarse classification used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidRange,
    Validation,
    Submission,
    Storage,
}

/// Structured `kind + message` form of an [`AdvisorError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl AdvisorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdvisorError::NotFound { .. } => ErrorKind::NotFound,
            AdvisorError::InvalidRange { .. } => ErrorKind::InvalidRange,
            AdvisorError::Validation(_) => ErrorKind::Validation,
            AdvisorError::Submission(_) => ErrorKind::Submission,
            AdvisorError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Only failed writes are worth retrying; the rest are caller mistakes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdvisorError::Submission(_))
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;
