//! Ledger error types.
//!
//! Every failure inside a unit of work aborts it and surfaces as one of these variants.
//! Callers can tell apart missing records, constraint violations, transient conflicts
//! worth retrying, and the compound case where the rollback itself failed.

use thiserror::Error;

/// The kind of ledger record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// An account row.
    Account,
    /// An entry row.
    Entry,
    /// A transfer row.
    Transfer,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Account => "Account",
            Self::Entry => "Entry",
            Self::Transfer => "Transfer",
        })
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transfer amount must be strictly positive.
    #[error("Transfer amount must be positive, got {0}")]
    InvalidAmount(i64),

    // ========== Lookup Errors ==========
    /// Referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Which table was searched.
        kind: RecordKind,
        /// The identifier that was not found.
        id: i64,
    },

    // ========== Database Errors ==========
    /// A write violated a database constraint (foreign key, check, unique, not null).
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Lock timeout, serialization failure, deadlock or lost connection.
    #[error("Transient database error: {0}")]
    Transient(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Balance updates were handed to the ordered updater higher id first.
    #[error("Balance updates out of order: account {first} before account {second}")]
    UnorderedUpdate {
        /// Account the caller asked to update first.
        first: i64,
        /// Account the caller asked to update second.
        second: i64,
    },

    // ========== Unit of Work Errors ==========
    /// The caller cancelled the unit of work before it finished.
    #[error("Unit of work cancelled")]
    Cancelled,

    /// The work failed and rolling the transaction back failed too.
    #[error("{source}; rollback also failed: {rollback}")]
    Rollback {
        /// The failure that triggered the rollback.
        source: Box<LedgerError>,
        /// Why the rollback failed.
        rollback: String,
    },
}

impl LedgerError {
    /// Shorthand for a missing account.
    #[must_use]
    pub fn account_not_found(id: impl Into<i64>) -> Self {
        Self::NotFound {
            kind: RecordKind::Account,
            id: id.into(),
        }
    }

    /// Returns the error that started the failure, looking through a failed rollback.
    #[must_use]
    pub fn primary(&self) -> &Self {
        match self {
            Self::Rollback { source, .. } => source.primary(),
            other => other,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::NotFound {
                kind: RecordKind::Account,
                ..
            } => "ACCOUNT_NOT_FOUND",
            Self::NotFound {
                kind: RecordKind::Entry,
                ..
            } => "ENTRY_NOT_FOUND",
            Self::NotFound {
                kind: RecordKind::Transfer,
                ..
            } => "TRANSFER_NOT_FOUND",
            Self::Constraint(_) => "CONSTRAINT_VIOLATION",
            Self::Transient(_) => "TRANSIENT_FAILURE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::UnorderedUpdate { .. } => "UNORDERED_BALANCE_UPDATE",
            Self::Cancelled => "CANCELLED",
            Self::Rollback { .. } => "ROLLBACK_FAILED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount(_) => 400,

            // 404 Not Found
            Self::NotFound { .. } => 404,

            // 408 Request Timeout - the caller gave up
            Self::Cancelled => 408,

            // 409 Conflict - integrity errors
            Self::Constraint(_) => 409,

            // 503 Service Unavailable - retry later
            Self::Transient(_) => 503,

            // 500 Internal Server Error
            Self::Database(_) | Self::UnorderedUpdate { .. } | Self::Rollback { .. } => 500,
        }
    }

    /// Returns true if retrying the whole operation may succeed.
    ///
    /// The core never retries on its own. A retried transfer creates a new transfer.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.primary(), Self::Transient(_))
    }
}
