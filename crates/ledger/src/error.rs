//! The module contains the errors the ledger can return.
//!
//! Errors come in two disjoint classes:
//!
//! - [`DomainError`]: an expected, named business condition. Safe to show to a
//!   client and never logged as a failure of the system.
//! - [`InfraError`]: an unexpected storage failure. It keeps the raw
//!   [`StorageFailure`] for diagnostics and must not be shown verbatim.
//!
//! [`LedgerError`] is what every public operation returns. Callers branch on
//! [`LedgerError::domain`] instead of matching on messages.
use core::fmt;

use sea_orm::DbErr;
use thiserror::Error;

use crate::constraints::ViolationSide;

/// Named business-rule violations.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainError {
    #[error("record not found")]
    RecordNotFound,
    #[error("duplicate key")]
    DuplicateKey,
    #[error("a required value is missing")]
    NotNullViolation,
    #[error("value too long")]
    DataTooLong,
    #[error("value out of range")]
    DataOutOfRange,
    #[error("value truncated")]
    DataTruncated,
    #[error("constraint violated")]
    ConstraintViolation,
    #[error("record was modified concurrently, retry the operation")]
    ConcurrentUpdate,

    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,
    #[error("invalid currency code")]
    InvalidCurrency,
    #[error("currency not found")]
    CurrencyNotFound,
    #[error("currency does not match the account currency")]
    CurrencyMismatch,

    #[error("account not found")]
    AccountNotFound,
    #[error("account is inactive")]
    AccountInactive,
    #[error("account is already active")]
    AccountAlreadyActive,
    #[error("account is already inactive")]
    AccountAlreadyInactive,
    #[error("account still has transactions")]
    AccountHasTransactions,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("balance would exceed the largest representable amount")]
    BalanceOverflow,
    #[error("account name must not be empty")]
    AccountNameEmpty,
    #[error("unknown account type")]
    UnknownAccountType,

    #[error("category not found")]
    CategoryNotFound,
    #[error("category is inactive")]
    CategoryInactive,
    #[error("category is already active")]
    CategoryAlreadyActive,
    #[error("category is already inactive")]
    CategoryAlreadyInactive,
    #[error("category is used by an expenditure")]
    CategoryInUseByExpenditure,
    #[error("category is used by an ingress")]
    CategoryInUseByIngress,
    #[error("category is used by a transfer")]
    CategoryInUseByTransfer,
    #[error("category is used by a savings goal")]
    CategoryInUseBySavingsGoal,
    #[error("category name must not be empty")]
    CategoryNameEmpty,
    #[error("unknown category type")]
    UnknownCategoryType,

    #[error("household member not found")]
    HouseholdMemberNotFound,
    #[error("household member is inactive")]
    HouseholdMemberInactive,
    #[error("household member is already active")]
    HouseholdMemberAlreadyActive,
    #[error("household member is already inactive")]
    HouseholdMemberAlreadyInactive,
    #[error("household member still owns active accounts")]
    MemberHasActiveAccounts,
    #[error("household member name must not be empty")]
    MemberNameEmpty,

    #[error("tag not found")]
    TagNotFound,
    #[error("a tag with this name and type already exists")]
    TagAlreadyExists,
    #[error("tag name must not be empty")]
    TagNameEmpty,
    #[error("unknown tag type")]
    UnknownTagType,
    #[error("tag type does not match the tagged entity")]
    TagTypeMismatch,
    #[error("tag is still linked to a record")]
    TagInUse,

    #[error("transaction not found")]
    TransactionNotFound,
    #[error("transaction is still referenced")]
    TransactionInUse,
    #[error("transaction status cannot change this way")]
    InvalidStatusTransition,
    #[error("unknown transaction type")]
    UnknownTransactionType,
    #[error("unknown transaction status")]
    UnknownTransactionStatus,

    #[error("expenditure not found")]
    ExpenditureNotFound,
    #[error("ingress not found")]
    IngressNotFound,
}

/// What the storage driver reported, before translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The driver found no row where one was required.
    NoRows,
    /// The database rejected a statement. Usually carries a numeric code.
    Database,
    /// The connection or pool failed.
    Connection,
    Other,
}

/// Raw storage failure: optional numeric code plus the driver message.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message} (code {})", display_code(.code))]
pub struct StorageFailure {
    pub kind: FailureKind,
    pub code: Option<i64>,
    pub message: String,
}

fn display_code(code: &Option<i64>) -> String {
    code.map_or_else(|| "none".to_string(), |code| code.to_string())
}

impl StorageFailure {
    pub fn database(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Database,
            code,
            message: message.into(),
        }
    }

    pub fn no_rows(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::NoRows,
            code: None,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Connection,
            code: None,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Other,
            code: None,
            message: message.into(),
        }
    }
}

/// Unexpected storage-layer failures.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum InfraError {
    #[error("unhandled constraint {}: {failure}", .constraint.as_deref().unwrap_or("<unnamed>"))]
    UnknownConstraint {
        constraint: Option<String>,
        #[source]
        failure: StorageFailure,
    },
    #[error("constraint {constraint} violated ({side}), the schema should prevent this: {failure}")]
    UnexpectedConstraint {
        constraint: &'static str,
        side: ViolationSide,
        #[source]
        failure: StorageFailure,
    },
    #[error("SQL syntax error: {0}")]
    Syntax(#[source] StorageFailure),
    #[error("storage connection failure: {0}")]
    Connection(#[source] StorageFailure),
    #[error("failed to begin unit of work: {0}")]
    Begin(#[source] StorageFailure),
    #[error("failed to commit unit of work: {0}")]
    Commit(#[source] StorageFailure),
    #[error("failed to roll back unit of work: {0}")]
    Rollback(#[source] StorageFailure),
    #[error("invalid stored value: {0}")]
    Decode(String),
    #[error("unknown storage error: {0}")]
    Unknown(#[source] StorageFailure),
}

/// Error returned by every ledger operation.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infrastructure(#[from] InfraError),
    /// The unit of work failed and the rollback failed as well.
    #[error("{original} (rollback failed: {rollback})")]
    RollbackFailed {
        #[source]
        original: Box<LedgerError>,
        rollback: InfraError,
    },
}

impl LedgerError {
    /// The domain classification of this error, if it has one.
    ///
    /// A failed rollback is classified by the error that caused it.
    #[must_use]
    pub fn domain(&self) -> Option<DomainError> {
        match self {
            Self::Domain(err) => Some(*err),
            Self::Infrastructure(_) => None,
            Self::RollbackFailed { original, .. } => original.domain(),
        }
    }

    #[must_use]
    pub fn is_domain(&self) -> bool {
        self.domain().is_some()
    }

    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        !self.is_domain()
    }

    /// Replace the domain error `from` with `to`, leaving everything else as is.
    #[must_use]
    pub fn reclassify(self, from: DomainError, to: DomainError) -> Self {
        match self {
            Self::Domain(err) if err == from => Self::Domain(to),
            other => other,
        }
    }

    /// Shorthand for reclassifying [`DomainError::RecordNotFound`].
    #[must_use]
    pub fn not_found_as(self, to: DomainError) -> Self {
        self.reclassify(DomainError::RecordNotFound, to)
    }
}

impl From<DbErr> for LedgerError {
    fn from(value: DbErr) -> Self {
        crate::translate::translate(&value)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoRows => "no rows",
            Self::Database => "database",
            Self::Connection => "connection",
            Self::Other => "other",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_failure_keeps_original_classification() {
        let err = LedgerError::RollbackFailed {
            original: Box::new(DomainError::InsufficientBalance.into()),
            rollback: InfraError::Rollback(StorageFailure::connection("pool closed")),
        };

        assert_eq!(err.domain(), Some(DomainError::InsufficientBalance));
        assert!(err.is_domain());
        assert!(err.to_string().contains("insufficient balance"));
        assert!(err.to_string().contains("pool closed"));
    }

    #[test]
    fn rollback_failure_of_infra_error_stays_infra() {
        let err = LedgerError::RollbackFailed {
            original: Box::new(InfraError::Unknown(StorageFailure::other("boom")).into()),
            rollback: InfraError::Rollback(StorageFailure::other("also boom")),
        };

        assert!(err.is_infrastructure());
    }

    #[test]
    fn not_found_is_reclassified_only_when_matching() {
        let not_found = LedgerError::from(DomainError::RecordNotFound);
        assert_eq!(
            not_found.not_found_as(DomainError::AccountNotFound).domain(),
            Some(DomainError::AccountNotFound)
        );

        let inactive = LedgerError::from(DomainError::AccountInactive);
        assert_eq!(
            inactive.not_found_as(DomainError::CategoryNotFound).domain(),
            Some(DomainError::AccountInactive)
        );
    }
}
