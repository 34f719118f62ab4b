//! Translation of storage failures into the ledger error taxonomy.
//!
//! [`translate`] is total: every input maps to some typed [`LedgerError`],
//! it never panics. Foreign-key failures are resolved through the
//! [`constraints`](crate::constraints) registry by constraint name; every
//! other coded failure goes through a fixed code table. Codes of both MySQL
//! and SQLite (extended result codes) are understood.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DbErr, RuntimeErr};

use crate::{
    constraints::{self, Violation, ViolationSide},
    error::{DomainError, FailureKind, InfraError, LedgerError, StorageFailure},
};

/// Prefix MySQL uses for child-side foreign-key failures. The schema guards
/// raise the same text on SQLite.
const CHILD_ROW_PREFIX: &str = "Cannot add or update a child row";
const PARENT_ROW_PREFIX: &str = "Cannot delete or update a parent row";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CodeClass {
    /// Foreign-key failure. `None` when the direction must be read from the
    /// message (SQLite reports both directions with the same code).
    ForeignKey(Option<ViolationSide>),
    Domain(DomainError),
    Syntax,
}

static CODES: Lazy<HashMap<i64, CodeClass>> = Lazy::new(|| {
    use CodeClass::{Domain, ForeignKey, Syntax};
    use DomainError as E;
    use ViolationSide::{ParentMissing, StillReferenced};

    HashMap::from([
        // MySQL
        (1216, ForeignKey(Some(ParentMissing))),
        (1452, ForeignKey(Some(ParentMissing))),
        (1217, ForeignKey(Some(StillReferenced))),
        (1451, ForeignKey(Some(StillReferenced))),
        (1062, Domain(E::DuplicateKey)),
        (1586, Domain(E::DuplicateKey)),
        (1048, Domain(E::NotNullViolation)),
        (1406, Domain(E::DataTooLong)),
        (1264, Domain(E::DataOutOfRange)),
        (1265, Domain(E::DataTruncated)),
        (3819, Domain(E::ConstraintViolation)),
        (4025, Domain(E::ConstraintViolation)),
        (1064, Syntax),
        (1205, Domain(E::ConcurrentUpdate)),
        (1213, Domain(E::ConcurrentUpdate)),
        // SQLite extended result codes
        (787, ForeignKey(None)),
        (1811, ForeignKey(None)),
        (2067, Domain(E::DuplicateKey)),
        (1555, Domain(E::DuplicateKey)),
        (1299, Domain(E::NotNullViolation)),
        (18, Domain(E::DataTooLong)),
        (275, Domain(E::ConstraintViolation)),
        (19, Domain(E::ConstraintViolation)),
        (5, Domain(E::ConcurrentUpdate)),
        (517, Domain(E::ConcurrentUpdate)),
        (6, Domain(E::ConcurrentUpdate)),
        (262, Domain(E::ConcurrentUpdate)),
    ])
});

static CONSTRAINT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"CONSTRAINT\s+[`"']([^`"']+)[`"']"#).expect("constraint name pattern to compile")
});

/// Translate a sea-orm error.
pub fn translate(err: &DbErr) -> LedgerError {
    tracing::debug!(error = ?err, "translating storage error");
    translate_failure(StorageFailure::from(err))
}

/// Translate an already extracted [`StorageFailure`].
pub fn translate_failure(failure: StorageFailure) -> LedgerError {
    let translated = match failure.kind {
        FailureKind::NoRows => DomainError::RecordNotFound.into(),
        FailureKind::Connection => InfraError::Connection(failure).into(),
        FailureKind::Database | FailureKind::Other => classify(failure),
    };

    if let LedgerError::Infrastructure(err) = &translated {
        tracing::error!("storage failure: {err}");
    }
    translated
}

fn classify(failure: StorageFailure) -> LedgerError {
    let class = failure.code.and_then(|code| CODES.get(&code).copied());
    match class {
        Some(CodeClass::ForeignKey(side)) => foreign_key(failure, side),
        Some(CodeClass::Domain(err)) => err.into(),
        Some(CodeClass::Syntax) => InfraError::Syntax(failure).into(),
        None => InfraError::Unknown(failure).into(),
    }
}

fn foreign_key(failure: StorageFailure, side: Option<ViolationSide>) -> LedgerError {
    let name = constraint_name(&failure.message);
    let side = side.or_else(|| side_from_message(&failure.message));

    let (Some(name), Some(side)) = (name, side) else {
        return InfraError::UnknownConstraint {
            constraint: name.map(str::to_string),
            failure,
        }
        .into();
    };

    match constraints::lookup(name) {
        Some(rule) => match rule.violation(side) {
            Violation::Domain(err) => err.into(),
            Violation::Unreachable => InfraError::UnexpectedConstraint {
                constraint: rule.name,
                side,
                failure,
            }
            .into(),
        },
        None => InfraError::UnknownConstraint {
            constraint: Some(name.to_string()),
            failure,
        }
        .into(),
    }
}

/// Extract the quoted identifier following `CONSTRAINT`.
fn constraint_name(message: &str) -> Option<&str> {
    CONSTRAINT_NAME
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn side_from_message(message: &str) -> Option<ViolationSide> {
    let message = message.trim_start();
    if message.starts_with(CHILD_ROW_PREFIX) {
        Some(ViolationSide::ParentMissing)
    } else if message.starts_with(PARENT_ROW_PREFIX) {
        Some(ViolationSide::StillReferenced)
    } else {
        None
    }
}

impl From<&DbErr> for StorageFailure {
    fn from(err: &DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(message) => StorageFailure::no_rows(message.clone()),
            DbErr::RecordNotUpdated => StorageFailure::no_rows("no row updated"),
            DbErr::ConnectionAcquire(_) => StorageFailure::connection(err.to_string()),
            DbErr::Conn(RuntimeErr::SqlxError(sqlx_err))
            | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err))
            | DbErr::Query(RuntimeErr::SqlxError(sqlx_err)) => from_sqlx(sqlx_err),
            DbErr::Conn(_) => StorageFailure::connection(err.to_string()),
            other => StorageFailure::other(other.to_string()),
        }
    }
}

fn from_sqlx(err: &sea_orm::sqlx::Error) -> StorageFailure {
    use sea_orm::sqlx::Error;

    match err {
        Error::RowNotFound => StorageFailure::no_rows(err.to_string()),
        Error::Database(db) => StorageFailure::database(
            db.code().and_then(|code| code.parse().ok()),
            db.message(),
        ),
        Error::PoolTimedOut | Error::PoolClosed | Error::Io(_) => {
            StorageFailure::connection(err.to_string())
        }
        other => StorageFailure::other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk_insert_mysql(constraint: &str) -> StorageFailure {
        StorageFailure::database(
            Some(1452),
            format!(
                "Cannot add or update a child row: a foreign key constraint fails \
                 (`household`.`expenditures`, CONSTRAINT `{constraint}` FOREIGN KEY \
                 (`category_id`) REFERENCES `categories` (`id`))"
            ),
        )
    }

    fn fk_delete_mysql(constraint: &str) -> StorageFailure {
        StorageFailure::database(
            Some(1451),
            format!(
                "Cannot delete or update a parent row: a foreign key constraint fails \
                 (`household`.`expenditures`, CONSTRAINT `{constraint}` FOREIGN KEY \
                 (`category_id`) REFERENCES `categories` (`id`))"
            ),
        )
    }

    fn guard_trigger(prefix: &str, constraint: &str) -> StorageFailure {
        StorageFailure::database(
            Some(1811),
            format!("{prefix}: a foreign key constraint fails (CONSTRAINT `{constraint}`)"),
        )
    }

    #[test]
    fn no_rows_is_record_not_found() {
        let err = translate_failure(StorageFailure::no_rows("nothing"));
        assert_eq!(err, LedgerError::Domain(DomainError::RecordNotFound));

        let err = translate(&DbErr::RecordNotFound("accounts".to_string()));
        assert_eq!(err.domain(), Some(DomainError::RecordNotFound));
    }

    #[test]
    fn record_not_updated_is_record_not_found() {
        let err = translate(&DbErr::RecordNotUpdated);
        assert_eq!(err.domain(), Some(DomainError::RecordNotFound));
    }

    #[test]
    fn every_registered_constraint_maps_both_directions() {
        for rule in constraints::CONSTRAINTS {
            for (failure, side) in [
                (fk_insert_mysql(rule.name), ViolationSide::ParentMissing),
                (fk_delete_mysql(rule.name), ViolationSide::StillReferenced),
                (
                    guard_trigger(CHILD_ROW_PREFIX, rule.name),
                    ViolationSide::ParentMissing,
                ),
                (
                    guard_trigger(PARENT_ROW_PREFIX, rule.name),
                    ViolationSide::StillReferenced,
                ),
            ] {
                let err = translate_failure(failure);
                match rule.violation(side) {
                    Violation::Domain(expected) => {
                        assert_eq!(err.domain(), Some(expected), "{} {side}", rule.name)
                    }
                    Violation::Unreachable => assert!(
                        matches!(
                            err,
                            LedgerError::Infrastructure(InfraError::UnexpectedConstraint {
                                constraint,
                                side: actual,
                                ..
                            }) if constraint == rule.name && actual == side
                        ),
                        "{} {side}: {err:?}",
                        rule.name
                    ),
                }
            }
        }
    }

    #[test]
    fn category_in_use_by_expenditure_is_specific() {
        let err = translate_failure(fk_delete_mysql("fk_expenditures_category_id"));
        assert_eq!(err.domain(), Some(DomainError::CategoryInUseByExpenditure));
    }

    #[test]
    fn unknown_constraint_surfaces_as_infra_error() {
        let err = translate_failure(fk_insert_mysql("fk_brand_new"));
        assert_eq!(
            err,
            LedgerError::Infrastructure(InfraError::UnknownConstraint {
                constraint: Some("fk_brand_new".to_string()),
                failure: fk_insert_mysql("fk_brand_new"),
            })
        );
    }

    #[test]
    fn native_sqlite_foreign_key_without_name_is_unknown_constraint() {
        let failure = StorageFailure::database(Some(787), "FOREIGN KEY constraint failed");
        let err = translate_failure(failure);
        assert!(matches!(
            err,
            LedgerError::Infrastructure(InfraError::UnknownConstraint {
                constraint: None,
                ..
            })
        ));
    }

    #[test]
    fn foreign_key_without_direction_is_unknown_constraint() {
        let failure = StorageFailure::database(
            Some(1811),
            "something odd (CONSTRAINT `fk_expenditures_category_id`)",
        );
        assert!(matches!(
            translate_failure(failure),
            LedgerError::Infrastructure(InfraError::UnknownConstraint { constraint: Some(name), .. })
                if name == "fk_expenditures_category_id"
        ));
    }

    #[test]
    fn code_table_maps_to_domain_errors() {
        let cases = [
            (1062, DomainError::DuplicateKey),
            (2067, DomainError::DuplicateKey),
            (1555, DomainError::DuplicateKey),
            (1048, DomainError::NotNullViolation),
            (1299, DomainError::NotNullViolation),
            (1406, DomainError::DataTooLong),
            (1264, DomainError::DataOutOfRange),
            (1265, DomainError::DataTruncated),
            (3819, DomainError::ConstraintViolation),
            (275, DomainError::ConstraintViolation),
        ];
        for (code, expected) in cases {
            let err = translate_failure(StorageFailure::database(Some(code), "failed"));
            assert_eq!(err.domain(), Some(expected), "code {code}");
        }
    }

    #[test]
    fn busy_and_lock_codes_are_concurrent_updates() {
        let cases = [
            (5, "database is locked"),
            (517, "database is locked"),
            (6, "database table is locked"),
            (262, "database table is locked"),
            (1205, "Lock wait timeout exceeded; try restarting transaction"),
            (1213, "Deadlock found when trying to get lock; try restarting transaction"),
        ];
        for (code, message) in cases {
            let err = translate_failure(StorageFailure::database(Some(code), message));
            assert_eq!(err.domain(), Some(DomainError::ConcurrentUpdate), "code {code}");
        }
    }

    #[test]
    fn syntax_error_is_infra() {
        let failure = StorageFailure::database(Some(1064), "You have an error in your SQL syntax");
        assert_eq!(
            translate_failure(failure.clone()),
            LedgerError::Infrastructure(InfraError::Syntax(failure))
        );
    }

    #[test]
    fn unrecognized_codes_are_unknown_infra_errors() {
        for code in [-1, 0, 1, 999, 40001, i64::MAX] {
            let failure = StorageFailure::database(Some(code), "whatever");
            assert_eq!(
                translate_failure(failure.clone()),
                LedgerError::Infrastructure(InfraError::Unknown(failure)),
                "code {code}"
            );
        }
    }

    #[test]
    fn missing_code_is_unknown_infra_error() {
        let failure = StorageFailure::database(None, "no code at all");
        assert!(matches!(
            translate_failure(failure),
            LedgerError::Infrastructure(InfraError::Unknown(_))
        ));
    }

    #[test]
    fn connection_failure_is_infra() {
        let err = translate(&DbErr::Custom("x".to_string()));
        assert!(err.is_infrastructure());

        let err = translate_failure(StorageFailure::connection("pool timed out"));
        assert!(matches!(
            err,
            LedgerError::Infrastructure(InfraError::Connection(_))
        ));
    }

    #[test]
    fn constraint_name_accepts_backticks_and_double_quotes() {
        assert_eq!(
            constraint_name("... CONSTRAINT `fk_a` FOREIGN KEY"),
            Some("fk_a")
        );
        assert_eq!(
            constraint_name("violates foreign key CONSTRAINT \"fk_b\" on table"),
            Some("fk_b")
        );
        assert_eq!(constraint_name("FOREIGN KEY constraint failed"), None);
    }
}
