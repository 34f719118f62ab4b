//! Registry of the named foreign keys guarded by the schema.
//!
//! Every foreign key the ledger writes through has an entry here, with the
//! domain error produced when the key is violated from the child side (the
//! parent row is missing) and from the parent side (the parent is still
//! referenced). The translator looks the entries up by constraint name, so
//! "which relationship blocked this delete" never depends on message text.
//!
//! The table is immutable and built once, so it is shared freely between
//! concurrent requests.
//!
//! Bump [`REGISTRY_VERSION`] whenever an entry is added, removed or renamed;
//! the migration crate exports the same list of names.
use core::fmt;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::DomainError;

pub const REGISTRY_VERSION: u32 = 1;

/// Direction of a foreign-key violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSide {
    /// Insert or update of a child row whose parent does not exist.
    ParentMissing,
    /// Delete or update of a parent row that children still reference.
    StillReferenced,
}

impl fmt::Display for ViolationSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ParentMissing => "parent missing",
            Self::StillReferenced => "still referenced",
        })
    }
}

/// What a violation resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Violation {
    Domain(DomainError),
    /// The schema makes this direction impossible (cascade, set null, or a
    /// parent table that is never deleted from). Still resolves to a typed
    /// infrastructure error if it ever happens.
    Unreachable,
}

#[derive(Clone, Copy, Debug)]
pub struct ConstraintRule {
    pub name: &'static str,
    /// `table.column` holding the reference.
    pub child: &'static str,
    /// `table.column` being referenced.
    pub parent: &'static str,
    pub on_insert: Violation,
    pub on_delete: Violation,
}

impl ConstraintRule {
    #[must_use]
    pub fn violation(&self, side: ViolationSide) -> Violation {
        match side {
            ViolationSide::ParentMissing => self.on_insert,
            ViolationSide::StillReferenced => self.on_delete,
        }
    }
}

const fn rule(
    name: &'static str,
    child: &'static str,
    parent: &'static str,
    on_insert: Violation,
    on_delete: Violation,
) -> ConstraintRule {
    ConstraintRule {
        name,
        child,
        parent,
        on_insert,
        on_delete,
    }
}

use DomainError as E;
use Violation::{Domain, Unreachable};

pub static CONSTRAINTS: &[ConstraintRule] = &[
    rule(
        "fk_accounts_owner_id",
        "accounts.owner_id",
        "household_members.id",
        Domain(E::HouseholdMemberNotFound),
        // ON DELETE SET NULL
        Unreachable,
    ),
    rule(
        "fk_accounts_currency",
        "accounts.currency",
        "currencies.code",
        Domain(E::CurrencyNotFound),
        // currencies are reference data and never deleted
        Unreachable,
    ),
    rule(
        "fk_transactions_account_id",
        "transactions.account_id",
        "accounts.id",
        Domain(E::AccountNotFound),
        Domain(E::AccountHasTransactions),
    ),
    rule(
        "fk_transactions_currency",
        "transactions.currency",
        "currencies.code",
        Domain(E::CurrencyNotFound),
        Unreachable,
    ),
    rule(
        "fk_expenditures_category_id",
        "expenditures.category_id",
        "categories.id",
        Domain(E::CategoryNotFound),
        Domain(E::CategoryInUseByExpenditure),
    ),
    rule(
        "fk_expenditures_transaction_id",
        "expenditures.transaction_id",
        "transactions.id",
        Domain(E::TransactionNotFound),
        Domain(E::TransactionInUse),
    ),
    rule(
        "fk_ingresses_category_id",
        "ingresses.category_id",
        "categories.id",
        Domain(E::CategoryNotFound),
        Domain(E::CategoryInUseByIngress),
    ),
    rule(
        "fk_ingresses_transaction_id",
        "ingresses.transaction_id",
        "transactions.id",
        Domain(E::TransactionNotFound),
        Domain(E::TransactionInUse),
    ),
    rule(
        "fk_transfers_category_id",
        "transfers.category_id",
        "categories.id",
        Domain(E::CategoryNotFound),
        Domain(E::CategoryInUseByTransfer),
    ),
    rule(
        "fk_transfers_source_transaction_id",
        "transfers.source_transaction_id",
        "transactions.id",
        Domain(E::TransactionNotFound),
        Domain(E::TransactionInUse),
    ),
    rule(
        "fk_transfers_destination_transaction_id",
        "transfers.destination_transaction_id",
        "transactions.id",
        Domain(E::TransactionNotFound),
        Domain(E::TransactionInUse),
    ),
    rule(
        "fk_savings_goals_category_id",
        "savings_goals.category_id",
        "categories.id",
        Domain(E::CategoryNotFound),
        Domain(E::CategoryInUseBySavingsGoal),
    ),
    rule(
        "fk_savings_goals_currency",
        "savings_goals.currency",
        "currencies.code",
        Domain(E::CurrencyNotFound),
        Unreachable,
    ),
    rule(
        "fk_expenditure_tags_expenditure_id",
        "expenditure_tags.expenditure_id",
        "expenditures.id",
        Domain(E::ExpenditureNotFound),
        // ON DELETE CASCADE
        Unreachable,
    ),
    rule(
        "fk_expenditure_tags_tag_id",
        "expenditure_tags.tag_id",
        "tags.id",
        Domain(E::TagNotFound),
        Domain(E::TagInUse),
    ),
    rule(
        "fk_ingress_tags_ingress_id",
        "ingress_tags.ingress_id",
        "ingresses.id",
        Domain(E::IngressNotFound),
        // ON DELETE CASCADE
        Unreachable,
    ),
    rule(
        "fk_ingress_tags_tag_id",
        "ingress_tags.tag_id",
        "tags.id",
        Domain(E::TagNotFound),
        Domain(E::TagInUse),
    ),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static ConstraintRule>> =
    Lazy::new(|| CONSTRAINTS.iter().map(|rule| (rule.name, rule)).collect());

/// Find the rule registered for `name`.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static ConstraintRule> {
    BY_NAME.get(name).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Expected mapping, written out independently of `CONSTRAINTS`.
    const EXPECTED: &[(&str, Violation, Violation)] = &[
        ("fk_accounts_owner_id", Domain(E::HouseholdMemberNotFound), Unreachable),
        ("fk_accounts_currency", Domain(E::CurrencyNotFound), Unreachable),
        (
            "fk_transactions_account_id",
            Domain(E::AccountNotFound),
            Domain(E::AccountHasTransactions),
        ),
        ("fk_transactions_currency", Domain(E::CurrencyNotFound), Unreachable),
        (
            "fk_expenditures_category_id",
            Domain(E::CategoryNotFound),
            Domain(E::CategoryInUseByExpenditure),
        ),
        (
            "fk_expenditures_transaction_id",
            Domain(E::TransactionNotFound),
            Domain(E::TransactionInUse),
        ),
        (
            "fk_ingresses_category_id",
            Domain(E::CategoryNotFound),
            Domain(E::CategoryInUseByIngress),
        ),
        (
            "fk_ingresses_transaction_id",
            Domain(E::TransactionNotFound),
            Domain(E::TransactionInUse),
        ),
        (
            "fk_transfers_category_id",
            Domain(E::CategoryNotFound),
            Domain(E::CategoryInUseByTransfer),
        ),
        (
            "fk_transfers_source_transaction_id",
            Domain(E::TransactionNotFound),
            Domain(E::TransactionInUse),
        ),
        (
            "fk_transfers_destination_transaction_id",
            Domain(E::TransactionNotFound),
            Domain(E::TransactionInUse),
        ),
        (
            "fk_savings_goals_category_id",
            Domain(E::CategoryNotFound),
            Domain(E::CategoryInUseBySavingsGoal),
        ),
        ("fk_savings_goals_currency", Domain(E::CurrencyNotFound), Unreachable),
        (
            "fk_expenditure_tags_expenditure_id",
            Domain(E::ExpenditureNotFound),
            Unreachable,
        ),
        ("fk_expenditure_tags_tag_id", Domain(E::TagNotFound), Domain(E::TagInUse)),
        ("fk_ingress_tags_ingress_id", Domain(E::IngressNotFound), Unreachable),
        ("fk_ingress_tags_tag_id", Domain(E::TagNotFound), Domain(E::TagInUse)),
    ];

    #[test]
    fn every_entry_maps_both_directions() {
        assert_eq!(CONSTRAINTS.len(), EXPECTED.len());
        for (name, on_insert, on_delete) in EXPECTED {
            let rule = lookup(name).unwrap_or_else(|| panic!("{name} not registered"));
            assert_eq!(
                rule.violation(ViolationSide::ParentMissing),
                *on_insert,
                "{name} insert"
            );
            assert_eq!(
                rule.violation(ViolationSide::StillReferenced),
                *on_delete,
                "{name} delete"
            );
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = CONSTRAINTS.iter().map(|rule| rule.name).collect();
        assert_eq!(names.len(), CONSTRAINTS.len());
    }

    #[test]
    fn category_delete_violations_name_the_blocking_relationship() {
        let blocking: HashSet<_> = CONSTRAINTS
            .iter()
            .filter(|rule| rule.parent == "categories.id")
            .map(|rule| rule.on_delete)
            .collect();

        assert_eq!(blocking.len(), 4);
        assert!(!blocking.contains(&Unreachable));
    }

    #[test]
    fn unknown_name_is_not_registered() {
        assert!(lookup("fk_unknown").is_none());
    }
}
