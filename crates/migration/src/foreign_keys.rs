//! Named foreign keys of the ledger schema and their guard triggers.
//!
//! SQLite reports a violated foreign key without naming it. Each key listed
//! here is therefore also enforced by `BEFORE` triggers that abort with the
//! MySQL wording, constraint name included:
//!
//! ```text
//! Cannot add or update a child row: a foreign key constraint fails (CONSTRAINT `fk_x` ...)
//! Cannot delete or update a parent row: a foreign key constraint fails (CONSTRAINT `fk_x` ...)
//! ```
//!
//! Child-side triggers guard inserts and updates of the referencing column.
//! Parent-side triggers guard deletes, only for `Restrict` keys: cascading and
//! set-null keys are left to SQLite.

/// What deleting a referenced parent row does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    Restrict,
    Cascade,
    SetNull,
}

#[derive(Clone, Copy, Debug)]
pub struct GuardedKey {
    pub name: &'static str,
    pub child_table: &'static str,
    pub child_column: &'static str,
    pub parent_table: &'static str,
    pub parent_column: &'static str,
    pub on_delete: OnDelete,
}

const fn key(
    name: &'static str,
    (child_table, child_column): (&'static str, &'static str),
    (parent_table, parent_column): (&'static str, &'static str),
    on_delete: OnDelete,
) -> GuardedKey {
    GuardedKey {
        name,
        child_table,
        child_column,
        parent_table,
        parent_column,
        on_delete,
    }
}

use OnDelete::{Cascade, Restrict, SetNull};

pub const FOREIGN_KEYS: &[GuardedKey] = &[
    key(
        "fk_accounts_owner_id",
        ("accounts", "owner_id"),
        ("household_members", "id"),
        SetNull,
    ),
    key(
        "fk_accounts_currency",
        ("accounts", "currency"),
        ("currencies", "code"),
        Restrict,
    ),
    key(
        "fk_transactions_account_id",
        ("transactions", "account_id"),
        ("accounts", "id"),
        Restrict,
    ),
    key(
        "fk_transactions_currency",
        ("transactions", "currency"),
        ("currencies", "code"),
        Restrict,
    ),
    key(
        "fk_expenditures_category_id",
        ("expenditures", "category_id"),
        ("categories", "id"),
        Restrict,
    ),
    key(
        "fk_expenditures_transaction_id",
        ("expenditures", "transaction_id"),
        ("transactions", "id"),
        Restrict,
    ),
    key(
        "fk_ingresses_category_id",
        ("ingresses", "category_id"),
        ("categories", "id"),
        Restrict,
    ),
    key(
        "fk_ingresses_transaction_id",
        ("ingresses", "transaction_id"),
        ("transactions", "id"),
        Restrict,
    ),
    key(
        "fk_transfers_category_id",
        ("transfers", "category_id"),
        ("categories", "id"),
        Restrict,
    ),
    key(
        "fk_transfers_source_transaction_id",
        ("transfers", "source_transaction_id"),
        ("transactions", "id"),
        Restrict,
    ),
    key(
        "fk_transfers_destination_transaction_id",
        ("transfers", "destination_transaction_id"),
        ("transactions", "id"),
        Restrict,
    ),
    key(
        "fk_savings_goals_category_id",
        ("savings_goals", "category_id"),
        ("categories", "id"),
        Restrict,
    ),
    key(
        "fk_savings_goals_currency",
        ("savings_goals", "currency"),
        ("currencies", "code"),
        Restrict,
    ),
    key(
        "fk_expenditure_tags_expenditure_id",
        ("expenditure_tags", "expenditure_id"),
        ("expenditures", "id"),
        Cascade,
    ),
    key(
        "fk_expenditure_tags_tag_id",
        ("expenditure_tags", "tag_id"),
        ("tags", "id"),
        Restrict,
    ),
    key(
        "fk_ingress_tags_ingress_id",
        ("ingress_tags", "ingress_id"),
        ("ingresses", "id"),
        Cascade,
    ),
    key(
        "fk_ingress_tags_tag_id",
        ("ingress_tags", "tag_id"),
        ("tags", "id"),
        Restrict,
    ),
];

impl GuardedKey {
    fn reference(&self) -> String {
        format!(
            "(CONSTRAINT `{}` FOREIGN KEY (`{}`) REFERENCES `{}` (`{}`))",
            self.name, self.child_column, self.parent_table, self.parent_column
        )
    }

    fn child_missing_parent(&self) -> String {
        format!(
            "NEW.{col} IS NOT NULL AND NOT EXISTS (SELECT 1 FROM {parent} WHERE {pcol} = NEW.{col})",
            col = self.child_column,
            parent = self.parent_table,
            pcol = self.parent_column,
        )
    }

    /// Names of the triggers created for this key.
    pub fn trigger_names(&self) -> Vec<String> {
        let mut names = vec![
            format!("guard_{}_insert", self.name),
            format!("guard_{}_update", self.name),
        ];
        if self.on_delete == OnDelete::Restrict {
            names.push(format!("guard_{}_delete", self.name));
        }
        names
    }

    /// `CREATE TRIGGER` statements enforcing this key by name.
    pub fn create_triggers(&self) -> Vec<String> {
        let insert_message = format!(
            "Cannot add or update a child row: a foreign key constraint fails {}",
            self.reference()
        );
        let mut statements = vec![
            format!(
                "CREATE TRIGGER IF NOT EXISTS guard_{name}_insert BEFORE INSERT ON {child} \
                 FOR EACH ROW WHEN {cond} BEGIN SELECT RAISE(ABORT, '{msg}'); END;",
                name = self.name,
                child = self.child_table,
                cond = self.child_missing_parent(),
                msg = insert_message,
            ),
            format!(
                "CREATE TRIGGER IF NOT EXISTS guard_{name}_update BEFORE UPDATE OF {col} ON {child} \
                 FOR EACH ROW WHEN {cond} BEGIN SELECT RAISE(ABORT, '{msg}'); END;",
                name = self.name,
                col = self.child_column,
                child = self.child_table,
                cond = self.child_missing_parent(),
                msg = insert_message,
            ),
        ];

        if self.on_delete == OnDelete::Restrict {
            statements.push(format!(
                "CREATE TRIGGER IF NOT EXISTS guard_{name}_delete BEFORE DELETE ON {parent} \
                 FOR EACH ROW WHEN EXISTS (SELECT 1 FROM {child} WHERE {col} = OLD.{pcol}) \
                 BEGIN SELECT RAISE(ABORT, '{msg}'); END;",
                name = self.name,
                parent = self.parent_table,
                child = self.child_table,
                col = self.child_column,
                pcol = self.parent_column,
                msg = format!(
                    "Cannot delete or update a parent row: a foreign key constraint fails {}",
                    self.reference()
                ),
            ));
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = FOREIGN_KEYS.iter().map(|key| key.name).collect();
        assert_eq!(names.len(), FOREIGN_KEYS.len());
    }

    #[test]
    fn restrict_keys_get_a_delete_guard() {
        let key = FOREIGN_KEYS
            .iter()
            .find(|key| key.name == "fk_expenditures_category_id")
            .unwrap();
        let statements = key.create_triggers();

        assert_eq!(statements.len(), 3);
        assert!(statements[2].contains("BEFORE DELETE ON categories"));
        assert!(statements[2].contains(
            "'Cannot delete or update a parent row: a foreign key constraint fails \
             (CONSTRAINT `fk_expenditures_category_id`"
        ));
    }

    #[test]
    fn cascading_keys_only_guard_the_child() {
        let key = FOREIGN_KEYS
            .iter()
            .find(|key| key.name == "fk_expenditure_tags_expenditure_id")
            .unwrap();

        assert_eq!(key.create_triggers().len(), 2);
        assert_eq!(key.trigger_names().len(), 2);
    }
}
