use std::collections::BTreeSet;

use ledger::{Violation, constraints::CONSTRAINTS};
use migration::{FOREIGN_KEYS, OnDelete};

#[test]
fn registry_and_schema_name_the_same_keys() {
    let registered: BTreeSet<_> = CONSTRAINTS.iter().map(|rule| rule.name).collect();
    let migrated: BTreeSet<_> = FOREIGN_KEYS.iter().map(|key| key.name).collect();

    assert_eq!(registered, migrated);
}

#[test]
fn registry_and_schema_agree_on_columns() {
    for key in FOREIGN_KEYS {
        let rule = ledger::constraints::lookup(key.name).unwrap();
        assert_eq!(
            rule.child,
            format!("{}.{}", key.child_table, key.child_column),
            "{}",
            key.name
        );
        assert_eq!(
            rule.parent,
            format!("{}.{}", key.parent_table, key.parent_column),
            "{}",
            key.name
        );
    }
}

#[test]
fn only_restricting_keys_can_block_a_delete() {
    for key in FOREIGN_KEYS {
        let rule = ledger::constraints::lookup(key.name).unwrap();
        if key.on_delete != OnDelete::Restrict {
            assert_eq!(rule.on_delete, Violation::Unreachable, "{}", key.name);
        }
    }
}
