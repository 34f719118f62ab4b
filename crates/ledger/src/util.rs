//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! normalization and decoding so every entity enforces the same invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{DomainError, InfraError, LedgerError, ResultLedger};

/// Trim and collapse inner whitespace. `None` when nothing is left.
pub(crate) fn normalize_display(input: &str) -> Option<String> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Comparison key for names: NFKD, combining marks stripped, lower case,
/// whitespace collapsed. Symbols are kept, so `"C++"` and `"C#"` differ.
/// `None` when nothing but marks and whitespace is left.
pub(crate) fn normalize_key(input: &str) -> Option<String> {
    let folded: String = input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect();
    normalize_display(&folded)
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value.and_then(normalize_display)
}

/// Map a parse failure of a stored value to an infrastructure error: rows
/// that do not decode mean the table holds data the ledger never wrote.
pub(crate) fn decode<T>(result: Result<T, DomainError>, column: &str) -> ResultLedger<T> {
    result.map_err(|err| {
        LedgerError::Infrastructure(InfraError::Decode(format!("{column}: {err}")))
    })
}

/// Parse an id column written by the ledger.
pub(crate) fn parse_id(value: &str, column: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(value).map_err(|_| {
        LedgerError::Infrastructure(InfraError::Decode(format!("{column}: invalid id {value}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(normalize_display("  Food   & drinks "), Some("Food & drinks".to_string()));
        assert_eq!(normalize_display(" \t "), None);
    }

    #[test]
    fn key_folds_case_and_accents() {
        assert_eq!(normalize_key("Café  Bar!"), Some("cafe bar!".to_string()));
        assert_eq!(normalize_key(" ÉTÉ "), Some("ete".to_string()));
        assert_eq!(normalize_key("\u{301}"), None);
    }

    #[test]
    fn key_keeps_symbols() {
        assert_eq!(normalize_key("C++"), Some("c++".to_string()));
        assert_eq!(normalize_key("C#"), Some("c#".to_string()));
        assert_eq!(normalize_key("🎉"), Some("🎉".to_string()));
        assert_eq!(normalize_key("--"), Some("--".to_string()));
    }
}
