use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;

use crate::DomainError;

/// ISO 4217 currency code, e.g. `EUR`.
///
/// Only the shape is checked here (three ASCII letters, stored upper case).
/// Whether the currency is known is decided by the `currencies` table: an
/// unknown code is rejected by the `fk_*_currency` foreign keys and surfaces as
/// [`DomainError::CurrencyNotFound`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    #[must_use]
    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::eur()
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency);
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

/// Reference data: currencies accounts and transactions may use.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub minor_units: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized_to_upper_case() {
        assert_eq!(Currency::try_from(" usd ").unwrap().code(), "USD");
    }

    #[test]
    fn malformed_codes_are_rejected() {
        for raw in ["", "EU", "EURO", "E1R", "€€€"] {
            assert_eq!(Currency::try_from(raw), Err(DomainError::InvalidCurrency), "{raw}");
        }
    }
}
