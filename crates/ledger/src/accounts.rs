//! The module contains the `Account` struct, its balance operations and its
//! storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, DomainError, LedgerError, Money,
    activity::impl_activity,
    util::{decode, normalize_display, parse_id},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Bank,
    Cash,
    Crypto,
    Investment,
    Other,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Crypto => "crypto",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for AccountType {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bank" => Ok(Self::Bank),
            "cash" => Ok(Self::Cash),
            "crypto" => Ok(Self::Crypto),
            "investment" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::UnknownAccountType),
        }
    }
}

/// A place where money is kept: a bank account, a wallet, a broker.
///
/// `current_balance` only moves through [`Account::debit`] and
/// [`Account::credit`], and every call is paired with a transaction record
/// written in the same unit of work. It therefore always equals
/// `initial_balance` plus the signed sum of the completed transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub account_type: AccountType,
    pub currency: Currency,
    pub initial_balance: Money,
    pub current_balance: Money,
    pub active: bool,
    pub owner_id: Option<Uuid>,
    /// Optimistic concurrency token, bumped by every stored update.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: &str,
        account_type: AccountType,
        currency: Currency,
        initial_balance: Money,
        owner_id: Option<Uuid>,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = normalize_display(name).ok_or(DomainError::AccountNameEmpty)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            account_type,
            currency,
            initial_balance,
            current_balance: initial_balance,
            active,
            owner_id,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// `true` when `amount` can be taken out without going below zero.
    #[must_use]
    pub fn has_sufficient_balance(&self, amount: Money) -> bool {
        self.current_balance >= amount
    }

    /// Take `amount` out of the account.
    ///
    /// Does not check the balance: call [`Account::has_sufficient_balance`]
    /// first.
    pub fn debit(&mut self, amount: Money) {
        self.current_balance -= amount;
    }

    /// Put `amount` into the account. The balance is left untouched on
    /// [`DomainError::BalanceOverflow`].
    pub fn credit(&mut self, amount: Money) -> Result<(), DomainError> {
        self.current_balance = self
            .current_balance
            .checked_add(amount)
            .ok_or(DomainError::BalanceOverflow)?;
        Ok(())
    }

    pub fn rename(&mut self, name: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.name = normalize_display(name).ok_or(DomainError::AccountNameEmpty)?;
        self.updated_at = now;
        Ok(())
    }
}

impl_activity!(
    Account,
    DomainError::AccountAlreadyActive,
    DomainError::AccountAlreadyInactive
);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub initial_balance: i64,
    pub current_balance: i64,
    pub active: bool,
    pub owner_id: Option<String>,
    pub version: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::household_members::Entity",
        from = "Column::OwnerId",
        to = "super::household_members::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Owner,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::household_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            account_type: ActiveValue::Set(value.account_type.as_str().to_string()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            initial_balance: ActiveValue::Set(value.initial_balance.minor()),
            current_balance: ActiveValue::Set(value.current_balance.minor()),
            active: ActiveValue::Set(value.active),
            owner_id: ActiveValue::Set(value.owner_id.map(|id| id.to_string())),
            version: ActiveValue::Set(value.version),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "accounts.id")?,
            account_type: decode(
                AccountType::try_from(model.account_type.as_str()),
                "accounts.account_type",
            )?,
            currency: decode(Currency::try_from(model.currency), "accounts.currency")?,
            owner_id: model
                .owner_id
                .as_deref()
                .map(|id| parse_id(id, "accounts.owner_id"))
                .transpose()?,
            name: model.name,
            initial_balance: Money::new(model.initial_balance),
            current_balance: Money::new(model.current_balance),
            active: model.active,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn account(balance: i64) -> Account {
        Account::new(
            "Checking",
            AccountType::Bank,
            Currency::eur(),
            Money::new(balance),
            None,
            true,
            at(0),
        )
        .unwrap()
    }

    #[test]
    fn new_account_starts_at_initial_balance() {
        let account = account(10_000);
        assert_eq!(account.current_balance, Money::new(10_000));
        assert_eq!(account.initial_balance, Money::new(10_000));
        assert_eq!(account.version, 0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Account::new(
            "   ",
            AccountType::Cash,
            Currency::eur(),
            Money::ZERO,
            None,
            true,
            at(0),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::AccountNameEmpty);
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let account = account(10_000);
        assert!(account.has_sufficient_balance(Money::new(10_000)));
        assert!(!account.has_sufficient_balance(Money::new(10_001)));
    }

    #[test]
    fn debit_then_credit_restores_balance() {
        let mut account = account(12_345);
        account.debit(Money::new(999));
        assert_eq!(account.current_balance, Money::new(11_346));
        account.credit(Money::new(999)).unwrap();
        assert_eq!(account.current_balance, Money::new(12_345));
    }

    #[test]
    fn credit_past_the_limit_overflows() {
        let mut account = account(i64::MAX - 10);
        assert_eq!(
            account.credit(Money::new(100)),
            Err(DomainError::BalanceOverflow)
        );
        assert_eq!(account.current_balance, Money::new(i64::MAX - 10));
    }

    #[test]
    fn debit_does_not_validate() {
        let mut account = account(100);
        account.debit(Money::new(250));
        assert_eq!(account.current_balance, Money::new(-150));
    }

    #[test]
    fn activity_transitions_are_strict() {
        let mut account = account(0);
        assert_eq!(account.activate(at(1)), Err(DomainError::AccountAlreadyActive));
        assert_eq!(account.updated_at, at(0));

        account.deactivate(at(2)).unwrap();
        assert!(!account.active);
        assert_eq!(account.updated_at, at(2));
        assert_eq!(
            account.deactivate(at(3)),
            Err(DomainError::AccountAlreadyInactive)
        );

        account.activate(at(4)).unwrap();
        assert!(account.active);
        assert_eq!(account.updated_at, at(4));
    }

    #[test]
    fn model_round_trip() {
        let mut account = account(500);
        account.owner_id = Some(Uuid::new_v4());
        let active: ActiveModel = (&account).into();
        let model = Model {
            id: active.id.unwrap(),
            name: active.name.unwrap(),
            account_type: active.account_type.unwrap(),
            currency: active.currency.unwrap(),
            initial_balance: active.initial_balance.unwrap(),
            current_balance: active.current_balance.unwrap(),
            active: active.active.unwrap(),
            owner_id: active.owner_id.unwrap(),
            version: active.version.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
        };

        assert_eq!(Account::try_from(model).unwrap(), account);
    }

    #[test]
    fn unknown_stored_type_is_a_decode_error() {
        let model = Model {
            id: Uuid::new_v4().to_string(),
            name: "x".to_string(),
            account_type: "piggy".to_string(),
            currency: "EUR".to_string(),
            initial_balance: 0,
            current_balance: 0,
            active: true,
            owner_id: None,
            version: 0,
            created_at: at(0),
            updated_at: at(0),
        };

        let err = Account::try_from(model).unwrap_err();
        assert!(err.is_infrastructure());
    }
}
