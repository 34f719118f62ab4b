//! Transaction records.
//!
//! A `Transaction` is the audit record of one balance movement on one account.
//! It is immutable once written, apart from its [`TransactionStatus`].

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, DomainError, LedgerError, Money,
    util::{decode, parse_id},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Expenditure,
    Ingress,
    Transfer,
    SavingsContribution,
    SavingsWithdrawal,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expenditure => "expenditure",
            Self::Ingress => "ingress",
            Self::Transfer => "transfer",
            Self::SavingsContribution => "savings_contribution",
            Self::SavingsWithdrawal => "savings_withdrawal",
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expenditure" => Ok(Self::Expenditure),
            "ingress" => Ok(Self::Ingress),
            "transfer" => Ok(Self::Transfer),
            "savings_contribution" => Ok(Self::SavingsContribution),
            "savings_withdrawal" => Ok(Self::SavingsWithdrawal),
            _ => Err(DomainError::UnknownTransactionType),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only a pending transaction can settle; settled states are final.
    #[must_use]
    pub fn can_become(self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Completed | Self::Failed | Self::Cancelled
            )
        )
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::UnknownTransactionStatus),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Signed: negative takes money out of the account.
    pub amount: Money,
    pub currency: Currency,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub transaction_type: TransactionType,
    /// Account balance right after this transaction was applied.
    pub balance_after: Money,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: Uuid,
        amount: Money,
        currency: Currency,
        date: DateTime<Utc>,
        description: Option<String>,
        transaction_type: TransactionType,
        balance_after: Money,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            currency,
            date,
            description,
            transaction_type,
            balance_after,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition(
        &mut self,
        next: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !self.status.can_become(next) {
            return Err(DomainError::InvalidStatusTransition);
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub currency: String,
    pub date: DateTimeUtc,
    pub description: Option<String>,
    pub transaction_type: String,
    pub balance_after: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Account,
    #[sea_orm(has_one = "super::expenditures::Entity")]
    Expenditure,
    #[sea_orm(has_one = "super::ingresses::Entity")]
    Ingress,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::expenditures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenditure.def()
    }
}

impl Related<super::ingresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            amount: ActiveValue::Set(tx.amount.minor()),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            date: ActiveValue::Set(tx.date),
            description: ActiveValue::Set(tx.description.clone()),
            transaction_type: ActiveValue::Set(tx.transaction_type.as_str().to_string()),
            balance_after: ActiveValue::Set(tx.balance_after.minor()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "transactions.id")?,
            account_id: parse_id(&model.account_id, "transactions.account_id")?,
            currency: decode(Currency::try_from(model.currency), "transactions.currency")?,
            transaction_type: decode(
                TransactionType::try_from(model.transaction_type.as_str()),
                "transactions.transaction_type",
            )?,
            status: decode(
                TransactionStatus::try_from(model.status.as_str()),
                "transactions.status",
            )?,
            amount: Money::new(model.amount),
            date: model.date,
            description: model.description,
            balance_after: Money::new(model.balance_after),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use TransactionStatus::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn pending() -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Money::new(-500),
            Currency::eur(),
            at(0),
            None,
            TransactionType::Expenditure,
            Money::new(1_000),
            Pending,
            at(0),
        )
    }

    #[test]
    fn pending_settles_once() {
        for next in [Completed, Failed, Cancelled] {
            let mut tx = pending();
            tx.transition(next, at(1)).unwrap();
            assert_eq!(tx.status, next);
            assert_eq!(tx.updated_at, at(1));

            for again in [Pending, Completed, Failed, Cancelled] {
                assert_eq!(
                    tx.transition(again, at(2)),
                    Err(DomainError::InvalidStatusTransition),
                    "{next:?} -> {again:?}"
                );
            }
        }
    }

    #[test]
    fn pending_to_pending_is_rejected() {
        let mut tx = pending();
        assert_eq!(
            tx.transition(Pending, at(1)),
            Err(DomainError::InvalidStatusTransition)
        );
        assert_eq!(tx.updated_at, at(0));
    }

    #[test]
    fn stored_names_parse() {
        assert_eq!(TransactionStatus::try_from("completed"), Ok(Completed));
        assert_eq!(
            TransactionStatus::try_from("done"),
            Err(DomainError::UnknownTransactionStatus)
        );
        assert_eq!(
            TransactionType::try_from("savings_withdrawal"),
            Ok(TransactionType::SavingsWithdrawal)
        );
        assert_eq!(
            TransactionType::try_from("refund"),
            Err(DomainError::UnknownTransactionType)
        );
    }
}
