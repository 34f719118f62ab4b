//! Expenditures: money spent from an account under a category.
//!
//! An expenditure never exists without its transaction; both are written by
//! the same unit of work (see [`crate::create_expenditure`]).

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Category, LedgerError, Tag, Transaction, util::parse_id};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Expenditure {
    pub id: Uuid,
    pub category_id: Uuid,
    pub transaction_id: Uuid,
    /// Reported to the tax office or otherwise declared.
    pub declared: bool,
    /// Expected ahead of time, e.g. rent.
    pub planned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expenditure {
    pub fn new(
        category_id: Uuid,
        transaction_id: Uuid,
        declared: bool,
        planned: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            transaction_id,
            declared,
            planned,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An expenditure with everything it references resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpenditureDetail {
    #[serde(flatten)]
    pub expenditure: Expenditure,
    pub transaction: Transaction,
    pub category: Category,
    pub tags: Vec<Tag>,
}

/// Criteria for [`crate::ExpenditureRepository::find_expenditures`]. Unset
/// fields do not filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenditureFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Inclusive lower bound on the transaction date.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the transaction date.
    pub to: Option<DateTime<Utc>>,
    pub declared: Option<bool>,
    pub planned: Option<bool>,
}

impl ExpenditureFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn declared(mut self, declared: bool) -> Self {
        self.declared = Some(declared);
        self
    }

    #[must_use]
    pub fn planned(mut self, planned: bool) -> Self {
        self.planned = Some(planned);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenditures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub declared: bool,
    pub planned: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Transaction,
    #[sea_orm(has_many = "super::expenditure_tags::Entity")]
    Tags,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::expenditure_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expenditure> for ActiveModel {
    fn from(value: &Expenditure) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            category_id: ActiveValue::Set(value.category_id.to_string()),
            transaction_id: ActiveValue::Set(value.transaction_id.to_string()),
            declared: ActiveValue::Set(value.declared),
            planned: ActiveValue::Set(value.planned),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Expenditure {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "expenditures.id")?,
            category_id: parse_id(&model.category_id, "expenditures.category_id")?,
            transaction_id: parse_id(&model.transaction_id, "expenditures.transaction_id")?,
            declared: model.declared,
            planned: model.planned,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
