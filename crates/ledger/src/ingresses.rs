//! Ingresses: money received into an account under a category.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{Category, LedgerError, Tag, Transaction, util::parse_id};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ingress {
    pub id: Uuid,
    pub category_id: Uuid,
    pub transaction_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingress {
    pub fn new(category_id: Uuid, transaction_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            transaction_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IngressDetail {
    #[serde(flatten)]
    pub ingress: Ingress,
    pub transaction: Transaction,
    pub category: Category,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ingresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    #[sea_orm(unique)]
    pub transaction_id: String,
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
    #[sea_orm(has_many = "super::ingress_tags::Entity")]
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

impl Related<super::ingress_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ingress> for ActiveModel {
    fn from(value: &Ingress) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            category_id: ActiveValue::Set(value.category_id.to_string()),
            transaction_id: ActiveValue::Set(value.transaction_id.to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Ingress {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "ingresses.id")?,
            category_id: parse_id(&model.category_id, "ingresses.category_id")?,
            transaction_id: parse_id(&model.transaction_id, "ingresses.transaction_id")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
