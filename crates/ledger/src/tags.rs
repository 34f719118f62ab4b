//! Tags label expenditures and ingresses.
//!
//! A tag belongs to exactly one [`TagType`] and can only be attached to
//! records of that type. Names are unique per type after normalization
//! (`"Café"` and `"cafe"` collide, `"C++"` and `"C#"` do not), the unique
//! index on `(name_norm, tag_type)` enforces it and a violation surfaces as
//! [`DomainError::TagAlreadyExists`].

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DomainError, LedgerError,
    util::{decode, normalize_display, normalize_key, normalize_optional_text, parse_id},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Expenditure,
    Ingress,
    Transfer,
    SavingsGoal,
    SavingsWithdrawal,
    SavingsContribution,
}

impl TagType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expenditure => "expenditure",
            Self::Ingress => "ingress",
            Self::Transfer => "transfer",
            Self::SavingsGoal => "savings_goal",
            Self::SavingsWithdrawal => "savings_withdrawal",
            Self::SavingsContribution => "savings_contribution",
        }
    }
}

impl TryFrom<&str> for TagType {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expenditure" => Ok(Self::Expenditure),
            "ingress" => Ok(Self::Ingress),
            "transfer" => Ok(Self::Transfer),
            "savings_goal" => Ok(Self::SavingsGoal),
            "savings_withdrawal" => Ok(Self::SavingsWithdrawal),
            "savings_contribution" => Ok(Self::SavingsContribution),
            _ => Err(DomainError::UnknownTagType),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[serde(skip)]
    pub name_norm: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub tag_type: TagType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable attributes of a tag. `None` keeps the current value.
#[derive(Clone, Debug, Default)]
pub struct TagChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
}

/// Validated display name and comparison key.
fn tag_name(raw: &str) -> Result<(String, String), DomainError> {
    let name = normalize_display(raw).ok_or(DomainError::TagNameEmpty)?;
    let norm = normalize_key(&name).unwrap_or_else(|| name.to_lowercase());
    Ok((name, norm))
}

impl Tag {
    /// Validate and build a tag. The name is checked before the type.
    pub fn new(
        name: &str,
        tag_type: &str,
        description: Option<&str>,
        color: Option<&str>,
        background_color: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let (name, name_norm) = tag_name(name)?;
        let tag_type = TagType::try_from(tag_type)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            name_norm,
            description: normalize_optional_text(description),
            color: normalize_optional_text(color),
            background_color: normalize_optional_text(background_color),
            tag_type,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: &TagChanges, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(name) = changes.name.as_deref() {
            (self.name, self.name_norm) = tag_name(name)?;
        }
        if let Some(description) = changes.description.as_deref() {
            self.description = normalize_optional_text(Some(description));
        }
        if let Some(color) = changes.color.as_deref() {
            self.color = normalize_optional_text(Some(color));
        }
        if let Some(background_color) = changes.background_color.as_deref() {
            self.background_color = normalize_optional_text(Some(background_color));
        }
        self.updated_at = now;
        Ok(())
    }

    /// Fails with [`DomainError::TagTypeMismatch`] unless the tag is of `expected` type.
    pub fn ensure_type(&self, expected: TagType) -> Result<(), DomainError> {
        if self.tag_type == expected {
            Ok(())
        } else {
            Err(DomainError::TagTypeMismatch)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub tag_type: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenditure_tags::Entity")]
    ExpenditureTags,
    #[sea_orm(has_many = "super::ingress_tags::Entity")]
    IngressTags,
}

impl Related<super::expenditure_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenditureTags.def()
    }
}

impl Related<super::ingress_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngressTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tag> for ActiveModel {
    fn from(value: &Tag) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            name_norm: ActiveValue::Set(value.name_norm.clone()),
            description: ActiveValue::Set(value.description.clone()),
            color: ActiveValue::Set(value.color.clone()),
            background_color: ActiveValue::Set(value.background_color.clone()),
            tag_type: ActiveValue::Set(value.tag_type.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Tag {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "tags.id")?,
            tag_type: decode(TagType::try_from(model.tag_type.as_str()), "tags.tag_type")?,
            name: model.name,
            name_norm: model.name_norm,
            description: model.description,
            color: model.color,
            background_color: model.background_color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
