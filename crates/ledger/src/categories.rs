//! Categories classify expenditures, ingresses, transfers and savings goals.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DomainError, LedgerError,
    activity::impl_activity,
    util::{decode, normalize_display, normalize_optional_text, parse_id},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Ingress,
    Expenditure,
    Transfer,
    SavingsGoal,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Expenditure => "expenditure",
            Self::Transfer => "transfer",
            Self::SavingsGoal => "savings_goal",
        }
    }
}

impl TryFrom<&str> for CategoryType {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ingress" => Ok(Self::Ingress),
            "expenditure" => Ok(Self::Expenditure),
            "transfer" => Ok(Self::Transfer),
            "savings_goal" => Ok(Self::SavingsGoal),
            _ => Err(DomainError::UnknownCategoryType),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub category_type: CategoryType,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable attributes of a category. `None` keeps the current value.
#[derive(Clone, Debug, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
}

impl Category {
    pub fn new(
        name: &str,
        category_type: CategoryType,
        description: Option<&str>,
        color: Option<&str>,
        background_color: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = normalize_display(name).ok_or(DomainError::CategoryNameEmpty)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: normalize_optional_text(description),
            color: normalize_optional_text(color),
            background_color: normalize_optional_text(background_color),
            category_type,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply `changes`. Nothing is modified when the new name is blank.
    pub fn apply(&mut self, changes: &CategoryChanges, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(name) = changes.name.as_deref() {
            self.name = normalize_display(name).ok_or(DomainError::CategoryNameEmpty)?;
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
}

impl_activity!(
    Category,
    DomainError::CategoryAlreadyActive,
    DomainError::CategoryAlreadyInactive
);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub category_type: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenditures::Entity")]
    Expenditures,
    #[sea_orm(has_many = "super::ingresses::Entity")]
    Ingresses,
}

impl Related<super::expenditures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenditures.def()
    }
}

impl Related<super::ingresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            color: ActiveValue::Set(value.color.clone()),
            background_color: ActiveValue::Set(value.background_color.clone()),
            category_type: ActiveValue::Set(value.category_type.as_str().to_string()),
            active: ActiveValue::Set(value.active),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "categories.id")?,
            category_type: decode(
                CategoryType::try_from(model.category_type.as_str()),
                "categories.category_type",
            )?,
            name: model.name,
            description: model.description,
            color: model.color,
            background_color: model.background_color,
            active: model.active,
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

    fn groceries() -> Category {
        Category::new(
            "Groceries",
            CategoryType::Expenditure,
            None,
            Some("#fff"),
            None,
            at(0),
        )
        .unwrap()
    }

    #[test]
    fn types_parse_from_storage_names() {
        assert_eq!(CategoryType::try_from("savings_goal"), Ok(CategoryType::SavingsGoal));
        assert_eq!(
            CategoryType::try_from("salary"),
            Err(DomainError::UnknownCategoryType)
        );
    }

    #[test]
    fn activity_transitions_are_strict() {
        let mut category = groceries();
        assert_eq!(
            category.activate(at(1)),
            Err(DomainError::CategoryAlreadyActive)
        );
        category.deactivate(at(2)).unwrap();
        assert_eq!(
            category.deactivate(at(3)),
            Err(DomainError::CategoryAlreadyInactive)
        );
        category.activate(at(4)).unwrap();
        assert!(category.active);
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut category = groceries();
        category
            .apply(
                &CategoryChanges {
                    name: Some(" Food ".to_string()),
                    ..CategoryChanges::default()
                },
                at(5),
            )
            .unwrap();

        assert_eq!(category.name, "Food");
        assert_eq!(category.color.as_deref(), Some("#fff"));
        assert_eq!(category.updated_at, at(5));
    }

    #[test]
    fn apply_rejects_blank_name_without_changes() {
        let mut category = groceries();
        let err = category
            .apply(
                &CategoryChanges {
                    name: Some(String::new()),
                    color: Some("#000".to_string()),
                    ..CategoryChanges::default()
                },
                at(5),
            )
            .unwrap_err();

        assert_eq!(err, DomainError::CategoryNameEmpty);
        assert_eq!(category.color.as_deref(), Some("#fff"));
        assert_eq!(category.updated_at, at(0));
    }
}
