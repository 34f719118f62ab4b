//! People sharing the household. A member may own accounts; the account keeps
//! the reference, the member does not list its accounts.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    DomainError, LedgerError,
    activity::impl_activity,
    util::{normalize_display, normalize_optional_text, parse_id},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HouseholdMember {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    /// Free-form, e.g. "parent" or "child".
    pub role: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HouseholdMember {
    pub fn new(
        first_name: &str,
        last_name: Option<&str>,
        nickname: Option<&str>,
        role: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let first_name = normalize_display(first_name).ok_or(DomainError::MemberNameEmpty)?;
        Ok(Self {
            id: Uuid::new_v4(),
            first_name,
            last_name: normalize_optional_text(last_name),
            nickname: normalize_optional_text(nickname),
            role: normalize_optional_text(role),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Nickname when set, first name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.first_name)
    }
}

impl_activity!(
    HouseholdMember,
    DomainError::HouseholdMemberAlreadyActive,
    DomainError::HouseholdMemberAlreadyInactive
);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "household_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<String>,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&HouseholdMember> for ActiveModel {
    fn from(value: &HouseholdMember) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            first_name: ActiveValue::Set(value.first_name.clone()),
            last_name: ActiveValue::Set(value.last_name.clone()),
            nickname: ActiveValue::Set(value.nickname.clone()),
            role: ActiveValue::Set(value.role.clone()),
            active: ActiveValue::Set(value.active),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for HouseholdMember {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id, "household_members.id")?,
            first_name: model.first_name,
            last_name: model.last_name,
            nickname: model.nickname,
            role: model.role,
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

    #[test]
    fn names_are_trimmed_and_blank_optionals_dropped() {
        let member = HouseholdMember::new("  Ada ", Some(" "), Some("Addy"), None, at(0)).unwrap();
        assert_eq!(member.first_name, "Ada");
        assert_eq!(member.last_name, None);
        assert_eq!(member.display_name(), "Addy");
        assert!(member.active);
    }

    #[test]
    fn first_name_is_required() {
        assert_eq!(
            HouseholdMember::new("", None, None, None, at(0)),
            Err(DomainError::MemberNameEmpty)
        );
    }

    #[test]
    fn activity_transitions_are_strict() {
        let mut member = HouseholdMember::new("Ada", None, None, None, at(0)).unwrap();
        assert_eq!(
            member.activate(at(1)),
            Err(DomainError::HouseholdMemberAlreadyActive)
        );
        member.deactivate(at(2)).unwrap();
        assert_eq!(
            member.deactivate(at(3)),
            Err(DomainError::HouseholdMemberAlreadyInactive)
        );
        assert_eq!(member.updated_at, at(2));
    }
}
