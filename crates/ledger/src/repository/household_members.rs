use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder};
use uuid::Uuid;

use super::{HouseholdMemberRepository, ensure_affected, sql_repository};
use crate::{DomainError, HouseholdMember, ResultLedger, household_members};

sql_repository!(SqlHouseholdMembers);

impl<C: ConnectionTrait + Sync> HouseholdMemberRepository for SqlHouseholdMembers<'_, C> {
    async fn create(&self, member: &HouseholdMember) -> ResultLedger<()> {
        household_members::ActiveModel::from(member)
            .insert(self.conn)
            .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<HouseholdMember> {
        let model = household_members::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        HouseholdMember::try_from(model)
    }

    async fn update(&self, member: &HouseholdMember) -> ResultLedger<()> {
        household_members::ActiveModel::from(member)
            .update(self.conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ResultLedger<()> {
        let result = household_members::Entity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;
        ensure_affected(result.rows_affected)
    }

    async fn list(&self) -> ResultLedger<Vec<HouseholdMember>> {
        household_members::Entity::find()
            .order_by_asc(household_members::Column::FirstName)
            .all(self.conn)
            .await?
            .into_iter()
            .map(HouseholdMember::try_from)
            .collect()
    }
}
