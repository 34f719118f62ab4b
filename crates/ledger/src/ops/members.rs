use chrono::Utc;
use uuid::Uuid;

use crate::{
    DomainError, HouseholdMember, NewMemberCmd, ResultLedger,
    repository::{AccountRepository, HouseholdMemberRepository, Scope},
};

use super::{Ledger, with_uow};

impl Ledger {
    pub async fn create_member(&self, cmd: NewMemberCmd) -> ResultLedger<HouseholdMember> {
        let member = HouseholdMember::new(
            &cmd.first_name,
            cmd.last_name.as_deref(),
            cmd.nickname.as_deref(),
            cmd.role.as_deref(),
            Utc::now(),
        )?;
        with_uow!(self, |scope| {
            scope.members().create(&member).await?;
            Ok(member)
        })
    }

    pub async fn member(&self, id: Uuid) -> ResultLedger<HouseholdMember> {
        load(&self.store(), id).await
    }

    pub async fn list_members(&self) -> ResultLedger<Vec<HouseholdMember>> {
        self.store().members().list().await
    }

    pub async fn activate_member(&self, id: Uuid) -> ResultLedger<HouseholdMember> {
        with_uow!(self, |scope| {
            let mut member = load(scope, id).await?;
            member.activate(Utc::now())?;
            scope.members().update(&member).await?;
            Ok(member)
        })
    }

    pub async fn deactivate_member(&self, id: Uuid) -> ResultLedger<HouseholdMember> {
        with_uow!(self, |scope| {
            let mut member = load(scope, id).await?;
            member.deactivate(Utc::now())?;
            scope.members().update(&member).await?;
            Ok(member)
        })
    }

    /// Delete a member that owns no active account.
    ///
    /// Inactive accounts it owned are kept and lose their owner.
    pub async fn delete_member(&self, id: Uuid) -> ResultLedger<()> {
        with_uow!(self, |scope| {
            load(scope, id).await?;
            let owned = scope.accounts().list_by_owner(id).await?;
            if owned.iter().any(|account| account.active) {
                return Err(DomainError::MemberHasActiveAccounts.into());
            }
            scope
                .members()
                .delete(id)
                .await
                .map_err(|err| err.not_found_as(DomainError::HouseholdMemberNotFound))
        })
    }
}

async fn load<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<HouseholdMember> {
    scope
        .members()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::HouseholdMemberNotFound))
}
