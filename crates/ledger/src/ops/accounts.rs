use chrono::Utc;
use uuid::Uuid;

use crate::{
    Account, DomainError, NewAccountCmd, ResultLedger,
    repository::{AccountRepository, HouseholdMemberRepository, Scope},
};

use super::{Ledger, with_uow};

impl Ledger {
    /// Open an account. The initial balance becomes the current balance.
    ///
    /// The owner, when given, must exist and be active; the currency must be
    /// known.
    pub async fn create_account(&self, cmd: NewAccountCmd) -> ResultLedger<Account> {
        let account = Account::new(
            &cmd.name,
            cmd.account_type,
            cmd.currency,
            cmd.initial_balance,
            cmd.owner_id,
            cmd.active,
            Utc::now(),
        )?;
        with_uow!(self, |scope| {
            if let Some(owner_id) = account.owner_id {
                let owner = scope
                    .members()
                    .get_by_id(owner_id)
                    .await
                    .map_err(|err| err.not_found_as(DomainError::HouseholdMemberNotFound))?;
                if !owner.active {
                    return Err(DomainError::HouseholdMemberInactive.into());
                }
            }
            scope.accounts().create(&account).await?;
            Ok(account)
        })
    }

    pub async fn account(&self, id: Uuid) -> ResultLedger<Account> {
        self.store()
            .accounts()
            .get_by_id(id)
            .await
            .map_err(|err| err.not_found_as(DomainError::AccountNotFound))
    }

    pub async fn list_accounts(&self) -> ResultLedger<Vec<Account>> {
        self.store().accounts().list().await
    }

    pub async fn activate_account(&self, id: Uuid) -> ResultLedger<Account> {
        with_uow!(self, |scope| {
            let mut account = load(scope, id).await?;
            account.activate(Utc::now())?;
            scope.accounts().update(&account).await
        })
    }

    pub async fn deactivate_account(&self, id: Uuid) -> ResultLedger<Account> {
        with_uow!(self, |scope| {
            let mut account = load(scope, id).await?;
            account.deactivate(Utc::now())?;
            scope.accounts().update(&account).await
        })
    }

    pub async fn rename_account(&self, id: Uuid, name: &str) -> ResultLedger<Account> {
        let name = name.to_string();
        with_uow!(self, |scope| {
            let mut account = load(scope, id).await?;
            account.rename(&name, Utc::now())?;
            scope.accounts().update(&account).await
        })
    }

    /// Delete an account that never had a transaction.
    pub async fn delete_account(&self, id: Uuid) -> ResultLedger<()> {
        with_uow!(self, |scope| {
            load(scope, id).await?;
            if scope.accounts().has_transactions(id).await? {
                return Err(DomainError::AccountHasTransactions.into());
            }
            scope
                .accounts()
                .delete(id)
                .await
                .map_err(|err| err.not_found_as(DomainError::AccountNotFound))
        })
    }
}

async fn load<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<Account> {
    scope
        .accounts()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::AccountNotFound))
}
