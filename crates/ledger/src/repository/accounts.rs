use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::{AccountRepository, ensure_affected, sql_repository};
use crate::{Account, DomainError, ResultLedger, accounts, transactions};

sql_repository!(SqlAccounts);

impl<C: ConnectionTrait + Sync> AccountRepository for SqlAccounts<'_, C> {
    async fn create(&self, account: &Account) -> ResultLedger<()> {
        accounts::ActiveModel::from(account).insert(self.conn).await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<Account> {
        let model = accounts::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        Account::try_from(model)
    }

    async fn update(&self, account: &Account) -> ResultLedger<Account> {
        let mut stored = account.clone();
        stored.version = account.version + 1;
        stored.updated_at = Utc::now();

        let mut changes = accounts::ActiveModel::from(&stored);
        changes.id = ActiveValue::NotSet;
        changes.created_at = ActiveValue::NotSet;

        let result = accounts::Entity::update_many()
            .set(changes)
            .filter(accounts::Column::Id.eq(account.id.to_string()))
            .filter(accounts::Column::Version.eq(account.version))
            .exec(self.conn)
            .await?;

        if result.rows_affected == 0 {
            let exists = accounts::Entity::find_by_id(account.id.to_string())
                .count(self.conn)
                .await?
                > 0;
            return Err(if exists {
                DomainError::ConcurrentUpdate
            } else {
                DomainError::RecordNotFound
            }
            .into());
        }
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> ResultLedger<()> {
        let result = accounts::Entity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;
        ensure_affected(result.rows_affected)
    }

    async fn list(&self) -> ResultLedger<Vec<Account>> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> ResultLedger<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id.to_string()))
            .order_by_asc(accounts::Column::Name)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn has_transactions(&self, id: Uuid) -> ResultLedger<bool> {
        let count = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(id.to_string()))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }
}
