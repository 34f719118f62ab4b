use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::{TransactionRepository, sql_repository};
use crate::{DomainError, ResultLedger, Transaction, transactions};

sql_repository!(SqlTransactions);

impl<C: ConnectionTrait + Sync> TransactionRepository for SqlTransactions<'_, C> {
    async fn create(&self, transaction: &Transaction) -> ResultLedger<()> {
        transactions::ActiveModel::from(transaction)
            .insert(self.conn)
            .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        Transaction::try_from(model)
    }

    async fn list(&self, account_id: Uuid) -> ResultLedger<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.to_string()))
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::CreatedAt)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
