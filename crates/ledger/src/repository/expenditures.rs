use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::{ExpenditureRepository, sql_repository};
use crate::{DomainError, Expenditure, ExpenditureFilter, ResultLedger, expenditures, transactions};

sql_repository!(SqlExpenditures);

impl<C: ConnectionTrait + Sync> ExpenditureRepository for SqlExpenditures<'_, C> {
    async fn create(&self, expenditure: &Expenditure) -> ResultLedger<()> {
        expenditures::ActiveModel::from(expenditure)
            .insert(self.conn)
            .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<Expenditure> {
        let model = expenditures::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        Expenditure::try_from(model)
    }

    async fn find_expenditures(&self, filter: &ExpenditureFilter) -> ResultLedger<Vec<Expenditure>> {
        let mut query = expenditures::Entity::find().inner_join(transactions::Entity);

        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(expenditures::Column::CategoryId.eq(category_id.to_string()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::Date.lt(to));
        }
        if let Some(declared) = filter.declared {
            query = query.filter(expenditures::Column::Declared.eq(declared));
        }
        if let Some(planned) = filter.planned {
            query = query.filter(expenditures::Column::Planned.eq(planned));
        }

        query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(expenditures::Column::CreatedAt)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Expenditure::try_from)
            .collect()
    }
}
