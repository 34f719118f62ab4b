use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::{CategoryRepository, ensure_affected, sql_repository};
use crate::{Category, CategoryType, DomainError, ResultLedger, categories};

sql_repository!(SqlCategories);

impl<C: ConnectionTrait + Sync> CategoryRepository for SqlCategories<'_, C> {
    async fn create(&self, category: &Category) -> ResultLedger<()> {
        categories::ActiveModel::from(category)
            .insert(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> ResultLedger<()> {
        categories::ActiveModel::from(category)
            .update(self.conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ResultLedger<()> {
        let result = categories::Entity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;
        ensure_affected(result.rows_affected)
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<Category> {
        let model = categories::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        Category::try_from(model)
    }

    async fn list(&self) -> ResultLedger<Vec<Category>> {
        categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    async fn find_by_type(&self, category_type: CategoryType) -> ResultLedger<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::CategoryType.eq(category_type.as_str()))
            .order_by_asc(categories::Column::Name)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }
}
