use chrono::Utc;
use uuid::Uuid;

use crate::{
    Category, CategoryChanges, CategoryType, DomainError, NewCategoryCmd, ResultLedger,
    repository::{CategoryRepository, Scope},
};

use super::{Ledger, with_uow};

impl Ledger {
    pub async fn create_category(&self, cmd: NewCategoryCmd) -> ResultLedger<Category> {
        let category = Category::new(
            &cmd.name,
            cmd.category_type,
            cmd.description.as_deref(),
            cmd.color.as_deref(),
            cmd.background_color.as_deref(),
            Utc::now(),
        )?;
        with_uow!(self, |scope| {
            scope.categories().create(&category).await?;
            Ok(category)
        })
    }

    pub async fn category(&self, id: Uuid) -> ResultLedger<Category> {
        load(&self.store(), id).await
    }

    pub async fn list_categories(&self) -> ResultLedger<Vec<Category>> {
        self.store().categories().list().await
    }

    pub async fn categories_by_type(
        &self,
        category_type: CategoryType,
    ) -> ResultLedger<Vec<Category>> {
        self.store().categories().find_by_type(category_type).await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> ResultLedger<Category> {
        with_uow!(self, |scope| {
            let mut category = load(scope, id).await?;
            category.apply(&changes, Utc::now())?;
            scope.categories().update(&category).await?;
            Ok(category)
        })
    }

    pub async fn activate_category(&self, id: Uuid) -> ResultLedger<Category> {
        with_uow!(self, |scope| {
            let mut category = load(scope, id).await?;
            category.activate(Utc::now())?;
            scope.categories().update(&category).await?;
            Ok(category)
        })
    }

    pub async fn deactivate_category(&self, id: Uuid) -> ResultLedger<Category> {
        with_uow!(self, |scope| {
            let mut category = load(scope, id).await?;
            category.deactivate(Utc::now())?;
            scope.categories().update(&category).await?;
            Ok(category)
        })
    }

    /// Delete a category nothing refers to.
    ///
    /// A category still in use fails with the error naming what uses it, e.g.
    /// [`DomainError::CategoryInUseByExpenditure`].
    pub async fn delete_category(&self, id: Uuid) -> ResultLedger<()> {
        with_uow!(self, |scope| {
            scope
                .categories()
                .delete(id)
                .await
                .map_err(|err| err.not_found_as(DomainError::CategoryNotFound))
        })
    }
}

async fn load<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<Category> {
    scope
        .categories()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::CategoryNotFound))
}
