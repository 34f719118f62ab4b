//! Use cases, exposed as methods on [`Ledger`].
//!
//! Every mutation runs inside exactly one unit of work. The orchestration of
//! the money-moving use cases is also available as free functions generic
//! over [`Scope`], so they can run against any repository implementation.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    Account, Category, DomainError, Money, ResultLedger, Tag, TagType,
    repository::{AccountRepository, CategoryRepository, Scope, SqlStore, TagRepository},
    uow::UnitOfWork,
};

mod accounts;
mod categories;
pub mod expenditures;
pub mod ingresses;
mod members;
mod tags;
mod transactions;

/// Run a block inside a unit of work, committing on success and rolling back
/// on error. The block sees the transaction-bound repositories as `$scope`.
macro_rules! with_uow {
    ($self:expr, |$scope:ident| $body:expr) => {
        $self
            .uow
            .run(move |$scope| Box::pin(async move { $body }))
            .await
    };
}

pub(crate) use with_uow;

#[derive(Clone, Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    uow: UnitOfWork,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// The unit of work manager, for callers composing their own operations.
    pub fn unit_of_work(&self) -> &UnitOfWork {
        &self.uow
    }

    /// Repositories outside any unit of work, used for reads.
    fn store(&self) -> SqlStore<'_, DatabaseConnection> {
        SqlStore::new(&self.database)
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultLedger<Ledger> {
        Ok(Ledger {
            uow: UnitOfWork::new(self.database.clone()),
            database: self.database,
        })
    }
}

pub(crate) fn ensure_positive(amount: Money) -> ResultLedger<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(DomainError::InvalidAmount.into())
    }
}

/// Load an account that must exist and be active.
pub(crate) async fn active_account<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<Account> {
    let account = scope
        .accounts()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::AccountNotFound))?;
    if !account.active {
        return Err(DomainError::AccountInactive.into());
    }
    Ok(account)
}

/// Load a category that must exist and be active.
pub(crate) async fn active_category<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<Category> {
    let category = scope
        .categories()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::CategoryNotFound))?;
    if !category.active {
        return Err(DomainError::CategoryInactive.into());
    }
    Ok(category)
}

/// Resolve every id to a tag of `expected` type, in request order.
///
/// Repeated ids are resolved once. A missing id fails with `TagNotFound`, a
/// tag of another type with `TagTypeMismatch`.
pub(crate) async fn resolve_tags<S: Scope>(
    scope: &S,
    ids: &[Uuid],
    expected: TagType,
) -> ResultLedger<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::with_capacity(ids.len());
    for id in ids {
        if tags.iter().any(|tag| tag.id == *id) {
            continue;
        }
        let tag = scope
            .tags()
            .get_by_id(*id)
            .await
            .map_err(|err| err.not_found_as(DomainError::TagNotFound))?;
        tag.ensure_type(expected)?;
        tags.push(tag);
    }
    Ok(tags)
}
