//! Repository contracts and their SQL implementation.
//!
//! Every repository is a trait, so use cases only depend on the contract and
//! never on where the rows go. [`SqlStore`] implements all of them over any
//! sea-orm connection: built on a `DatabaseConnection` each call autocommits,
//! built on a `DatabaseTransaction` (see [`crate::TxScope`]) every call joins
//! the same unit of work.
//!
//! Lookups by id return [`DomainError::RecordNotFound`](crate::DomainError)
//! when the row is missing; use cases reclassify it into the entity specific
//! error.

use std::future::Future;

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
    Account, Category, CategoryType, Expenditure, ExpenditureFilter, HouseholdMember, Ingress,
    ResultLedger, Tag, TagType, Transaction,
};

/// Declares a repository struct holding a borrowed connection.
macro_rules! sql_repository {
    ($name:ident) => {
        #[derive(Debug)]
        pub struct $name<'c, C> {
            conn: &'c C,
        }

        impl<'c, C: sea_orm::ConnectionTrait> $name<'c, C> {
            pub fn new(conn: &'c C) -> Self {
                Self { conn }
            }
        }
    };
}

pub(crate) use sql_repository;

/// Map "no row affected" to `RecordNotFound`.
pub(crate) fn ensure_affected(rows_affected: u64) -> ResultLedger<()> {
    if rows_affected == 0 {
        Err(crate::DomainError::RecordNotFound.into())
    } else {
        Ok(())
    }
}

mod accounts;
mod categories;
mod expenditures;
mod household_members;
mod ingresses;
mod tags;
mod transactions;

pub use accounts::SqlAccounts;
pub use categories::SqlCategories;
pub use expenditures::SqlExpenditures;
pub use household_members::SqlHouseholdMembers;
pub use ingresses::SqlIngresses;
pub use tags::SqlTags;
pub use transactions::SqlTransactions;

pub trait AccountRepository {
    fn create(&self, account: &Account) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<Account>> + Send;
    /// Store `account` if nobody changed it since it was read.
    ///
    /// Returns the stored account with its new version. Fails with
    /// `ConcurrentUpdate` when the stored version moved on.
    fn update(&self, account: &Account) -> impl Future<Output = ResultLedger<Account>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ResultLedger<()>> + Send;
    fn list(&self) -> impl Future<Output = ResultLedger<Vec<Account>>> + Send;
    fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl Future<Output = ResultLedger<Vec<Account>>> + Send;
    fn has_transactions(&self, id: Uuid) -> impl Future<Output = ResultLedger<bool>> + Send;
}

pub trait HouseholdMemberRepository {
    fn create(&self, member: &HouseholdMember) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<HouseholdMember>> + Send;
    fn update(&self, member: &HouseholdMember) -> impl Future<Output = ResultLedger<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ResultLedger<()>> + Send;
    fn list(&self) -> impl Future<Output = ResultLedger<Vec<HouseholdMember>>> + Send;
}

pub trait CategoryRepository {
    fn create(&self, category: &Category) -> impl Future<Output = ResultLedger<()>> + Send;
    fn update(&self, category: &Category) -> impl Future<Output = ResultLedger<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<Category>> + Send;
    fn list(&self) -> impl Future<Output = ResultLedger<Vec<Category>>> + Send;
    fn find_by_type(
        &self,
        category_type: CategoryType,
    ) -> impl Future<Output = ResultLedger<Vec<Category>>> + Send;
}

pub trait TagRepository {
    /// Fails with `TagAlreadyExists` when the normalized name is taken for
    /// the tag's type.
    fn create(&self, tag: &Tag) -> impl Future<Output = ResultLedger<()>> + Send;
    fn update(&self, tag: &Tag) -> impl Future<Output = ResultLedger<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<Tag>> + Send;
    fn list_by_type(&self, tag_type: TagType)
    -> impl Future<Output = ResultLedger<Vec<Tag>>> + Send;
    /// Attach `tag_ids` to the record `target_id` of kind `tag_type`.
    ///
    /// Only expenditure and ingress records carry tags; any other type fails
    /// with `TagTypeMismatch`.
    fn link_tags_to_type(
        &self,
        tag_type: TagType,
        target_id: Uuid,
        tag_ids: &[Uuid],
    ) -> impl Future<Output = ResultLedger<()>> + Send;
    /// Tags attached to the record `target_id` of kind `tag_type`.
    fn linked_to(
        &self,
        tag_type: TagType,
        target_id: Uuid,
    ) -> impl Future<Output = ResultLedger<Vec<Tag>>> + Send;
}

pub trait TransactionRepository {
    fn create(&self, transaction: &Transaction) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<Transaction>> + Send;
    /// Transactions of one account, oldest first.
    fn list(&self, account_id: Uuid)
    -> impl Future<Output = ResultLedger<Vec<Transaction>>> + Send;
}

pub trait ExpenditureRepository {
    fn create(&self, expenditure: &Expenditure) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<Expenditure>> + Send;
    /// Expenditures matching `filter`, most recent transaction date first.
    fn find_expenditures(
        &self,
        filter: &ExpenditureFilter,
    ) -> impl Future<Output = ResultLedger<Vec<Expenditure>>> + Send;
}

pub trait IngressRepository {
    fn create(&self, ingress: &Ingress) -> impl Future<Output = ResultLedger<()>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResultLedger<Ingress>> + Send;
}

/// A set of repositories sharing one connection handle.
pub trait Scope: Sync {
    fn accounts(&self) -> impl AccountRepository + Send + Sync + '_;
    fn members(&self) -> impl HouseholdMemberRepository + Send + Sync + '_;
    fn categories(&self) -> impl CategoryRepository + Send + Sync + '_;
    fn tags(&self) -> impl TagRepository + Send + Sync + '_;
    fn transactions(&self) -> impl TransactionRepository + Send + Sync + '_;
    fn expenditures(&self) -> impl ExpenditureRepository + Send + Sync + '_;
    fn ingresses(&self) -> impl IngressRepository + Send + Sync + '_;
}

/// SQL implementation of every repository over one connection handle.
#[derive(Debug)]
pub struct SqlStore<'c, C> {
    conn: &'c C,
}

impl<C> Clone for SqlStore<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for SqlStore<'_, C> {}

impl<'c, C: ConnectionTrait> SqlStore<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &'c C {
        self.conn
    }
}

impl<C: ConnectionTrait + Sync> Scope for SqlStore<'_, C> {
    fn accounts(&self) -> impl AccountRepository + Send + Sync + '_ {
        SqlAccounts::new(self.conn)
    }

    fn members(&self) -> impl HouseholdMemberRepository + Send + Sync + '_ {
        SqlHouseholdMembers::new(self.conn)
    }

    fn categories(&self) -> impl CategoryRepository + Send + Sync + '_ {
        SqlCategories::new(self.conn)
    }

    fn tags(&self) -> impl TagRepository + Send + Sync + '_ {
        SqlTags::new(self.conn)
    }

    fn transactions(&self) -> impl TransactionRepository + Send + Sync + '_ {
        SqlTransactions::new(self.conn)
    }

    fn expenditures(&self) -> impl ExpenditureRepository + Send + Sync + '_ {
        SqlExpenditures::new(self.conn)
    }

    fn ingresses(&self) -> impl IngressRepository + Send + Sync + '_ {
        SqlIngresses::new(self.conn)
    }
}
