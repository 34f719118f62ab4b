//! Household ledger core.
//!
//! Accounts, categories, tags and household members, and the use cases that
//! move money between them. Every multi-step mutation runs in one
//! [`UnitOfWork`]; storage failures are translated into [`DomainError`] or
//! [`InfraError`] before they reach a caller.

pub use accounts::{Account, AccountType};
pub use categories::{Category, CategoryChanges, CategoryType};
pub use commands::{
    EntryMeta, NewAccountCmd, NewCategoryCmd, NewExpenditureCmd, NewIngressCmd, NewMemberCmd,
    NewTagCmd,
};
pub use constraints::{ConstraintRule, REGISTRY_VERSION, Violation, ViolationSide};
pub use currency::Currency;
pub use error::{DomainError, FailureKind, InfraError, LedgerError, StorageFailure};
pub use expenditures::{Expenditure, ExpenditureDetail, ExpenditureFilter};
pub use household_members::HouseholdMember;
pub use ingresses::{Ingress, IngressDetail};
pub use money::Money;
pub use ops::{Ledger, LedgerBuilder, expenditures::create_expenditure, ingresses::create_ingress};
pub use repository::{
    AccountRepository, CategoryRepository, ExpenditureRepository, HouseholdMemberRepository,
    IngressRepository, Scope, SqlStore, TagRepository, TransactionRepository,
};
pub use tags::{Tag, TagChanges, TagType};
pub use transactions::{Transaction, TransactionStatus, TransactionType};
pub use translate::translate;
pub use uow::{ScopeFuture, TxScope, UnitOfWork};

pub mod accounts;
pub mod categories;
mod commands;
pub mod constraints;
pub mod currency;
mod error;
pub mod expenditure_tags;
pub mod expenditures;
pub mod household_members;
pub mod ingress_tags;
pub mod ingresses;
mod money;
mod ops;
pub mod repository;
pub mod tags;
pub mod transactions;
mod translate;
mod uow;

mod activity;
mod util;

pub type ResultLedger<T> = Result<T, LedgerError>;
