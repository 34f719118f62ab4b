//! Unit of work: one storage transaction per business operation.
//!
//! [`UnitOfWork::run`] begins a transaction, hands the work closure a
//! [`TxScope`] whose repositories all write through that transaction, and
//! then commits exactly once on success or rolls back exactly once on
//! failure.
//!
//! A `TxScope` cannot open another unit of work, so nesting is ruled out by
//! the types. If the future returned by `run` is dropped before completion
//! the open transaction is dropped with it and rolled back; nothing commits
//! unless `run` reaches its commit.

use std::{future::Future, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, error};

use crate::{InfraError, LedgerError, ResultLedger, StorageFailure, repository::SqlStore};

/// Repositories bound to an open transaction.
pub type TxScope<'s> = SqlStore<'s, DatabaseTransaction>;

/// Future returned by the work closure of [`UnitOfWork::run`].
pub type ScopeFuture<'s, T> = Pin<Box<dyn Future<Output = ResultLedger<T>> + Send + 's>>;

#[derive(Clone, Debug)]
pub struct UnitOfWork {
    database: DatabaseConnection,
}

impl UnitOfWork {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Run `work` atomically.
    ///
    /// ```ignore
    /// let account = uow
    ///     .run(|scope| Box::pin(async move { scope.accounts().get_by_id(id).await }))
    ///     .await?;
    /// ```
    ///
    /// A failed commit is reported as [`InfraError::Commit`]. When rolling
    /// back fails too, the result is [`LedgerError::RollbackFailed`] carrying
    /// both errors; its [`LedgerError::domain`] is still the one of the
    /// original error.
    pub async fn run<T, F>(&self, work: F) -> ResultLedger<T>
    where
        T: Send,
        F: for<'s> FnOnce(&'s TxScope<'s>) -> ScopeFuture<'s, T> + Send,
    {
        let txn = self.database.begin().await.map_err(|err| {
            let err = InfraError::Begin(StorageFailure::from(&err));
            error!("{err}");
            err
        })?;
        debug!("unit of work started");

        let outcome = {
            let scope = SqlStore::new(&txn);
            work(&scope).await
        };

        match outcome {
            Ok(value) => {
                txn.commit().await.map_err(|err| {
                    let err = InfraError::Commit(StorageFailure::from(&err));
                    error!("{err}");
                    err
                })?;
                debug!("unit of work committed");
                Ok(value)
            }
            Err(original) => match txn.rollback().await {
                Ok(()) => {
                    debug!(error = %original, "unit of work rolled back");
                    Err(original)
                }
                Err(err) => {
                    let rollback = InfraError::Rollback(StorageFailure::from(&err));
                    error!(
                        original = %original,
                        rollback = %rollback,
                        "unit of work rollback failed"
                    );
                    Err(LedgerError::RollbackFailed {
                        original: Box::new(original),
                        rollback,
                    })
                }
            },
        }
    }
}
