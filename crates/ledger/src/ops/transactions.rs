use uuid::Uuid;

use crate::{
    DomainError, ResultLedger, Transaction,
    repository::{AccountRepository, Scope, TransactionRepository},
};

use super::Ledger;

impl Ledger {
    pub async fn transaction(&self, id: Uuid) -> ResultLedger<Transaction> {
        self.store()
            .transactions()
            .get_by_id(id)
            .await
            .map_err(|err| err.not_found_as(DomainError::TransactionNotFound))
    }

    /// Transactions of an account, oldest first.
    pub async fn list_transactions(&self, account_id: Uuid) -> ResultLedger<Vec<Transaction>> {
        let store = self.store();
        store
            .accounts()
            .get_by_id(account_id)
            .await
            .map_err(|err| err.not_found_as(DomainError::AccountNotFound))?;
        store.transactions().list(account_id).await
    }
}
