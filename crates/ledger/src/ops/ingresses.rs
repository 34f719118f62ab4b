//! Ingress use cases: the credit side of [`super::expenditures`].
//!
//! The account and category checks run in the same order as for
//! expenditures; there is no balance check.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    DomainError, Ingress, IngressDetail, NewIngressCmd, ResultLedger, TagType, Transaction,
    TransactionStatus, TransactionType,
    repository::{
        AccountRepository, CategoryRepository, IngressRepository, Scope, TagRepository,
        TransactionRepository,
    },
};

use super::{Ledger, active_account, active_category, ensure_positive, resolve_tags, with_uow};

/// Create an ingress and its transaction inside `scope`.
pub async fn create_ingress<S: Scope>(
    scope: &S,
    cmd: &NewIngressCmd,
    now: DateTime<Utc>,
) -> ResultLedger<IngressDetail> {
    let mut account = active_account(scope, cmd.account_id).await?;
    let category = active_category(scope, cmd.category_id).await?;
    if cmd.currency != account.currency {
        return Err(DomainError::CurrencyMismatch.into());
    }

    account.credit(cmd.amount)?;

    let transaction = Transaction::new(
        account.id,
        cmd.amount,
        account.currency.clone(),
        cmd.meta.date,
        cmd.meta.description.clone(),
        TransactionType::Ingress,
        account.current_balance,
        TransactionStatus::Completed,
        now,
    );
    scope.transactions().create(&transaction).await?;
    scope.accounts().update(&account).await?;

    let ingress = Ingress::new(category.id, transaction.id, now);
    scope.ingresses().create(&ingress).await?;

    let tags = resolve_tags(scope, &cmd.tag_ids, TagType::Ingress).await?;
    let tag_ids: Vec<Uuid> = tags.iter().map(|tag| tag.id).collect();
    scope
        .tags()
        .link_tags_to_type(TagType::Ingress, ingress.id, &tag_ids)
        .await?;

    Ok(IngressDetail {
        ingress,
        transaction,
        category,
        tags,
    })
}

impl Ledger {
    /// Receive money into an account.
    pub async fn create_ingress(&self, cmd: NewIngressCmd) -> ResultLedger<IngressDetail> {
        ensure_positive(cmd.amount)?;
        let now = Utc::now();
        with_uow!(self, |scope| create_ingress(scope, &cmd, now).await)
    }

    pub async fn ingress(&self, id: Uuid) -> ResultLedger<IngressDetail> {
        let store = self.store();
        let ingress = store
            .ingresses()
            .get_by_id(id)
            .await
            .map_err(|err| err.not_found_as(DomainError::IngressNotFound))?;
        let transaction = store
            .transactions()
            .get_by_id(ingress.transaction_id)
            .await
            .map_err(|err| err.not_found_as(DomainError::TransactionNotFound))?;
        let category = store
            .categories()
            .get_by_id(ingress.category_id)
            .await
            .map_err(|err| err.not_found_as(DomainError::CategoryNotFound))?;
        let tags = store.tags().linked_to(TagType::Ingress, ingress.id).await?;

        Ok(IngressDetail {
            ingress,
            transaction,
            category,
            tags,
        })
    }
}
