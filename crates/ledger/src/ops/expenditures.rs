//! Expenditure use cases.
//!
//! Creating an expenditure checks its preconditions in a fixed order so the
//! error a caller sees is always the first violated one:
//!
//! 1. the account exists and is active,
//! 2. the category exists and is active,
//! 3. the currency is the account currency,
//! 4. the account balance covers the amount.
//!
//! Only then is anything written: the debit, the completed transaction with
//! its balance snapshot, the account, the expenditure and its tags. Tags are
//! resolved last; an unknown or mistyped tag aborts the whole unit of work.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    DomainError, Expenditure, ExpenditureDetail, ExpenditureFilter, NewExpenditureCmd,
    ResultLedger, TagType, Transaction, TransactionStatus, TransactionType,
    repository::{
        AccountRepository, CategoryRepository, ExpenditureRepository, Scope, TagRepository,
        TransactionRepository,
    },
};

use super::{Ledger, active_account, active_category, ensure_positive, resolve_tags, with_uow};

/// Create an expenditure and its transaction inside `scope`.
///
/// The amount must already be known to be positive.
pub async fn create_expenditure<S: Scope>(
    scope: &S,
    cmd: &NewExpenditureCmd,
    now: DateTime<Utc>,
) -> ResultLedger<ExpenditureDetail> {
    let mut account = active_account(scope, cmd.account_id).await?;
    let category = active_category(scope, cmd.category_id).await?;
    if cmd.currency != account.currency {
        return Err(DomainError::CurrencyMismatch.into());
    }
    if !account.has_sufficient_balance(cmd.amount) {
        return Err(DomainError::InsufficientBalance.into());
    }

    account.debit(cmd.amount);

    let transaction = Transaction::new(
        account.id,
        -cmd.amount,
        account.currency.clone(),
        cmd.meta.date,
        cmd.meta.description.clone(),
        TransactionType::Expenditure,
        account.current_balance,
        TransactionStatus::Completed,
        now,
    );
    scope.transactions().create(&transaction).await?;
    scope.accounts().update(&account).await?;

    let expenditure = Expenditure::new(
        category.id,
        transaction.id,
        cmd.declared,
        cmd.planned,
        now,
    );
    scope.expenditures().create(&expenditure).await?;

    let tags = resolve_tags(scope, &cmd.tag_ids, TagType::Expenditure).await?;
    let tag_ids: Vec<Uuid> = tags.iter().map(|tag| tag.id).collect();
    scope
        .tags()
        .link_tags_to_type(TagType::Expenditure, expenditure.id, &tag_ids)
        .await?;

    Ok(ExpenditureDetail {
        expenditure,
        transaction,
        category,
        tags,
    })
}

/// Assemble an expenditure with its transaction, category and tags.
pub async fn expenditure_detail<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<ExpenditureDetail> {
    let expenditure = scope
        .expenditures()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::ExpenditureNotFound))?;
    let transaction = scope
        .transactions()
        .get_by_id(expenditure.transaction_id)
        .await
        .map_err(|err| err.not_found_as(DomainError::TransactionNotFound))?;
    let category = scope
        .categories()
        .get_by_id(expenditure.category_id)
        .await
        .map_err(|err| err.not_found_as(DomainError::CategoryNotFound))?;
    let tags = scope
        .tags()
        .linked_to(TagType::Expenditure, expenditure.id)
        .await?;

    Ok(ExpenditureDetail {
        expenditure,
        transaction,
        category,
        tags,
    })
}

impl Ledger {
    /// Spend money from an account.
    ///
    /// Debits the account, records a completed transaction and links the
    /// requested tags, all or nothing.
    pub async fn create_expenditure(
        &self,
        cmd: NewExpenditureCmd,
    ) -> ResultLedger<ExpenditureDetail> {
        ensure_positive(cmd.amount)?;
        let now = Utc::now();
        with_uow!(self, |scope| create_expenditure(scope, &cmd, now).await)
    }

    pub async fn expenditure(&self, id: Uuid) -> ResultLedger<ExpenditureDetail> {
        expenditure_detail(&self.store(), id).await
    }

    pub async fn find_expenditures(
        &self,
        filter: &ExpenditureFilter,
    ) -> ResultLedger<Vec<Expenditure>> {
        self.store().expenditures().find_expenditures(filter).await
    }
}
