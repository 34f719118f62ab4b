mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{category, eur_account, ledger_with_db, now, tag};
use ledger::{
    AccountType, CategoryType, Currency, DomainError, ExpenditureFilter, Money, NewAccountCmd,
    NewExpenditureCmd, TransactionStatus, TransactionType,
};

#[tokio::test]
async fn spending_the_whole_balance_leaves_zero() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;

    let detail = ledger
        .create_expenditure(
            NewExpenditureCmd::new(
                account.id,
                groceries.id,
                Money::new(10_000),
                Currency::eur(),
                now(),
            )
            .description("weekly shopping"),
        )
        .await
        .unwrap();

    assert_eq!(detail.transaction.amount, Money::new(-10_000));
    assert_eq!(detail.transaction.balance_after, Money::ZERO);
    assert_eq!(detail.transaction.status, TransactionStatus::Completed);
    assert_eq!(detail.transaction.transaction_type, TransactionType::Expenditure);
    assert_eq!(
        detail.transaction.description.as_deref(),
        Some("weekly shopping")
    );
    assert_eq!(detail.category.id, groceries.id);
    assert!(detail.tags.is_empty());

    let account = ledger.account(account.id).await.unwrap();
    assert_eq!(account.current_balance, Money::ZERO);
    assert_eq!(account.initial_balance, Money::new(10_000));

    let transactions = ledger.list_transactions(account.id).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].balance_after, Money::ZERO);
}

#[tokio::test]
async fn overspending_by_one_cent_writes_nothing() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;

    let err = ledger
        .create_expenditure(NewExpenditureCmd::new(
            account.id,
            groceries.id,
            Money::new(10_001),
            Currency::eur(),
            now(),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.domain(), Some(DomainError::InsufficientBalance));
    let account = ledger.account(account.id).await.unwrap();
    assert_eq!(account.current_balance, Money::new(10_000));
    assert!(ledger.list_transactions(account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn amount_must_be_positive() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;

    for amount in [0, -500] {
        let err = ledger
            .create_expenditure(NewExpenditureCmd::new(
                account.id,
                groceries.id,
                Money::new(amount),
                Currency::eur(),
                now(),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.domain(), Some(DomainError::InvalidAmount));
    }
}

#[tokio::test]
async fn inactive_account_is_rejected_before_the_category() {
    let (ledger, _db) = ledger_with_db().await;
    let account = ledger
        .create_account(
            NewAccountCmd::new("Old", AccountType::Cash, Currency::eur())
                .initial_balance(Money::new(5_000))
                .active(false),
        )
        .await
        .unwrap();

    let err = ledger
        .create_expenditure(NewExpenditureCmd::new(
            account.id,
            Uuid::new_v4(),
            Money::new(20_000),
            Currency::eur(),
            now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::AccountInactive));
    assert_eq!(
        ledger.account(account.id).await.unwrap().current_balance,
        Money::new(5_000)
    );

    let err = ledger
        .create_expenditure(NewExpenditureCmd::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Money::new(20_000),
            Currency::eur(),
            now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::AccountNotFound));
}

#[tokio::test]
async fn category_must_exist_and_be_active() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let old = category(&ledger, "Old hobby", CategoryType::Expenditure).await;
    ledger.deactivate_category(old.id).await.unwrap();

    let err = ledger
        .create_expenditure(NewExpenditureCmd::new(
            account.id,
            Uuid::new_v4(),
            Money::new(20_000),
            Currency::eur(),
            now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::CategoryNotFound));

    let err = ledger
        .create_expenditure(NewExpenditureCmd::new(
            account.id,
            old.id,
            Money::new(20_000),
            Currency::eur(),
            now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::CategoryInactive));
    assert!(ledger.list_transactions(account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn currency_mismatch_is_checked_before_the_balance() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 100).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;

    let err = ledger
        .create_expenditure(NewExpenditureCmd::new(
            account.id,
            groceries.id,
            Money::new(1_000_000),
            Currency::try_from("USD").unwrap(),
            now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::CurrencyMismatch));
}

#[tokio::test]
async fn unknown_tag_rolls_back_the_debit() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;
    let food = tag(&ledger, "Food", "expenditure").await;

    let err = ledger
        .create_expenditure(
            NewExpenditureCmd::new(
                account.id,
                groceries.id,
                Money::new(2_500),
                Currency::eur(),
                now(),
            )
            .tags([food.id, Uuid::new_v4()]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::TagNotFound));

    let account = ledger.account(account.id).await.unwrap();
    assert_eq!(account.current_balance, Money::new(10_000));
    assert!(ledger.list_transactions(account.id).await.unwrap().is_empty());
    assert!(
        ledger
            .find_expenditures(&ExpenditureFilter::new().account(account.id))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn tags_of_another_type_are_rejected() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;
    let salary = tag(&ledger, "Salary", "ingress").await;

    let err = ledger
        .create_expenditure(
            NewExpenditureCmd::new(
                account.id,
                groceries.id,
                Money::new(2_500),
                Currency::eur(),
                now(),
            )
            .tags([salary.id]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::TagTypeMismatch));
    assert_eq!(
        ledger.account(account.id).await.unwrap().current_balance,
        Money::new(10_000)
    );
}

#[tokio::test]
async fn detail_resolves_tags_and_repeated_ids_link_once() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;
    let food = tag(&ledger, "Food", "expenditure").await;
    let weekly = tag(&ledger, "Weekly", "expenditure").await;

    let created = ledger
        .create_expenditure(
            NewExpenditureCmd::new(
                account.id,
                groceries.id,
                Money::new(4_200),
                Currency::eur(),
                now(),
            )
            .declared(true)
            .tags([food.id, weekly.id, food.id]),
        )
        .await
        .unwrap();
    assert_eq!(created.tags.len(), 2);

    let detail = ledger.expenditure(created.expenditure.id).await.unwrap();
    assert!(detail.expenditure.declared);
    assert!(!detail.expenditure.planned);
    assert_eq!(detail.transaction.id, created.transaction.id);
    assert_eq!(detail.category.name, "Groceries");

    let mut names: Vec<_> = detail.tags.iter().map(|tag| tag.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Food", "Weekly"]);

    let err = ledger.expenditure(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.domain(), Some(DomainError::ExpenditureNotFound));
}

#[tokio::test]
async fn find_expenditures_filters_by_date_and_flags() {
    let (ledger, _db) = ledger_with_db().await;
    let account = eur_account(&ledger, 100_000).await;
    let rent = category(&ledger, "Rent", CategoryType::Expenditure).await;
    let fun = category(&ledger, "Fun", CategoryType::Expenditure).await;
    let today = Utc::now();

    let last_month = ledger
        .create_expenditure(
            NewExpenditureCmd::new(
                account.id,
                rent.id,
                Money::new(50_000),
                Currency::eur(),
                today - Duration::days(30),
            )
            .planned(true),
        )
        .await
        .unwrap();
    let this_week = ledger
        .create_expenditure(NewExpenditureCmd::new(
            account.id,
            fun.id,
            Money::new(3_000),
            Currency::eur(),
            today - Duration::days(2),
        ))
        .await
        .unwrap();

    let all = ledger
        .find_expenditures(&ExpenditureFilter::new().account(account.id))
        .await
        .unwrap();
    let ids: Vec<_> = all.iter().map(|expenditure| expenditure.id).collect();
    assert_eq!(ids, [this_week.expenditure.id, last_month.expenditure.id]);

    let recent = ledger
        .find_expenditures(
            &ExpenditureFilter::new().between(today - Duration::days(7), today),
        )
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, this_week.expenditure.id);

    let planned = ledger
        .find_expenditures(&ExpenditureFilter::new().planned(true))
        .await
        .unwrap();
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].category_id, rent.id);

    let fun_only = ledger
        .find_expenditures(&ExpenditureFilter::new().category(fun.id).declared(false))
        .await
        .unwrap();
    assert_eq!(fun_only.len(), 1);

    assert_eq!(
        ledger.account(account.id).await.unwrap().current_balance,
        Money::new(47_000)
    );
}
