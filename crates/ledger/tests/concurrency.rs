mod common;

use tokio::task::JoinSet;

use common::{category, eur_account, ledger_with_file_db, now};
use ledger::{CategoryType, Currency, DomainError, Money, NewExpenditureCmd};

const WRITERS: i64 = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_expenditures_never_lose_a_debit() {
    let (ledger, db, path) = ledger_with_file_db().await;
    let account = eur_account(&ledger, 10_000).await;
    let groceries = category(&ledger, "Groceries", CategoryType::Expenditure).await;

    let mut tasks = JoinSet::new();
    for _ in 0..WRITERS {
        let ledger = ledger.clone();
        let cmd = NewExpenditureCmd::new(
            account.id,
            groceries.id,
            Money::new(100),
            Currency::eur(),
            now(),
        );
        tasks.spawn(async move { ledger.create_expenditure(cmd).await });
    }

    let mut committed = 0;
    while let Some(outcome) = tasks.join_next().await {
        match outcome.unwrap() {
            Ok(_) => committed += 1,
            Err(err) => assert_eq!(
                err.domain(),
                Some(DomainError::ConcurrentUpdate),
                "unexpected failure: {err}"
            ),
        }
    }
    assert!(committed >= 1);

    let stored = ledger.account(account.id).await.unwrap();
    assert_eq!(stored.current_balance, Money::new(10_000 - 100 * committed));
    assert_eq!(stored.version, account.version + committed);

    let transactions = ledger.list_transactions(account.id).await.unwrap();
    assert_eq!(transactions.len() as i64, committed);
    let mut balances: Vec<_> = transactions.iter().map(|tx| tx.balance_after).collect();
    balances.sort_unstable();
    balances.dedup();
    assert_eq!(balances.len() as i64, committed);

    drop(ledger);
    drop(db);
    let _ = std::fs::remove_file(&path);
}
