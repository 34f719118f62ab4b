#![allow(dead_code)]

use std::path::PathBuf;

use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use ledger::{
    Account, AccountType, Category, CategoryType, Currency, Ledger, Money, NewAccountCmd,
    NewCategoryCmd, NewTagCmd, Tag,
};
use migration::MigratorTrait;

pub async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db)
}

/// Ledger over a fresh SQLite file under `target/test_dbs`. The caller
/// removes the file.
pub async fn ledger_with_file_db() -> (Ledger, DatabaseConnection, PathBuf) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db, path)
}

pub async fn eur_account(ledger: &Ledger, balance: i64) -> Account {
    ledger
        .create_account(
            NewAccountCmd::new("Checking", AccountType::Bank, Currency::eur())
                .initial_balance(Money::new(balance)),
        )
        .await
        .unwrap()
}

pub async fn category(ledger: &Ledger, name: &str, category_type: CategoryType) -> Category {
    ledger
        .create_category(NewCategoryCmd::new(name, category_type))
        .await
        .unwrap()
}

pub async fn tag(ledger: &Ledger, name: &str, tag_type: &str) -> Tag {
    ledger
        .create_tag(NewTagCmd::new(name, tag_type))
        .await
        .unwrap()
}

pub fn now() -> chrono::DateTime<Utc> {
    Utc::now()
}
