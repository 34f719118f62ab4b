//! Schema tool for the household ledger database.
//!
//! ```text
//! migration [up|down|fresh|status|guards]
//! ```
//!
//! The database comes from `HOUSEHOLD_DATABASE_URL`, then `DATABASE_URL`,
//! then `./household.db`.

use std::collections::HashSet;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::prelude::*;

const DEFAULT_URL: &str = "sqlite:./household.db?mode=rwc";
const USAGE: &str = "usage: migration [up|down|fresh|status|guards]\n\
                     database: HOUSEHOLD_DATABASE_URL, DATABASE_URL or ./household.db";

fn database_url() -> String {
    ["HOUSEHOLD_DATABASE_URL", "DATABASE_URL"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

/// Guard triggers listed in [`migration::FOREIGN_KEYS`] but absent from the
/// database.
async fn missing_guards(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT name FROM sqlite_master WHERE type = 'trigger'",
        ))
        .await?;
    let present = rows
        .iter()
        .map(|row| row.try_get::<String>("", "name"))
        .collect::<Result<HashSet<_>, _>>()?;

    Ok(migration::FOREIGN_KEYS
        .iter()
        .flat_map(|key| key.trigger_names())
        .filter(|name| !present.contains(name))
        .collect())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let db = Database::connect(&database_url()).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, None).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        "guards" => {
            let missing = missing_guards(&db).await?;
            if missing.is_empty() {
                println!("all foreign key guards present");
            } else {
                for name in &missing {
                    eprintln!("missing guard trigger: {name}");
                }
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guards_follow_the_migrations() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        assert!(missing_guards(&db).await.unwrap().is_empty());

        migration::Migrator::down(&db, Some(1)).await.unwrap();
        let missing = missing_guards(&db).await.unwrap();
        let expected: usize = migration::FOREIGN_KEYS
            .iter()
            .map(|key| key.trigger_names().len())
            .sum();
        assert_eq!(missing.len(), expected);
        assert!(missing.contains(&"guard_fk_accounts_owner_id_insert".to_string()));
    }
}
