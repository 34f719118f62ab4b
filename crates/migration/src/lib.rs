pub use sea_orm_migration::prelude::*;

pub mod foreign_keys;
mod m20260301_000000_init;
mod m20260301_000001_foreign_key_guards;

pub use foreign_keys::{FOREIGN_KEYS, GuardedKey, OnDelete};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000000_init::Migration),
            Box::new(m20260301_000001_foreign_key_guards::Migration),
        ]
    }
}
