//! Guard triggers that make foreign key violations name their constraint.
//!
//! See [`crate::foreign_keys`] for the generated statements.

use sea_orm_migration::prelude::*;

use crate::FOREIGN_KEYS;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for key in FOREIGN_KEYS {
            for statement in key.create_triggers() {
                db.execute_unprepared(&statement).await?;
            }
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for key in FOREIGN_KEYS {
            for trigger in key.trigger_names() {
                db.execute_unprepared(&format!("DROP TRIGGER IF EXISTS {trigger};"))
                    .await?;
            }
        }
        Ok(())
    }
}
