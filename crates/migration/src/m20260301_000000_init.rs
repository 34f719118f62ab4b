//! Initial schema migration - creates all tables from scratch.
//!
//! - `currencies`: reference data, seeded here and never deleted
//! - `household_members`: people sharing the household
//! - `accounts`: places where money is kept, with a version column for
//!   optimistic concurrency
//! - `categories`, `tags`: classification of money movements
//! - `transactions`: one balance movement on one account
//! - `expenditures`, `ingresses`, `transfers`, `savings_goals`: records
//!   bound to transactions and categories
//! - `expenditure_tags`, `ingress_tags`: tag links
//!
//! Every foreign key carries the name listed in
//! [`FOREIGN_KEYS`](crate::FOREIGN_KEYS).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Currencies {
    Table,
    Code,
    Name,
    MinorUnits,
}

#[derive(Iden)]
enum HouseholdMembers {
    Table,
    Id,
    FirstName,
    LastName,
    Nickname,
    Role,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    AccountType,
    Currency,
    InitialBalance,
    CurrentBalance,
    Active,
    OwnerId,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    Color,
    BackgroundColor,
    CategoryType,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
    Color,
    BackgroundColor,
    TagType,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    Amount,
    Currency,
    Date,
    Description,
    TransactionType,
    BalanceAfter,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Expenditures {
    Table,
    Id,
    CategoryId,
    TransactionId,
    Declared,
    Planned,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Ingresses {
    Table,
    Id,
    CategoryId,
    TransactionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transfers {
    Table,
    Id,
    CategoryId,
    SourceTransactionId,
    DestinationTransactionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SavingsGoals {
    Table,
    Id,
    Name,
    CategoryId,
    Currency,
    TargetAmount,
    CurrentAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ExpenditureTags {
    Table,
    ExpenditureId,
    TagId,
}

#[derive(Iden)]
enum IngressTags {
    Table,
    IngressId,
    TagId,
}

const SEED_CURRENCIES: &str = "INSERT INTO currencies (code, name, minor_units) VALUES \
    ('EUR', 'Euro', 2), \
    ('USD', 'US Dollar', 2), \
    ('GBP', 'Pound Sterling', 2), \
    ('CHF', 'Swiss Franc', 2), \
    ('JPY', 'Yen', 0);";

fn audit_columns<T: Iden + 'static>(
    table: &mut TableCreateStatement,
    created_at: T,
    updated_at: T,
) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Currencies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Code)
                            .string_len(3)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Currencies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Currencies::MinorUnits)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(SEED_CURRENCIES)
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Household members
        // ───────────────────────────────────────────────────────────────────
        let mut members = Table::create();
        members
            .table(HouseholdMembers::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(HouseholdMembers::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(HouseholdMembers::FirstName).string().not_null())
            .col(ColumnDef::new(HouseholdMembers::LastName).string())
            .col(ColumnDef::new(HouseholdMembers::Nickname).string())
            .col(ColumnDef::new(HouseholdMembers::Role).string())
            .col(
                ColumnDef::new(HouseholdMembers::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        audit_columns(
            &mut members,
            HouseholdMembers::CreatedAt,
            HouseholdMembers::UpdatedAt,
        );
        manager.create_table(members.to_owned()).await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Accounts
        // ───────────────────────────────────────────────────────────────────
        let mut accounts = Table::create();
        accounts
            .table(Accounts::Table)
            .if_not_exists()
            .col(ColumnDef::new(Accounts::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Accounts::Name).string().not_null())
            .col(ColumnDef::new(Accounts::AccountType).string().not_null())
            .col(ColumnDef::new(Accounts::Currency).string_len(3).not_null())
            .col(
                ColumnDef::new(Accounts::InitialBalance)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Accounts::CurrentBalance)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Accounts::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(Accounts::OwnerId).string())
            .col(
                ColumnDef::new(Accounts::Version)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_accounts_owner_id")
                    .from(Accounts::Table, Accounts::OwnerId)
                    .to(HouseholdMembers::Table, HouseholdMembers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_accounts_currency")
                    .from(Accounts::Table, Accounts::Currency)
                    .to(Currencies::Table, Currencies::Code)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        audit_columns(&mut accounts, Accounts::CreatedAt, Accounts::UpdatedAt);
        manager.create_table(accounts.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-owner_id")
                    .table(Accounts::Table)
                    .col(Accounts::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Categories
        // ───────────────────────────────────────────────────────────────────
        let mut categories = Table::create();
        categories
            .table(Categories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Categories::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Categories::Name).string().not_null())
            .col(ColumnDef::new(Categories::Description).string())
            .col(ColumnDef::new(Categories::Color).string())
            .col(ColumnDef::new(Categories::BackgroundColor).string())
            .col(ColumnDef::new(Categories::CategoryType).string().not_null())
            .col(
                ColumnDef::new(Categories::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        audit_columns(&mut categories, Categories::CreatedAt, Categories::UpdatedAt);
        manager.create_table(categories.to_owned()).await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Tags
        // ───────────────────────────────────────────────────────────────────
        let mut tags = Table::create();
        tags.table(Tags::Table)
            .if_not_exists()
            .col(ColumnDef::new(Tags::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Tags::Name).string().not_null())
            .col(ColumnDef::new(Tags::NameNorm).string().not_null())
            .col(ColumnDef::new(Tags::Description).string())
            .col(ColumnDef::new(Tags::Color).string())
            .col(ColumnDef::new(Tags::BackgroundColor).string())
            .col(ColumnDef::new(Tags::TagType).string().not_null());
        audit_columns(&mut tags, Tags::CreatedAt, Tags::UpdatedAt);
        manager.create_table(tags.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tags-name_norm-tag_type-unique")
                    .table(Tags::Table)
                    .col(Tags::NameNorm)
                    .col(Tags::TagType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Transactions
        // ───────────────────────────────────────────────────────────────────
        let mut transactions = Table::create();
        transactions
            .table(Transactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transactions::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Transactions::AccountId).string().not_null())
            .col(ColumnDef::new(Transactions::Amount).big_integer().not_null())
            .col(
                ColumnDef::new(Transactions::Currency)
                    .string_len(3)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transactions::Date)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(Transactions::Description).string())
            .col(
                ColumnDef::new(Transactions::TransactionType)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transactions::BalanceAfter)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(Transactions::Status).string().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_transactions_account_id")
                    .from(Transactions::Table, Transactions::AccountId)
                    .to(Accounts::Table, Accounts::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_transactions_currency")
                    .from(Transactions::Table, Transactions::Currency)
                    .to(Currencies::Table, Currencies::Code)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        audit_columns(
            &mut transactions,
            Transactions::CreatedAt,
            Transactions::UpdatedAt,
        );
        manager.create_table(transactions.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Expenditures and ingresses
        // ───────────────────────────────────────────────────────────────────
        let mut expenditures = Table::create();
        expenditures
            .table(Expenditures::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Expenditures::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Expenditures::CategoryId).string().not_null())
            .col(
                ColumnDef::new(Expenditures::TransactionId)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(Expenditures::Declared)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Expenditures::Planned)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_expenditures_category_id")
                    .from(Expenditures::Table, Expenditures::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_expenditures_transaction_id")
                    .from(Expenditures::Table, Expenditures::TransactionId)
                    .to(Transactions::Table, Transactions::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        audit_columns(
            &mut expenditures,
            Expenditures::CreatedAt,
            Expenditures::UpdatedAt,
        );
        manager.create_table(expenditures.to_owned()).await?;

        let mut ingresses = Table::create();
        ingresses
            .table(Ingresses::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Ingresses::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Ingresses::CategoryId).string().not_null())
            .col(
                ColumnDef::new(Ingresses::TransactionId)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_ingresses_category_id")
                    .from(Ingresses::Table, Ingresses::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_ingresses_transaction_id")
                    .from(Ingresses::Table, Ingresses::TransactionId)
                    .to(Transactions::Table, Transactions::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        audit_columns(&mut ingresses, Ingresses::CreatedAt, Ingresses::UpdatedAt);
        manager.create_table(ingresses.to_owned()).await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Transfers and savings goals
        // ───────────────────────────────────────────────────────────────────
        let mut transfers = Table::create();
        transfers
            .table(Transfers::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transfers::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Transfers::CategoryId).string().not_null())
            .col(
                ColumnDef::new(Transfers::SourceTransactionId)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transfers::DestinationTransactionId)
                    .string()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_transfers_category_id")
                    .from(Transfers::Table, Transfers::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_transfers_source_transaction_id")
                    .from(Transfers::Table, Transfers::SourceTransactionId)
                    .to(Transactions::Table, Transactions::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_transfers_destination_transaction_id")
                    .from(Transfers::Table, Transfers::DestinationTransactionId)
                    .to(Transactions::Table, Transactions::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        audit_columns(&mut transfers, Transfers::CreatedAt, Transfers::UpdatedAt);
        manager.create_table(transfers.to_owned()).await?;

        let mut savings_goals = Table::create();
        savings_goals
            .table(SavingsGoals::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(SavingsGoals::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(SavingsGoals::Name).string().not_null())
            .col(ColumnDef::new(SavingsGoals::CategoryId).string().not_null())
            .col(
                ColumnDef::new(SavingsGoals::Currency)
                    .string_len(3)
                    .not_null(),
            )
            .col(
                ColumnDef::new(SavingsGoals::TargetAmount)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(SavingsGoals::CurrentAmount)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_savings_goals_category_id")
                    .from(SavingsGoals::Table, SavingsGoals::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_savings_goals_currency")
                    .from(SavingsGoals::Table, SavingsGoals::Currency)
                    .to(Currencies::Table, Currencies::Code)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        audit_columns(
            &mut savings_goals,
            SavingsGoals::CreatedAt,
            SavingsGoals::UpdatedAt,
        );
        manager.create_table(savings_goals.to_owned()).await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Tag links
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenditureTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenditureTags::ExpenditureId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenditureTags::TagId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ExpenditureTags::ExpenditureId)
                            .col(ExpenditureTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenditure_tags_expenditure_id")
                            .from(ExpenditureTags::Table, ExpenditureTags::ExpenditureId)
                            .to(Expenditures::Table, Expenditures::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenditure_tags_tag_id")
                            .from(ExpenditureTags::Table, ExpenditureTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IngressTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IngressTags::IngressId).string().not_null())
                    .col(ColumnDef::new(IngressTags::TagId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(IngressTags::IngressId)
                            .col(IngressTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingress_tags_ingress_id")
                            .from(IngressTags::Table, IngressTags::IngressId)
                            .to(Ingresses::Table, Ingresses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingress_tags_tag_id")
                            .from(IngressTags::Table, IngressTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(IngressTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenditureTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingsGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenditures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HouseholdMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        Ok(())
    }
}
