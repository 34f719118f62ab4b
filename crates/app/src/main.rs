use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use ledger::{
    AccountType, CategoryType, Currency, Ledger, LedgerError, Money, NewAccountCmd,
    NewCategoryCmd, NewExpenditureCmd, NewIngressCmd, NewMemberCmd, NewTagCmd,
};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "household")]
#[command(about = "Household ledger: accounts, categories, tags and money movements")]
struct Cli {
    /// Settings file, without extension.
    #[arg(long, default_value = "household")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bring the database schema up to date.
    Migrate,
    Member(Member),
    Account(Account),
    Category(Category),
    Tag(Tag),
    Expenditure(Expenditure),
    Ingress(Ingress),
}

#[derive(Args, Debug)]
struct Member {
    #[command(subcommand)]
    command: MemberCommand,
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    Add(MemberAddArgs),
}

#[derive(Args, Debug)]
struct MemberAddArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    nickname: Option<String>,
    #[arg(long)]
    role: Option<String>,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Add(AccountAddArgs),
    Show(IdArgs),
    Activate(IdArgs),
    Deactivate(IdArgs),
    Delete(IdArgs),
}

#[derive(Args, Debug)]
struct AccountAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type", value_parser = parse_account_type)]
    account_type: AccountType,
    #[arg(long, default_value = "EUR", value_parser = parse_currency)]
    currency: Currency,
    /// Opening balance, e.g. `120.50`.
    #[arg(long, default_value = "0", value_parser = parse_money)]
    initial_balance: Money,
    #[arg(long)]
    owner: Option<Uuid>,
    #[arg(long)]
    inactive: bool,
}

#[derive(Args, Debug)]
struct IdArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    Add(CategoryAddArgs),
    Delete(IdArgs),
}

#[derive(Args, Debug)]
struct CategoryAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type", value_parser = parse_category_type)]
    category_type: CategoryType,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Tag {
    #[command(subcommand)]
    command: TagCommand,
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    Add(TagAddArgs),
}

#[derive(Args, Debug)]
struct TagAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type")]
    tag_type: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Expenditure {
    #[command(subcommand)]
    command: EntryCommand,
}

#[derive(Args, Debug)]
struct Ingress {
    #[command(subcommand)]
    command: EntryCommand,
}

#[derive(Subcommand, Debug)]
enum EntryCommand {
    Add(EntryAddArgs),
}

#[derive(Args, Debug)]
struct EntryAddArgs {
    #[arg(long)]
    account: Uuid,
    #[arg(long)]
    category: Uuid,
    #[arg(long, value_parser = parse_money)]
    amount: Money,
    #[arg(long, default_value = "EUR", value_parser = parse_currency)]
    currency: Currency,
    /// RFC 3339 timestamp, defaults to now.
    #[arg(long)]
    date: Option<DateTime<Utc>>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "tag")]
    tags: Vec<Uuid>,
    /// Expenditures only.
    #[arg(long)]
    declared: bool,
    /// Expenditures only.
    #[arg(long)]
    planned: bool,
}

fn parse_account_type(raw: &str) -> Result<AccountType, String> {
    AccountType::try_from(raw).map_err(|err| err.to_string())
}

fn parse_category_type(raw: &str) -> Result<CategoryType, String> {
    CategoryType::try_from(raw).map_err(|err| err.to_string())
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_money(raw: &str) -> Result<Money, String> {
    raw.parse().map_err(|err: ledger::DomainError| err.to_string())
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match settings::Settings::new(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("invalid settings: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "household={level},ledger={level},migration={level}",
            level = settings.app.level
        )))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &settings.database).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(AppError::Ledger(err)) if err.is_domain() => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, database: &settings::Database) -> Result<String, AppError> {
    let db = sea_orm::Database::connect(database.url()).await?;
    Migrator::up(&db, None).await?;
    tracing::debug!("database ready");

    let ledger = Ledger::builder().database(db).build().await?;
    let now = Utc::now();

    match command {
        Command::Migrate => json(&serde_json::json!({ "migrated": true })),
        Command::Member(Member {
            command: MemberCommand::Add(args),
        }) => {
            let mut cmd = NewMemberCmd::new(args.first_name);
            cmd.last_name = args.last_name;
            cmd.nickname = args.nickname;
            cmd.role = args.role;
            json(&ledger.create_member(cmd).await?)
        }
        Command::Account(Account { command }) => match command {
            AccountCommand::Add(args) => {
                let mut cmd = NewAccountCmd::new(args.name, args.account_type, args.currency)
                    .initial_balance(args.initial_balance)
                    .active(!args.inactive);
                cmd.owner_id = args.owner;
                json(&ledger.create_account(cmd).await?)
            }
            AccountCommand::Show(IdArgs { id }) => json(&ledger.account(id).await?),
            AccountCommand::Activate(IdArgs { id }) => {
                json(&ledger.activate_account(id).await?)
            }
            AccountCommand::Deactivate(IdArgs { id }) => {
                json(&ledger.deactivate_account(id).await?)
            }
            AccountCommand::Delete(IdArgs { id }) => {
                ledger.delete_account(id).await?;
                json(&serde_json::json!({ "deleted": id }))
            }
        },
        Command::Category(Category { command }) => match command {
            CategoryCommand::Add(args) => {
                let mut cmd = NewCategoryCmd::new(args.name, args.category_type);
                cmd.description = args.description;
                json(&ledger.create_category(cmd).await?)
            }
            CategoryCommand::Delete(IdArgs { id }) => {
                ledger.delete_category(id).await?;
                json(&serde_json::json!({ "deleted": id }))
            }
        },
        Command::Tag(Tag {
            command: TagCommand::Add(args),
        }) => {
            let mut cmd = NewTagCmd::new(args.name, args.tag_type);
            cmd.description = args.description;
            json(&ledger.create_tag(cmd).await?)
        }
        Command::Expenditure(Expenditure {
            command: EntryCommand::Add(args),
        }) => {
            let mut cmd = NewExpenditureCmd::new(
                args.account,
                args.category,
                args.amount,
                args.currency,
                args.date.unwrap_or(now),
            )
            .declared(args.declared)
            .planned(args.planned)
            .tags(args.tags);
            cmd.meta.description = args.description;
            json(&ledger.create_expenditure(cmd).await?)
        }
        Command::Ingress(Ingress {
            command: EntryCommand::Add(args),
        }) => {
            let mut cmd = NewIngressCmd::new(
                args.account,
                args.category,
                args.amount,
                args.currency,
                args.date.unwrap_or(now),
            )
            .tags(args.tags);
            cmd.meta.description = args.description;
            json(&ledger.create_ingress(cmd).await?)
        }
    }
}

fn json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}
