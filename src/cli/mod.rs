pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::store::FileStorage;

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Estate CLI - inspect and manage persisted entity stores")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Directory holding persisted stores (defaults to STORE_PERSIST_DIR)")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Query and modify persisted entity stores")]
    Store {
        #[command(subcommand)]
        cmd: commands::store::StoreCommands,
    },

    #[command(about = "Sample data generation")]
    Fixture {
        #[command(subcommand)]
        cmd: commands::fixture::FixtureCommands,
    },

    #[command(about = "Effective configuration")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

/// Entity kinds that have a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Accounts,
    Calendars,
    Expenses,
    Hotels,
    Listings,
    Locations,
    Notifications,
    Reservations,
    Tasks,
}

// Bind `$entity` to the model type for `$kind` and evaluate `$body`
macro_rules! with_entity {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            $crate::cli::EntityKind::Accounts => { type $entity = $crate::models::Account; $body }
            $crate::cli::EntityKind::Calendars => { type $entity = $crate::models::Calendar; $body }
            $crate::cli::EntityKind::Expenses => { type $entity = $crate::models::Expense; $body }
            $crate::cli::EntityKind::Hotels => { type $entity = $crate::models::Hotel; $body }
            $crate::cli::EntityKind::Listings => { type $entity = $crate::models::Listing; $body }
            $crate::cli::EntityKind::Locations => { type $entity = $crate::models::Location; $body }
            $crate::cli::EntityKind::Notifications => { type $entity = $crate::models::Notification; $body }
            $crate::cli::EntityKind::Reservations => { type $entity = $crate::models::Reservation; $body }
            $crate::cli::EntityKind::Tasks => { type $entity = $crate::models::Task; $body }
        }
    };
}
pub(crate) use with_entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let storage = match &cli.data_dir {
        Some(dir) => FileStorage::new(dir.clone()),
        None => FileStorage::from_config(),
    };

    let json = matches!(output_format, OutputFormat::Json);
    let result = match cli.command {
        Commands::Store { cmd } => commands::store::handle(cmd, &storage, output_format).await,
        Commands::Fixture { cmd } => commands::fixture::handle(cmd, &storage, output_format).await,
        Commands::Config { cmd } => commands::config::handle(cmd, output_format).await,
    };

    if let (true, Err(e)) = (json, &result) {
        let code = e.downcast_ref::<StoreError>().map(StoreError::error_code);
        utils::output_error(&OutputFormat::Json, &e.to_string(), code)?;
    }
    result
}
