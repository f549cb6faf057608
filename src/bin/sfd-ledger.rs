#![forbid(unsafe_code)]
//! Command-line host for the SFD account ledger

use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use sfd_ledger::config::{load_config, load_config_from, Config};
use sfd_ledger::{Account, AccountLedger, InMemoryStore, KeyValueStore, SqliteStore};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a config file (defaults to ./config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seeds the four demonstration accounts
    Init,
    /// Opens an account with a zero balance
    Create { id: String, tax_id: String },
    /// Shows an account
    Query {
        id: String,
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Adds an amount to an account balance
    Credit { id: String, amount: String },
    /// Subtracts an amount from an account balance
    Debit { id: String, amount: String },
    /// Dispatches a raw function name with string arguments
    Invoke {
        function: String,
        args: Vec<String>,
    },
}

fn open_state(config: &Config) -> Result<Box<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    if config.database.is_in_memory() {
        return Ok(Box::new(InMemoryStore::new()));
    }
    let db_path = Path::new(&config.database.path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data dir {:?}: {}", parent, e))?;
        }
    }
    Ok(Box::new(SqliteStore::open(&config.database.path)?))
}

fn print_account(account: &Account) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Value")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
        ]);
    let balance_color = if account.balance < 0.0 {
        TableColor::Red
    } else {
        TableColor::Green
    };
    table.add_row(vec![Cell::new("ID"), Cell::new(&account.id)]);
    table.add_row(vec![Cell::new("Number"), Cell::new(&account.number)]);
    table.add_row(vec![Cell::new("Tax ID"), Cell::new(&account.tax_id)]);
    table.add_row(vec![
        Cell::new("Balance"),
        Cell::new(format!("{:.2}", account.balance)).fg(balance_color),
    ]);
    table.add_row(vec![Cell::new("Status"), Cell::new(account.status)]);
    println!("{}", table);
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level()?)
        .with_writer(std::io::stderr)
        .init();
    info!(path = %config.database.path, "opening world state");

    let state = open_state(&config)?;
    let ledger = AccountLedger::new();

    match cli.command {
        Commands::Init => {
            ledger.init(&state)?;
            println!("{}", "✅ Seeded demonstration accounts".bright_green());
        }
        Commands::Create { id, tax_id } => {
            ledger.create(&state, &id, &tax_id)?;
            println!("{}", format!("✅ Account {} created", id).bright_green());
        }
        Commands::Query { id, json } => {
            let account = ledger.query(&state, &id)?;
            if json {
                println!("{}", serde_json::to_string(&account)?);
            } else {
                print_account(&account);
            }
        }
        Commands::Credit { id, amount } => {
            let account = ledger.credit(&state, &id, &amount)?;
            println!("{}", serde_json::to_string(&account)?);
        }
        Commands::Debit { id, amount } => {
            let account = ledger.debit(&state, &id, &amount)?;
            println!("{}", serde_json::to_string(&account)?);
        }
        Commands::Invoke { function, args } => {
            let payload = ledger.invoke(&state, &function, &args)?;
            if payload.is_empty() {
                println!("{}", format!("✅ {} succeeded", function).bright_green());
            } else {
                println!("{}", String::from_utf8_lossy(&payload));
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red().bold());
            ExitCode::FAILURE
        }
    }
}
