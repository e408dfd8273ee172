//! Command-line layer - argument definitions, shared context and dispatch.
//!
//! Every subcommand is a thin wrapper over a [`crate::core`] operation: it resolves
//! names to ids, calls the operation and prints the outcome. Errors are returned to
//! `main`, which logs them and exits non-zero.

/// Command implementations organized by category
pub mod commands;

use crate::config::{AppConfig, settings::DEFAULT_CONFIG_PATH};
use clap::{Args, Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;

/// Shared data available to all commands.
pub struct CliData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded at start-up
    pub config: AppConfig,
}

impl CliData {
    /// Creates a new `CliData` from an open connection and loaded settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: AppConfig) -> Self {
        Self { database, config }
    }
}

/// menu-ledger -- ingredient prices, recipe costs and menu workbooks.
#[derive(Parser, Debug)]
#[command(
    name = "menu-ledger",
    about = "Restaurant pricing ledger",
    long_about = "Tracks ingredient prices, propagates them through recipes to menu items and exports priced menus as spreadsheets.",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Settings file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Database URL (default: sqlite://data/menu_ledger.sqlite?mode=rwc).
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage unit labels.
    Unit {
        #[command(subcommand)]
        command: UnitCommand,
    },

    /// Manage primary ingredients and their prices.
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommand,
    },

    /// Manage recipe lines (fractions of a primary ingredient).
    Middle {
        #[command(subcommand)]
        command: MiddleCommand,
    },

    /// Manage final products.
    Product {
        #[command(subcommand)]
        command: ProductCommand,
    },

    /// Import a price sheet.
    Import(FileArgs),

    /// Check a price sheet without importing it.
    Validate(FileArgs),

    /// Write the priced menu workbook.
    Export(ExportArgs),

    /// Write the latest ingredient prices as an importable price sheet.
    ExportPrices(FileArgs),

    /// Run a menu job: optional import, then export, then record the job.
    Menu(MenuArgs),

    /// List recorded menu jobs.
    Menus,

    /// Print cost, menu price and profit of every product.
    Report,
}

/// Unit subcommands.
#[derive(Subcommand, Debug)]
pub enum UnitCommand {
    /// Add a unit label (no-op if it exists).
    Add {
        /// Unit label, e.g. "kilo".
        title: String,
    },
    /// List unit labels.
    List,
}

/// Ingredient subcommands.
#[derive(Subcommand, Debug)]
pub enum IngredientCommand {
    /// Add a primary ingredient.
    Add {
        /// Unique ingredient name.
        name: String,
        /// Unit label; created when missing.
        #[arg(long, short)]
        unit: String,
    },
    /// List ingredients with their latest price.
    List,
    /// Record a new unit price and run the cascade.
    Price {
        /// Ingredient name.
        name: String,
        /// Price of one unit.
        unit_price: i64,
    },
    /// Show the price history of an ingredient, newest first.
    History {
        /// Ingredient name.
        name: String,
    },
    /// Set the recipe lines an ingredient is made of. No ids clears the composition.
    Compose {
        /// Ingredient name.
        name: String,
        /// Middle ingredient ids.
        middle_ids: Vec<i64>,
    },
}

/// Middle ingredient subcommands.
#[derive(Subcommand, Debug)]
pub enum MiddleCommand {
    /// Add a recipe line.
    Add(MiddleArgs),
    /// List recipe lines.
    List,
    /// Change the amount or tier of a recipe line.
    Update {
        /// Middle ingredient id.
        id: i64,
        #[command(flatten)]
        line: MiddleLineArgs,
    },
}

/// Arguments of `middle add`.
#[derive(Args, Debug)]
pub struct MiddleArgs {
    /// Base ingredient name.
    pub ingredient: String,
    #[command(flatten)]
    pub line: MiddleLineArgs,
}

/// Amount and tier of a recipe line.
#[derive(Args, Debug)]
pub struct MiddleLineArgs {
    /// Fraction of one unit, between 0 and 1.
    pub amount: f64,
    /// Use the line to compose another primary ingredient instead of a product.
    #[arg(long)]
    pub primary: bool,
}

/// Product subcommands.
#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Add a final product.
    Add {
        /// Unique product name.
        name: String,
    },
    /// List products with cost and menu price.
    List,
    /// Add recipe lines to a product and record its new cost.
    AddIngredient {
        /// Product name.
        name: String,
        /// Middle ingredient ids.
        #[arg(required = true)]
        middle_ids: Vec<i64>,
    },
    /// Remove a recipe line from a product.
    RemoveIngredient {
        /// Product name.
        name: String,
        /// Middle ingredient id.
        middle_id: i64,
    },
    /// Declare the menu price of a product.
    Declare {
        /// Product name.
        name: String,
        /// Menu price.
        price: i64,
    },
    /// Compute the current cost of a product from the latest prices.
    Cost {
        /// Product name.
        name: String,
    },
    /// Show the cost and menu price history of a product.
    History {
        /// Product name.
        name: String,
    },
}

/// A single spreadsheet path.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Spreadsheet path.
    pub file: PathBuf,
}

/// Arguments of `export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output path (default: a timestamped file in the export directory).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Arguments of `menu`.
#[derive(Args, Debug)]
pub struct MenuArgs {
    /// Price sheet to import before exporting.
    #[arg(long)]
    pub import: Option<PathBuf>,
}

/// Runs one parsed command and prints its output.
///
/// # Errors
/// Returns whatever error the underlying operation reports.
pub async fn run(command: Commands, data: &CliData) -> crate::errors::Result<()> {
    let output = execute(command, data).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Runs one parsed command and returns the text it would print.
pub async fn execute(command: Commands, data: &CliData) -> crate::errors::Result<String> {
    match command {
        Commands::Unit { command } => commands::unit::run(command, data).await,
        Commands::Ingredient { command } => commands::ingredient::run(command, data).await,
        Commands::Middle { command } => commands::middle::run(command, data).await,
        Commands::Product { command } => commands::product::run(command, data).await,
        Commands::Import(args) => commands::menu::import_sheet(&args, data).await,
        Commands::Validate(args) => commands::menu::validate_sheet(&args, data),
        Commands::Export(args) => commands::menu::export_menu(&args, data).await,
        Commands::ExportPrices(args) => commands::menu::export_prices(&args, data).await,
        Commands::Menu(args) => commands::menu::run_job(&args, data).await,
        Commands::Menus => commands::menu::list_jobs(data).await,
        Commands::Report => commands::menu::print_report(data).await,
    }
}
