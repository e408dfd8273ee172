use clap::Parser;
use dotenvy::dotenv;
use menu_ledger::{
    cli::{self, Cli, CliData},
    config::{database, settings},
    core::unit,
    errors::Result,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env before parsing so DATABASE_URL can come from it
    dotenv().ok();

    let args = Cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    // 3. Load the application configuration
    let app_config = settings::load_or_default(&args.config)?;

    // 4. Connect and make sure the schema exists
    let database_url = args.database_url.unwrap_or_else(database::get_database_url);
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed configured units
    unit::seed_units(&db, &app_config.units).await?;
    info!("Ledger ready");

    // 6. Run the command
    cli::run(args.command, &CliData::new(db, app_config)).await
}
