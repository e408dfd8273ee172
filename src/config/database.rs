//! Database configuration module for the pricing ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    FinalPriceHistory, FinalProduct, FinalProductIngredient, Menu, MiddleIngredient, PriceHistory,
    PrimaryIngredient, RelatedIngredient, SellPriceHistory, Unit,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default database location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/menu_ledger.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// File path of a `sqlite://` URL, or `None` for in-memory and non-SQLite URLs.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Establishes a connection to the database named by `database_url`.
///
/// The parent directory of a file-backed `SQLite` database is created when missing.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let parent = sqlite_file_path(database_url).and_then(Path::parent);
    if let Some(parent) = parent.filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every ledger table that does not exist yet.
///
/// Parents are created before children so that foreign keys always point at an
/// existing table.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Unit).await?;
    create_table(db, &schema, PrimaryIngredient).await?;
    create_table(db, &schema, PriceHistory).await?;
    create_table(db, &schema, MiddleIngredient).await?;
    create_table(db, &schema, RelatedIngredient).await?;
    create_table(db, &schema, FinalProduct).await?;
    create_table(db, &schema, FinalProductIngredient).await?;
    create_table(db, &schema, SellPriceHistory).await?;
    create_table(db, &schema, FinalPriceHistory).await?;
    create_table(db, &schema, Menu).await?;

    info!("Database tables ensured");
    Ok(())
}
