//! Shared test utilities for the pricing ledger.
//!
//! Helpers for setting up an in-memory database and the handful of ingredient and
//! product graphs the tests keep coming back to.

use crate::{
    core::{composition, ingredient, product, propagation},
    entities::{self, CompositionKind},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an unpriced primary ingredient measured in `kilo`.
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::primary_ingredient::Model> {
    ingredient::create_ingredient(db, name, "kilo").await
}

/// Creates a primary ingredient and records one hand-entered price for it.
pub async fn create_priced_ingredient(
    db: &DatabaseConnection,
    name: &str,
    unit_price: i64,
) -> Result<entities::primary_ingredient::Model> {
    let created = create_test_ingredient(db, name).await?;
    propagation::record_price(db, created.id, unit_price).await?;
    Ok(created)
}

/// Creates a final-product recipe line using `unit_amount` of the base ingredient.
pub async fn create_test_middle(
    db: &DatabaseConnection,
    base_ingredient_id: i64,
    unit_amount: f64,
) -> Result<entities::middle_ingredient::Model> {
    composition::create_middle_ingredient(db, base_ingredient_id, unit_amount, CompositionKind::Final)
        .await
}

/// Flour priced at 1000 and Bread made of half a unit of it.
///
/// Bread starts with a single cost snapshot of 500.
/// Returns (flour, bread).
pub async fn setup_flour_and_bread(
    db: &DatabaseConnection,
) -> Result<(
    entities::primary_ingredient::Model,
    entities::final_product::Model,
)> {
    let flour = create_priced_ingredient(db, "Flour", 1000).await?;
    let line = create_test_middle(db, flour.id, 0.5).await?;
    let bread = product::create_product(db, "Bread").await?;
    product::add_ingredients(db, false, bread.id, &[line.id]).await?;
    Ok((flour, bread))
}

/// Milk priced at 1000, Cream at 2000, and Dough composed of half a unit of Milk.
///
/// Composing Dough records a price of 500 for it.
/// Returns (milk, cream, dough, the milk line Dough is composed of).
pub async fn setup_composite(
    db: &DatabaseConnection,
) -> Result<(
    entities::primary_ingredient::Model,
    entities::primary_ingredient::Model,
    entities::primary_ingredient::Model,
    entities::middle_ingredient::Model,
)> {
    let milk = create_priced_ingredient(db, "Milk", 1000).await?;
    let cream = create_priced_ingredient(db, "Cream", 2000).await?;
    let dough = create_test_ingredient(db, "Dough").await?;
    let milk_line =
        composition::create_middle_ingredient(db, milk.id, 0.5, CompositionKind::Primary).await?;
    composition::compose_ingredient(db, dough.id, &[milk_line.id]).await?;
    Ok((milk, cream, dough, milk_line))
}
