//! Command implementations organized by category.
//!
//! Handlers return the text to print so they can be exercised without a terminal.

/// Ingredient commands
pub mod ingredient;

/// Import, export, menu job and report commands
pub mod menu;

/// Recipe line commands
pub mod middle;

/// Final product commands
pub mod product;

/// Unit commands
pub mod unit;

use crate::{
    core::{ingredient as ingredients, product as products, propagation::CascadeReport},
    entities::{final_product, primary_ingredient},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Looks an ingredient up by name.
pub(crate) async fn find_ingredient(
    db: &DatabaseConnection,
    name: &str,
) -> Result<primary_ingredient::Model> {
    ingredients::get_ingredient_by_name(db, name)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            name: name.to_string(),
        })
}

/// Looks a product up by name.
pub(crate) async fn find_product(db: &DatabaseConnection, name: &str) -> Result<final_product::Model> {
    products::get_product_by_name(db, name)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: name.to_string(),
        })
}

pub(crate) fn format_timestamp(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Describes what a price change rippled into.
pub(crate) fn describe_cascade(report: &CascadeReport) -> String {
    let mut lines = Vec::new();
    for derived in &report.derived_prices {
        lines.push(format!(
            "  derived price {} for ingredient #{}",
            crate::core::report::format_price(derived.unit_price),
            derived.ingredient_id
        ));
    }
    for snapshot in &report.sell_prices {
        lines.push(format!(
            "  new cost {} for product #{}",
            crate::core::report::format_price(snapshot.sell_price),
            snapshot.final_product_id
        ));
    }
    lines.join("\n")
}
