//! Cost computation - the pure arithmetic behind every computed price.
//!
//! A recipe line costs `trunc(unit_price * unit_amount)`; a product (or a composite
//! primary ingredient) costs the sum of its lines. Truncation happens per line, before
//! summing, so the total is always a sum of whole currency units.

use crate::{
    core::{ingredient, product},
    entities::{middle_ingredient, primary_ingredient},
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;

/// One priced recipe line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostLine {
    /// Latest unit price of the base ingredient
    pub unit_price: i64,
    /// Fraction of the unit consumed
    pub unit_amount: f64,
}

/// Cost of a single line, truncated toward zero.
#[must_use]
pub fn line_cost(unit_price: i64, unit_amount: f64) -> i64 {
    // Prices are whole currency units far below 2^53, so the f64 round trip is exact.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let cost = (unit_price as f64 * unit_amount).trunc() as i64;
    cost
}

/// Sum of the truncated line costs.
#[must_use]
pub fn total_cost(lines: &[CostLine]) -> i64 {
    lines
        .iter()
        .map(|line| line_cost(line.unit_price, line.unit_amount))
        .sum()
}

/// Prices each middle ingredient with its base ingredient's latest observation.
///
/// # Errors
/// Returns [`Error::MissingPrice`] for the first base ingredient with no price history.
pub async fn price_lines<C>(db: &C, lines: &[middle_ingredient::Model]) -> Result<Vec<CostLine>>
where
    C: ConnectionTrait,
{
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(observation) = ingredient::latest_price(db, line.base_ingredient_id).await? else {
            return Err(missing_price(db, line.base_ingredient_id).await);
        };
        priced.push(CostLine {
            unit_price: observation.unit_price,
            unit_amount: line.unit_amount,
        });
    }
    Ok(priced)
}

async fn missing_price<C>(db: &C, ingredient_id: i64) -> Error
where
    C: ConnectionTrait,
{
    let ingredient = match ingredient::get_ingredient_by_id(db, ingredient_id).await {
        Ok(Some(primary_ingredient::Model { name, .. })) => name,
        Ok(None) => ingredient_id.to_string(),
        Err(e) => return e,
    };
    Error::MissingPrice { ingredient }
}

/// Computed cost of a final product from the current price ledger.
///
/// # Errors
/// Fails with [`Error::MissingPrice`] if any composed ingredient was never priced,
/// and with [`Error::ProductNotFound`] if the product does not exist.
pub async fn product_cost<C>(db: &C, product_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    product::require_product(db, product_id).await?;
    let lines = product::product_ingredients(db, product_id).await?;
    let priced = price_lines(db, &lines).await?;
    Ok(total_cost(&priced))
}

/// Computed price of a composite primary ingredient from its related middle ingredients.
pub async fn composite_ingredient_cost<C>(db: &C, ingredient_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let lines = ingredient::related_middle_ingredients(db, ingredient_id).await?;
    let priced = price_lines(db, &lines).await?;
    Ok(total_cost(&priced))
}
