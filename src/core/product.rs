//! Final product business logic - menu items, their recipes and their price histories.
//!
//! Adding ingredients to a product is a cascade trigger: the edit and the resulting
//! cost snapshot are committed in one transaction (see [`add_ingredients`]).
//! Declared menu prices are entered by hand and never touched by the cascade.

use crate::{
    core::{composition, propagation},
    entities::{
        FinalPriceHistory, FinalProduct, FinalProductIngredient, MiddleIngredient,
        SellPriceHistory, final_price_history, final_product, final_product_ingredient,
        middle_ingredient, sell_price_history,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Lists every final product, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<final_product::Model>> {
    FinalProduct::find()
        .order_by_asc(final_product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a final product by its exact name.
pub async fn get_product_by_name<C>(db: &C, name: &str) -> Result<Option<final_product::Model>>
where
    C: ConnectionTrait,
{
    FinalProduct::find()
        .filter(final_product::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a final product by id.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<final_product::Model>>
where
    C: ConnectionTrait,
{
    FinalProduct::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_product_by_id`] but a missing row is an error.
pub async fn require_product<C>(db: &C, product_id: i64) -> Result<final_product::Model>
where
    C: ConnectionTrait,
{
    get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })
}

/// Creates a final product with an empty recipe.
///
/// # Errors
/// Returns an error if the name is blank or already taken.
pub async fn create_product<C>(db: &C, name: &str) -> Result<final_product::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Product name cannot be empty".to_string(),
        });
    }

    let now = chrono::Utc::now();
    let product = final_product::ActiveModel {
        name: Set(name.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Returns the middle ingredients making up a product, in the order they were added.
pub async fn product_ingredients<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<middle_ingredient::Model>>
where
    C: ConnectionTrait,
{
    let middle_ids: Vec<i64> = FinalProductIngredient::find()
        .filter(final_product_ingredient::Column::FinalProductId.eq(product_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.middle_ingredient_id)
        .collect();

    if middle_ids.is_empty() {
        return Ok(Vec::new());
    }

    MiddleIngredient::find()
        .filter(middle_ingredient::Column::Id.is_in(middle_ids))
        .order_by_asc(middle_ingredient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns every product whose recipe contains one of the given middle ingredients.
pub async fn products_containing<C>(
    db: &C,
    middle_ingredient_ids: Vec<i64>,
) -> Result<Vec<final_product::Model>>
where
    C: ConnectionTrait,
{
    if middle_ingredient_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut product_ids: Vec<i64> = FinalProductIngredient::find()
        .filter(final_product_ingredient::Column::MiddleIngredientId.is_in(middle_ingredient_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.final_product_id)
        .collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    if product_ids.is_empty() {
        return Ok(Vec::new());
    }

    FinalProduct::find()
        .filter(final_product::Column::Id.is_in(product_ids))
        .order_by_asc(final_product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds middle ingredients to a product's recipe and records the new computed cost.
///
/// Ingredients already in the recipe, or repeated in `middle_ingredient_ids`, are
/// ignored. When at least one ingredient is new, a cost snapshot is appended;
/// `guard_non_positive` decides whether a zero or negative cost is still recorded. The edit and the snapshot commit together or not at all.
///
/// # Errors
/// Returns an error if the product or a middle ingredient does not exist, or if a
/// composed ingredient has never been priced.
#[instrument(skip(db, middle_ingredient_ids))]
pub async fn add_ingredients(
    db: &DatabaseConnection,
    guard_non_positive: bool,
    product_id: i64,
    middle_ingredient_ids: &[i64],
) -> Result<Option<sell_price_history::Model>> {
    let txn = db.begin().await?;

    require_product(&txn, product_id).await?;
    let mut existing: Vec<i64> = product_ingredients(&txn, product_id)
        .await?
        .into_iter()
        .map(|line| line.id)
        .collect();

    let mut added = 0;
    for &middle_id in middle_ingredient_ids {
        composition::require_middle_ingredient(&txn, middle_id).await?;
        if existing.contains(&middle_id) {
            continue;
        }
        final_product_ingredient::ActiveModel {
            final_product_id: Set(product_id),
            middle_ingredient_id: Set(middle_id),
        }
        .insert(&txn)
        .await?;
        existing.push(middle_id);
        added += 1;
    }

    if added == 0 {
        txn.commit().await?;
        return Ok(None);
    }

    touch_product(&txn, product_id).await?;
    let snapshot =
        propagation::refresh_product_cost(&txn, product_id, guard_non_positive).await?;
    txn.commit().await?;

    info!("Added {} ingredient(s) to product {}", added, product_id);
    Ok(snapshot)
}

/// Removes a middle ingredient from a product's recipe.
///
/// Only additions trigger a cost snapshot; the next price change recomputes the cost.
pub async fn remove_ingredient(
    db: &DatabaseConnection,
    product_id: i64,
    middle_ingredient_id: i64,
) -> Result<bool> {
    let result = FinalProductIngredient::delete_many()
        .filter(final_product_ingredient::Column::FinalProductId.eq(product_id))
        .filter(final_product_ingredient::Column::MiddleIngredientId.eq(middle_ingredient_id))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        touch_product(db, product_id).await?;
    }
    Ok(result.rows_affected > 0)
}

async fn touch_product<C>(db: &C, product_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut product: final_product::ActiveModel = require_product(db, product_id).await?.into();
    product.updated_at = Set(chrono::Utc::now());
    product.update(db).await?;
    Ok(())
}

/// Records a hand-entered menu price for a product.
///
/// # Errors
/// Returns an error if the price is negative or the product does not exist.
pub async fn declare_price(
    db: &DatabaseConnection,
    product_id: i64,
    sell_price: i64,
) -> Result<final_price_history::Model> {
    if sell_price < 0 {
        #[allow(clippy::cast_precision_loss)]
        let amount = sell_price as f64;
        return Err(Error::InvalidAmount { amount });
    }

    require_product(db, product_id).await?;
    let declared = final_price_history::ActiveModel {
        sell_price: Set(sell_price),
        final_product_id: Set(product_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    declared.insert(db).await.map_err(Into::into)
}

/// Computed cost snapshots of a product, newest first.
pub async fn sell_price_history<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<sell_price_history::Model>>
where
    C: ConnectionTrait,
{
    SellPriceHistory::find()
        .filter(sell_price_history::Column::FinalProductId.eq(product_id))
        .order_by_desc(sell_price_history::Column::CreatedAt)
        .order_by_desc(sell_price_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Declared menu prices of a product, newest first.
pub async fn declared_price_history<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<final_price_history::Model>>
where
    C: ConnectionTrait,
{
    FinalPriceHistory::find()
        .filter(final_price_history::Column::FinalProductId.eq(product_id))
        .order_by_desc(final_price_history::Column::CreatedAt)
        .order_by_desc(final_price_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Most recent strictly positive computed cost, if any.
pub async fn latest_sell_price<C>(db: &C, product_id: i64) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    Ok(SellPriceHistory::find()
        .filter(sell_price_history::Column::FinalProductId.eq(product_id))
        .filter(sell_price_history::Column::SellPrice.gt(0))
        .order_by_desc(sell_price_history::Column::CreatedAt)
        .order_by_desc(sell_price_history::Column::Id)
        .one(db)
        .await?
        .map(|row| row.sell_price))
}

/// Most recent strictly positive declared menu price, if any.
pub async fn latest_declared_price<C>(db: &C, product_id: i64) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    Ok(FinalPriceHistory::find()
        .filter(final_price_history::Column::FinalProductId.eq(product_id))
        .filter(final_price_history::Column::SellPrice.gt(0))
        .order_by_desc(final_price_history::Column::CreatedAt)
        .order_by_desc(final_price_history::Column::Id)
        .one(db)
        .await?
        .map(|row| row.sell_price))
}
