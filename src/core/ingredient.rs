//! Primary ingredient business logic - creation, lookups and the price ledger reads.
//!
//! Writing a price goes through [`crate::core::propagation::record_price`], which owns
//! the cascade. Everything here is read-only on the price ledger.

use crate::{
    core::unit,
    entities::{
        MiddleIngredient, PriceHistory, PrimaryIngredient, RelatedIngredient, middle_ingredient,
        price_history, primary_ingredient, related_ingredient,
    },
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Lists every primary ingredient, ordered alphabetically by name.
pub async fn list_ingredients(db: &DatabaseConnection) -> Result<Vec<primary_ingredient::Model>> {
    PrimaryIngredient::find()
        .order_by_asc(primary_ingredient::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a primary ingredient by its exact name.
pub async fn get_ingredient_by_name<C>(
    db: &C,
    name: &str,
) -> Result<Option<primary_ingredient::Model>>
where
    C: ConnectionTrait,
{
    PrimaryIngredient::find()
        .filter(primary_ingredient::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a primary ingredient by id.
pub async fn get_ingredient_by_id<C>(
    db: &C,
    ingredient_id: i64,
) -> Result<Option<primary_ingredient::Model>>
where
    C: ConnectionTrait,
{
    PrimaryIngredient::find_by_id(ingredient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_ingredient_by_id`] but a missing row is an error.
pub async fn require_ingredient<C>(db: &C, ingredient_id: i64) -> Result<primary_ingredient::Model>
where
    C: ConnectionTrait,
{
    get_ingredient_by_id(db, ingredient_id)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        })
}

/// Creates a primary ingredient measured in `unit_title`, creating the unit if needed.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The unit title is empty
/// - The database insert fails (including a duplicate name)
pub async fn create_ingredient<C>(
    db: &C,
    name: &str,
    unit_title: &str,
) -> Result<primary_ingredient::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Ingredient name cannot be empty".to_string(),
        });
    }

    let unit = unit::get_or_create_unit(db, unit_title).await?;
    let now = chrono::Utc::now();

    let ingredient = primary_ingredient::ActiveModel {
        name: Set(name.trim().to_string()),
        unit_id: Set(unit.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    ingredient.insert(db).await.map_err(Into::into)
}

/// Returns the named ingredient, creating it (and its unit) when absent.
///
/// An existing ingredient keeps its unit even if `unit_title` differs.
pub async fn get_or_create_ingredient<C>(
    db: &C,
    name: &str,
    unit_title: &str,
) -> Result<primary_ingredient::Model>
where
    C: ConnectionTrait,
{
    match get_ingredient_by_name(db, name).await? {
        Some(existing) => Ok(existing),
        None => create_ingredient(db, name, unit_title).await,
    }
}

/// Returns the most recent price observation for an ingredient, if any.
pub async fn latest_price<C>(db: &C, ingredient_id: i64) -> Result<Option<price_history::Model>>
where
    C: ConnectionTrait,
{
    PriceHistory::find()
        .filter(price_history::Column::IngredientId.eq(ingredient_id))
        .order_by_desc(price_history::Column::CreatedAt)
        .order_by_desc(price_history::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the full price history of an ingredient, newest first.
pub async fn price_history_for<C>(db: &C, ingredient_id: i64) -> Result<Vec<price_history::Model>>
where
    C: ConnectionTrait,
{
    PriceHistory::find()
        .filter(price_history::Column::IngredientId.eq(ingredient_id))
        .order_by_desc(price_history::Column::CreatedAt)
        .order_by_desc(price_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the middle ingredients a composite primary ingredient is made of.
pub async fn related_middle_ingredients<C>(
    db: &C,
    ingredient_id: i64,
) -> Result<Vec<middle_ingredient::Model>>
where
    C: ConnectionTrait,
{
    let middle_ids: Vec<i64> = RelatedIngredient::find()
        .filter(related_ingredient::Column::PrimaryIngredientId.eq(ingredient_id))
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

/// Whether the ingredient is composite, i.e. has a non-empty related set.
pub async fn is_composite<C>(db: &C, ingredient_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = RelatedIngredient::find()
        .filter(related_ingredient::Column::PrimaryIngredientId.eq(ingredient_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Returns the primary ingredients whose related set contains the given middle ingredient.
pub async fn ingredients_related_to<C>(
    db: &C,
    middle_ingredient_id: i64,
) -> Result<Vec<primary_ingredient::Model>>
where
    C: ConnectionTrait,
{
    let primary_ids: Vec<i64> = RelatedIngredient::find()
        .filter(related_ingredient::Column::MiddleIngredientId.eq(middle_ingredient_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.primary_ingredient_id)
        .collect();

    if primary_ids.is_empty() {
        return Ok(Vec::new());
    }

    PrimaryIngredient::find()
        .filter(primary_ingredient::Column::Id.is_in(primary_ids))
        .order_by_asc(primary_ingredient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::propagation::record_price;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_ingredient_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_ingredient(&db, "", "kilo").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { message: _ }));

        let result = create_ingredient(&db, "   ", "kilo").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid input: Ingredient name cannot be empty"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_ingredient_creates_unit() -> Result<()> {
        let db = setup_test_db().await?;

        let flour = create_ingredient(&db, "  Flour ", "kilo").await?;
        assert_eq!(flour.name, "Flour");

        let unit = unit::get_unit_by_id(&db, flour.unit_id).await?.unwrap();
        assert_eq!(unit.title, "kilo");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_ingredient_name_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_ingredient(&db, "Flour", "kilo").await?;

        let result = create_ingredient(&db, "Flour", "gram").await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_ingredient_keeps_existing_unit() -> Result<()> {
        let db = setup_test_db().await?;
        let flour = create_ingredient(&db, "Flour", "kilo").await?;

        let again = get_or_create_ingredient(&db, "Flour", "gram").await?;
        assert_eq!(again.id, flour.id);
        assert_eq!(again.unit_id, flour.unit_id);
        assert_eq!(list_ingredients(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_latest_price_is_most_recent_observation() -> Result<()> {
        let db = setup_test_db().await?;
        let flour = create_ingredient(&db, "Flour", "kilo").await?;

        assert!(latest_price(&db, flour.id).await?.is_none());

        record_price(&db, flour.id, 1000).await?;
        record_price(&db, flour.id, 1200).await?;
        record_price(&db, flour.id, 900).await?;

        let latest = latest_price(&db, flour.id).await?.unwrap();
        assert_eq!(latest.unit_price, 900);
        assert!(latest.signal_involved);

        let history = price_history_for(&db, flour.id).await?;
        let prices: Vec<i64> = history.iter().map(|p| p.unit_price).collect();
        assert_eq!(prices, vec![900, 1200, 1000]);

        Ok(())
    }

    #[tokio::test]
    async fn test_require_ingredient_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_ingredient(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::IngredientNotFound { name: _ }
        ));
        Ok(())
    }
}
