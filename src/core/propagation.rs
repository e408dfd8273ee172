//! Propagation engine - the price cascade run after every ledger write.
//!
//! Two triggers exist:
//!
//! 1. A new price observation for a primary ingredient. If the observation was entered
//!    by a person (`signal_involved`), every composite ingredient related to a middle
//!    ingredient based on it receives a derived observation worth
//!    `trunc(price * unit_amount)`, marked as derived so it never cascades to further
//!    related ingredients. Then, for the observed ingredient and for every derived one,
//!    each final product using it gets a fresh cost snapshot when that cost is positive.
//! 2. A final product gaining ingredients, handled by [`refresh_product_cost`].
//!
//! The cascade is an explicit call made by the service layer inside the caller's
//! transaction: the trigger row and every derived row commit together.

use crate::{
    core::{composition, cost, ingredient, product},
    entities::{price_history, sell_price_history},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument, warn};

/// Everything one price write produced.
#[derive(Debug, Clone)]
pub struct CascadeReport {
    /// The observation that triggered the cascade
    pub observation: price_history::Model,
    /// Observations derived for related composite ingredients
    pub derived_prices: Vec<price_history::Model>,
    /// Cost snapshots appended for affected final products
    pub sell_prices: Vec<sell_price_history::Model>,
}

/// Records a hand-entered price for a primary ingredient and runs the full cascade.
///
/// # Errors
/// Returns an error if the price is negative, the ingredient does not exist, or any
/// write fails; in every case nothing is committed.
#[instrument(skip(db))]
pub async fn record_price(
    db: &DatabaseConnection,
    ingredient_id: i64,
    unit_price: i64,
) -> Result<CascadeReport> {
    let txn = db.begin().await?;
    let report = record_price_in(&txn, ingredient_id, unit_price, true).await?;
    txn.commit().await?;
    Ok(report)
}

/// Appends a price observation and runs its cascade on an existing connection or
/// transaction. Callers that need atomicity pass a transaction.
pub async fn record_price_in<C>(
    db: &C,
    ingredient_id: i64,
    unit_price: i64,
    signal_involved: bool,
) -> Result<CascadeReport>
where
    C: ConnectionTrait,
{
    if unit_price < 0 {
        #[allow(clippy::cast_precision_loss)]
        let amount = unit_price as f64;
        return Err(Error::InvalidAmount { amount });
    }
    ingredient::require_ingredient(db, ingredient_id).await?;

    let observation = append_observation(db, ingredient_id, unit_price, signal_involved).await?;
    let mut report = CascadeReport {
        observation: observation.clone(),
        derived_prices: Vec::new(),
        sell_prices: Vec::new(),
    };

    report
        .sell_prices
        .extend(refresh_products_using(db, ingredient_id).await?);

    if signal_involved {
        for line in composition::middle_ingredients_based_on(db, ingredient_id).await? {
            for related in ingredient::ingredients_related_to(db, line.id).await? {
                let derived_price = cost::line_cost(unit_price, line.unit_amount);
                let derived = append_observation(db, related.id, derived_price, false).await?;
                debug!(
                    "Derived price {} for '{}' from middle ingredient {}",
                    derived_price, related.name, line.id
                );
                report.derived_prices.push(derived);
                report
                    .sell_prices
                    .extend(refresh_products_using(db, related.id).await?);
            }
        }
    }

    Ok(report)
}

async fn append_observation<C>(
    db: &C,
    ingredient_id: i64,
    unit_price: i64,
    signal_involved: bool,
) -> Result<price_history::Model>
where
    C: ConnectionTrait,
{
    price_history::ActiveModel {
        unit_price: Set(unit_price),
        ingredient_id: Set(ingredient_id),
        signal_involved: Set(signal_involved),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

async fn append_snapshot<C>(
    db: &C,
    product_id: i64,
    sell_price: i64,
) -> Result<sell_price_history::Model>
where
    C: ConnectionTrait,
{
    sell_price_history::ActiveModel {
        sell_price: Set(sell_price),
        final_product_id: Set(product_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Recomputes every final product that uses the ingredient and snapshots positive costs.
///
/// Products with another ingredient still unpriced are skipped with a warning.
async fn refresh_products_using<C>(
    db: &C,
    ingredient_id: i64,
) -> Result<Vec<sell_price_history::Model>>
where
    C: ConnectionTrait,
{
    let line_ids: Vec<i64> = composition::middle_ingredients_based_on(db, ingredient_id)
        .await?
        .into_iter()
        .map(|line| line.id)
        .collect();

    let mut snapshots = Vec::new();
    for affected in product::products_containing(db, line_ids).await? {
        let total = match cost::product_cost(db, affected.id).await {
            Ok(total) => total,
            Err(Error::MissingPrice { ingredient }) => {
                warn!(
                    "Skipping cost of '{}': ingredient '{}' has no price yet",
                    affected.name, ingredient
                );
                continue;
            }
            Err(e) => return Err(e),
        };
        if total > 0 {
            snapshots.push(append_snapshot(db, affected.id, total).await?);
        } else {
            debug!("Cost of '{}' is {}, no snapshot taken", affected.name, total);
        }
    }
    Ok(snapshots)
}

/// Snapshots the cost of one product after its ingredient set changed.
///
/// With `guard_non_positive` unset the snapshot is taken whatever the cost; set, it
/// behaves like a price-triggered refresh and skips zero or negative costs.
///
/// # Errors
/// Fails with [`Error::MissingPrice`] when an ingredient of the product was never priced.
pub async fn refresh_product_cost<C>(
    db: &C,
    product_id: i64,
    guard_non_positive: bool,
) -> Result<Option<sell_price_history::Model>>
where
    C: ConnectionTrait,
{
    let total = cost::product_cost(db, product_id).await?;
    if guard_non_positive && total <= 0 {
        debug!("Cost of product {} is {}, no snapshot taken", product_id, total);
        return Ok(None);
    }
    Ok(Some(append_snapshot(db, product_id, total).await?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::product::{add_ingredients, create_product, sell_price_history};
    use crate::entities::CompositionKind;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_bread_example() -> Result<()> {
        let db = setup_test_db().await?;
        let (flour, bread) = setup_flour_and_bread(&db).await?;

        let report = record_price(&db, flour.id, 2000).await?;
        assert_eq!(report.sell_prices.len(), 1);
        assert_eq!(report.sell_prices[0].sell_price, 1000);
        assert_eq!(report.sell_prices[0].final_product_id, bread.id);
        assert!(report.derived_prices.is_empty());

        let history = sell_price_history(&db, bread.id).await?;
        let prices: Vec<i64> = history.iter().map(|s| s.sell_price).collect();
        assert_eq!(prices, vec![1000, 500]);
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_price_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let flour = create_test_ingredient(&db, "Flour").await?;
        let result = record_price(&db, flour.id, -5).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));
        assert!(ingredient::latest_price(&db, flour.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_ingredient_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = record_price(&db, 404, 10).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::IngredientNotFound { name: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_cost_is_not_snapshotted() -> Result<()> {
        let db = setup_test_db().await?;
        let (flour, bread) = setup_flour_and_bread(&db).await?;

        let report = record_price(&db, flour.id, 1).await?;
        // trunc(1 * 0.5) == 0
        assert!(report.sell_prices.is_empty());
        assert_eq!(sell_price_history(&db, bread.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_related_ingredients_receive_derived_prices() -> Result<()> {
        let db = setup_test_db().await?;
        let (milk, _cream, dough, milk_line) = setup_composite(&db).await?;
        let before = ingredient::price_history_for(&db, dough.id).await?.len();

        let report = record_price(&db, milk.id, 3001).await?;

        assert_eq!(report.derived_prices.len(), 1);
        let derived = &report.derived_prices[0];
        assert_eq!(derived.ingredient_id, dough.id);
        assert_eq!(derived.unit_price, cost::line_cost(3001, milk_line.unit_amount));
        assert_eq!(derived.unit_price, 1500);
        assert!(!derived.signal_involved);

        let history = ingredient::price_history_for(&db, dough.id).await?;
        assert_eq!(history.len(), before + 1);
        assert_eq!(history[0].unit_price, 1500);
        Ok(())
    }

    #[tokio::test]
    async fn test_one_derived_price_per_related_ingredient() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_priced_ingredient(&db, "Milk", 1000).await?;
        let yogurt = create_test_ingredient(&db, "Yogurt").await?;
        let cheese = create_test_ingredient(&db, "Cheese").await?;

        let for_yogurt = composition::create_middle_ingredient(
            &db,
            milk.id,
            0.5,
            CompositionKind::Primary,
        )
        .await?;
        let for_cheese = composition::create_middle_ingredient(
            &db,
            milk.id,
            0.25,
            CompositionKind::Primary,
        )
        .await?;
        composition::compose_ingredient(&db, yogurt.id, &[for_yogurt.id]).await?;
        composition::compose_ingredient(&db, cheese.id, &[for_cheese.id]).await?;

        let report = record_price(&db, milk.id, 2000).await?;
        let mut derived: Vec<(i64, i64)> = report
            .derived_prices
            .iter()
            .map(|p| (p.ingredient_id, p.unit_price))
            .collect();
        derived.sort_unstable();
        assert_eq!(derived, vec![(yogurt.id, 1000), (cheese.id, 500)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_derived_prices_do_not_cascade_further() -> Result<()> {
        let db = setup_test_db().await?;
        let (_milk, _cream, dough, _milk_line) = setup_composite(&db).await?;

        // a final-product line on the composite ingredient
        let dough_line = composition::create_middle_ingredient(
            &db,
            dough.id,
            1.0,
            CompositionKind::Final,
        )
        .await?;
        let pastry = create_product(&db, "Pastry").await?;
        add_ingredients(&db, false, pastry.id, &[dough_line.id]).await?;

        // derived observations do not walk related sets
        let report = record_price_in(&db, dough.id, 700, false).await?;
        assert!(report.derived_prices.is_empty());
        // but they still refresh product costs
        assert_eq!(report.sell_prices.len(), 1);
        assert_eq!(report.sell_prices[0].sell_price, 700);
        Ok(())
    }

    #[tokio::test]
    async fn test_derived_price_refreshes_products_of_related_ingredient() -> Result<()> {
        let db = setup_test_db().await?;
        let (milk, _cream, dough, _milk_line) = setup_composite(&db).await?;
        let dough_line = composition::create_middle_ingredient(
            &db,
            dough.id,
            0.5,
            CompositionKind::Final,
        )
        .await?;
        let pastry = create_product(&db, "Pastry").await?;
        add_ingredients(&db, false, pastry.id, &[dough_line.id]).await?;

        let report = record_price(&db, milk.id, 4000).await?;
        // dough = trunc(4000 * 0.5) = 2000, pastry = trunc(2000 * 0.5) = 1000
        assert_eq!(report.derived_prices[0].unit_price, 2000);
        let pastry_snapshots: Vec<i64> = report
            .sell_prices
            .iter()
            .filter(|s| s.final_product_id == pastry.id)
            .map(|s| s.sell_price)
            .collect();
        assert_eq!(pastry_snapshots, vec![1000]);
        Ok(())
    }

    #[tokio::test]
    async fn test_product_with_unpriced_ingredient_is_skipped() -> Result<()> {
        let db = setup_test_db().await?;
        let (flour, bread) = setup_flour_and_bread(&db).await?;
        let salt = create_test_ingredient(&db, "Salt").await?;
        let salt_line = create_test_middle(&db, salt.id, 0.1).await?;

        // Salt is unpriced: adding it through the service fails and rolls back
        assert!(add_ingredients(&db, false, bread.id, &[salt_line.id]).await.is_err());

        // link it directly, as an operator editing the recipe table would
        crate::entities::final_product_ingredient::ActiveModel {
            final_product_id: Set(bread.id),
            middle_ingredient_id: Set(salt_line.id),
        }
        .insert(&db)
        .await?;

        let buns = create_product(&db, "Buns").await?;
        let flour_line = create_test_middle(&db, flour.id, 1.0).await?;
        add_ingredients(&db, false, buns.id, &[flour_line.id]).await?;

        let report = record_price(&db, flour.id, 3000).await?;
        let snapshots: Vec<(i64, i64)> = report
            .sell_prices
            .iter()
            .map(|s| (s.final_product_id, s.sell_price))
            .collect();
        assert_eq!(snapshots, vec![(buns.id, 3000)]);

        // once salt is priced, bread is costed again: 1500 + trunc(50 * 0.1)
        let report = record_price(&db, salt.id, 50).await?;
        assert_eq!(report.sell_prices.len(), 1);
        assert_eq!(report.sell_prices[0].final_product_id, bread.id);
        assert_eq!(report.sell_prices[0].sell_price, 1505);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_product_cost_guard() -> Result<()> {
        let db = setup_test_db().await?;
        let (flour, bread) = setup_flour_and_bread(&db).await?;
        record_price(&db, flour.id, 0).await?;

        assert!(refresh_product_cost(&db, bread.id, true).await?.is_none());
        let unguarded = refresh_product_cost(&db, bread.id, false).await?.unwrap();
        assert_eq!(unguarded.sell_price, 0);
        Ok(())
    }
}
