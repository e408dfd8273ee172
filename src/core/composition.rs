//! Composition graph - middle ingredients and the make-up of composite primary ingredients.
//!
//! The graph is restricted to one extra tier: a primary ingredient may be composed of
//! middle ingredients, but only of middle ingredients whose base is a plain (non-composite)
//! primary ingredient. Every edit that could break this is rejected here, synchronously,
//! with [`Error::InvalidComposition`].

use crate::{
    core::{cost, ingredient, propagation},
    entities::{
        CompositionKind, MiddleIngredient, RelatedIngredient, middle_ingredient,
        related_ingredient,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Lists every middle ingredient in creation order.
pub async fn list_middle_ingredients(
    db: &DatabaseConnection,
) -> Result<Vec<middle_ingredient::Model>> {
    MiddleIngredient::find()
        .order_by_asc(middle_ingredient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a middle ingredient by id.
pub async fn get_middle_ingredient_by_id<C>(
    db: &C,
    middle_ingredient_id: i64,
) -> Result<Option<middle_ingredient::Model>>
where
    C: ConnectionTrait,
{
    MiddleIngredient::find_by_id(middle_ingredient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_middle_ingredient_by_id`] but a missing row is an error.
pub async fn require_middle_ingredient<C>(
    db: &C,
    middle_ingredient_id: i64,
) -> Result<middle_ingredient::Model>
where
    C: ConnectionTrait,
{
    get_middle_ingredient_by_id(db, middle_ingredient_id)
        .await?
        .ok_or(Error::MiddleIngredientNotFound {
            id: middle_ingredient_id,
        })
}

/// Middle ingredients consuming the given primary ingredient.
pub async fn middle_ingredients_based_on<C>(
    db: &C,
    ingredient_id: i64,
) -> Result<Vec<middle_ingredient::Model>>
where
    C: ConnectionTrait,
{
    MiddleIngredient::find()
        .filter(middle_ingredient::Column::BaseIngredientId.eq(ingredient_id))
        .order_by_asc(middle_ingredient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

fn validate_unit_amount(unit_amount: f64) -> Result<()> {
    if !unit_amount.is_finite() || !(0.0..=1.0).contains(&unit_amount) {
        return Err(Error::InvalidAmount {
            amount: unit_amount,
        });
    }
    Ok(())
}

async fn validate_line<C>(db: &C, base_ingredient_id: i64, kind: CompositionKind) -> Result<()>
where
    C: ConnectionTrait,
{
    let base = ingredient::require_ingredient(db, base_ingredient_id).await?;
    if kind == CompositionKind::Primary && ingredient::is_composite(db, base.id).await? {
        return Err(Error::InvalidComposition {
            message: format!(
                "'{}' is itself composed of other ingredients and cannot be used in a primary composition",
                base.name
            ),
        });
    }
    Ok(())
}

/// Creates a recipe line: `unit_amount` of the base ingredient.
///
/// # Errors
/// Returns an error if:
/// - `unit_amount` is not a finite number within [0, 1]
/// - The base ingredient does not exist
/// - `kind` is [`CompositionKind::Primary`] and the base ingredient is composite
pub async fn create_middle_ingredient<C>(
    db: &C,
    base_ingredient_id: i64,
    unit_amount: f64,
    kind: CompositionKind,
) -> Result<middle_ingredient::Model>
where
    C: ConnectionTrait,
{
    validate_unit_amount(unit_amount)?;
    validate_line(db, base_ingredient_id, kind).await?;

    let now = chrono::Utc::now();
    let line = middle_ingredient::ActiveModel {
        unit_amount: Set(unit_amount),
        base_ingredient_id: Set(base_ingredient_id),
        kind: Set(kind),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    line.insert(db).await.map_err(Into::into)
}

/// Changes the amount and tier tag of an existing recipe line.
///
/// The same validation as [`create_middle_ingredient`] applies.
pub async fn update_middle_ingredient(
    db: &DatabaseConnection,
    middle_ingredient_id: i64,
    unit_amount: f64,
    kind: CompositionKind,
) -> Result<middle_ingredient::Model> {
    validate_unit_amount(unit_amount)?;
    let existing = require_middle_ingredient(db, middle_ingredient_id).await?;
    validate_line(db, existing.base_ingredient_id, kind).await?;

    let mut line: middle_ingredient::ActiveModel = existing.into();
    line.unit_amount = Set(unit_amount);
    line.kind = Set(kind);
    line.updated_at = Set(chrono::Utc::now());
    line.update(db).await.map_err(Into::into)
}

/// Replaces the related set of a primary ingredient, making it composite.
///
/// When the new set is non-empty, the ingredient's price is recomputed from its
/// related middle ingredients and recorded as a regular observation, which cascades
/// like any hand-entered price. An empty set turns the ingredient back into a plain
/// one and records nothing. The edit and its cascade commit together.
///
/// # Errors
/// Returns [`Error::InvalidComposition`] if the ingredient would be composed of
/// itself, of a composite ingredient, or is already used where only plain
/// ingredients are allowed. Returns [`Error::MissingPrice`] if a component has never
/// been priced.
#[instrument(skip(db, middle_ingredient_ids))]
pub async fn compose_ingredient(
    db: &DatabaseConnection,
    ingredient_id: i64,
    middle_ingredient_ids: &[i64],
) -> Result<Option<propagation::CascadeReport>> {
    let txn = db.begin().await?;

    let target = ingredient::require_ingredient(&txn, ingredient_id).await?;
    let mut components = Vec::with_capacity(middle_ingredient_ids.len());
    for &middle_id in middle_ingredient_ids {
        let line = require_middle_ingredient(&txn, middle_id).await?;
        if line.base_ingredient_id == ingredient_id {
            return Err(Error::InvalidComposition {
                message: format!("'{}' cannot be composed of itself", target.name),
            });
        }
        if ingredient::is_composite(&txn, line.base_ingredient_id).await? {
            return Err(Error::InvalidComposition {
                message: format!(
                    "middle ingredient {middle_id} is based on a composite ingredient"
                ),
            });
        }
        if !components.iter().any(|c: &middle_ingredient::Model| c.id == line.id) {
            components.push(line);
        }
    }

    if !components.is_empty() {
        for usage in middle_ingredients_based_on(&txn, ingredient_id).await? {
            let in_related_set = !ingredient::ingredients_related_to(&txn, usage.id)
                .await?
                .is_empty();
            if usage.kind == CompositionKind::Primary || in_related_set {
                return Err(Error::InvalidComposition {
                    message: format!(
                        "'{}' is used to compose other ingredients and cannot become composite",
                        target.name
                    ),
                });
            }
        }
    }

    RelatedIngredient::delete_many()
        .filter(related_ingredient::Column::PrimaryIngredientId.eq(ingredient_id))
        .exec(&txn)
        .await?;
    for line in &components {
        related_ingredient::ActiveModel {
            primary_ingredient_id: Set(ingredient_id),
            middle_ingredient_id: Set(line.id),
        }
        .insert(&txn)
        .await?;
    }

    if components.is_empty() {
        txn.commit().await?;
        info!("'{}' is no longer composite", target.name);
        return Ok(None);
    }

    let price = cost::composite_ingredient_cost(&txn, ingredient_id).await?;
    let report = propagation::record_price_in(&txn, ingredient_id, price, true).await?;
    txn.commit().await?;

    info!(
        "'{}' composed of {} ingredient(s), priced at {}",
        target.name,
        components.len(),
        price
    );
    Ok(Some(report))
}
