//! Price history entity - append-only unit price observations for primary ingredients.
//!
//! The current price of an ingredient is its most recent row by `created_at`, with the
//! row id breaking ties between observations recorded within the same clock tick.
//! `signal_involved` is `true` for observations entered by a person (or an import) and
//! `false` for observations derived by the propagation engine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    /// Unique identifier for the observation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Observed unit price in whole currency units
    pub unit_price: i64,
    /// ID of the primary ingredient this price belongs to
    pub ingredient_id: i64,
    /// Whether this observation should cascade to related ingredients
    pub signal_involved: bool,
    /// When the observation was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PriceHistory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each observation belongs to one primary ingredient
    #[sea_orm(
        belongs_to = "super::primary_ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::primary_ingredient::Column::Id",
        on_delete = "Cascade"
    )]
    PrimaryIngredient,
}

impl Related<super::primary_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrimaryIngredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
