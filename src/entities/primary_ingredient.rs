//! Primary ingredient entity - a raw purchased item with a unit price.
//!
//! A primary ingredient may itself be composite: its related middle ingredients
//! (see [`super::related_ingredient`]) describe what it is made of. Prices live in
//! [`super::price_history`], never on this row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary ingredient database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "primary_ingredients")]
pub struct Model {
    /// Unique identifier for the ingredient
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ingredient name (e.g., "Flour"), unique across the ledger
    #[sea_orm(unique)]
    pub name: String,
    /// ID of the unit the ingredient is priced in
    pub unit_id: i64,
    /// When the ingredient was created
    pub created_at: DateTimeUtc,
    /// When the ingredient was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `PrimaryIngredient` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ingredient is measured in one unit
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
    /// One ingredient has many price observations
    #[sea_orm(has_many = "super::price_history::Entity")]
    PriceHistory,
    /// One ingredient is the base of many middle ingredients
    #[sea_orm(has_many = "super::middle_ingredient::Entity")]
    MiddleIngredients,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistory.def()
    }
}

impl Related<super::middle_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MiddleIngredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
