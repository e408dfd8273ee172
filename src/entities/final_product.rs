//! Final product entity - a menu item composed of middle ingredients.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Final product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "final_products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Menu name (e.g., "Bread"), unique across the ledger
    #[sea_orm(unique)]
    pub name: String,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `FinalProduct` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many computed cost snapshots
    #[sea_orm(has_many = "super::sell_price_history::Entity")]
    SellPrices,
    /// One product has many declared menu prices
    #[sea_orm(has_many = "super::final_price_history::Entity")]
    FinalPrices,
}

impl Related<super::sell_price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellPrices.def()
    }
}

impl Related<super::final_price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinalPrices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
