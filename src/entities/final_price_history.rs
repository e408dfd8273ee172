//! Final price history entity - menu prices declared by hand for a final product.
//!
//! Independent of the computed cost; the difference between the two is the profit
//! reported by the menu exporter.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Final (declared) price history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "final_price_history")]
pub struct Model {
    /// Unique identifier for the declaration
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Declared menu price, never negative
    pub sell_price: i64,
    /// ID of the final product
    pub final_product_id: i64,
    /// When the price was declared
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `FinalPriceHistory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each declaration belongs to one final product
    #[sea_orm(
        belongs_to = "super::final_product::Entity",
        from = "Column::FinalProductId",
        to = "super::final_product::Column::Id",
        on_delete = "Cascade"
    )]
    FinalProduct,
}

impl Related<super::final_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinalProduct.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
