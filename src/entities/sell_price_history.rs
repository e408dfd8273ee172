//! Sell price history entity - computed cost snapshots of a final product.
//!
//! Rows are appended by the propagation engine and never modified.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sell price history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sell_price_history")]
pub struct Model {
    /// Unique identifier for the snapshot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Computed cost at snapshot time
    pub sell_price: i64,
    /// ID of the final product
    pub final_product_id: i64,
    /// When the snapshot was taken
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `SellPriceHistory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one final product
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
