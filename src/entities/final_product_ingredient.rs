//! Join table linking final products to the middle ingredients they are made of.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Final product ingredient link model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "final_product_ingredients")]
pub struct Model {
    /// The final product
    #[sea_orm(primary_key, auto_increment = false)]
    pub final_product_id: i64,
    /// One of its middle ingredients
    #[sea_orm(primary_key, auto_increment = false)]
    pub middle_ingredient_id: i64,
}

/// Defines relationships between `FinalProductIngredient` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The final product
    #[sea_orm(
        belongs_to = "super::final_product::Entity",
        from = "Column::FinalProductId",
        to = "super::final_product::Column::Id",
        on_delete = "Cascade"
    )]
    FinalProduct,
    /// The middle ingredient
    #[sea_orm(
        belongs_to = "super::middle_ingredient::Entity",
        from = "Column::MiddleIngredientId",
        to = "super::middle_ingredient::Column::Id",
        on_delete = "Cascade"
    )]
    MiddleIngredient,
}

impl ActiveModelBehavior for ActiveModel {}
