//! Related ingredient join table - the composition of a composite primary ingredient.
//!
//! A row says "primary ingredient `primary_ingredient_id` is made (in part) of middle
//! ingredient `middle_ingredient_id`".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Related ingredient link model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "related_ingredients")]
pub struct Model {
    /// The composite primary ingredient
    #[sea_orm(primary_key, auto_increment = false)]
    pub primary_ingredient_id: i64,
    /// One of its composing middle ingredients
    #[sea_orm(primary_key, auto_increment = false)]
    pub middle_ingredient_id: i64,
}

/// Defines relationships between `RelatedIngredient` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The composite primary ingredient
    #[sea_orm(
        belongs_to = "super::primary_ingredient::Entity",
        from = "Column::PrimaryIngredientId",
        to = "super::primary_ingredient::Column::Id",
        on_delete = "Cascade"
    )]
    PrimaryIngredient,
    /// The composing middle ingredient
    #[sea_orm(
        belongs_to = "super::middle_ingredient::Entity",
        from = "Column::MiddleIngredientId",
        to = "super::middle_ingredient::Column::Id",
        on_delete = "Cascade"
    )]
    MiddleIngredient,
}

impl ActiveModelBehavior for ActiveModel {}
