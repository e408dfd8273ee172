//! Middle ingredient entity - a recipe line: this fraction of this primary ingredient.
//!
//! A middle ingredient is used either by a final product or in the composition of a
//! composite primary ingredient. The [`CompositionKind`] tag keeps the graph one tier deep:
//! a `Primary`-tagged line may not be based on an ingredient that is itself composite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which tier of the composition graph a middle ingredient is meant for
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum CompositionKind {
    /// Composes another primary ingredient
    #[sea_orm(string_value = "p")]
    Primary,
    /// Composes a final product
    #[sea_orm(string_value = "f")]
    Final,
}

/// Middle ingredient database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "middle_ingredients")]
pub struct Model {
    /// Unique identifier for the recipe line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Fraction of the base ingredient's unit required, within [0, 1]
    pub unit_amount: f64,
    /// ID of the primary ingredient consumed
    pub base_ingredient_id: i64,
    /// Composition tier tag
    pub kind: CompositionKind,
    /// When the line was created
    pub created_at: DateTimeUtc,
    /// When the line was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `MiddleIngredient` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line consumes one primary ingredient
    #[sea_orm(
        belongs_to = "super::primary_ingredient::Entity",
        from = "Column::BaseIngredientId",
        to = "super::primary_ingredient::Column::Id",
        on_delete = "Cascade"
    )]
    BaseIngredient,
}

impl Related<super::primary_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BaseIngredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
