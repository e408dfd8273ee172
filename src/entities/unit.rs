//! Unit entity - the measure a primary ingredient is bought and priced in.
//!
//! Units are a small get-or-create catalogue (kilo, gram, liter, box, item ...).
//! They are seeded from `config.toml` and extended on demand by spreadsheet imports.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    /// Unique identifier for the unit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Label shown next to quantities (e.g., "kilo", "box")
    #[sea_orm(unique)]
    pub title: String,
    /// When the unit was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Unit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One unit measures many primary ingredients
    #[sea_orm(has_many = "super::primary_ingredient::Entity")]
    PrimaryIngredients,
}

impl Related<super::primary_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrimaryIngredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
