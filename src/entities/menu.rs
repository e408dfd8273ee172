//! Menu entity - a record of one batch import/export job.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu job database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    /// Unique identifier for the job
    #[sea_orm(primary_key)]
    pub id: i64,
    /// File name of the imported price sheet, if one was consumed
    pub imported_file: Option<String>,
    /// Path of the generated menu workbook, if one was written
    pub export_path: Option<String>,
    /// When the job ran
    pub created_at: DateTimeUtc,
}

/// Menu jobs have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
