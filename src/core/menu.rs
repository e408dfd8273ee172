//! Menu batch jobs.
//!
//! A job optionally validates and imports a price sheet, then writes a fresh menu
//! workbook and records both in the `menus` table. The imported file itself is not kept;
//! only its name is stored.

use crate::{
    config::AppConfig,
    core::{export, import},
    entities::menu,
    errors::Result,
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Lists every recorded menu job, newest first.
pub async fn list_menus(db: &DatabaseConnection) -> Result<Vec<menu::Model>> {
    menu::Entity::find()
        .order_by_desc(menu::Column::CreatedAt)
        .order_by_desc(menu::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Path of the workbook written by a job started at `now`.
#[must_use]
pub fn export_path_for(directory: &Path, now: chrono::DateTime<chrono::Utc>) -> PathBuf {
    directory.join(format!("menu-{}.xlsx", now.format("%Y%m%d-%H%M%S%3f")))
}

/// Runs one menu job and records it.
///
/// When `price_sheet` is given it is validated first and then imported, so the exported
/// menu reflects the new prices. A sheet that fails validation aborts the job before
/// anything is written.
///
/// # Errors
/// Returns [`crate::errors::Error::InvalidFileFormat`] for a malformed sheet, or any
/// database, I/O or workbook error raised along the way.
#[instrument(skip(db, config))]
pub async fn run_menu(
    db: &DatabaseConnection,
    config: &AppConfig,
    price_sheet: Option<&Path>,
) -> Result<menu::Model> {
    let imported_file = match price_sheet {
        Some(path) => {
            import::validate_file(path, &config.import)?;
            import::import_price_sheet(db, path, &config.import).await?;
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }
        None => None,
    };

    let now = chrono::Utc::now();
    let path = export_path_for(&config.export.directory, now);
    export::write_menu_workbook(db, &path, &config.export).await?;

    let job = menu::ActiveModel {
        imported_file: Set(imported_file),
        export_path: Set(Some(path.display().to_string())),
        created_at: Set(now),
        ..Default::default()
    };
    let job = job.insert(db).await?;
    info!("Menu job {} exported to {}", job.id, path.display());
    Ok(job)
}
