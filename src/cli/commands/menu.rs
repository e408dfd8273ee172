//! Spreadsheet and menu commands - import, validate, export, menu jobs and the report.

use crate::{
    cli::{CliData, ExportArgs, FileArgs, MenuArgs},
    core::{export, import, menu, report},
    errors::Result,
};

/// Imports a price sheet and runs the cascade for every row.
pub async fn import_sheet(args: &FileArgs, data: &CliData) -> Result<String> {
    let summary = import::import_price_sheet(&data.database, &args.file, &data.config.import).await?;
    Ok(format!(
        "✅ Imported {} price(s): {} new ingredient(s), {} derived price(s), {} cost update(s)",
        summary.rows, summary.created_ingredients, summary.derived_prices, summary.sell_prices
    ))
}

/// Checks a price sheet without writing anything.
pub fn validate_sheet(args: &FileArgs, data: &CliData) -> Result<String> {
    let rows = import::validate_file(&args.file, &data.config.import)?;
    Ok(format!(
        "✅ {} is a valid price sheet with {} row(s)",
        args.file.display(),
        rows
    ))
}

/// Writes the menu workbook.
pub async fn export_menu(args: &ExportArgs, data: &CliData) -> Result<String> {
    let path = args.output.clone().unwrap_or_else(|| {
        menu::export_path_for(&data.config.export.directory, chrono::Utc::now())
    });
    let sheets = export::write_menu_workbook(&data.database, &path, &data.config.export).await?;
    Ok(format!(
        "✅ Menu with {} product(s) written to {}",
        sheets,
        path.display()
    ))
}

/// Writes the latest ingredient prices as an importable sheet.
pub async fn export_prices(args: &FileArgs, data: &CliData) -> Result<String> {
    let rows = export::export_price_list(&data.database, &args.file, &data.config.import).await?;
    Ok(format!(
        "✅ {} price(s) written to {}",
        rows,
        args.file.display()
    ))
}

/// Runs and records a menu job.
pub async fn run_job(args: &MenuArgs, data: &CliData) -> Result<String> {
    let job = menu::run_menu(&data.database, &data.config, args.import.as_deref()).await?;
    Ok(format!(
        "✅ Menu job #{} written to {}",
        job.id,
        job.export_path.unwrap_or_default()
    ))
}

/// Lists recorded menu jobs.
pub async fn list_jobs(data: &CliData) -> Result<String> {
    let jobs = menu::list_menus(&data.database).await?;
    if jobs.is_empty() {
        return Ok("No menu jobs yet.".to_string());
    }
    Ok(jobs
        .iter()
        .map(|job| {
            format!(
                "#{} {}  import: {}  export: {}",
                job.id,
                super::format_timestamp(&job.created_at),
                job.imported_file.as_deref().unwrap_or("-"),
                job.export_path.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Prints cost, menu price and profit of every product.
pub async fn print_report(data: &CliData) -> Result<String> {
    let summaries = report::generate_menu_report(&data.database).await?;
    if summaries.is_empty() {
        return Ok("No products yet.".to_string());
    }
    Ok(summaries
        .iter()
        .map(report::format_summary_line)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::AppConfig;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_export_prices_validate_import() -> Result<()> {
        let db = setup_test_db().await?;
        setup_flour_and_bread(&db).await?;
        let dir = tempfile::tempdir()?;
        let mut config = AppConfig::default();
        config.export.directory = dir.path().join("exports");
        let data = CliData::new(db, config);

        let sheet = FileArgs {
            file: dir.path().join("prices.xlsx"),
        };
        let written = export_prices(&sheet, &data).await?;
        assert!(written.starts_with("✅ 1 price(s) written"));

        let checked = validate_sheet(&sheet, &data)?;
        assert!(checked.ends_with("with 1 row(s)"));

        let imported = import_sheet(&sheet, &data).await?;
        assert_eq!(
            imported,
            "✅ Imported 1 price(s): 0 new ingredient(s), 0 derived price(s), 1 cost update(s)"
        );

        let job = run_job(&MenuArgs { import: None }, &data).await?;
        assert!(job.starts_with("✅ Menu job #1 written to"));
        assert!(list_jobs(&data).await?.starts_with("#1 "));
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_rejects_garbage() -> Result<()> {
        let data = CliData::new(setup_test_db().await?, AppConfig::default());
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("prices.xlsx");
        std::fs::write(&file, b"garbage")?;

        let result = validate_sheet(&FileArgs { file }, &data);
        assert!(matches!(result.unwrap_err(), Error::InvalidFileFormat));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_lines() -> Result<()> {
        let db = setup_test_db().await?;
        setup_flour_and_bread(&db).await?;
        let data = CliData::new(db, AppConfig::default());
        assert_eq!(print_report(&data).await?, "Bread: cost 500 | menu - | profit -");
        Ok(())
    }
}
