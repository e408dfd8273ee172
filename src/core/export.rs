//! Menu workbook export.
//!
//! Writes one workbook per export: a summary sheet, then one sheet per final product
//! listing its ingredients (name, unit, required fraction, latest unit price) followed by
//! a trailer with the product's computed cost, declared menu price and profit. Profit is
//! red when negative and green when positive. Prices use thousands separators, columns
//! are auto-fitted and sheets are laid out right-to-left unless configured otherwise.
//!
//! [`export_price_list`] writes the current latest prices in the import layout instead,
//! so a price list can be exported, edited and imported back.

use crate::{
    config::{ExportConfig, ImportConfig},
    core::{
        ingredient, product,
        report::{self, ProductSummary, ProfitTone},
        unit,
    },
    errors::Result,
};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

const MAX_SHEET_NAME: usize = 31;
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const PRICE_FORMAT: &str = "#,##0";

/// One ingredient row of a product sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLine {
    /// Base ingredient name
    pub ingredient: String,
    /// Unit label of the base ingredient
    pub unit: String,
    /// Required fraction of the unit
    pub unit_amount: f64,
    /// Latest unit price, if the ingredient was ever priced
    pub latest_price: Option<i64>,
}

/// Everything needed to render one product sheet.
#[derive(Debug, Clone)]
pub struct MenuSheet {
    /// Cost, declared price and profit of the product
    pub summary: ProductSummary,
    /// Recipe lines of the product
    pub lines: Vec<MenuLine>,
}

/// Snapshot of every product with its recipe lines and prices.
pub async fn collect_menu(db: &DatabaseConnection) -> Result<Vec<MenuSheet>> {
    let mut sheets = Vec::new();
    for summary in report::generate_menu_report(db).await? {
        let mut lines = Vec::new();
        for line in product::product_ingredients(db, summary.product.id).await? {
            let base = ingredient::require_ingredient(db, line.base_ingredient_id).await?;
            let unit_title = unit::get_unit_by_id(db, base.unit_id)
                .await?
                .map(|u| u.title)
                .unwrap_or_default();
            let latest_price = ingredient::latest_price(db, base.id)
                .await?
                .map(|p| p.unit_price);
            lines.push(MenuLine {
                ingredient: base.name,
                unit: unit_title,
                unit_amount: line.unit_amount,
                latest_price,
            });
        }
        sheets.push(MenuSheet { summary, lines });
    }
    Ok(sheets)
}

/// Turns a product name into a unique, valid worksheet name.
///
/// Invalid characters become `_`, names are cut to 31 characters and duplicates
/// (compared case-insensitively, as spreadsheet applications do) get a ` (n)` suffix.
pub fn sheet_name_for(name: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let base: String = if cleaned.is_empty() {
        "Product".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let mut candidate = base.clone();
    let mut counter = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({counter})");
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        let prefix: String = base.chars().take(keep).collect();
        candidate = format!("{prefix}{suffix}");
        counter += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

#[allow(clippy::cast_precision_loss)]
const fn cell_number(amount: i64) -> f64 {
    amount as f64
}

struct Formats {
    header: Format,
    price: Format,
    fraction: Format,
    loss: Format,
    gain: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            price: Format::new().set_num_format(PRICE_FORMAT),
            fraction: Format::new().set_num_format("0.00##"),
            loss: Format::new()
                .set_num_format(PRICE_FORMAT)
                .set_font_color(Color::Red),
            gain: Format::new()
                .set_num_format(PRICE_FORMAT)
                .set_font_color(Color::Green),
        }
    }

    fn for_profit(&self, profit: i64) -> &Format {
        match ProfitTone::of(profit) {
            ProfitTone::Loss => &self.loss,
            ProfitTone::Gain => &self.gain,
            ProfitTone::Even => &self.price,
        }
    }
}

fn write_amount(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    amount: Option<i64>,
    format: &Format,
) -> Result<()> {
    if let Some(amount) = amount {
        worksheet.write_number_with_format(row, col, cell_number(amount), format)?;
    }
    Ok(())
}

fn write_headers(worksheet: &mut Worksheet, row: u32, labels: &[&str], format: &Format) -> Result<()> {
    for (col, label) in (0u16..).zip(labels) {
        worksheet.write_string_with_format(row, col, *label, format)?;
    }
    Ok(())
}

fn write_summary_row(
    worksheet: &mut Worksheet,
    row: u32,
    summary: &ProductSummary,
    formats: &Formats,
) -> Result<()> {
    worksheet.write_string(row, 0, &summary.product.name)?;
    write_amount(worksheet, row, 1, summary.computed_cost, &formats.price)?;
    write_amount(worksheet, row, 2, summary.declared_price, &formats.price)?;
    if let Some(profit) = summary.profit {
        write_amount(worksheet, row, 3, Some(profit), formats.for_profit(profit))?;
    }
    Ok(())
}

const SUMMARY_LABELS: [&str; 4] = ["Product", "Computed cost", "Menu price", "Profit"];
const LINE_LABELS: [&str; 4] = ["Ingredient", "Unit", "Required fraction", "Latest price"];

fn render_summary_sheet(
    worksheet: &mut Worksheet,
    name: &str,
    sheets: &[MenuSheet],
    formats: &Formats,
) -> Result<()> {
    worksheet.set_name(name)?;
    write_headers(worksheet, 0, &SUMMARY_LABELS, &formats.header)?;
    for (row, sheet) in (1u32..).zip(sheets) {
        write_summary_row(worksheet, row, &sheet.summary, formats)?;
    }
    Ok(())
}

fn render_product_sheet(
    worksheet: &mut Worksheet,
    name: &str,
    sheet: &MenuSheet,
    formats: &Formats,
) -> Result<()> {
    worksheet.set_name(name)?;
    write_headers(worksheet, 0, &LINE_LABELS, &formats.header)?;

    let mut row = 1u32;
    for line in &sheet.lines {
        worksheet.write_string(row, 0, &line.ingredient)?;
        worksheet.write_string(row, 1, &line.unit)?;
        worksheet.write_number_with_format(row, 2, line.unit_amount, &formats.fraction)?;
        write_amount(worksheet, row, 3, line.latest_price, &formats.price)?;
        row += 1;
    }

    // trailer: blank row, labels, totals
    row += 1;
    write_headers(worksheet, row, &SUMMARY_LABELS, &formats.header)?;
    write_summary_row(worksheet, row + 1, &sheet.summary, formats)?;
    Ok(())
}

/// Renders the menu workbook in memory.
pub fn render_menu_workbook(sheets: &[MenuSheet], config: &ExportConfig) -> Result<Workbook> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let mut used = HashSet::new();
    // reserved by spreadsheet applications
    used.insert("history".to_string());

    let summary_name = sheet_name_for("Summary", &mut used);
    let worksheet = workbook.add_worksheet();
    render_summary_sheet(worksheet, &summary_name, sheets, &formats)?;
    worksheet.set_right_to_left(config.right_to_left);
    worksheet.autofit();

    for sheet in sheets {
        let name = sheet_name_for(&sheet.summary.product.name, &mut used);
        let worksheet = workbook.add_worksheet();
        render_product_sheet(worksheet, &name, sheet, &formats)?;
        worksheet.set_right_to_left(config.right_to_left);
        worksheet.autofit();
    }
    Ok(workbook)
}

/// Collects the current menu and writes it to `path`. Returns the number of product sheets.
#[instrument(skip(db, config))]
pub async fn write_menu_workbook(
    db: &DatabaseConnection,
    path: &Path,
    config: &ExportConfig,
) -> Result<usize> {
    let sheets = collect_menu(db).await?;
    let mut workbook = render_menu_workbook(&sheets, config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    info!("Menu with {} product(s) written to {}", sheets.len(), path.display());
    Ok(sheets.len())
}

/// Collects the current menu and returns the workbook bytes.
pub async fn menu_workbook_bytes(db: &DatabaseConnection, config: &ExportConfig) -> Result<Vec<u8>> {
    let sheets = collect_menu(db).await?;
    let mut workbook = render_menu_workbook(&sheets, config)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes every ingredient's latest price in the import layout. Returns the row count.
///
/// Ingredients that were never priced are left out. Composite ingredients are written
/// after every plain one: importing a component re-derives the composites built from
/// it, so their own rows must be applied last to restore the recorded prices.
#[instrument(skip(db, config))]
pub async fn export_price_list(
    db: &DatabaseConnection,
    path: &Path,
    config: &ImportConfig,
) -> Result<usize> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;
    worksheet.write_string_with_format(0, 0, "Price list", &formats.header)?;
    let header_row = config.header_rows.saturating_sub(1);
    write_headers(worksheet, header_row, &["#", "Name", "Unit", "Unit price"], &formats.header)?;

    let mut row = config.header_rows;
    let mut plain = Vec::new();
    let mut composite = Vec::new();
    for item in ingredient::list_ingredients(db).await? {
        if ingredient::is_composite(db, item.id).await? {
            composite.push(item);
        } else {
            plain.push(item);
        }
    }

    let mut written: u32 = 0;
    for item in plain.into_iter().chain(composite) {
        let Some(latest) = ingredient::latest_price(db, item.id).await? else {
            continue;
        };
        let unit_title = unit::get_unit_by_id(db, item.unit_id)
            .await?
            .map(|u| u.title)
            .unwrap_or_default();
        written += 1;
        worksheet.write_number(row, 0, f64::from(written))?;
        worksheet.write_string(row, 1, &item.name)?;
        worksheet.write_string(row, 2, &unit_title)?;
        worksheet.write_number_with_format(row, 3, cell_number(latest.unit_price), &formats.price)?;
        row += 1;
    }
    worksheet.autofit();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    info!("Price list with {} row(s) written to {}", written, path.display());
    Ok(usize::try_from(written)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::import::{import_price_sheet, parse_price_sheet};
    use crate::core::composition;
    use crate::core::product::declare_price;
    use crate::entities::CompositionKind;
    use crate::test_utils::*;
    use calamine::{Data, Reader, open_workbook_auto};

    #[test]
    fn test_sheet_name_for() {
        let mut used = HashSet::new();
        assert_eq!(sheet_name_for("Bread", &mut used), "Bread");
        assert_eq!(sheet_name_for("bread", &mut used), "bread (2)");
        assert_eq!(sheet_name_for("Bread", &mut used), "Bread (3)");
        assert_eq!(sheet_name_for("Tea/Coffee [hot]", &mut used), "Tea_Coffee _hot_");
        assert_eq!(sheet_name_for("  ", &mut used), "Product");

        let long = "A very long product name that keeps going";
        let first = sheet_name_for(long, &mut used);
        assert_eq!(first.chars().count(), 31);
        let second = sheet_name_for(long, &mut used);
        assert_eq!(second.chars().count(), 31);
        assert!(second.ends_with(" (2)"));
    }

    #[tokio::test]
    async fn test_collect_menu() -> Result<()> {
        let db = setup_test_db().await?;
        let (_flour, bread) = setup_flour_and_bread(&db).await?;
        declare_price(&db, bread.id, 400).await?;

        let sheets = collect_menu(&db).await?;
        assert_eq!(sheets.len(), 1);
        assert_eq!(
            sheets[0].lines,
            vec![MenuLine {
                ingredient: "Flour".to_string(),
                unit: "kilo".to_string(),
                unit_amount: 0.5,
                latest_price: Some(1000),
            }]
        );
        assert_eq!(sheets[0].summary.computed_cost, Some(500));
        assert_eq!(sheets[0].summary.profit, Some(-100));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_menu_workbook_layout() -> Result<()> {
        let db = setup_test_db().await?;
        let (_flour, bread) = setup_flour_and_bread(&db).await?;
        declare_price(&db, bread.id, 1200).await?;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("menus").join("menu.xlsx");
        let count = write_menu_workbook(&db, &path, &ExportConfig::default()).await?;
        assert_eq!(count, 1);

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Summary", "Bread"]);

        let summary = workbook.worksheet_range("Summary").unwrap();
        assert_eq!(
            summary.get_value((1, 0)),
            Some(&Data::String("Bread".to_string()))
        );
        assert_eq!(summary.get_value((1, 3)), Some(&Data::Float(700.0)));

        let sheet = workbook.worksheet_range("Bread").unwrap();
        assert_eq!(
            sheet.get_value((1, 0)),
            Some(&Data::String("Flour".to_string()))
        );
        assert_eq!(sheet.get_value((1, 2)), Some(&Data::Float(0.5)));
        assert_eq!(sheet.get_value((1, 3)), Some(&Data::Float(1000.0)));
        // blank row, label row, totals row
        assert_eq!(
            sheet.get_value((3, 1)),
            Some(&Data::String("Computed cost".to_string()))
        );
        assert_eq!(sheet.get_value((4, 1)), Some(&Data::Float(500.0)));
        assert_eq!(sheet.get_value((4, 2)), Some(&Data::Float(1200.0)));
        assert_eq!(sheet.get_value((4, 3)), Some(&Data::Float(700.0)));
        Ok(())
    }

    #[tokio::test]
    async fn test_menu_workbook_bytes() -> Result<()> {
        let db = setup_test_db().await?;
        setup_flour_and_bread(&db).await?;
        let bytes = menu_workbook_bytes(&db, &ExportConfig::default()).await?;
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
        Ok(())
    }

    #[tokio::test]
    async fn test_price_list_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let flour = create_priced_ingredient(&db, "Flour", 1_250_000).await?;
        let milk = create_priced_ingredient(&db, "Milk", 450).await?;
        create_test_ingredient(&db, "Unpriced").await?;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("prices.xlsx");
        let config = ImportConfig::default();
        assert_eq!(export_price_list(&db, &path, &config).await?, 2);

        let rows = parse_price_sheet(&path, &config)?;
        assert_eq!(rows.len(), 2);

        let fresh = setup_test_db().await?;
        import_price_sheet(&fresh, &path, &config).await?;
        for (name, expected) in [("Flour", 1_250_000), ("Milk", 450)] {
            let item = ingredient::get_ingredient_by_name(&fresh, name).await?.unwrap();
            let latest = ingredient::latest_price(&fresh, item.id).await?.unwrap();
            assert_eq!(latest.unit_price, expected);
        }

        // re-importing into the source ledger keeps the same latest prices
        import_price_sheet(&db, &path, &config).await?;
        assert_eq!(
            ingredient::latest_price(&db, flour.id).await?.unwrap().unit_price,
            1_250_000
        );
        assert_eq!(ingredient::latest_price(&db, milk.id).await?.unwrap().unit_price, 450);
        Ok(())
    }

    #[tokio::test]
    async fn test_price_list_round_trip_keeps_composite_price() -> Result<()> {
        let db = setup_test_db().await?;
        let (_milk, cream, dough, milk_line) = setup_composite(&db).await?;
        let cream_line = composition::create_middle_ingredient(
            &db,
            cream.id,
            0.5,
            CompositionKind::Primary,
        )
        .await?;
        composition::compose_ingredient(&db, dough.id, &[milk_line.id, cream_line.id]).await?;
        // trunc(1000 * 0.5) + trunc(2000 * 0.5)
        assert_eq!(ingredient::latest_price(&db, dough.id).await?.unwrap().unit_price, 1500);

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("prices.xlsx");
        let config = ImportConfig::default();
        export_price_list(&db, &path, &config).await?;

        // composites come after their components
        let rows = parse_price_sheet(&path, &config)?;
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cream", "Milk", "Dough"]);

        import_price_sheet(&db, &path, &config).await?;
        assert_eq!(ingredient::latest_price(&db, dough.id).await?.unwrap().unit_price, 1500);
        Ok(())
    }
}
