//! Price sheet import - reads raw ingredient prices from a spreadsheet into the ledger.
//!
//! Layout: worksheet `Page 1` (configurable); the first two rows are headers; then one row
//! per ingredient with the name in column 1, the unit label in column 2 and the integer
//! unit price in column 3 (0-indexed). Any malformed row rejects the whole file with
//! [`Error::InvalidFileFormat`]. Files are parsed completely before anything is written,
//! and the writes share one transaction, so a rejected file leaves the ledger untouched.

use crate::{
    config::ImportConfig,
    core::{ingredient, propagation},
    errors::{Error, Result},
};
use calamine::{Data, Reader, open_workbook_auto};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

const NAME_COLUMN: u32 = 1;
const UNIT_COLUMN: u32 = 2;
const PRICE_COLUMN: u32 = 3;

/// One parsed row of a price sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRow {
    /// Ingredient name
    pub name: String,
    /// Unit label
    pub unit: String,
    /// Unit price in whole currency units
    pub unit_price: i64,
}

/// Outcome of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Rows read from the sheet
    pub rows: usize,
    /// Ingredients that did not exist before the import
    pub created_ingredients: usize,
    /// Derived observations written by the cascade
    pub derived_prices: usize,
    /// Cost snapshots written by the cascade
    pub sell_prices: usize,
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn cell_price(cell: Option<&Data>) -> Option<i64> {
    match cell? {
        Data::Int(value) => Some(*value),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(value) if value.is_finite() => Some(value.trunc() as i64),
        Data::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn is_blank(cell: Option<&Data>) -> bool {
    cell.is_none_or(|data| matches!(data, Data::Empty))
}

/// Parses a price sheet from disk without touching the database.
///
/// Rows whose name, unit and price cells are all empty are ignored.
///
/// # Errors
/// Returns [`Error::InvalidFileFormat`] if the file is not a readable workbook, the
/// sheet is missing, or any row has a missing name/unit or a non-integer price.
pub fn parse_price_sheet(path: &Path, config: &ImportConfig) -> Result<Vec<PriceRow>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        debug!("Cannot open {}: {}", path.display(), e);
        Error::InvalidFileFormat
    })?;
    let range = workbook
        .worksheet_range(&config.sheet_name)
        .map_err(|e| {
            debug!("Cannot read sheet '{}': {}", config.sheet_name, e);
            Error::InvalidFileFormat
        })?;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for row in config.header_rows..=last_row {
        let name = range.get_value((row, NAME_COLUMN));
        let unit = range.get_value((row, UNIT_COLUMN));
        let price = range.get_value((row, PRICE_COLUMN));
        if is_blank(name) && is_blank(unit) && is_blank(price) {
            continue;
        }

        let parsed = cell_text(name).zip(cell_text(unit)).zip(cell_price(price));
        let Some(((name, unit), unit_price)) = parsed else {
            debug!("Malformed price row {}", row + 1);
            return Err(Error::InvalidFileFormat);
        };
        rows.push(PriceRow {
            name,
            unit,
            unit_price,
        });
    }
    Ok(rows)
}

/// Dry-runs the parser on a temporary copy of the uploaded bytes.
///
/// The copy is deleted when this returns, whatever the outcome. Only the structure is
/// checked; prices and names are not validated against the ledger.
///
/// # Errors
/// Returns [`Error::InvalidFileFormat`] for anything the importer would reject while parsing.
pub fn validate_bytes(bytes: &[u8], config: &ImportConfig) -> Result<usize> {
    let mut copy = tempfile::Builder::new()
        .prefix("price-sheet-")
        .suffix(".xlsx")
        .tempfile()?;
    copy.write_all(bytes)?;
    copy.flush()?;
    let rows = parse_price_sheet(copy.path(), config)?;
    Ok(rows.len())
}

/// Validates a price sheet stored on disk. See [`validate_bytes`].
pub fn validate_file(path: &Path, config: &ImportConfig) -> Result<usize> {
    let bytes = std::fs::read(path)?;
    validate_bytes(&bytes, config)
}

/// Writes parsed rows to the ledger in one transaction.
///
/// Each row creates its ingredient (and unit) when missing, then records the price as a
/// hand-entered observation so that the full cascade runs. Importing the same rows twice
/// appends two observations per ingredient.
#[instrument(skip(db, rows), fields(rows = rows.len()))]
pub async fn import_rows(db: &DatabaseConnection, rows: &[PriceRow]) -> Result<ImportSummary> {
    let txn = db.begin().await?;
    let mut summary = ImportSummary {
        rows: rows.len(),
        ..ImportSummary::default()
    };

    for row in rows {
        let existing = ingredient::get_ingredient_by_name(&txn, &row.name).await?;
        let primary = match existing {
            Some(primary) => primary,
            None => {
                summary.created_ingredients += 1;
                ingredient::create_ingredient(&txn, &row.name, &row.unit).await?
            }
        };
        let report = propagation::record_price_in(&txn, primary.id, row.unit_price, true).await?;
        summary.derived_prices += report.derived_prices.len();
        summary.sell_prices += report.sell_prices.len();
    }

    txn.commit().await?;
    info!(
        "Imported {} price row(s), {} new ingredient(s)",
        summary.rows, summary.created_ingredients
    );
    Ok(summary)
}

/// Parses and imports a price sheet from disk.
pub async fn import_price_sheet(
    db: &DatabaseConnection,
    path: &Path,
    config: &ImportConfig,
) -> Result<ImportSummary> {
    let rows = parse_price_sheet(path, config)?;
    import_rows(db, &rows).await
}
