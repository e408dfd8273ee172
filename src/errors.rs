//! Unified error types for the pricing ledger.
//!
//! Every fallible operation in the crate returns [`Result`], and every failure is
//! surfaced immediately to the caller of the triggering operation. Nothing is retried.

use thiserror::Error;

/// All errors produced by the ledger, the propagation engine and the menu exporter.
#[derive(Debug, Error)]
pub enum Error {
    /// Unreadable or invalid settings file
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// A name or label supplied by the user is unusable, e.g. blank
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description
        message: String,
    },

    /// Any failure reported by the database layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure while reading or writing spreadsheets
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook generation failure
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// An imported spreadsheet could not be parsed. Deliberately carries no row detail.
    #[error("The imported spreadsheet is not in the expected format")]
    InvalidFileFormat,

    /// A quantity or price outside its allowed range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// Cost was requested for a product whose base ingredient has never been priced
    #[error("No price has been recorded for ingredient '{ingredient}'")]
    MissingPrice {
        /// Name of the unpriced ingredient
        ingredient: String,
    },

    /// The composition graph edit would break the one-tier nesting rule
    #[error("Invalid composition: {message}")]
    InvalidComposition {
        /// Human-readable description
        message: String,
    },

    /// Primary ingredient lookup failed
    #[error("Ingredient not found: {name}")]
    IngredientNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// Middle ingredient lookup failed
    #[error("Middle ingredient not found: {id}")]
    MiddleIngredientNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// Final product lookup failed
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// Unit lookup failed
    #[error("Unit not found: {title}")]
    UnitNotFound {
        /// Title that was looked up
        title: String,
    },

    /// Integer conversion overflow
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
