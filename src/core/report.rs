//! Menu report business logic.
//!
//! Summarises each final product as last computed cost, last declared menu price and the
//! profit between them. Only strictly positive prices count as "last". All functions are
//! framework-agnostic; the exporter and the CLI format the results.

use crate::{
    core::product,
    entities::final_product,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Sign of a profit figure, used to color it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitTone {
    /// Declared price below cost
    Loss,
    /// Declared price equal to cost
    Even,
    /// Declared price above cost
    Gain,
}

impl ProfitTone {
    /// Classifies a profit figure.
    #[must_use]
    pub const fn of(profit: i64) -> Self {
        if profit < 0 {
            Self::Loss
        } else if profit > 0 {
            Self::Gain
        } else {
            Self::Even
        }
    }
}

/// One product line of the menu report.
#[derive(Debug, Clone)]
pub struct ProductSummary {
    /// The product reported on
    pub product: final_product::Model,
    /// Last positive computed cost
    pub computed_cost: Option<i64>,
    /// Last positive declared menu price
    pub declared_price: Option<i64>,
    /// Declared price minus computed cost, when both are known
    pub profit: Option<i64>,
}

/// Profit of a product: declared minus computed, when both are known.
#[must_use]
pub fn calculate_profit(declared_price: Option<i64>, computed_cost: Option<i64>) -> Option<i64> {
    Some(declared_price? - computed_cost?)
}

/// Builds the summary of a single product.
pub async fn summarize_product(
    db: &DatabaseConnection,
    product: final_product::Model,
) -> Result<ProductSummary> {
    let computed_cost = product::latest_sell_price(db, product.id).await?;
    let declared_price = product::latest_declared_price(db, product.id).await?;
    Ok(ProductSummary {
        profit: calculate_profit(declared_price, computed_cost),
        product,
        computed_cost,
        declared_price,
    })
}

/// Builds the summary of every product, alphabetically.
pub async fn generate_menu_report(db: &DatabaseConnection) -> Result<Vec<ProductSummary>> {
    let mut summaries = Vec::new();
    for item in product::list_products(db).await? {
        summaries.push(summarize_product(db, item).await?);
    }
    Ok(summaries)
}

/// Formats a whole-unit price with thousands separators, e.g. `1,234,500`.
#[must_use]
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_optional(amount: Option<i64>) -> String {
    amount.map_or_else(|| "-".to_string(), format_price)
}

/// Formats one summary as a single report line.
#[must_use]
pub fn format_summary_line(summary: &ProductSummary) -> String {
    let marker = match summary.profit.map(ProfitTone::of) {
        Some(ProfitTone::Loss) => " (loss)",
        Some(ProfitTone::Gain) => " (profit)",
        Some(ProfitTone::Even) | None => "",
    };
    format!(
        "{}: cost {} | menu {} | profit {}{}",
        summary.product.name,
        format_optional(summary.computed_cost),
        format_optional(summary.declared_price),
        format_optional(summary.profit),
        marker
    )
}
