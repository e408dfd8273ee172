//! Final product commands - recipes, declared prices, costs and histories.

use super::{find_product, format_timestamp};
use crate::{
    cli::{CliData, ProductCommand},
    core::{cost, product, report},
    errors::Result,
};

/// Runs a product subcommand.
pub async fn run(command: ProductCommand, data: &CliData) -> Result<String> {
    let db = &data.database;
    match command {
        ProductCommand::Add { name } => {
            let created = product::create_product(db, &name).await?;
            Ok(format!("✅ Product '{}' added (#{})", created.name, created.id))
        }
        ProductCommand::List => {
            let summaries = report::generate_menu_report(db).await?;
            if summaries.is_empty() {
                return Ok("No products yet.".to_string());
            }
            Ok(summaries
                .iter()
                .map(|s| format!("#{} {}", s.product.id, report::format_summary_line(s)))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        ProductCommand::AddIngredient { name, middle_ids } => {
            let item = find_product(db, &name).await?;
            let guard = data.config.propagation.guard_ingredient_edits;
            match product::add_ingredients(db, guard, item.id, &middle_ids).await? {
                Some(snapshot) => Ok(format!(
                    "✅ {} updated, cost {}",
                    item.name,
                    report::format_price(snapshot.sell_price)
                )),
                None => Ok(format!("{} already uses every given line", item.name)),
            }
        }
        ProductCommand::RemoveIngredient { name, middle_id } => {
            let item = find_product(db, &name).await?;
            if product::remove_ingredient(db, item.id, middle_id).await? {
                Ok(format!("✅ Line #{} removed from {}", middle_id, item.name))
            } else {
                Ok(format!("{} does not use line #{}", item.name, middle_id))
            }
        }
        ProductCommand::Declare { name, price } => {
            let item = find_product(db, &name).await?;
            let declared = product::declare_price(db, item.id, price).await?;
            Ok(format!(
                "✅ {} is on the menu for {}",
                item.name,
                report::format_price(declared.sell_price)
            ))
        }
        ProductCommand::Cost { name } => {
            let item = find_product(db, &name).await?;
            let computed = cost::product_cost(db, item.id).await?;
            Ok(format!(
                "{} costs {} at current prices",
                item.name,
                report::format_price(computed)
            ))
        }
        ProductCommand::History { name } => {
            let item = find_product(db, &name).await?;
            let mut lines = vec![format!("Cost history of {}:", item.name)];
            for entry in product::sell_price_history(db, item.id).await? {
                lines.push(format!(
                    "  {}  {}",
                    format_timestamp(&entry.created_at),
                    report::format_price(entry.sell_price)
                ));
            }
            lines.push("Menu price history:".to_string());
            for entry in product::declared_price_history(db, item.id).await? {
                lines.push(format!(
                    "  {}  {}",
                    format_timestamp(&entry.created_at),
                    report::format_price(entry.sell_price)
                ));
            }
            Ok(lines.join("\n"))
        }
    }
}
