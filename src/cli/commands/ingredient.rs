//! Ingredient commands - add, list, price, history and compose.

use super::{describe_cascade, find_ingredient, format_timestamp};
use crate::{
    cli::{CliData, IngredientCommand},
    core::{composition, ingredient, propagation, report::format_price, unit},
    errors::Result,
};

/// Runs an ingredient subcommand.
pub async fn run(command: IngredientCommand, data: &CliData) -> Result<String> {
    let db = &data.database;
    match command {
        IngredientCommand::Add {
            name,
            unit: unit_title,
        } => {
            let created = ingredient::create_ingredient(db, &name, &unit_title).await?;
            Ok(format!("✅ Ingredient '{}' added (#{})", created.name, created.id))
        }
        IngredientCommand::List => {
            let mut lines = Vec::new();
            for item in ingredient::list_ingredients(db).await? {
                let unit_title = unit::get_unit_by_id(db, item.unit_id)
                    .await?
                    .map(|u| u.title)
                    .unwrap_or_default();
                let price = ingredient::latest_price(db, item.id)
                    .await?
                    .map_or_else(|| "unpriced".to_string(), |p| format_price(p.unit_price));
                let marker = if ingredient::is_composite(db, item.id).await? {
                    " (composite)"
                } else {
                    ""
                };
                lines.push(format!(
                    "#{} {}{} - {} per {}",
                    item.id, item.name, marker, price, unit_title
                ));
            }
            if lines.is_empty() {
                return Ok("No ingredients yet.".to_string());
            }
            Ok(lines.join("\n"))
        }
        IngredientCommand::Price { name, unit_price } => {
            let item = find_ingredient(db, &name).await?;
            let report = propagation::record_price(db, item.id, unit_price).await?;
            let mut output = format!(
                "✅ {} now costs {}",
                item.name,
                format_price(report.observation.unit_price)
            );
            let cascade = describe_cascade(&report);
            if !cascade.is_empty() {
                output.push('\n');
                output.push_str(&cascade);
            }
            Ok(output)
        }
        IngredientCommand::History { name } => {
            let item = find_ingredient(db, &name).await?;
            let history = ingredient::price_history_for(db, item.id).await?;
            if history.is_empty() {
                return Ok(format!("{} has never been priced.", item.name));
            }
            Ok(history
                .iter()
                .map(|entry| {
                    let source = if entry.signal_involved { "entered" } else { "derived" };
                    format!(
                        "{}  {}  ({})",
                        format_timestamp(&entry.created_at),
                        format_price(entry.unit_price),
                        source
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        IngredientCommand::Compose { name, middle_ids } => {
            let item = find_ingredient(db, &name).await?;
            match composition::compose_ingredient(db, item.id, &middle_ids).await? {
                Some(report) => {
                    let mut output = format!(
                        "✅ {} is now made of {} line(s), price {}",
                        item.name,
                        middle_ids.len(),
                        format_price(report.observation.unit_price)
                    );
                    let cascade = describe_cascade(&report);
                    if !cascade.is_empty() {
                        output.push('\n');
                        output.push_str(&cascade);
                    }
                    Ok(output)
                }
                None => Ok(format!("✅ {} is no longer composite", item.name)),
            }
        }
    }
}
