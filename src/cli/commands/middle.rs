//! Recipe line commands - `middle add`, `middle list` and `middle update`.

use super::find_ingredient;
use crate::{
    cli::{CliData, MiddleCommand, MiddleLineArgs},
    core::{composition, ingredient},
    entities::CompositionKind,
    errors::Result,
};

const fn kind_of(line: &MiddleLineArgs) -> CompositionKind {
    if line.primary {
        CompositionKind::Primary
    } else {
        CompositionKind::Final
    }
}

const fn kind_label(kind: CompositionKind) -> &'static str {
    match kind {
        CompositionKind::Primary => "ingredient",
        CompositionKind::Final => "product",
    }
}

/// Runs a recipe line subcommand.
pub async fn run(command: MiddleCommand, data: &CliData) -> Result<String> {
    let db = &data.database;
    match command {
        MiddleCommand::Add(args) => {
            let base = find_ingredient(db, &args.ingredient).await?;
            let line = composition::create_middle_ingredient(
                db,
                base.id,
                args.line.amount,
                kind_of(&args.line),
            )
            .await?;
            Ok(format!(
                "✅ Line #{}: {} x {} for {} recipes",
                line.id,
                line.unit_amount,
                base.name,
                kind_label(line.kind)
            ))
        }
        MiddleCommand::List => {
            let mut lines = Vec::new();
            for line in composition::list_middle_ingredients(db).await? {
                let base = ingredient::require_ingredient(db, line.base_ingredient_id).await?;
                lines.push(format!(
                    "#{} {} x {} ({})",
                    line.id,
                    line.unit_amount,
                    base.name,
                    kind_label(line.kind)
                ));
            }
            if lines.is_empty() {
                return Ok("No recipe lines yet.".to_string());
            }
            Ok(lines.join("\n"))
        }
        MiddleCommand::Update { id, line } => {
            let updated =
                composition::update_middle_ingredient(db, id, line.amount, kind_of(&line)).await?;
            Ok(format!(
                "✅ Line #{} now uses {} ({})",
                updated.id,
                updated.unit_amount,
                kind_label(updated.kind)
            ))
        }
    }
}
