//! Unit commands - `unit add` and `unit list`.

use crate::{
    cli::{CliData, UnitCommand},
    core::unit,
    errors::Result,
};

/// Runs a unit subcommand.
pub async fn run(command: UnitCommand, data: &CliData) -> Result<String> {
    let db = &data.database;
    match command {
        UnitCommand::Add { title } => {
            let created = unit::get_or_create_unit(db, &title).await?;
            Ok(format!("✅ Unit '{}' is available (#{})", created.title, created.id))
        }
        UnitCommand::List => {
            let units = unit::list_units(db).await?;
            if units.is_empty() {
                return Ok("No units defined.".to_string());
            }
            Ok(units
                .iter()
                .map(|u| format!("#{} {}", u.id, u.title))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_unit_add_and_list() -> Result<()> {
        let data = CliData::new(setup_test_db().await?, AppConfig::default());

        let added = run(
            UnitCommand::Add {
                title: "liter".to_string(),
            },
            &data,
        )
        .await?;
        assert!(added.contains("'liter'"));

        let listed = run(UnitCommand::List, &data).await?;
        assert_eq!(listed, "#1 liter");
        Ok(())
    }
}
