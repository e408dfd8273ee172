//! Unit catalogue - get-or-create lookups for the measures ingredients are priced in.

use crate::{
    entities::{Unit, unit},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Lists every unit, ordered alphabetically by title.
pub async fn list_units(db: &DatabaseConnection) -> Result<Vec<unit::Model>> {
    Unit::find()
        .order_by_asc(unit::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a unit by its exact title.
pub async fn get_unit_by_title<C>(db: &C, title: &str) -> Result<Option<unit::Model>>
where
    C: ConnectionTrait,
{
    Unit::find()
        .filter(unit::Column::Title.eq(title.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a unit by id.
pub async fn get_unit_by_id<C>(db: &C, unit_id: i64) -> Result<Option<unit::Model>>
where
    C: ConnectionTrait,
{
    Unit::find_by_id(unit_id).one(db).await.map_err(Into::into)
}

/// Returns the unit with the given title, creating it first if needed.
///
/// # Errors
/// Returns an error if the title is blank or the database operation fails.
pub async fn get_or_create_unit<C>(db: &C, title: &str) -> Result<unit::Model>
where
    C: ConnectionTrait,
{
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput {
            message: "Unit title cannot be empty".to_string(),
        });
    }

    if let Some(existing) = get_unit_by_title(db, title).await? {
        return Ok(existing);
    }

    debug!("Creating unit '{}'", title);
    let unit = unit::ActiveModel {
        title: Set(title.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    unit.insert(db).await.map_err(Into::into)
}

/// Ensures every configured unit exists. Returns how many were newly created.
pub async fn seed_units(db: &DatabaseConnection, titles: &[String]) -> Result<usize> {
    let mut created = 0;
    for title in titles {
        if get_unit_by_title(db, title).await?.is_none() {
            get_or_create_unit(db, title).await?;
            created += 1;
        }
    }
    if created > 0 {
        info!("Seeded {} unit(s) from configuration", created);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_or_create_unit_rejects_blank_title() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = get_or_create_unit(&db, "   ").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { message: _ }));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_unit_reuses_existing() -> Result<()> {
        let db = setup_test_db().await?;

        let first = get_or_create_unit(&db, "kilo").await?;
        let second = get_or_create_unit(&db, " kilo ").await?;
        assert_eq!(first.id, second.id);
        assert_eq!(list_units(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_units_only_creates_missing() -> Result<()> {
        let db = setup_test_db().await?;
        get_or_create_unit(&db, "gram").await?;

        let titles = vec!["gram".to_string(), "liter".to_string(), "box".to_string()];
        let created = seed_units(&db, &titles).await?;
        assert_eq!(created, 2);

        let units = list_units(&db).await?;
        let names: Vec<&str> = units.iter().map(|u| u.title.as_str()).collect();
        assert_eq!(names, vec!["box", "gram", "liter"]);

        assert_eq!(seed_units(&db, &titles).await?, 0);
        Ok(())
    }
}
