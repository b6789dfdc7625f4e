//! # Animal Repository
//!
//! Database operations for the animal inventory.
//!
//! Animals move `available → sold` exactly once, inside the sale
//! transaction (see [`crate::repository::sale`]). This repository covers
//! registration and listing.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hacienda_core::{Animal, AnimalState};

/// Repository for animal database operations.
#[derive(Debug, Clone)]
pub struct AnimalRepository {
    pool: SqlitePool,
}

impl AnimalRepository {
    /// Creates a new AnimalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnimalRepository { pool }
    }

    /// Inserts a new animal. The ear-tag must be unique.
    pub async fn insert(&self, animal: &Animal) -> DbResult<()> {
        debug!(id = %animal.id, tag = %animal.tag, "Inserting animal");

        sqlx::query(
            r#"
            INSERT INTO animals (
                id, tag, category, weight_kg, state, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&animal.id)
        .bind(&animal.tag)
        .bind(&animal.category)
        .bind(animal.weight_kg)
        .bind(animal.state)
        .bind(&animal.notes)
        .bind(animal.created_at)
        .bind(animal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an animal by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Animal>> {
        let animal: Option<Animal> = sqlx::query_as::<_, Animal>(
            r#"
            SELECT id, tag, category, weight_kg, state, notes, created_at, updated_at
            FROM animals
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(animal)
    }

    /// Gets an animal by ID, failing if missing.
    pub async fn require(&self, id: &str) -> DbResult<Animal> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Animal", id))
    }

    /// Lists available animals, optionally filtered by category.
    pub async fn list_available(&self, category: Option<&str>) -> DbResult<Vec<Animal>> {
        let animals: Vec<Animal> = match category {
            Some(category) => {
                sqlx::query_as::<_, Animal>(
                    r#"
                    SELECT id, tag, category, weight_kg, state, notes, created_at, updated_at
                    FROM animals
                    WHERE state = 'available' AND category = ?1
                    ORDER BY tag
                    "#,
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Animal>(
                    r#"
                    SELECT id, tag, category, weight_kg, state, notes, created_at, updated_at
                    FROM animals
                    WHERE state = 'available'
                    ORDER BY tag
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(animals)
    }

    /// Updates an animal's weight after a weighing.
    pub async fn update_weight(&self, id: &str, weight_kg: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE animals SET weight_kg = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(weight_kg)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Animal", id));
        }

        Ok(())
    }
}

// =============================================================================
// Test Helpers + Unit Tests
// =============================================================================

/// Builds an available animal for tests and the seed binary.
pub fn new_animal(tag: &str, category: &str, weight_kg: i64) -> Animal {
    let now = Utc::now();
    Animal {
        id: uuid::Uuid::new_v4().to_string(),
        tag: tag.to_string(),
        category: category.to_string(),
        weight_kg,
        state: AnimalState::Available,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list_available() {
        let db = test_db().await;
        let repo = db.animals();

        repo.insert(&new_animal("AR0001", "Novillo", 300)).await.unwrap();
        repo.insert(&new_animal("AR0002", "Vaca", 380)).await.unwrap();

        let all = repo.list_available(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let novillos = repo.list_available(Some("Novillo")).await.unwrap();
        assert_eq!(novillos.len(), 1);
        assert_eq!(novillos[0].tag, "AR0001");
    }

    #[tokio::test]
    async fn test_duplicate_tag_rejected() {
        let db = test_db().await;
        let repo = db.animals();

        repo.insert(&new_animal("AR0001", "Novillo", 300)).await.unwrap();
        let err = repo
            .insert(&new_animal("AR0001", "Vaca", 400))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_weight() {
        let db = test_db().await;
        let repo = db.animals();

        let animal = new_animal("AR0001", "Novillo", 300);
        repo.insert(&animal).await.unwrap();
        repo.update_weight(&animal.id, 315).await.unwrap();

        let fetched = repo.require(&animal.id).await.unwrap();
        assert_eq!(fetched.weight_kg, 315);
    }
}
