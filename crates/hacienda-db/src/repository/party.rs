//! # Party Repository
//!
//! Database operations for counterparties (buyers and suppliers).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hacienda_core::{Party, PartyKind};

/// Repository for party database operations.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: SqlitePool,
}

impl PartyRepository {
    /// Creates a new PartyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartyRepository { pool }
    }

    /// Inserts a new party.
    pub async fn insert(&self, party: &Party) -> DbResult<()> {
        debug!(id = %party.id, name = %party.name, "Inserting party");

        sqlx::query(
            r#"
            INSERT INTO parties (
                id, name, cuit, address, kind, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&party.id)
        .bind(&party.name)
        .bind(&party.cuit)
        .bind(&party.address)
        .bind(party.kind)
        .bind(party.is_active)
        .bind(party.created_at)
        .bind(party.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a party by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Party>> {
        let party: Option<Party> = sqlx::query_as::<_, Party>(
            r#"
            SELECT id, name, cuit, address, kind, is_active, created_at, updated_at
            FROM parties
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(party)
    }

    /// Gets a party by ID, failing if missing.
    pub async fn require(&self, id: &str) -> DbResult<Party> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Party", id))
    }

    /// Lists active parties, optionally filtered by kind.
    pub async fn list(&self, kind: Option<PartyKind>) -> DbResult<Vec<Party>> {
        let parties: Vec<Party> = match kind {
            Some(kind) => {
                sqlx::query_as::<_, Party>(
                    r#"
                    SELECT id, name, cuit, address, kind, is_active, created_at, updated_at
                    FROM parties
                    WHERE is_active = 1 AND kind = ?1
                    ORDER BY name
                    "#,
                )
                .bind(kind)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Party>(
                    r#"
                    SELECT id, name, cuit, address, kind, is_active, created_at, updated_at
                    FROM parties
                    WHERE is_active = 1
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(parties)
    }

    /// Searches active parties by name (case-insensitive substring).
    pub async fn search(&self, query: &str, limit: i64) -> DbResult<Vec<Party>> {
        let pattern = format!("%{}%", query);

        let parties: Vec<Party> = sqlx::query_as::<_, Party>(
            r#"
            SELECT id, name, cuit, address, kind, is_active, created_at, updated_at
            FROM parties
            WHERE is_active = 1 AND name LIKE ?1
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(parties)
    }

    /// Soft-deletes a party.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE parties SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Party", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn make_party(name: &str, kind: PartyKind) -> Party {
        let now = Utc::now();
        Party {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            cuit: None,
            address: None,
            kind,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_by_kind() {
        let db = test_db().await;
        let repo = db.parties();

        repo.insert(&make_party("Frigorífico Norte", PartyKind::Buyer))
            .await
            .unwrap();
        repo.insert(&make_party("Cabaña La Esperanza", PartyKind::Supplier))
            .await
            .unwrap();

        let buyers = repo.list(Some(PartyKind::Buyer)).await.unwrap();
        assert_eq!(buyers.len(), 1);
        assert_eq!(buyers[0].name, "Frigorífico Norte");

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let db = test_db().await;
        let repo = db.parties();

        repo.insert(&make_party("Frigorífico Norte", PartyKind::Buyer))
            .await
            .unwrap();
        repo.insert(&make_party("Frigorífico Sur", PartyKind::Buyer))
            .await
            .unwrap();

        let found = repo.search("Sur", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Frigorífico Sur");
    }

    #[tokio::test]
    async fn test_deactivated_party_hidden_from_list() {
        let db = test_db().await;
        let repo = db.parties();

        let party = make_party("Frigorífico Norte", PartyKind::Buyer);
        repo.insert(&party).await.unwrap();
        repo.deactivate(&party.id).await.unwrap();

        assert!(repo.list(None).await.unwrap().is_empty());
        // Still reachable by ID (facturas keep referencing it)
        assert!(repo.get_by_id(&party.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_require_missing_party() {
        let db = test_db().await;

        let err = db.parties().require("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
