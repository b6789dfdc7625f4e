//! # Numbering Repository
//!
//! Invoice number issuance and numbering configuration.
//!
//! ## Issuance Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Invoice Number Issuance                               │
//! │                                                                         │
//! │  create_invoice command                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  issue_number(Comprobante::A)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE numbering_configs                                              │
//! │     SET last_number = last_number + 1                                  │
//! │   WHERE comprobante = 'A' AND active = 1                               │
//! │  RETURNING *            ← single statement, single row                 │
//! │       │                                                                 │
//! │       ├── row returned  → IssuedNumber { 42, "0001-00000042-A" }       │
//! │       ├── config inactive → DbError::InactiveNumbering                 │
//! │       └── config missing  → DbError::NotFound                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Single Statement
//! The read-increment-write happens inside one SQL statement, so SQLite's
//! write serialization guarantees two concurrent issuers can never observe
//! the same counter value. No in-process lock is needed, and the guarantee
//! holds even across multiple processes sharing the database file.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use hacienda_core::{Comprobante, NumberingConfig, ValidationError};

/// A freshly issued invoice number.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedNumber {
    /// Raw sequential value taken from the counter.
    pub number: i64,
    /// Point of sale the number was issued under.
    pub punto_venta: i64,
    /// Display form: `prefix + zero-padded number + suffix`.
    pub formatted: String,
}

/// Repository for numbering configuration and number issuance.
#[derive(Debug, Clone)]
pub struct NumberingRepository {
    pool: SqlitePool,
}

impl NumberingRepository {
    /// Creates a new NumberingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NumberingRepository { pool }
    }

    /// Issues the next invoice number for a comprobante class.
    ///
    /// ## Atomicity
    /// The increment and read-back happen in one `UPDATE ... RETURNING`
    /// statement. Sequential calls yield distinct, strictly increasing,
    /// gapless numbers.
    ///
    /// ## Errors
    /// - `DbError::InactiveNumbering` - config exists but `active = 0`
    /// - `DbError::NotFound` - no config for this comprobante
    pub async fn issue_number(&self, comprobante: Comprobante) -> DbResult<IssuedNumber> {
        let now = Utc::now();

        let config: Option<NumberingConfig> = sqlx::query_as::<_, NumberingConfig>(
            r#"
            UPDATE numbering_configs SET
                last_number = last_number + 1,
                updated_at = ?2
            WHERE comprobante = ?1 AND active = 1
            RETURNING comprobante, punto_venta, last_number, prefix, suffix, active, updated_at
            "#,
        )
        .bind(comprobante)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let config = match config {
            Some(config) => config,
            None => {
                // Distinguish "deactivated" from "missing" for the caller.
                return match self.get(comprobante).await? {
                    Some(_) => Err(DbError::InactiveNumbering {
                        comprobante: comprobante.letter().to_string(),
                    }),
                    None => Err(DbError::not_found(
                        "NumberingConfig",
                        comprobante.letter(),
                    )),
                };
            }
        };

        let issued = IssuedNumber {
            number: config.last_number,
            punto_venta: config.punto_venta,
            formatted: config.format_number(config.last_number),
        };

        info!(
            comprobante = %comprobante.letter(),
            number = issued.number,
            formatted = %issued.formatted,
            "Issued invoice number"
        );

        Ok(issued)
    }

    /// Gets the numbering configuration for a comprobante class.
    pub async fn get(&self, comprobante: Comprobante) -> DbResult<Option<NumberingConfig>> {
        let config: Option<NumberingConfig> = sqlx::query_as::<_, NumberingConfig>(
            r#"
            SELECT comprobante, punto_venta, last_number, prefix, suffix, active, updated_at
            FROM numbering_configs
            WHERE comprobante = ?1
            "#,
        )
        .bind(comprobante)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    /// Lists all numbering configurations.
    pub async fn list(&self) -> DbResult<Vec<NumberingConfig>> {
        let configs: Vec<NumberingConfig> = sqlx::query_as::<_, NumberingConfig>(
            r#"
            SELECT comprobante, punto_venta, last_number, prefix, suffix, active, updated_at
            FROM numbering_configs
            ORDER BY comprobante
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(configs)
    }

    /// Saves (inserts or updates) a numbering configuration.
    ///
    /// ## Validation
    /// - `NumberingConfig::validate()` rules (punto_venta, affix lengths)
    /// - Monotonicity guard: an update may never move `last_number`
    ///   backward. The check runs in the same transaction as the write.
    pub async fn save(&self, config: &NumberingConfig) -> DbResult<()> {
        config.validate()?;

        debug!(
            comprobante = %config.comprobante.letter(),
            punto_venta = config.punto_venta,
            "Saving numbering config"
        );

        let mut tx = self.pool.begin().await?;

        let current: Option<i64> = sqlx::query_scalar(
            "SELECT last_number FROM numbering_configs WHERE comprobante = ?1",
        )
        .bind(config.comprobante)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(current) = current {
            if config.last_number < current {
                return Err(ValidationError::MustNotDecrease {
                    field: "last_number".to_string(),
                    current,
                    requested: config.last_number,
                }
                .into());
            }
        }

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO numbering_configs (
                comprobante, punto_venta, last_number, prefix, suffix, active, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (comprobante) DO UPDATE SET
                punto_venta = excluded.punto_venta,
                last_number = excluded.last_number,
                prefix = excluded.prefix,
                suffix = excluded.suffix,
                active = excluded.active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(config.comprobante)
        .bind(config.punto_venta)
        .bind(config.last_number)
        .bind(&config.prefix)
        .bind(&config.suffix)
        .bind(config.active)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_sequential_issuance_is_gapless() {
        let db = test_db().await;
        let repo = db.numbering();

        let mut numbers = Vec::new();
        for _ in 0..5 {
            let issued = repo.issue_number(Comprobante::A).await.unwrap();
            numbers.push(issued.number);
        }

        // Distinct, strictly increasing, no gaps
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issuers_never_share_a_number() {
        // The in-memory pool is a single connection and serializes
        // everything trivially, so this one runs against a file-backed
        // database with a real connection pool.
        let path = std::env::temp_dir().join(format!(
            "hacienda-numbering-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();

        const TASKS: usize = 8;
        const PER_TASK: usize = 5;

        let mut handles = Vec::new();
        for _ in 0..TASKS {
            let repo = db.numbering().clone();
            handles.push(tokio::spawn(async move {
                let mut numbers = Vec::with_capacity(PER_TASK);
                for _ in 0..PER_TASK {
                    numbers.push(repo.issue_number(Comprobante::A).await.unwrap().number);
                }
                numbers
            }));
        }

        let mut all: Vec<i64> = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }

        // Distinct and gapless: exactly 1..=40, each issued once
        all.sort_unstable();
        let expected: Vec<i64> = (1..=(TASKS * PER_TASK) as i64).collect();
        assert_eq!(all, expected);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_issued_number_formatting() {
        let db = test_db().await;
        let repo = db.numbering();

        let issued = repo.issue_number(Comprobante::A).await.unwrap();

        // Seeded config: prefix "0001-", suffix "-A"
        assert_eq!(issued.formatted, "0001-00000001-A");
        assert_eq!(issued.punto_venta, 1);
    }

    #[tokio::test]
    async fn test_fresh_config_without_affixes() {
        let db = test_db().await;
        let repo = db.numbering();

        let mut config = NumberingConfig::new(Comprobante::B, 1);
        config.prefix.clear();
        config.suffix.clear();
        repo.save(&config).await.unwrap();

        let issued = repo.issue_number(Comprobante::B).await.unwrap();
        assert_eq!(issued.formatted, "00000001");
    }

    #[tokio::test]
    async fn test_inactive_config_refuses_to_issue() {
        let db = test_db().await;
        let repo = db.numbering();

        let mut config = repo.get(Comprobante::C).await.unwrap().unwrap();
        config.active = false;
        repo.save(&config).await.unwrap();

        let err = repo.issue_number(Comprobante::C).await.unwrap_err();
        assert!(matches!(err, DbError::InactiveNumbering { .. }));
    }

    #[tokio::test]
    async fn test_counter_never_moves_backward() {
        let db = test_db().await;
        let repo = db.numbering();

        // Advance the counter to 3
        for _ in 0..3 {
            repo.issue_number(Comprobante::A).await.unwrap();
        }

        let mut config = repo.get(Comprobante::A).await.unwrap().unwrap();
        config.last_number = 1;

        let err = repo.save(&config).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustNotDecrease { .. })
        ));

        // Counter unchanged: next issuance continues from 3
        let issued = repo.issue_number(Comprobante::A).await.unwrap();
        assert_eq!(issued.number, 4);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_punto_venta() {
        let db = test_db().await;
        let repo = db.numbering();

        let mut config = NumberingConfig::new(Comprobante::E, 1);
        config.punto_venta = 0;

        let err = repo.save(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_counter_may_be_moved_forward() {
        let db = test_db().await;
        let repo = db.numbering();

        let mut config = repo.get(Comprobante::A).await.unwrap().unwrap();
        config.last_number = 100;
        repo.save(&config).await.unwrap();

        let issued = repo.issue_number(Comprobante::A).await.unwrap();
        assert_eq!(issued.number, 101);
    }
}
