//! # Sale Repository
//!
//! Database operations for registered sales and their lots.
//!
//! ## Sale Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Sale Registration (one transaction)                    │
//! │                                                                         │
//! │  wizard_confirm command                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_sale(sale, lots)                                               │
//! │       │                                                                 │
//! │       ├── INSERT INTO sales                                            │
//! │       ├── For each lot:                                                │
//! │       │      INSERT INTO sale_lots (snapshot of tag/category/price)    │
//! │       │      UPDATE animals SET state = 'sold'                         │
//! │       │        WHERE id = ? AND state = 'available'  ← guard           │
//! │       │                                                                 │
//! │       ├── Any guard fails → whole transaction rolls back               │
//! │       └── COMMIT                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `state = 'available'` guard means an animal can be sold at most
//! once, even under concurrent confirmation of two wizards.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use hacienda_core::{Sale, SaleLot};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a confirmed sale with its lots in one transaction.
    ///
    /// ## Snapshot Pattern
    /// Lot rows carry frozen copies of tag, category, weight and price:
    /// later changes to the animal never alter the sale history.
    pub async fn create_sale(&self, sale: &Sale, lots: &[SaleLot]) -> DbResult<()> {
        debug!(id = %sale.id, lots = lots.len(), "Registering sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, buyer_id, comprobante,
                subtotal_centavos, tax_centavos, total_centavos,
                notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.buyer_id)
        .bind(sale.comprobante)
        .bind(sale.subtotal_centavos)
        .bind(sale.tax_centavos)
        .bind(sale.total_centavos)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for lot in lots {
            sqlx::query(
                r#"
                INSERT INTO sale_lots (
                    id, sale_id, animal_id,
                    tag_snapshot, category_snapshot,
                    weight_kg, unit_price_centavos, line_total_centavos,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&lot.id)
            .bind(&lot.sale_id)
            .bind(&lot.animal_id)
            .bind(&lot.tag_snapshot)
            .bind(&lot.category_snapshot)
            .bind(lot.weight_kg)
            .bind(lot.unit_price_centavos)
            .bind(lot.line_total_centavos)
            .bind(lot.created_at)
            .execute(&mut *tx)
            .await?;

            // An animal may be sold at most once.
            let result = sqlx::query(
                r#"
                UPDATE animals SET
                    state = 'sold',
                    updated_at = ?2
                WHERE id = ?1 AND state = 'available'
                "#,
            )
            .bind(&lot.animal_id)
            .bind(lot.created_at)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping `tx` rolls the whole sale back.
                return Err(DbError::not_found("Animal (available)", &lot.animal_id));
            }
        }

        tx.commit().await?;

        info!(
            id = %sale.id,
            total_centavos = sale.total_centavos,
            lots = lots.len(),
            "Sale registered"
        );

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale: Option<Sale> = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, buyer_id, comprobante,
                   subtotal_centavos, tax_centavos, total_centavos,
                   notes, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all lots for a sale.
    pub async fn get_lots(&self, sale_id: &str) -> DbResult<Vec<SaleLot>> {
        let lots: Vec<SaleLot> = sqlx::query_as::<_, SaleLot>(
            r#"
            SELECT id, sale_id, animal_id,
                   tag_snapshot, category_snapshot,
                   weight_kg, unit_price_centavos, line_total_centavos,
                   created_at
            FROM sale_lots
            WHERE sale_id = ?1
            ORDER BY tag_snapshot
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lots)
    }

    /// Lists the most recent sales.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sales: Vec<Sale> = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, buyer_id, comprobante,
                   subtotal_centavos, tax_centavos, total_centavos,
                   notes, created_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::animal::new_animal;
    use chrono::Utc;
    use hacienda_core::{Animal, AnimalState, Comprobante, Party, PartyKind};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_buyer(db: &Database) -> Party {
        let now = Utc::now();
        let party = Party {
            id: Uuid::new_v4().to_string(),
            name: "Frigorífico del Sur SA".to_string(),
            cuit: None,
            address: None,
            kind: PartyKind::Buyer,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.parties().insert(&party).await.unwrap();
        party
    }

    fn lot_for(sale_id: &str, animal: &Animal, unit_price_centavos: i64) -> SaleLot {
        SaleLot {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            animal_id: animal.id.clone(),
            tag_snapshot: animal.tag.clone(),
            category_snapshot: animal.category.clone(),
            weight_kg: animal.weight_kg,
            unit_price_centavos,
            line_total_centavos: animal.weight_kg * unit_price_centavos,
            created_at: Utc::now(),
        }
    }

    fn sale_for(buyer_id: &str, lots: &[SaleLot]) -> Sale {
        let subtotal: i64 = lots.iter().map(|l| l.line_total_centavos).sum();
        Sale {
            id: lots[0].sale_id.clone(),
            buyer_id: buyer_id.to_string(),
            comprobante: Comprobante::B,
            subtotal_centavos: subtotal,
            tax_centavos: 0,
            total_centavos: subtotal,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_sale_marks_animals_sold() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;

        let animal = new_animal("AR0001", "Novillo", 300);
        db.animals().insert(&animal).await.unwrap();

        let sale_id = Uuid::new_v4().to_string();
        let lots = vec![lot_for(&sale_id, &animal, 45_000)];
        let sale = sale_for(&buyer.id, &lots);

        db.sales().create_sale(&sale, &lots).await.unwrap();

        let fetched = db.animals().require(&animal.id).await.unwrap();
        assert_eq!(fetched.state, AnimalState::Sold);

        let stored_lots = db.sales().get_lots(&sale.id).await.unwrap();
        assert_eq!(stored_lots.len(), 1);
        assert_eq!(stored_lots[0].line_total_centavos, 300 * 45_000);
    }

    #[tokio::test]
    async fn test_sold_animal_cannot_be_sold_again() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;

        let animal = new_animal("AR0001", "Novillo", 300);
        db.animals().insert(&animal).await.unwrap();

        let first_id = Uuid::new_v4().to_string();
        let first_lots = vec![lot_for(&first_id, &animal, 45_000)];
        db.sales()
            .create_sale(&sale_for(&buyer.id, &first_lots), &first_lots)
            .await
            .unwrap();

        let second_id = Uuid::new_v4().to_string();
        let second_lots = vec![lot_for(&second_id, &animal, 50_000)];
        let err = db
            .sales()
            .create_sale(&sale_for(&buyer.id, &second_lots), &second_lots)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));

        // Second sale rolled back entirely
        assert!(db.sales().get_by_id(&second_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_sale_leaves_other_animals_available() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;

        let available = new_animal("AR0001", "Novillo", 300);
        let mut sold = new_animal("AR0002", "Vaca", 380);
        sold.state = AnimalState::Sold;
        db.animals().insert(&available).await.unwrap();
        db.animals().insert(&sold).await.unwrap();

        let sale_id = Uuid::new_v4().to_string();
        let lots = vec![
            lot_for(&sale_id, &available, 45_000),
            lot_for(&sale_id, &sold, 38_000),
        ];

        let err = db
            .sales()
            .create_sale(&sale_for(&buyer.id, &lots), &lots)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // Rollback must restore the first animal to available
        let fetched = db.animals().require(&available.id).await.unwrap();
        assert_eq!(fetched.state, AnimalState::Available);
    }
}
