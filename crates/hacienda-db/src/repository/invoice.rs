//! # Invoice Repository
//!
//! Database operations for facturas and their line items.
//!
//! ## Factura Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Factura Lifecycle                                  │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── insert_invoice() → Factura { status: Pendiente, number }       │
//! │         (number comes from NumberingRepository, assigned exactly once) │
//! │                                                                         │
//! │  2. EMIT                                                               │
//! │     └── emit() → Factura { status: Emitida }                           │
//! │                                                                         │
//! │  3. SETTLE                                                             │
//! │     ├── pay()   → Factura { status: Pagada }   (terminal)              │
//! │     └── annul() → Factura { status: Anulada }  (terminal)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each status update carries a `WHERE status = ...` guard mirroring the
//! state machine, so a concurrent transition can never corrupt the
//! lifecycle. No UPDATE in this module ever touches `number`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use hacienda_core::{CoreError, Factura, FacturaItem, FacturaStatus};

/// Repository for factura database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Inserts a factura together with its line items, in one transaction.
    ///
    /// ## Snapshot Pattern
    /// Item category and unit price are frozen copies: later price-list
    /// changes never alter an issued document.
    pub async fn insert_invoice(&self, factura: &Factura, items: &[FacturaItem]) -> DbResult<()> {
        debug!(id = %factura.id, number = %factura.number, "Inserting factura");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO facturas (
                id, number, comprobante, punto_venta, buyer_id, sale_id,
                issue_date, due_date,
                net_centavos, tax_centavos, total_centavos,
                status, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14, ?15
            )
            "#,
        )
        .bind(&factura.id)
        .bind(&factura.number)
        .bind(factura.comprobante)
        .bind(factura.punto_venta)
        .bind(&factura.buyer_id)
        .bind(&factura.sale_id)
        .bind(factura.issue_date)
        .bind(factura.due_date)
        .bind(factura.net_centavos)
        .bind(factura.tax_centavos)
        .bind(factura.total_centavos)
        .bind(factura.status)
        .bind(&factura.notes)
        .bind(factura.created_at)
        .bind(factura.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO factura_items (
                    id, factura_id, concept, category,
                    weight_kg, unit_price_centavos, line_total_centavos,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.factura_id)
            .bind(&item.concept)
            .bind(&item.category)
            .bind(item.weight_kg)
            .bind(item.unit_price_centavos)
            .bind(item.line_total_centavos)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            number = %factura.number,
            total_centavos = factura.total_centavos,
            items = items.len(),
            "Factura created"
        );

        Ok(())
    }

    /// Gets a factura by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Factura>> {
        let factura: Option<Factura> = sqlx::query_as::<_, Factura>(
            r#"
            SELECT id, number, comprobante, punto_venta, buyer_id, sale_id,
                   issue_date, due_date,
                   net_centavos, tax_centavos, total_centavos,
                   status, notes, created_at, updated_at
            FROM facturas
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(factura)
    }

    /// Gets all line items for a factura.
    pub async fn get_items(&self, factura_id: &str) -> DbResult<Vec<FacturaItem>> {
        let items: Vec<FacturaItem> = sqlx::query_as::<_, FacturaItem>(
            r#"
            SELECT id, factura_id, concept, category,
                   weight_kg, unit_price_centavos, line_total_centavos,
                   created_at
            FROM factura_items
            WHERE factura_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(factura_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the most recent facturas.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Factura>> {
        let facturas: Vec<Factura> = sqlx::query_as::<_, Factura>(
            r#"
            SELECT id, number, comprobante, punto_venta, buyer_id, sale_id,
                   issue_date, due_date,
                   net_centavos, tax_centavos, total_centavos,
                   status, notes, created_at, updated_at
            FROM facturas
            ORDER BY created_at DESC, number DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(facturas)
    }

    /// Marks a pending factura as emitted.
    pub async fn emit(&self, id: &str) -> DbResult<()> {
        self.transition(id, FacturaStatus::Pendiente, FacturaStatus::Emitida)
            .await
    }

    /// Marks an emitted factura as paid. Terminal.
    pub async fn pay(&self, id: &str) -> DbResult<()> {
        self.transition(id, FacturaStatus::Emitida, FacturaStatus::Pagada)
            .await
    }

    /// Annuls an emitted factura. Terminal.
    pub async fn annul(&self, id: &str) -> DbResult<()> {
        self.transition(id, FacturaStatus::Emitida, FacturaStatus::Anulada)
            .await
    }

    /// Applies one guarded status transition.
    ///
    /// The `WHERE status = ?` clause is the concurrency guard: if another
    /// writer got there first, zero rows match and the factura is re-read
    /// to produce a precise error.
    async fn transition(&self, id: &str, from: FacturaStatus, to: FacturaStatus) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE facturas SET
                status = ?3,
                updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                Some(factura) => Err(DbError::Domain(CoreError::InvalidStatusTransition {
                    from: factura.status,
                    to,
                })),
                None => Err(DbError::not_found("Factura", id)),
            };
        }

        info!(id = %id, from = ?from, to = ?to, "Factura status changed");
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
    use chrono::NaiveDate;
    use hacienda_core::{Comprobante, Party, PartyKind};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_buyer(db: &Database) -> Party {
        let now = Utc::now();
        let party = Party {
            id: Uuid::new_v4().to_string(),
            name: "Frigorífico del Sur SA".to_string(),
            cuit: Some("30-50001091-2".to_string()),
            address: Some("Ruta 5 km 120, Trenque Lauquen".to_string()),
            kind: PartyKind::Buyer,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.parties().insert(&party).await.unwrap();
        party
    }

    fn build_factura(buyer_id: &str) -> (Factura, Vec<FacturaItem>) {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let factura = Factura {
            id: id.clone(),
            number: "0001-00000001-A".to_string(),
            comprobante: Comprobante::A,
            punto_venta: 1,
            buyer_id: buyer_id.to_string(),
            sale_id: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            due_date: None,
            net_centavos: 13_500_000,
            tax_centavos: 2_835_000,
            total_centavos: 16_335_000,
            status: FacturaStatus::Pendiente,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let items = vec![FacturaItem {
            id: Uuid::new_v4().to_string(),
            factura_id: id,
            concept: "Novillo - caravana AR0001".to_string(),
            category: "Novillo".to_string(),
            weight_kg: 300,
            unit_price_centavos: 45_000,
            line_total_centavos: 13_500_000,
            created_at: now,
        }];

        (factura, items)
    }

    #[tokio::test]
    async fn test_insert_and_fetch_factura() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;
        let (factura, items) = build_factura(&buyer.id);

        db.invoices().insert_invoice(&factura, &items).await.unwrap();

        let fetched = db.invoices().get_by_id(&factura.id).await.unwrap().unwrap();
        assert_eq!(fetched.number, "0001-00000001-A");
        assert_eq!(fetched.status, FacturaStatus::Pendiente);
        assert!(fetched.totals_consistent());

        let fetched_items = db.invoices().get_items(&factura.id).await.unwrap();
        assert_eq!(fetched_items.len(), 1);
        assert_eq!(fetched_items[0].weight_kg, 300);
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;
        let (factura, items) = build_factura(&buyer.id);
        db.invoices().insert_invoice(&factura, &items).await.unwrap();

        let (mut second, items) = build_factura(&buyer.id);
        second.number = factura.number.clone();

        let err = db.invoices().insert_invoice(&second, &items).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_full_lifecycle_to_paid() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;
        let (factura, items) = build_factura(&buyer.id);
        db.invoices().insert_invoice(&factura, &items).await.unwrap();

        db.invoices().emit(&factura.id).await.unwrap();
        db.invoices().pay(&factura.id).await.unwrap();

        let fetched = db.invoices().get_by_id(&factura.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, FacturaStatus::Pagada);
        // Number untouched through the whole lifecycle
        assert_eq!(fetched.number, factura.number);
    }

    #[tokio::test]
    async fn test_annul_requires_emitted() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;
        let (factura, items) = build_factura(&buyer.id);
        db.invoices().insert_invoice(&factura, &items).await.unwrap();

        // Pendiente cannot be annulled directly
        let err = db.invoices().annul(&factura.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

        db.invoices().emit(&factura.id).await.unwrap();
        db.invoices().annul(&factura.id).await.unwrap();

        let fetched = db.invoices().get_by_id(&factura.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, FacturaStatus::Anulada);
    }

    #[tokio::test]
    async fn test_terminal_states_are_final() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;
        let (factura, items) = build_factura(&buyer.id);
        db.invoices().insert_invoice(&factura, &items).await.unwrap();

        db.invoices().emit(&factura.id).await.unwrap();
        db.invoices().pay(&factura.id).await.unwrap();

        let err = db.invoices().annul(&factura.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }

    #[tokio::test]
    async fn test_transition_on_missing_factura() {
        let db = test_db().await;

        let err = db.invoices().emit("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let db = test_db().await;
        let buyer = seed_buyer(&db).await;

        for n in 1..=3 {
            let (mut factura, mut items) = build_factura(&buyer.id);
            factura.number = format!("0001-{:08}-A", n);
            factura.created_at = Utc::now() + chrono::Duration::seconds(n);
            for item in &mut items {
                item.factura_id = factura.id.clone();
            }
            db.invoices().insert_invoice(&factura, &items).await.unwrap();
        }

        let recent = db.invoices().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].number, "0001-00000003-A");
    }
}
