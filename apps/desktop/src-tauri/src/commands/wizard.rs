//! # Sale Wizard Commands
//!
//! Tauri commands driving the three-step sale flow.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Wizard Command Flow                                  │
//! │                                                                         │
//! │  Frontend Action          Tauri Command            Wizard State Change  │
//! │  ───────────────          ─────────────            ─────────────────    │
//! │                                                                         │
//! │  Open Wizard ────────────► wizard_get() ──────────► (read only)         │
//! │                                                                         │
//! │  Pick Buyer ─────────────► wizard_set_buyer() ────► buyer_id = Some     │
//! │                                                                         │
//! │  Pick Animal ────────────► wizard_add_animal() ───► lots.push(lot)      │
//! │                                                                         │
//! │  Enter Price ────────────► wizard_set_price() ────► prices[cat] = p     │
//! │                                                                         │
//! │  Next / Back ────────────► wizard_next_step() ────► step advances only  │
//! │                            wizard_prev_step()       when valid          │
//! │                                                                         │
//! │  Confirm ────────────────► wizard_confirm() ──────► sale persisted,     │
//! │                                                     animals marked      │
//! │                                                     sold, wizard reset  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SaleWizard, WizardLot, WizardState, WizardStep};
use hacienda_core::{Comprobante, Money, PartyKind, Sale, SaleLot};

/// Snapshot of the wizard for the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub buyer_id: Option<String>,
    pub comprobante: Comprobante,
    pub lots: Vec<WizardLot>,
    /// Categories present in the selection, with their price if entered.
    pub categories: Vec<CategoryPrice>,
    /// Totals, present once every category has a price.
    pub totals: Option<TotalsDto>,
    pub step_valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPrice {
    pub category: String,
    pub unit_price_centavos: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDto {
    pub subtotal_centavos: i64,
    pub tax_centavos: i64,
    pub total_centavos: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSaleResponse {
    pub sale_id: String,
    pub subtotal_centavos: i64,
    pub tax_centavos: i64,
    pub total_centavos: i64,
    pub lot_count: usize,
}

fn snapshot(wizard: &SaleWizard) -> WizardSnapshot {
    let categories = wizard
        .categories()
        .into_iter()
        .map(|category| {
            let unit_price_centavos = wizard.prices.get(&category).map(|m| m.centavos());
            CategoryPrice {
                category,
                unit_price_centavos,
            }
        })
        .collect();

    let totals = wizard.totals().ok().map(|t| TotalsDto {
        subtotal_centavos: t.subtotal.centavos(),
        tax_centavos: t.tax.centavos(),
        total_centavos: t.total.centavos(),
    });

    WizardSnapshot {
        step: wizard.step,
        buyer_id: wizard.buyer_id.clone(),
        comprobante: wizard.comprobante,
        lots: wizard.lots.clone(),
        categories,
        totals,
        step_valid: wizard.step_valid(),
    }
}

/// Returns the current wizard state.
#[tauri::command]
pub fn wizard_get(wizard: State<'_, WizardState>) -> WizardSnapshot {
    debug!("wizard_get command");
    wizard.with_wizard(snapshot)
}

/// Selects the buyer for the sale (Datos step).
///
/// The party must exist, be active, and be a buyer.
#[tauri::command]
pub async fn wizard_set_buyer(
    db: State<'_, DbState>,
    wizard: State<'_, WizardState>,
    buyer_id: String,
) -> Result<WizardSnapshot, ApiError> {
    debug!(buyer_id = %buyer_id, "wizard_set_buyer command");

    let party = db.inner().parties().require(&buyer_id).await?;
    if party.kind != PartyKind::Buyer {
        return Err(ApiError::wizard(format!("{} is not a buyer", party.name)));
    }
    if !party.is_active {
        return Err(ApiError::wizard(format!("{} is deactivated", party.name)));
    }

    Ok(wizard.with_wizard_mut(|w| {
        w.set_buyer(&party.id);
        snapshot(w)
    }))
}

/// Adds an animal to the selection (Animales step).
#[tauri::command]
pub async fn wizard_add_animal(
    db: State<'_, DbState>,
    wizard: State<'_, WizardState>,
    animal_id: String,
) -> Result<WizardSnapshot, ApiError> {
    debug!(animal_id = %animal_id, "wizard_add_animal command");

    let animal = db.inner().animals().require(&animal_id).await?;

    wizard.with_wizard_mut(|w| {
        w.add_animal(&animal).map_err(ApiError::wizard)?;
        Ok(snapshot(w))
    })
}

/// Removes an animal from the selection.
#[tauri::command]
pub fn wizard_remove_animal(
    wizard: State<'_, WizardState>,
    animal_id: String,
) -> Result<WizardSnapshot, ApiError> {
    debug!(animal_id = %animal_id, "wizard_remove_animal command");

    wizard.with_wizard_mut(|w| {
        w.remove_animal(&animal_id).map_err(ApiError::wizard)?;
        Ok(snapshot(w))
    })
}

/// Sets the price per kilogram for a category (Precios step).
#[tauri::command]
pub fn wizard_set_price(
    wizard: State<'_, WizardState>,
    category: String,
    unit_price_centavos: i64,
) -> Result<WizardSnapshot, ApiError> {
    debug!(category = %category, price = %unit_price_centavos, "wizard_set_price command");

    wizard.with_wizard_mut(|w| {
        w.set_price(&category, Money::from_centavos(unit_price_centavos))
            .map_err(|e| ApiError::validation(e.to_string()))?;
        Ok(snapshot(w))
    })
}

/// Advances to the next step, refusing while the current one is incomplete.
#[tauri::command]
pub fn wizard_next_step(wizard: State<'_, WizardState>) -> Result<WizardSnapshot, ApiError> {
    debug!("wizard_next_step command");

    wizard.with_wizard_mut(|w| {
        w.next_step().map_err(ApiError::wizard)?;
        Ok(snapshot(w))
    })
}

/// Goes back one step. Always allowed, loses nothing.
#[tauri::command]
pub fn wizard_prev_step(wizard: State<'_, WizardState>) -> WizardSnapshot {
    debug!("wizard_prev_step command");

    wizard.with_wizard_mut(|w| {
        w.prev_step();
        snapshot(w)
    })
}

/// Confirms the sale: persists it, marks the animals sold, resets the wizard.
///
/// ## Atomicity
/// The sale and its lots are written in one database transaction; if any
/// selected animal is no longer available the whole sale rolls back and
/// the wizard keeps its state so the operator can fix the selection.
#[tauri::command]
pub async fn wizard_confirm(
    db: State<'_, DbState>,
    wizard: State<'_, WizardState>,
    config: State<'_, ConfigState>,
) -> Result<ConfirmSaleResponse, ApiError> {
    debug!("wizard_confirm command");

    // Snapshot everything under the lock, then do the async work without it.
    let (buyer_id, comprobante, lots, prices) = wizard.with_wizard(|w| {
        (
            w.buyer_id.clone(),
            w.comprobante,
            w.lots.clone(),
            w.prices.clone(),
        )
    });

    let buyer_id = buyer_id.ok_or_else(|| ApiError::wizard("No buyer selected"))?;
    if lots.is_empty() {
        return Err(ApiError::wizard("No animals selected"));
    }

    let totals = wizard.with_wizard(|w| w.totals()).map_err(ApiError::from)?;

    let sale_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let sale = Sale {
        id: sale_id.clone(),
        buyer_id,
        comprobante,
        subtotal_centavos: totals.subtotal.centavos(),
        tax_centavos: totals.tax.centavos(),
        total_centavos: totals.total.centavos(),
        notes: None,
        created_at: now,
    };

    let sale_lots: Vec<SaleLot> = lots
        .iter()
        .map(|lot| {
            // totals() succeeded, so every category has a price
            let unit_price = prices
                .get(&lot.category)
                .map(|m| m.centavos())
                .unwrap_or_default();
            SaleLot {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                animal_id: lot.animal_id.clone(),
                tag_snapshot: lot.tag.clone(),
                category_snapshot: lot.category.clone(),
                weight_kg: lot.weight_kg,
                unit_price_centavos: unit_price,
                line_total_centavos: Money::from_centavos(unit_price)
                    .multiply_weight(lot.weight_kg)
                    .centavos(),
                created_at: now,
            }
        })
        .collect();

    db.inner().sales().create_sale(&sale, &sale_lots).await?;

    wizard.with_wizard_mut(|w| w.reset(config.default_comprobante));

    info!(
        sale_id = %sale_id,
        total = %sale.total_centavos,
        lots = sale_lots.len(),
        "Sale confirmed"
    );

    Ok(ConfirmSaleResponse {
        sale_id,
        subtotal_centavos: sale.subtotal_centavos,
        tax_centavos: sale.tax_centavos,
        total_centavos: sale.total_centavos,
        lot_count: sale_lots.len(),
    })
}
