//! # Numbering Commands
//!
//! Tauri commands for reading and editing the numbering configuration.
//!
//! Issuing a number is NOT exposed here: numbers are only taken inside
//! `create_invoice`, so the counter cannot be advanced from the UI
//! without a factura being written.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use hacienda_core::{Comprobante, NumberingConfig};

/// Numbering configuration data sent to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingConfigDto {
    pub comprobante: Comprobante,
    pub punto_venta: i64,
    pub last_number: i64,
    pub prefix: String,
    pub suffix: String,
    pub active: bool,
    /// What the next issued number will look like.
    pub next_preview: String,
}

impl From<NumberingConfig> for NumberingConfigDto {
    fn from(config: NumberingConfig) -> Self {
        let next_preview = config.peek_next();
        NumberingConfigDto {
            comprobante: config.comprobante,
            punto_venta: config.punto_venta,
            last_number: config.last_number,
            prefix: config.prefix,
            suffix: config.suffix,
            active: config.active,
            next_preview,
        }
    }
}

/// Returns the numbering configuration for one comprobante class.
#[tauri::command]
pub async fn get_numbering_config(
    db: State<'_, DbState>,
    comprobante: Comprobante,
) -> Result<NumberingConfigDto, ApiError> {
    debug!(?comprobante, "get_numbering_config command");

    let config = db
        .inner()
        .numbering()
        .get(comprobante)
        .await?
        .ok_or_else(|| ApiError::not_found("NumberingConfig", comprobante.letter()))?;

    Ok(NumberingConfigDto::from(config))
}

/// Saves a numbering configuration.
///
/// ## Invariants Enforced
/// - punto_venta >= 1, affixes length-limited (core validation)
/// - `last_number` may stay or jump forward, never backward; the
///   repository rejects a decrease so already-issued numbers cannot be
///   re-issued
#[tauri::command]
pub async fn save_numbering_config(
    db: State<'_, DbState>,
    comprobante: Comprobante,
    punto_venta: i64,
    last_number: i64,
    prefix: String,
    suffix: String,
    active: bool,
) -> Result<NumberingConfigDto, ApiError> {
    debug!(?comprobante, punto_venta = %punto_venta, last_number = %last_number, "save_numbering_config command");

    let config = NumberingConfig {
        comprobante,
        punto_venta,
        last_number,
        prefix,
        suffix,
        active,
        updated_at: Utc::now(),
    };

    db.inner().numbering().save(&config).await?;

    info!(?comprobante, "Numbering configuration saved");
    Ok(NumberingConfigDto::from(config))
}
