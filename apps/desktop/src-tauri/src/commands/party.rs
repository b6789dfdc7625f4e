//! # Party Commands
//!
//! Tauri commands for buyers and suppliers.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::DbState;
use hacienda_core::validation::{validate_cuit, validate_party_name};
use hacienda_core::{Party, PartyKind};

/// Party data sent to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDto {
    pub id: String,
    pub name: String,
    pub cuit: Option<String>,
    pub address: Option<String>,
    pub kind: PartyKind,
}

impl From<Party> for PartyDto {
    fn from(party: Party) -> Self {
        PartyDto {
            id: party.id,
            name: party.name,
            cuit: party.cuit,
            address: party.address,
            kind: party.kind,
        }
    }
}

/// Lists active parties, optionally filtered by role.
///
/// ## Parameters
/// - `kind`: `buyer`, `supplier`, or omitted for all
#[tauri::command]
pub async fn list_parties(
    db: State<'_, DbState>,
    kind: Option<PartyKind>,
) -> Result<Vec<PartyDto>, ApiError> {
    debug!(?kind, "list_parties command");

    let parties = db.inner().parties().list(kind).await?;
    Ok(parties.into_iter().map(PartyDto::from).collect())
}

/// Creates a new party after validating its fields.
///
/// ## Validation
/// - Name: required, trimmed, length-limited
/// - CUIT: optional, but when present must normalize to 11 digits
#[tauri::command]
pub async fn create_party(
    db: State<'_, DbState>,
    name: String,
    cuit: Option<String>,
    address: Option<String>,
    kind: PartyKind,
) -> Result<PartyDto, ApiError> {
    debug!(name = %name, ?kind, "create_party command");

    validate_party_name(&name).map_err(|e| ApiError::validation(e.to_string()))?;

    let cuit = match cuit.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => Some(validate_cuit(raw).map_err(|e| ApiError::validation(e.to_string()))?),
    };

    let now = Utc::now();
    let party = Party {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        cuit,
        address: address.filter(|a| !a.trim().is_empty()),
        kind,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    db.inner().parties().insert(&party).await?;

    info!(id = %party.id, name = %party.name, "Party created");
    Ok(PartyDto::from(party))
}
