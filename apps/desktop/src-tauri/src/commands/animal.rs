//! # Animal Commands
//!
//! Tauri commands for querying the cattle inventory.

use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use hacienda_core::Animal;

/// Animal data sent to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDto {
    pub id: String,
    pub tag: String,
    pub category: String,
    pub weight_kg: i64,
}

impl From<Animal> for AnimalDto {
    fn from(animal: Animal) -> Self {
        AnimalDto {
            id: animal.id,
            tag: animal.tag,
            category: animal.category,
            weight_kg: animal.weight_kg,
        }
    }
}

/// Lists animals available for sale, optionally filtered by category.
///
/// ## When Used
/// - The Animales step of the sale wizard
#[tauri::command]
pub async fn list_available_animals(
    db: State<'_, DbState>,
    category: Option<String>,
) -> Result<Vec<AnimalDto>, ApiError> {
    debug!(?category, "list_available_animals command");

    let animals = db
        .inner()
        .animals()
        .list_available(category.as_deref())
        .await?;
    Ok(animals.into_iter().map(AnimalDto::from).collect())
}
