//! # Database State
//!
//! Wraps the `Database` connection for use in Tauri commands.
//!
//! ## Thread Safety
//! The `Database` struct from `hacienda-db` contains a `SqlitePool` which
//! is inherently thread-safe. Multiple commands can execute queries
//! concurrently without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! #[tauri::command]
//! async fn list_parties(
//!     db: State<'_, DbState>,
//! ) -> Result<Vec<PartyDto>, ApiError> {
//!     let parties = db.inner().parties().list(Some(PartyKind::Buyer)).await?;
//!     Ok(parties.into_iter().map(PartyDto::from).collect())
//! }
//! ```

use hacienda_db::Database;

/// Wrapper around `Database` for Tauri state management.
///
/// ## Why a Wrapper?
/// Tauri's state management requires types to implement `Send + Sync`.
/// This wrapper makes the intent explicit and provides a clean API
/// for accessing the database in commands.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let configs = db_state.inner().numbering().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
