//! # Hacienda Desktop Library
//!
//! Core library for the Hacienda desktop application.
//! This is the main entry point that configures and runs the Tauri app.
//!
//! ## Module Organization
//! ```text
//! hacienda_desktop_lib/
//! ├── lib.rs          ◄─── You are here (Tauri setup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── wizard.rs   ◄─── Sale wizard state machine
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── party.rs    ◄─── Buyer/supplier commands
//! │   ├── animal.rs   ◄─── Available animal queries
//! │   ├── wizard.rs   ◄─── Sale wizard commands
//! │   ├── invoice.rs  ◄─── Invoice creation & lifecycle
//! │   ├── numbering.rs◄─── Numbering configuration
//! │   ├── pdf.rs      ◄─── PDF generation & presentation
//! │   └── config.rs   ◄─── Configuration commands
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Option B: Multiple State Types)
//! Instead of a single `AppState` struct, we use multiple focused state types:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri State Management                               │
//! │                                                                         │
//! │  Option B: Multiple State Types (CHOSEN)                               │
//! │  ─────────────────────────────────────────                             │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    DbState       │ │   WizardState    │ │    ConfigState       │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Database pool │ │  • Current step  │ │  • Company profile   │   │
//! │  │  • Repositories  │ │  • Selected lots │ │  • Default comprob.  │   │
//! │  │                  │ │  • Price list    │ │  • Initial status    │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  WHY: Each command only requests the state it needs.                   │
//! │       Better separation of concerns and testability.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tauri::Manager;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use hacienda_db::{Database, DbConfig};
use state::{ConfigState, DbState, WizardState};

/// Runs the Tauri application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Determine Database Path ──────────────────────────────────────────► │
/// │     • macOS: ~/Library/Application Support/com.hacienda.app/...         │
/// │     • Windows: %APPDATA%/hacienda/app/hacienda.db                       │
/// │     • Linux: ~/.local/share/hacienda-app/hacienda.db                    │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations (seeds the numbering configs)              │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • DbState: Wraps Database connection                                │
/// │     • WizardState: Empty sale wizard with Mutex for thread safety       │
/// │     • ConfigState: Environment-driven configuration                     │
/// │                                                                         │
/// │  5. Build & Run Tauri App ────────────────────────────────────────────► │
/// │     • Register all commands                                             │
/// │     • Manage state                                                      │
/// │     • Launch window                                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() {
    // Initialize tracing (logging)
    init_tracing();

    info!("Starting Hacienda Desktop Application");

    // Build and run the Tauri app
    tauri::Builder::default()
        // Setup hook runs before the app starts
        .setup(|app| {
            // Determine database path
            let db_path = get_database_path(app)?;
            info!(?db_path, "Database path determined");

            // Initialize database (blocking in setup, async in runtime)
            let db = tauri::async_runtime::block_on(async {
                let config = DbConfig::new(db_path);
                Database::new(config).await
            })?;

            info!("Database connected and migrations applied");

            // Initialize state objects
            let db_state = DbState::new(db);
            let wizard_state = WizardState::new();
            let config_state = ConfigState::from_env();

            // Register state with Tauri
            app.manage(db_state);
            app.manage(wizard_state);
            app.manage(config_state);

            info!("State initialized");
            Ok(())
        })
        // Register all commands
        .invoke_handler(tauri::generate_handler![
            // Party commands
            commands::party::list_parties,
            commands::party::create_party,
            // Animal commands
            commands::animal::list_available_animals,
            // Sale wizard commands
            commands::wizard::wizard_get,
            commands::wizard::wizard_set_buyer,
            commands::wizard::wizard_add_animal,
            commands::wizard::wizard_remove_animal,
            commands::wizard::wizard_set_price,
            commands::wizard::wizard_next_step,
            commands::wizard::wizard_prev_step,
            commands::wizard::wizard_confirm,
            // Invoice commands
            commands::invoice::create_invoice,
            commands::invoice::list_invoices,
            commands::invoice::get_invoice,
            commands::invoice::emit_invoice,
            commands::invoice::pay_invoice,
            commands::invoice::annul_invoice,
            // Numbering commands
            commands::numbering::get_numbering_config,
            commands::numbering::save_numbering_config,
            // PDF commands
            commands::pdf::save_invoice_pdf,
            commands::pdf::open_invoice_pdf,
            commands::pdf::preview_invoice_pdf,
            // Config commands
            commands::config::get_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=hacienda=trace` - Show trace for hacienda crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hacienda=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.hacienda.app/hacienda.db`
/// - **Windows**: `%APPDATA%\hacienda\app\hacienda.db`
/// - **Linux**: `~/.local/share/hacienda-app/hacienda.db`
///
/// ## Development Override
/// Set `HACIENDA_DB_PATH` environment variable to use a custom path.
fn get_database_path(_app: &tauri::App) -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Check for override
    if let Ok(path) = std::env::var("HACIENDA_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    // Use platform-specific app data directory
    let proj_dirs = ProjectDirs::from("com", "hacienda", "app")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("hacienda.db"))
}
