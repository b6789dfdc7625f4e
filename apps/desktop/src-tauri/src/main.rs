//! # Hacienda Desktop Application Entry Point
//!
//! This is the main entry point for the Tauri desktop application.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hacienda Desktop                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Tauri WebView                               │  │
//! │  │  ┌────────────────────────────────────────────────────────────┐  │  │
//! │  │  │                      Frontend                              │  │  │
//! │  │  │  • Sale Wizard          • Invoice List                     │  │  │
//! │  │  │  • Numbering Config     • PDF Preview                      │  │  │
//! │  │  └────────────────────────────────────────────────────────────┘  │  │
//! │  │                              │                                   │  │
//! │  │                     invoke('command')                           │  │
//! │  │                              │                                   │  │
//! │  └──────────────────────────────┼───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Delegates to lib.rs                              │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► Sets up logging, database, state, commands       │  │
//! │  │                                                                  │  │
//! │  │  commands/ ──► wizard_confirm, create_invoice, emit_invoice     │  │
//! │  │                                                                  │  │
//! │  │  state/ ─────► DbState, WizardState, ConfigState                │  │
//! │  │                                                                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  hacienda.db (local file, WAL mode)                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Determine database path (app data directory)
//! 3. Connect to database & run migrations
//! 4. Create state objects (DbState, WizardState, ConfigState)
//! 5. Build Tauri application
//! 6. Register commands
//! 7. Launch window

// Prevents an additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

fn main() {
    // Run the Tauri application
    // The actual setup is in lib.rs for better testability
    hacienda_desktop_lib::run();
}
