//! # Seed Data Generator
//!
//! Populates the database with demo parties and animals for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 animals (default)
//! cargo run -p hacienda-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p hacienda-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p hacienda-db --bin seed -- --db ./data/hacienda.db
//! ```
//!
//! ## Generated Data
//! - A handful of buyers (frigoríficos) and suppliers (cabañas)
//! - Animals across the standard categories, each with:
//!   - Unique ear-tag: `AR{INDEX:04}`
//!   - Category-typical weight (deterministic, no RNG dependency)

use chrono::Utc;
use std::env;

use hacienda_core::{Animal, AnimalState, Party, PartyKind};
use hacienda_db::{Database, DbConfig};
use uuid::Uuid;

/// Categories with a typical weight band in kg (min, spread).
const CATEGORIES: &[(&str, i64, i64)] = &[
    ("Novillo", 380, 120),
    ("Vaquillona", 280, 100),
    ("Vaca", 400, 150),
    ("Ternero", 160, 80),
    ("Toro", 600, 200),
];

/// Demo counterparties.
const BUYERS: &[(&str, &str)] = &[
    ("Frigorífico del Sur SA", "30-50001091-2"),
    ("Frigorífico Norte SRL", "30-70710103-9"),
    ("Carnes Pampeanas SA", "30-65425350-8"),
];

const SUPPLIERS: &[&str] = &[
    "Cabaña La Esperanza",
    "Estancia El Ombú",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./hacienda_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Hacienda Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of animals to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./hacienda_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Hacienda Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Animals:  {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing inventory
    let existing = db.animals().list_available(None).await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} available animals", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding parties...");

    for (name, cuit) in BUYERS {
        db.parties()
            .insert(&make_party(name, Some(cuit), PartyKind::Buyer))
            .await?;
    }
    for name in SUPPLIERS {
        db.parties()
            .insert(&make_party(name, None, PartyKind::Supplier))
            .await?;
    }

    println!("✓ {} buyers, {} suppliers", BUYERS.len(), SUPPLIERS.len());

    println!();
    println!("Generating animals...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let animal = generate_animal(seed);
        if let Err(e) = db.animals().insert(&animal).await {
            eprintln!("Failed to insert {}: {}", animal.tag, e);
            continue;
        }
        generated += 1;

        if generated % 100 == 0 {
            println!("  Generated {} animals...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} animals in {:?}", generated, elapsed);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a demo party.
fn make_party(name: &str, cuit: Option<&str>, kind: PartyKind) -> Party {
    let now = Utc::now();
    Party {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        cuit: cuit.map(|c| c.to_string()),
        address: None,
        kind,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Generates a single animal with a category-typical weight.
fn generate_animal(seed: usize) -> Animal {
    let now = Utc::now();

    let (category, base, spread) = CATEGORIES[seed % CATEGORIES.len()];
    let weight_kg = base + ((seed * 37) as i64 % spread);

    Animal {
        id: Uuid::new_v4().to_string(),
        tag: format!("AR{:04}", seed + 1),
        category: category.to_string(),
        weight_kg,
        state: AnimalState::Available,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}
