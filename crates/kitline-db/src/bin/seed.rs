//! # Seed Data Generator
//!
//! Populates the database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p kitline-db --bin seed
//!
//! # Specify database path
//! cargo run -p kitline-db --bin seed -- --db ./data/kitline.db
//! ```
//!
//! ## Generated Data
//! - Shirt types with listed prices
//! - One "N+" pack per shirt type, plus a kit-and-boots combo pack
//! - A few catalog products (typed and untyped, with sizes)
//! - Surcharge prices (`patch_price`, `personalization_price`)

use std::env;

use kitline_core::{Pack, PackRequirement, ProductCategory};
use kitline_db::{Database, DbConfig, NewProduct};

/// (name, price cents, cost cents, pack min quantity, pack unit price cents)
const SHIRT_TYPES: &[(&str, i64, i64, u32, i64)] = &[
    ("Current Season", 2500, 1100, 4, 2000),
    ("Retro", 2000, 800, 4, 1500),
    ("Kids", 1800, 700, 3, 1500),
    ("Player Version", 3000, 1400, 5, 2500),
];

const SIZES: &[&str] = &["S", "M", "L", "XL", "XXL"];

/// (key, price cents, cost cents)
const PRICING_CONFIG: &[(&str, i64, i64)] = &[
    ("patch_price", 200, 50),
    ("personalization_price", 300, 100),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kitline_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kitline Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kitline_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kitline Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.shirt_types().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} shirt types", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut retro_id = None;
    for (name, price, cost, min, pack_price) in SHIRT_TYPES {
        let shirt_type = db.shirt_types().insert(name, *price, *cost).await?;
        if *name == "Retro" {
            retro_id = Some(shirt_type.id);
        }

        let pack = Pack {
            id: 0,
            name: format!("{}+ {}", min, name),
            price_cents: *pack_price,
            requirements: vec![PackRequirement {
                category: ProductCategory::Tshirt,
                shirt_type_id: Some(shirt_type.id),
                quantity: *min,
            }],
        };
        db.packs().insert(&pack).await?;

        println!("  ✓ {} ({} cents), pack {}", name, price, pack.name);
    }

    if let Some(retro_id) = retro_id {
        let combo = Pack {
            id: 0,
            name: "Retro Kit + Boots".to_string(),
            price_cents: 6500,
            requirements: vec![
                PackRequirement {
                    category: ProductCategory::Tshirt,
                    shirt_type_id: Some(retro_id),
                    quantity: 1,
                },
                PackRequirement {
                    category: ProductCategory::Shoes,
                    shirt_type_id: None,
                    quantity: 1,
                },
            ],
        };
        db.packs().insert(&combo).await?;
        println!("  ✓ Combo pack {}", combo.name);
    }

    let sizes: Vec<String> = SIZES.iter().map(|s| s.to_string()).collect();
    let products = [
        NewProduct {
            name: "Benfica 1961 Home (Retro)".to_string(),
            price_cents: 0,
            cost_price_cents: 800,
            category: ProductCategory::Tshirt,
            shirt_type_id: retro_id,
            available_sizes: sizes.clone(),
        },
        NewProduct {
            name: "Training Jacket".to_string(),
            price_cents: 4500,
            cost_price_cents: 2000,
            category: ProductCategory::Other,
            shirt_type_id: None,
            available_sizes: sizes.clone(),
        },
        NewProduct {
            name: "Match Boots".to_string(),
            price_cents: 5000,
            cost_price_cents: 2500,
            category: ProductCategory::Shoes,
            shirt_type_id: None,
            available_sizes: (38..=46).map(|s| s.to_string()).collect(),
        },
        NewProduct {
            name: "Scarf".to_string(),
            price_cents: 1200,
            cost_price_cents: 400,
            category: ProductCategory::Other,
            shirt_type_id: None,
            available_sizes: Vec::new(),
        },
    ];

    for product in &products {
        let inserted = db.products().insert(product).await?;
        println!("  ✓ Product #{} {}", inserted.id, inserted.name);
    }

    for (key, price, cost) in PRICING_CONFIG {
        let entry = db.pricing_config().upsert(key, *price, Some(*cost)).await?;
        println!("  ✓ {} = {} cents", entry.name, entry.price_cents);
    }

    println!();
    println!("✓ Seed complete");

    db.close().await;
    Ok(())
}
