//! # Seed Data Generator
//!
//! Populates a development database with a handful of catalog products.
//!
//! ## Usage
//! ```bash
//! # Seed ./vitrine_dev.db
//! cargo run -p vitrine-db --bin seed
//!
//! # Specify database path
//! cargo run -p vitrine-db --bin seed -- --db ./data/loja.db
//! ```
//!
//! Seeded rows carry placeholder image URLs; replace them through the
//! storefront's update form to upload real images.

use std::env;
use vitrine_core::{Money, NewProduct};
use vitrine_db::{Database, DbConfig};

/// (name, description, price in centavos)
const DEMO_PRODUCTS: &[(&str, &str, i64)] = &[
    ("Caneca de Cerâmica", "Caneca branca de 350ml, vai ao micro-ondas.", 3490),
    ("Camiseta Básica", "Algodão penteado, disponível do P ao GG.", 5990),
    ("Boné Aba Curva", "Ajuste traseiro com fivela metálica.", 7990),
    ("Garrafa Térmica", "Mantém a temperatura por até 12 horas.", 8990),
    ("Caderno Pontilhado", "A5, 160 páginas, capa dura.", 4250),
    ("Mochila Urbana", "Compartimento acolchoado para notebook de 15\".", 19990),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vitrine_dev.db");

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
                println!("Vitrine Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vitrine_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vitrine Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let repo = db.products();
    for (index, (name, description, cents)) in DEMO_PRODUCTS.iter().enumerate() {
        let id = repo
            .create(&NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                price: Money::from_cents(*cents),
                image_url: Some(format!("https://placehold.co/600x400?text=Produto+{}", index + 1)),
            })
            .await?;
        println!("  + #{:<3} {:<22} {}", id, name, Money::from_cents(*cents));
    }

    println!();
    println!("✓ Seeded {} products", DEMO_PRODUCTS.len());

    db.close().await;
    Ok(())
}
