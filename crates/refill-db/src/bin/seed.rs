//! # Seed Data Generator
//!
//! Populates the database with a water-station catalog and a handful of
//! customers for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./refill_dev.db
//! cargo run -p refill-db --bin seed
//!
//! # Specify database path
//! cargo run -p refill-db --bin seed -- --db ./data/refill.db
//!
//! # Also record a few sample sales
//! cargo run -p refill-db --bin seed -- --with-sales
//! ```

use std::env;

use refill_core::{
    CustomerType, DraftLine, NewCustomer, NewItem, PaymentMethod, SaleDraft, SaleStatus,
    TransactionType,
};
use refill_db::{Database, DbConfig};

/// (name, category, price in centavos, unit, stock, min, max)
const ITEMS: &[(&str, &str, i64, &str, i64, i64, i64)] = &[
    ("Round 5gal refill", "Refill", 2500, "gallon", 120, 20, 300),
    ("Slim 5gal refill", "Refill", 2500, "gallon", 80, 20, 300),
    ("Alkaline 5gal refill", "Refill", 4000, "gallon", 40, 10, 150),
    ("Mineral 1L bottle", "Bottled", 1500, "bottle", 200, 48, 500),
    ("Purified 500ml bottle", "Bottled", 1000, "bottle", 300, 96, 600),
    ("Round 5gal container", "Container", 18000, "pc", 25, 5, 60),
    ("Slim 5gal container", "Container", 20000, "pc", 18, 5, 60),
    ("Container cap", "Accessory", 500, "pc", 150, 50, 400),
    ("Shrink seal", "Accessory", 200, "pc", 400, 100, 1000),
    ("Hot and cold dispenser", "Equipment", 450000, "unit", 3, 1, 10),
];

/// (name, phone, address, type)
const CUSTOMERS: &[(&str, &str, &str, CustomerType)] = &[
    ("Santos Household", "0917 555 0101", "12 Mabini St, Quezon City", CustomerType::Regular),
    ("Reyes Carinderia", "0918 555 0144", "88 Rizal Ave, Caloocan", CustomerType::Wholesale),
    ("Bautista Dental Clinic", "0927 555 0199", "3F Lopez Bldg, Marikina", CustomerType::Corporate),
    ("Walk-in Guest", "0900 000 0000", "", CustomerType::Regular),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./refill_dev.db");
    let mut with_sales = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-sales" | "-s" => with_sales = true,
            "--help" | "-h" => {
                println!("Refill Station Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./refill_dev.db)");
                println!("  -s, --with-sales   Record a few sample sales");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Refill Station Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !db.items().list().await?.is_empty() {
        println!("⚠ Catalog already has items");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Creating catalog...");
    let mut item_ids = Vec::with_capacity(ITEMS.len());
    for &(name, category, price_cents, uom, stock, min_stock, max_stock) in ITEMS {
        let item = db
            .items()
            .create(&NewItem {
                name: name.to_string(),
                category: category.to_string(),
                price_cents,
                uom: uom.to_string(),
                initial_stock: stock,
                min_stock,
                max_stock,
            })
            .await?;
        println!("  {:<24} {:>10}  stock {}", item.name, item.price(), item.current_stock);
        item_ids.push((item.id, price_cents));
    }

    println!();
    println!("Creating customers...");
    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for &(name, phone, address, customer_type) in CUSTOMERS {
        let customer = db
            .customers()
            .create(&NewCustomer {
                name: name.to_string(),
                phone: phone.to_string(),
                email: None,
                address: address.to_string(),
                customer_type,
            })
            .await?;
        println!("  {} ({:?})", customer.name, customer.customer_type);
        customer_ids.push(customer.id);
    }

    if with_sales {
        println!();
        println!("Recording sample sales...");
        let samples = [
            (customer_ids[0], TransactionType::Delivery, vec![(0, 2), (7, 2)], SaleStatus::Completed),
            (customer_ids[1], TransactionType::WalkIn, vec![(1, 10)], SaleStatus::Completed),
            (customer_ids[2], TransactionType::Delivery, vec![(2, 4), (3, 12)], SaleStatus::Pending),
        ];

        for (customer_id, transaction_type, lines, status) in samples {
            let draft = SaleDraft {
                customer_id: Some(customer_id),
                transaction_type: Some(transaction_type),
                items: lines
                    .iter()
                    .map(|&(index, quantity)| DraftLine {
                        item_id: Some(item_ids[index].0),
                        quantity,
                        price_cents: item_ids[index].1,
                    })
                    .collect(),
                payment_method: PaymentMethod::Cash,
                status,
                ..Default::default()
            };

            let outcome = db.sale_workflow().save_sale(&draft, Some("seed")).await?;
            println!(
                "  {} {:?} {} {}",
                outcome.sale.invoice_id,
                outcome.sale.status,
                outcome.sale.total(),
                if outcome.delivery.is_some() { "(delivery)" } else { "" }
            );
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
