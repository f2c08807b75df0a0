//! # Seed Data Generator
//!
//! Populates the database with placeholder data for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./acme_dashboard.db (default)
//! cargo run -p acme-db --bin seed
//!
//! # Specify database path
//! cargo run -p acme-db --bin seed -- --db ./data/acme.db
//! ```
//!
//! ## Generated Data
//! - One login: `user@nextmail.com` / `123456`
//! - Six customers
//! - Thirteen invoices spread over 2022-2023, paid and pending
//! - Twelve months of revenue, January first

use acme_core::password::hash_password;
use acme_core::{new_id, Customer, Invoice, InvoiceStatus, Revenue, User};
use acme_db::{Database, DbConfig};
use chrono::NaiveDate;
use std::env;

/// Placeholder login.
const USER: (&str, &str, &str, &str) = (
    "410544b2-4001-4271-9855-fec4b6a6442a",
    "User",
    "user@nextmail.com",
    "123456",
);

/// (id, name, email, image_url)
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    (
        "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
        "Evil Rabbit",
        "evil@rabbit.com",
        "/customers/evil-rabbit.png",
    ),
    (
        "3958dc9e-712f-4377-85e9-fec4b6a6442a",
        "Delba de Oliveira",
        "delba@oliveira.com",
        "/customers/delba-de-oliveira.png",
    ),
    (
        "3958dc9e-742f-4377-85e9-fec4b6a6442a",
        "Lee Robinson",
        "lee@robinson.com",
        "/customers/lee-robinson.png",
    ),
    (
        "76d65c26-f784-44a2-ac19-586678f7c2f2",
        "Michael Novotny",
        "michael@novotny.com",
        "/customers/michael-novotny.png",
    ),
    (
        "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
        "Amy Burns",
        "amy@burns.com",
        "/customers/amy-burns.png",
    ),
    (
        "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        "Balazs Orban",
        "balazs@orban.com",
        "/customers/balazs-orban.png",
    ),
];

/// (customer index, amount in cents, status, date)
const INVOICES: &[(usize, i64, InvoiceStatus, &str)] = &[
    (0, 15795, InvoiceStatus::Pending, "2022-12-06"),
    (1, 20348, InvoiceStatus::Pending, "2022-11-14"),
    (4, 3040, InvoiceStatus::Paid, "2022-10-29"),
    (3, 44800, InvoiceStatus::Paid, "2023-09-10"),
    (5, 34577, InvoiceStatus::Pending, "2023-08-05"),
    (2, 54246, InvoiceStatus::Pending, "2023-07-16"),
    (0, 666, InvoiceStatus::Pending, "2023-06-27"),
    (3, 32545, InvoiceStatus::Paid, "2023-06-09"),
    (4, 1250, InvoiceStatus::Paid, "2023-06-17"),
    (5, 8546, InvoiceStatus::Paid, "2023-06-07"),
    (1, 500, InvoiceStatus::Paid, "2023-08-19"),
    (5, 8945, InvoiceStatus::Paid, "2023-06-03"),
    (2, 1000, InvoiceStatus::Paid, "2022-06-05"),
];

/// Whole dollars per month, in calendar order.
const REVENUE: &[(&str, i64)] = &[
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./acme_dashboard.db");

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
                println!("Acme Dashboard Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./acme_dashboard.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Acme Dashboard Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::file(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.users().count().await? + db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has data");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Users
    let (id, name, email, password) = USER;
    db.users()
        .insert(&User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: hash_password(password)?,
        })
        .await?;
    println!("✓ Seeded 1 user ({} / {})", email, password);

    // Customers
    for (id, name, email, image_url) in CUSTOMERS {
        db.customers()
            .insert(&Customer {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                image_url: image_url.to_string(),
            })
            .await?;
    }
    println!("✓ Seeded {} customers", CUSTOMERS.len());

    // Invoices
    for (customer, amount, status, date) in INVOICES {
        db.invoices()
            .insert(&Invoice {
                id: new_id(),
                customer_id: CUSTOMERS[*customer].0.to_string(),
                amount: *amount,
                status: *status,
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
            })
            .await?;
    }
    println!("✓ Seeded {} invoices", INVOICES.len());

    // Revenue
    for (month, revenue) in REVENUE {
        db.revenue()
            .insert(&Revenue {
                month: month.to_string(),
                revenue: *revenue,
            })
            .await?;
    }
    println!("✓ Seeded {} months of revenue", REVENUE.len());

    db.close().await;

    println!();
    println!("Done.");

    Ok(())
}
