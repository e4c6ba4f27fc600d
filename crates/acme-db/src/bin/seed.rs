//! # Seed Data Generator
//!
//! Populates a dashboard database with demo customers, invoices, and a
//! year of monthly revenue.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file (./dashboard.db)
//! cargo run -p acme-db --bin seed
//!
//! # Specify a database path
//! cargo run -p acme-db --bin seed -- --db ./data/dashboard.db
//! DATABASE_PATH=./data/dashboard.db cargo run -p acme-db --bin seed
//! ```
//!
//! Inserts are idempotent (`INSERT OR REPLACE`), so re-running refreshes the
//! demo dataset in place.

use std::env;

use tracing::info;
use uuid::Uuid;

use acme_db::{Database, DbConfig, DbError};

/// Demo customers: (id, name, email, image).
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
        "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
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
        "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        "Amy Burns",
        "amy@burns.com",
        "/customers/amy-burns.png",
    ),
    (
        "126eed9c-c90c-4ef6-a4a8-fcf7408d3c66",
        "Balazs Orban",
        "balazs@orban.com",
        "/customers/balazs-orban.png",
    ),
];

/// Demo invoices: (customer index, amount_cents, status, date).
const INVOICES: &[(usize, i64, &str, &str)] = &[
    (0, 1_577_400, "pending", "2023-12-06"),
    (1, 2_054_100, "pending", "2023-11-14"),
    (4, 304_000, "paid", "2023-10-29"),
    (3, 4_480_000, "paid", "2023-09-10"),
    (5, 3_454_500, "paid", "2023-08-05"),
    (2, 66_660, "pending", "2023-07-16"),
    (0, 50_000, "paid", "2023-06-27"),
    (3, 89_890, "paid", "2023-06-09"),
    (4, 812_600, "paid", "2023-05-17"),
    (5, 102_100, "paid", "2023-04-06"),
    (1, 132_400, "paid", "2023-03-07"),
    (2, 54_150, "paid", "2023-02-02"),
    (0, 866_600, "paid", "2023-01-18"),
];

/// Monthly revenue series for the chart.
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
async fn main() -> Result<(), DbError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path();
    info!(path = %db_path, "Seeding dashboard database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    seed_customers(&db).await?;
    seed_invoices(&db).await?;
    seed_revenue(&db).await?;

    info!(
        customers = CUSTOMERS.len(),
        invoices = INVOICES.len(),
        revenue_months = REVENUE.len(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Resolves the target database path: `--db <path>` beats `DATABASE_PATH`
/// beats the default.
fn parse_db_path() -> String {
    let args: Vec<String> = env::args().collect();
    for window in args.windows(2) {
        if window[0] == "--db" {
            return window[1].clone();
        }
    }

    env::var("DATABASE_PATH").unwrap_or_else(|_| "./dashboard.db".to_string())
}

async fn seed_customers(db: &Database) -> Result<(), DbError> {
    for &(id, name, email, image_url) in CUSTOMERS {
        sqlx::query(
            "INSERT OR REPLACE INTO customers (id, name, email, image_url) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(image_url)
        .execute(db.pool())
        .await
        .map_err(|e| DbError::query("seed_customers", e))?;
    }

    info!(count = CUSTOMERS.len(), "Customers seeded");
    Ok(())
}

async fn seed_invoices(db: &Database) -> Result<(), DbError> {
    // Fresh ids each run; old demo invoices are cleared first so re-seeding
    // doesn't accumulate duplicates.
    sqlx::query("DELETE FROM invoices")
        .execute(db.pool())
        .await
        .map_err(|e| DbError::query("seed_invoices", e))?;

    for &(customer_idx, amount_cents, status, date) in INVOICES {
        let (customer_id, _, _, _) = CUSTOMERS[customer_idx];

        sqlx::query(
            "INSERT INTO invoices (id, customer_id, amount_cents, status, date) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(customer_id)
        .bind(amount_cents)
        .bind(status)
        .bind(date)
        .execute(db.pool())
        .await
        .map_err(|e| DbError::query("seed_invoices", e))?;
    }

    info!(count = INVOICES.len(), "Invoices seeded");
    Ok(())
}

async fn seed_revenue(db: &Database) -> Result<(), DbError> {
    for &(month, revenue) in REVENUE {
        sqlx::query("INSERT OR REPLACE INTO revenue (month, revenue) VALUES (?1, ?2)")
            .bind(month)
            .bind(revenue)
            .execute(db.pool())
            .await
            .map_err(|e| DbError::query("seed_revenue", e))?;
    }

    info!(count = REVENUE.len(), "Revenue series seeded");
    Ok(())
}
