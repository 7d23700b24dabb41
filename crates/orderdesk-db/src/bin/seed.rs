//! # Seed Data Generator
//!
//! Populates a database with reference data and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./orderdesk_dev.db with 60 products (default)
//! cargo run -p orderdesk-db --bin seed
//!
//! # Custom product count
//! cargo run -p orderdesk-db --bin seed -- --products 200
//!
//! # Specify database path
//! cargo run -p orderdesk-db --bin seed -- --db ./data/orderdesk.db
//! ```
//!
//! ## Generated Data
//! - Departments: Sales, Logistics, Purchasing
//! - Employees spread over those departments with staggered hire dates
//! - Customers in a handful of cities (used by the city reports)
//! - Products: `{name} {pack}` with deterministic price and stock
//! - A few sample orders so the reports return rows

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orderdesk_core::{Customer, Department, Employee, NewProduct, Order, OrderDetail};
use orderdesk_db::{Database, DbConfig, OrderRepository, ProductRepository};

const DEPARTMENTS: &[(&str, &str)] = &[("D01", "Sales"), ("D02", "Logistics"), ("D03", "Purchasing")];

/// (id, name, position, department, hire date)
const EMPLOYEES: &[(&str, &str, &str, &str, &str)] = &[
    ("E01", "Nancy Davolio", "Sales Representative", "D01", "2019-05-01"),
    ("E02", "Andrew Fuller", "Vice President, Sales", "D01", "2018-08-14"),
    ("E03", "Janet Leverling", "Sales Representative", "D01", "2021-04-01"),
    ("E04", "Margaret Peacock", "Sales Representative", "D01", "2022-05-03"),
    ("E05", "Steven Buchanan", "Sales Manager", "D01", "2020-10-17"),
    ("E06", "Michael Suyama", "Warehouse Lead", "D02", "2023-10-17"),
    ("E07", "Robert King", "Driver", "D02", "2024-01-02"),
    ("E08", "Laura Callahan", "Buyer", "D03", "2024-01-02"),
];

/// (id, company, contact, city)
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    ("ALFKI", "Alfreds Futterkiste", "Maria Anders", "Berlin"),
    ("ANATR", "Ana Trujillo Emparedados", "Ana Trujillo", "Mexico City"),
    ("BONAP", "Bon app'", "Laurence Lebihan", "Marseille"),
    ("FRANK", "Frankenversand", "Peter Franken", "Munich"),
    ("LONEP", "Lonesome Pine Restaurant", "Fran Wilson", "Portland"),
    ("QUICK", "QUICK-Stop", "Horst Kloss", "Cunewalde"),
    ("VINET", "Vins et alcools Chevalier", "Paul Henriot", "Reims"),
    ("WOLZA", "Wolski Zajazd", "Zbyszek Piestrzeniewicz", "Warszawa"),
];

const PRODUCT_NAMES: &[&str] = &[
    "Chai",
    "Chang",
    "Aniseed Syrup",
    "Cajun Seasoning",
    "Gumbo Mix",
    "Boysenberry Spread",
    "Dried Pears",
    "Cranberry Sauce",
    "Kobe Niku",
    "Ikura",
    "Queso Cabrales",
    "Queso Manchego",
    "Konbu",
    "Tofu",
    "Genen Shouyu",
    "Pavlova",
    "Alice Mutton",
    "Carnarvon Tigers",
    "Teatime Biscuits",
    "Marmalade",
];

/// Pack variants and the price added on top of the base price.
const PACKS: &[(&str, i64)] = &[("Single", 0), ("6-Pack", 450), ("Case", 1800)];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 60;
    let mut db_path = String::from("./orderdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1]
                        .parse()
                        .with_context(|| format!("invalid product count: {}", args[i + 1]))?;
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
                println!("OrderDesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>  Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>     Database file path (default: ./orderdesk_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(db = %db_path, products = product_count, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open {}", db_path))?;

    if has_data(&db).await? {
        warn!(db = %db_path, "Database is not empty, skipping seed");
        return Ok(());
    }

    seed_reference_data(&db).await?;

    let start = std::time::Instant::now();
    let product_ids = seed_products(&db, product_count).await?;
    info!(
        count = product_ids.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Generated products"
    );

    let orders = seed_orders(&db, &product_ids).await?;
    info!(count = orders, "Generated sample orders");

    let top = db.orders().top_cities_by_amount(3).await?;
    for row in &top {
        info!(city = %row.city, total_cents = row.total_amount_cents, "Top city");
    }

    info!("Seed complete");
    Ok(())
}

/// Whether any table the seed writes to already holds rows.
async fn has_data(db: &Database) -> Result<bool> {
    let products = db.products().count().await?;
    let customers = db.customers().count().await?;
    let departments = db.departments().get_all().await?.len();
    let employees = db.employees().get_all().await?.len();

    Ok(products > 0 || customers > 0 || departments > 0 || employees > 0)
}

async fn seed_reference_data(db: &Database) -> Result<()> {
    for (id, name) in DEPARTMENTS {
        db.departments()
            .insert(&Department {
                id: id.to_string(),
                name: name.to_string(),
            })
            .await
            .with_context(|| format!("inserting department {}", id))?;
    }

    for (id, name, position, department_id, hired) in EMPLOYEES {
        db.employees()
            .insert(&Employee {
                id: id.to_string(),
                name: name.to_string(),
                position: position.to_string(),
                department_id: department_id.to_string(),
                hire_date: date(hired)?,
                phone: None,
            })
            .await
            .with_context(|| format!("inserting employee {}", id))?;
    }

    for (id, company, contact, city) in CUSTOMERS {
        db.customers()
            .insert(&Customer {
                id: id.to_string(),
                company_name: company.to_string(),
                contact_name: contact.to_string(),
                city: city.to_string(),
                phone: None,
            })
            .await
            .with_context(|| format!("inserting customer {}", id))?;
    }

    info!(
        departments = DEPARTMENTS.len(),
        employees = EMPLOYEES.len(),
        customers = CUSTOMERS.len(),
        "Inserted reference data"
    );
    Ok(())
}

/// Inserts up to `count` products in one transaction and returns their ids.
async fn seed_products(db: &Database, count: usize) -> Result<Vec<i64>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(count);

    'outer: for (name_idx, name) in PRODUCT_NAMES.iter().enumerate() {
        for (pack_idx, (pack, price_addon)) in PACKS.iter().enumerate() {
            if ids.len() >= count {
                break 'outer;
            }

            let product = generate_product(name, pack, *price_addon, name_idx * PACKS.len() + pack_idx);
            let inserted = ProductRepository::insert_in(&mut tx, &product)
                .await
                .with_context(|| format!("inserting product {}", product.name))?;
            ids.push(inserted.id);
        }
    }

    tx.commit().await?;
    Ok(ids)
}

/// Places one order per customer, each with up to two lines.
async fn seed_orders(db: &Database, product_ids: &[i64]) -> Result<usize> {
    if product_ids.is_empty() {
        return Ok(0);
    }

    let mut tx = db.begin().await?;
    let mut placed = 0;

    for (idx, (customer_id, ..)) in CUSTOMERS.iter().enumerate() {
        let order_date = date(if idx % 2 == 0 { "2023-03-14" } else { "2024-06-02" })?;
        let order = Order {
            id: format!("SO-{:05}", 10248 + idx),
            customer_id: customer_id.to_string(),
            employee_id: EMPLOYEES[idx % EMPLOYEES.len()].0.to_string(),
            order_date,
            request_date: order_date + chrono::Duration::days(14),
            shipping_date: None,
        };
        OrderRepository::insert_in(&mut tx, &order).await?;

        let first = product_ids[idx % product_ids.len()];
        let second = product_ids[(idx * 7 + 3) % product_ids.len()];
        let mut lines = vec![(first, 2 + idx as i64)];
        if second != first {
            lines.push((second, 1));
        }

        for (product_id, quantity) in lines {
            let product = ProductRepository::get_by_id_in(&mut tx, product_id)
                .await?
                .with_context(|| format!("product {} vanished while seeding", product_id))?;
            if !product.can_fulfil(quantity) {
                continue;
            }

            OrderRepository::insert_detail_in(
                &mut tx,
                &OrderDetail {
                    order_id: order.id.clone(),
                    product_id,
                    unit_price_cents: product.unit_price_cents,
                    quantity,
                },
            )
            .await?;
            ProductRepository::decrement_stock_in(&mut tx, product_id, quantity).await?;
        }

        placed += 1;
    }

    tx.commit().await?;
    Ok(placed)
}

/// Deterministic product data derived from `seed`.
fn generate_product(name: &str, pack: &str, price_addon: i64, seed: usize) -> NewProduct {
    // $1.99 - $9.99 base
    let base_price = 199 + ((seed * 17) % 800) as i64;

    NewProduct {
        name: format!("{} {}", name, pack),
        unit_price_cents: base_price + price_addon,
        stock: 20 + (seed % 81) as i64,
    }
}

fn date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, orderdesk_core::DATE_FORMAT)
        .with_context(|| format!("invalid date literal {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reference_data_alone_counts_as_seeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(!has_data(&db).await.unwrap());

        db.departments()
            .insert(&Department {
                id: "D01".to_string(),
                name: "Sales".to_string(),
            })
            .await
            .unwrap();
        assert!(has_data(&db).await.unwrap());
    }

    #[tokio::test]
    async fn test_full_seed_is_detected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 0);
        assert!(has_data(&db).await.unwrap());
    }
}
