//! # orderdesk-service: Business Services for OrderDesk
//!
//! Services validate input, call the repositories and translate failures
//! into [`ServiceError`].
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller (REST layer, CLI, tests)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                orderdesk-service (THIS CRATE)                   │   │
//! │  │   ProductService    OrderService    EmployeeService             │   │
//! │  │   ServiceError      ServiceConfig   telemetry                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  orderdesk-db (repositories)        orderdesk-core (types, rules)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use orderdesk_service::{telemetry, Services, ServiceConfig};
//!
//! let config = ServiceConfig::load()?;
//! telemetry::init_tracing(&config.log_filter);
//!
//! let services = Services::connect(&config).await?;
//! let chai = services.products.get_product_by_id(1).await?;
//! ```

pub mod config;
pub mod employee;
pub mod error;
pub mod order;
pub mod product;
pub mod telemetry;

pub use config::{ConfigError, ServiceConfig};
pub use employee::EmployeeService;
pub use error::{ErrorCode, ErrorResponse, ServiceError, ServiceResult};
pub use order::OrderService;
pub use product::ProductService;

use orderdesk_db::{Database, DbResult};
use tracing::{info, warn};

/// All services sharing one database pool.
#[derive(Debug, Clone)]
pub struct Services {
    pub products: ProductService,
    pub orders: OrderService,
    pub employees: EmployeeService,
}

impl Services {
    /// Wraps an open database.
    pub fn new(db: Database, config: &ServiceConfig) -> Self {
        Services {
            products: ProductService::new(db.clone()),
            orders: OrderService::new(db.clone(), config.max_report_limit),
            employees: EmployeeService::new(db),
        }
    }

    /// Opens the configured database (running migrations) and builds the services.
    pub async fn connect(config: &ServiceConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;

        let (total, applied) = orderdesk_db::migrations::migration_status(db.pool()).await?;
        if applied < total {
            warn!(total, applied, "Database schema is behind the embedded migrations");
        }
        info!(
            path = ?config.database_path,
            migrations = applied,
            "Database connected"
        );

        Ok(Services::new(db, config))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use orderdesk_core::{Customer, Department, Employee, NewProduct};
    use orderdesk_db::{Database, DbConfig};
    use std::path::PathBuf;
    use uuid::Uuid;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, orderdesk_core::DATE_FORMAT).unwrap()
    }

    pub fn new_product(name: &str, unit_price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit_price_cents,
            stock,
        }
    }

    /// In-memory database with:
    /// - departments D01 Sales, D02 Logistics
    /// - customers ALFKI (Berlin), BONAP (Marseille)
    /// - employee E01 (D01, hired 2022-04-01)
    /// - products Chai (18.00 x 39), Chang (19.00 x 17), Aniseed Syrup (10.00 x 13)
    pub async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;
        db
    }

    /// File-backed database in the temp dir with a multi-connection pool,
    /// seeded like [`seeded_db`].
    pub struct FileDb {
        pub db: Database,
        path: PathBuf,
    }

    impl FileDb {
        pub async fn open(max_connections: u32) -> Self {
            let path = std::env::temp_dir().join(format!("orderdesk-{}.db", Uuid::new_v4()));
            let db = Database::new(DbConfig::new(&path).max_connections(max_connections))
                .await
                .unwrap();
            seed(&db).await;
            FileDb { db, path }
        }

        pub async fn remove(self) {
            self.db.close().await;
            for suffix in ["", "-wal", "-shm"] {
                let mut file = self.path.clone().into_os_string();
                file.push(suffix);
                let _ = std::fs::remove_file(file);
            }
        }
    }

    async fn seed(db: &Database) {

        for (id, name) in [("D01", "Sales"), ("D02", "Logistics")] {
            db.departments()
                .insert(&Department {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .await
                .unwrap();
        }

        for (id, city) in [("ALFKI", "Berlin"), ("BONAP", "Marseille")] {
            db.customers()
                .insert(&Customer {
                    id: id.to_string(),
                    company_name: format!("{} Trading", id),
                    contact_name: "Maria Anders".to_string(),
                    city: city.to_string(),
                    phone: None,
                })
                .await
                .unwrap();
        }

        db.employees()
            .insert(&Employee {
                id: "E01".to_string(),
                name: "Nancy Davolio".to_string(),
                position: "Sales Representative".to_string(),
                department_id: "D01".to_string(),
                hire_date: date("2022-04-01"),
                phone: None,
            })
            .await
            .unwrap();

        for (name, price, stock) in [("Chai", 1800, 39), ("Chang", 1900, 17), ("Aniseed Syrup", 1000, 13)] {
            db.products()
                .insert(&new_product(name, price, stock))
                .await
                .unwrap();
        }
    }
}
