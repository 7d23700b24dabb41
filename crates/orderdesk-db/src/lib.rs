//! # orderdesk-db: Database Layer for OrderDesk
//!
//! SQLite storage accessed through sqlx. Every SQL statement in the
//! workspace lives in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Data Flow                              │
//! │                                                                         │
//! │  OrderService::save_order(request)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   orderdesk-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │   │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                  │   │ (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo      │   │             │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo        │   │ 001_init    │  │   │
//! │  │   │ Transactions  │    │ CustomerRepo     │   │ 002_indexes │  │   │
//! │  │   │               │    │ EmployeeRepo     │   │             │  │   │
//! │  │   │               │    │ DepartmentRepo   │   │             │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./orderdesk.db")).await?;
//! let chai = db.products().get_by_id(1).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::customer::CustomerRepository;
pub use repository::department::DepartmentRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
