//! # Repository Module
//!
//! Data-access types for OrderDesk, one per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Service                                                               │
//! │       │  db.products().get_by_id(11)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)              ← runs on the pool              │
//! │  └── get_by_id_in(conn, id)            ← runs on a transaction         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods ending in `_in` take a `&mut SqliteConnection` so a service can
//! run several of them inside one transaction (`&mut *tx`).
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD, name search, stock updates
//! - [`OrderRepository`] - Orders, order details, city/year reports
//! - [`CustomerRepository`] - Customer lookups
//! - [`EmployeeRepository`] - Employee queries
//! - [`DepartmentRepository`] - Department lookups
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`OrderRepository`]: order::OrderRepository
//! [`CustomerRepository`]: customer::CustomerRepository
//! [`EmployeeRepository`]: employee::EmployeeRepository
//! [`DepartmentRepository`]: department::DepartmentRepository

pub mod customer;
pub mod department;
pub mod employee;
pub mod order;
pub mod product;
