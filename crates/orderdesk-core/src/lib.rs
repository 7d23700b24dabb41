//! # orderdesk-core: Domain Types and Rules for OrderDesk
//!
//! Entities, money arithmetic and validation rules with zero I/O
//! dependencies. Both the database layer and the service layer build on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 orderdesk-service (Services)                    │   │
//! │  │   ProductService • OrderService • EmployeeService              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ orderdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │                  │   │
//! │  │   │   Order   │  │           │  │  parsing  │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 orderdesk-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Product, Order, Customer, Employee, ...) and report rows
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and parsing
//!
//! ## Example Usage
//!
//! ```rust
//! use orderdesk_core::money::Money;
//!
//! let unit_price = Money::from_cents(1800); // $18.00
//! let line_total = unit_price.multiply_quantity(3);
//!
//! assert_eq!(line_total.cents(), 5400);
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum number of lines accepted in a single order request.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single product on one order line.
///
/// Guards against typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Largest unit price a product may carry (10,000,000.00).
///
/// With [`MAX_STOCK`] this keeps `unit_price × stock` inside `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Largest stock level a product may carry.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Date format accepted by every date-taking operation (`2024-03-15`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
