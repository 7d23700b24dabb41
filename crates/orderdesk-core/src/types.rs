//! # Domain Types
//!
//! Entities persisted by OrderDesk plus the request and report shapes the
//! services exchange with callers.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────┐        ┌──────────────┐        ┌──────────────┐      │
//! │  │  Department  │◄───────│   Employee   │        │   Customer   │      │
//! │  │  id, name    │  FK    │  id, name    │        │  id, city    │      │
//! │  └──────────────┘        │  hire_date   │        └──────┬───────┘      │
//! │                          └──────┬───────┘               │              │
//! │                                 │ FK                 FK │              │
//! │                                 ▼                       ▼              │
//! │                          ┌─────────────────────────────────────┐       │
//! │                          │               Order                 │       │
//! │                          │  id, order/request/shipping dates   │       │
//! │                          └──────────────────┬──────────────────┘       │
//! │                                             │ 1..n                     │
//! │                                             ▼                          │
//! │  ┌──────────────┐   FK   ┌─────────────────────────────────────┐       │
//! │  │   Product    │◄───────│            OrderDetail              │       │
//! │  │  price,stock │        │  unit_price (snapshot), quantity    │       │
//! │  └──────────────┘        └─────────────────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text identifiers (customer `ALFKI`, employee `E01`, order ids) are
//! business keys chosen by the caller. Product ids are database-assigned.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Department
// =============================================================================

/// An organisational unit employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Department {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer that places orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Business key, e.g. `ALFKI`.
    pub id: String,
    pub company_name: String,
    pub contact_name: String,
    /// City used by the per-city order reports.
    pub city: String,
    pub phone: Option<String>,
}

// =============================================================================
// Employee
// =============================================================================

/// An employee who takes orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Job title, e.g. `Sales Representative`.
    pub position: String,
    pub department_id: String,
    #[ts(as = "String")]
    pub hire_date: NaiveDate,
    pub phone: Option<String>,
}

/// Employee joined with the name of their department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct EmployeeDepartment {
    pub employee_id: String,
    pub employee_name: String,
    pub department_name: String,
    #[ts(as = "String")]
    pub hire_date: NaiveDate,
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Database-assigned identifier.
    pub id: i64,

    pub name: String,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Units currently in stock. Never negative.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Whether `quantity` units can be taken without stock going negative.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock - quantity >= 0
    }

    /// Value of the units on hand (`unit_price × stock`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.unit_price().multiply_quantity(self.stock)
    }
}

/// Fields needed to create a product; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub unit_price_cents: i64,
    pub stock: i64,
}

/// Product listed with the value of its stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductStockValue {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub stock: i64,
    pub stock_value_cents: i64,
}

impl From<Product> for ProductStockValue {
    fn from(p: Product) -> Self {
        let stock_value_cents = p.stock_value().cents();
        ProductStockValue {
            product_id: p.id,
            name: p.name,
            unit_price_cents: p.unit_price_cents,
            stock: p.stock,
            stock_value_cents,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub employee_id: String,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    /// Date the customer asked for delivery.
    #[ts(as = "String")]
    pub request_date: NaiveDate,
    /// Set once the order ships.
    #[ts(as = "Option<String>")]
    pub shipping_date: Option<NaiveDate>,
}

/// A line of an order.
///
/// `unit_price_cents` is frozen at placement so later price changes do not
/// rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderDetail {
    pub order_id: String,
    pub product_id: i64,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl OrderDetail {
    /// Line total (`unit_price × quantity`).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// An order header together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub details: Vec<OrderDetail>,
}

impl OrderWithDetails {
    /// Sum of all line totals.
    pub fn total(&self) -> Money {
        self.details.iter().map(OrderDetail::line_total).sum()
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// Input for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRequest {
    /// Caller-chosen order id. A UUID is generated when absent.
    pub order_id: Option<String>,
    pub customer_id: String,
    pub employee_id: String,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    #[ts(as = "String")]
    pub request_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub shipping_date: Option<NaiveDate>,
    pub details: Vec<OrderLineRequest>,
}

/// One requested line: which product and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

// =============================================================================
// Report Rows
// =============================================================================

/// Total ordered amount for one customer city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CityOrderTotal {
    pub city: String,
    pub total_amount_cents: i64,
}

/// Number of orders placed in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct YearlyOrderCount {
    pub year: i64,
    pub order_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
