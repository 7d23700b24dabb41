//! # Validation Module
//!
//! Input validation and parsing for OrderDesk requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service (Rust)                                               │
//! │  ├── Shape checks (THIS MODULE): ids, names, quantities, dates         │
//! │  └── Existence checks: customer, employee, product lookups             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (stock >= 0) constraints                         │
//! │  ├── PRIMARY KEY / UNIQUE constraints                                  │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::validation::{parse_date, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! let shipped = parse_date("shipping_date", "2024-07-16").unwrap();
//! assert_eq!(shipped.to_string(), "2024-07-16");
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{Employee, NewProduct, OrderRequest, Product};
use crate::{DATE_FORMAT, MAX_ITEM_QUANTITY, MAX_ORDER_LINES, MAX_STOCK, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a business key such as a customer, employee or order id.
///
/// ## Rules
/// - Must not be empty
/// - No leading or trailing whitespace (keys are stored as given)
/// - At most 36 characters (fits a UUID)
/// - ASCII letters, digits, hyphens and underscores only
///
/// ```rust
/// use orderdesk_core::validation::validate_key;
///
/// assert!(validate_key("customer_id", "ALFKI").is_ok());
/// assert!(validate_key("customer_id", "").is_err());
/// assert!(validate_key("customer_id", "AL FKI").is_err());
/// ```
pub fn validate_key(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.trim() != value {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not have leading or trailing whitespace".to_string(),
        });
    }

    if value.len() > 36 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 36,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required display text (names, positions).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a name search term and returns it trimmed.
///
/// An empty term is allowed and matches every product.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(term.to_string())
}

/// Parses a `YYYY-MM-DD` date.
///
/// ```rust
/// use orderdesk_core::validation::parse_date;
///
/// assert!(parse_date("hire_date", "2023-01-09").is_ok());
/// assert!(parse_date("hire_date", "09/01/2023").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD, got '{}'", value),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product id supplied by a caller. Negative ids never exist.
pub fn validate_product_id(id: i64) -> ValidationResult<()> {
    if id < 0 {
        return Err(ValidationError::Negative {
            field: "product_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "unit_price".to_string(),
        });
    }

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level. Stock never goes negative.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    if stock > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates an ordered quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a report row limit against the configured maximum.
pub fn validate_report_limit(limit: i64, max: i64) -> ValidationResult<()> {
    if limit < 1 || limit > max {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates the writable fields of a new product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_text("name", &product.name)?;
    validate_price_cents(product.unit_price_cents)?;
    validate_stock(product.stock)
}

/// Validates a product about to be fully updated.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(product.id)?;
    validate_text("name", &product.name)?;
    validate_price_cents(product.unit_price_cents)?;
    validate_stock(product.stock)
}

/// Validates an employee about to be saved.
pub fn validate_employee(employee: &Employee) -> ValidationResult<()> {
    validate_key("employee_id", &employee.id)?;
    validate_text("name", &employee.name)?;
    validate_text("position", &employee.position)?;
    validate_key("department_id", &employee.department_id)
}

/// Validates the shape of an order request before any lookups happen.
///
/// ## Rules
/// ```text
/// order_id        optional; when present a valid key
/// customer_id     valid key
/// employee_id     valid key
/// request_date    not before order_date
/// shipping_date   not before order_date (when present)
/// details         1..=MAX_ORDER_LINES lines
///                 each product id >= 0, each quantity in 1..=MAX_ITEM_QUANTITY
///                 no product listed twice
/// ```
pub fn validate_order_request(request: &OrderRequest) -> ValidationResult<()> {
    if let Some(order_id) = &request.order_id {
        validate_key("order_id", order_id)?;
    }
    validate_key("customer_id", &request.customer_id)?;
    validate_key("employee_id", &request.employee_id)?;

    if request.request_date < request.order_date {
        return Err(ValidationError::InvalidFormat {
            field: "request_date".to_string(),
            reason: "must not be before order_date".to_string(),
        });
    }

    if let Some(shipping_date) = request.shipping_date {
        if shipping_date < request.order_date {
            return Err(ValidationError::InvalidFormat {
                field: "shipping_date".to_string(),
                reason: "must not be before order_date".to_string(),
            });
        }
    }

    if request.details.is_empty() {
        return Err(ValidationError::Required {
            field: "details".to_string(),
        });
    }

    if request.details.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "details".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    let mut seen = HashSet::with_capacity(request.details.len());
    for line in &request.details {
        validate_product_id(line.product_id)?;
        validate_quantity(line.quantity)?;

        if !seen.insert(line.product_id) {
            return Err(ValidationError::Duplicate {
                field: "product_id".to_string(),
                value: line.product_id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
