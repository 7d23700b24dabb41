//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Name search (`LIKE '%term%'`) and price filter
//! - Stock updates: absolute (`update_stock`) and order placement
//!   decrements (`decrement_stock_in`)
//!
//! ## Stock Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UPDATE products SET stock = stock - :qty                               │
//! │  WHERE id = :id AND stock >= :qty                                       │
//! │                                                                         │
//! │  zero rows touched → the decrement would take stock below zero         │
//! │  (the column also carries CHECK (stock >= 0))                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use orderdesk_core::{NewProduct, Product};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product ordered by id.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, unit_price_cents, stock, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_in(&mut conn, id).await
    }

    /// Gets a product by its ID on an existing connection or transaction.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, unit_price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Finds products whose name contains `term` (ASCII case-insensitive).
    ///
    /// `%` and `_` in the term match literally.
    pub async fn find_by_name_like(&self, term: &str) -> DbResult<Vec<Product>> {
        debug!(term = %term, "Searching products by name");

        let pattern = format!("%{}%", escape_like(term));

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, unit_price_cents, stock, created_at, updated_at
            FROM products
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Name search returned products");
        Ok(products)
    }

    /// Finds products priced strictly below `price_cents`.
    pub async fn find_below_price(&self, price_cents: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, unit_price_cents, stock, created_at, updated_at
            FROM products
            WHERE unit_price_cents < ?1
            ORDER BY unit_price_cents, id
            "#,
        )
        .bind(price_cents)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product and returns it with its assigned id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, product).await
    }

    /// Inserts a new product on an existing connection or transaction.
    pub async fn insert_in(conn: &mut SqliteConnection, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        let now = Utc::now();

        let inserted = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, unit_price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, name, unit_price_cents, stock, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(product.unit_price_cents)
        .bind(product.stock)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(inserted)
    }

    /// Replaces the writable fields of an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored row after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        debug!(id = product.id, "Updating product");

        let now = Utc::now();

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = ?2,
                unit_price_cents = ?3,
                stock = ?4,
                updated_at = ?5
            WHERE id = ?1
            RETURNING id, name, unit_price_cents, stock, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.unit_price_cents)
        .bind(product.stock)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Product", product.id))
    }

    /// Sets the stock level of a product.
    pub async fn update_stock(&self, id: i64, stock: i64) -> DbResult<Product> {
        debug!(id = id, stock = stock, "Setting stock");

        let now = Utc::now();

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                stock = ?2,
                updated_at = ?3
            WHERE id = ?1
            RETURNING id, name, unit_price_cents, stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Takes `quantity` units out of stock inside an order transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::CheckViolation)` - Stock cannot cover the quantity
    ///   (or the product vanished mid-transaction)
    pub async fn decrement_stock_in(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i64,
    ) -> DbResult<()> {
        debug!(id = id, quantity = quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = stock - ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::CheckViolation {
                message: format!("stock of product {} cannot cover {} units", id, quantity),
            });
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Order lines still reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
