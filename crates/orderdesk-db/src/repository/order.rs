//! # Order Repository
//!
//! Database operations for orders, their detail lines and the order reports.
//!
//! ## Order Placement (driven by OrderService)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let mut tx = db.begin().await?;                                        │
//! │                                                                         │
//! │  OrderRepository::insert_in(&mut tx, &order)           orders          │
//! │  for each line:                                                         │
//! │      ProductRepository::get_by_id_in(&mut tx, id)      products        │
//! │      OrderRepository::insert_detail_in(&mut tx, &line) order_details   │
//! │      ProductRepository::decrement_stock_in(&mut tx, ..) products        │
//! │                                                                         │
//! │  tx.commit().await?;        (drop without commit = rollback)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use orderdesk_core::{CityOrderTotal, Order, OrderDetail, OrderWithDetails, YearlyOrderCount};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists every order header, oldest first.
    pub async fn get_all(&self) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, employee_id, order_date, request_date, shipping_date
            FROM orders
            ORDER BY order_date, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Gets an order header by id; `Ok(None)` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, employee_id, order_date, request_date, shipping_date
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the detail lines of an order, by product id.
    pub async fn get_details(&self, order_id: &str) -> DbResult<Vec<OrderDetail>> {
        let details = sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT order_id, product_id, unit_price_cents, quantity
            FROM order_details
            WHERE order_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Gets an order with its lines; `Ok(None)` when the order is absent.
    pub async fn get_with_details(&self, id: &str) -> DbResult<Option<OrderWithDetails>> {
        let Some(order) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let details = self.get_details(id).await?;
        Ok(Some(OrderWithDetails { order, details }))
    }

    /// Orders of `customer_id` that contain `product_id`.
    pub async fn find_by_product_and_customer(
        &self,
        product_id: i64,
        customer_id: &str,
    ) -> DbResult<Vec<Order>> {
        debug!(product_id = product_id, customer_id = %customer_id, "Finding orders");

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT o.id, o.customer_id, o.employee_id, o.order_date, o.request_date, o.shipping_date
            FROM orders o
            INNER JOIN order_details d ON d.order_id = o.id
            WHERE d.product_id = ?1 AND o.customer_id = ?2
            ORDER BY o.order_date, o.id
            "#,
        )
        .bind(product_id)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Inserts an order header inside a transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - order id already used
    pub async fn insert_in(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, customer_id = %order.customer_id, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, employee_id, order_date, request_date, shipping_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(&order.employee_id)
        .bind(order.order_date)
        .bind(order.request_date)
        .bind(order.shipping_date)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts one order line inside a transaction.
    pub async fn insert_detail_in(conn: &mut SqliteConnection, detail: &OrderDetail) -> DbResult<()> {
        debug!(
            order_id = %detail.order_id,
            product_id = detail.product_id,
            quantity = detail.quantity,
            "Inserting order detail"
        );

        sqlx::query(
            r#"
            INSERT INTO order_details (order_id, product_id, unit_price_cents, quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&detail.order_id)
        .bind(detail.product_id)
        .bind(detail.unit_price_cents)
        .bind(detail.quantity)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Sets the shipping date of an order.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The stored header after the update
    /// * `Err(DbError::NotFound)` - Order doesn't exist
    pub async fn update_shipping_date(&self, id: &str, date: NaiveDate) -> DbResult<Order> {
        debug!(id = %id, shipping_date = %date, "Updating shipping date");

        let updated = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET shipping_date = ?2
            WHERE id = ?1
            RETURNING id, customer_id, employee_id, order_date, request_date, shipping_date
            "#,
        )
        .bind(id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Total ordered amount per customer city, largest first.
    pub async fn top_cities_by_amount(&self, limit: i64) -> DbResult<Vec<CityOrderTotal>> {
        let rows = sqlx::query_as::<_, CityOrderTotal>(
            r#"
            SELECT
                c.city AS city,
                SUM(d.unit_price_cents * d.quantity) AS total_amount_cents
            FROM orders o
            INNER JOIN customers c ON c.id = o.customer_id
            INNER JOIN order_details d ON d.order_id = o.id
            GROUP BY c.city
            ORDER BY total_amount_cents DESC, c.city
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Number of orders per order-date year for customers in `city`.
    pub async fn order_counts_by_year(&self, city: &str) -> DbResult<Vec<YearlyOrderCount>> {
        let rows = sqlx::query_as::<_, YearlyOrderCount>(
            r#"
            SELECT
                CAST(strftime('%Y', o.order_date) AS INTEGER) AS year,
                COUNT(*) AS order_count
            FROM orders o
            INNER JOIN customers c ON c.id = o.customer_id
            WHERE c.city = ?1
            GROUP BY year
            ORDER BY year
            "#,
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
