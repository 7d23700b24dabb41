//! # Order Service
//!
//! Order lookups, order placement, shipping updates and the city reports.
//!
//! ## Order Placement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     save_order(request)                                 │
//! │                                                                         │
//! │  1. validate_order_request        shape, quantities, duplicate lines   │
//! │  2. BEGIN IMMEDIATE                                                     │
//! │  3. customer exists?              no → ResourceNotFound                │
//! │  4. employee exists?              no → ResourceNotFound                │
//! │  5. INSERT order header           duplicate id → InvalidRequest        │
//! │  6. for each line:                                                      │
//! │       product exists?             no → InvalidRequest                  │
//! │       stock - quantity < 0?       yes → InvalidRequest                 │
//! │       INSERT detail (price snapshot)                                   │
//! │       stock -= quantity                                                │
//! │  7. COMMIT                                                              │
//! │                                                                         │
//! │  Any error drops the transaction: nothing from the order persists.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use orderdesk_core::validation::{
    parse_date, validate_key, validate_order_request, validate_product_id, validate_report_limit,
    validate_text,
};
use orderdesk_core::{
    CityOrderTotal, CoreError, Money, Order, OrderDetail, OrderRequest, OrderWithDetails,
    YearlyOrderCount,
};
use orderdesk_db::{
    CustomerRepository, DbError, Database, EmployeeRepository, OrderRepository, ProductRepository,
};

use crate::error::{ServiceError, ServiceResult};

/// Order operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    max_report_limit: i64,
}

impl OrderService {
    pub fn new(db: Database, max_report_limit: i64) -> Self {
        OrderService {
            db,
            max_report_limit,
        }
    }

    /// All order headers by order date, then id.
    pub async fn get_all_orders(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().get_all().await?)
    }

    /// Gets an order with its lines.
    ///
    /// An unknown id is reported as `InvalidRequest`.
    pub async fn get_order_by_id(&self, id: &str) -> ServiceResult<OrderWithDetails> {
        validate_key("order_id", id)?;

        self.db
            .orders()
            .get_with_details(id)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidRequest(format!("Order information is not correct: {}", id))
            })
    }

    /// Orders of `customer_id` containing `product_id`.
    ///
    /// ## Errors
    /// * `ResourceNotFound` - no such order exists
    pub async fn get_orders_by_product_and_customer(
        &self,
        product_id: i64,
        customer_id: &str,
    ) -> ServiceResult<Vec<Order>> {
        validate_product_id(product_id)?;
        validate_key("customer_id", customer_id)?;

        let orders = self
            .db
            .orders()
            .find_by_product_and_customer(product_id, customer_id)
            .await?;

        if orders.is_empty() {
            return Err(ServiceError::ResourceNotFound(format!(
                "No orders of customer {} contain product {}",
                customer_id, product_id
            )));
        }

        Ok(orders)
    }

    /// Places an order and returns it with its lines.
    ///
    /// Stock of every ordered product is reduced by the ordered quantity.
    pub async fn save_order(&self, request: OrderRequest) -> ServiceResult<OrderWithDetails> {
        validate_order_request(&request)?;

        let order = Order {
            id: request
                .order_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            customer_id: request.customer_id.clone(),
            employee_id: request.employee_id.clone(),
            order_date: request.order_date,
            request_date: request.request_date,
            shipping_date: request.shipping_date,
        };

        debug!(
            id = %order.id,
            customer_id = %order.customer_id,
            lines = request.details.len(),
            "Placing order"
        );

        let mut tx = self.db.begin().await?;

        if CustomerRepository::get_by_id_in(&mut tx, &order.customer_id)
            .await?
            .is_none()
        {
            warn!(customer_id = %order.customer_id, "Order rejected: unknown customer");
            return Err(ServiceError::not_found("Customer", &order.customer_id));
        }

        if EmployeeRepository::get_by_id_in(&mut tx, &order.employee_id)
            .await?
            .is_none()
        {
            warn!(employee_id = %order.employee_id, "Order rejected: unknown employee");
            return Err(ServiceError::not_found("Employee", &order.employee_id));
        }

        match OrderRepository::insert_in(&mut tx, &order).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(ServiceError::InvalidRequest(format!(
                    "Order {} already exists",
                    order.id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let mut details = Vec::with_capacity(request.details.len());
        let mut total = Money::zero();

        for line in &request.details {
            let product = ProductRepository::get_by_id_in(&mut tx, line.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(line.product_id))?;

            if !product.can_fulfil(line.quantity) {
                warn!(
                    product_id = product.id,
                    stock = product.stock,
                    requested = line.quantity,
                    "Order rejected: insufficient stock"
                );
                return Err(CoreError::InsufficientStock {
                    product: product.name,
                    available: product.stock,
                    requested: line.quantity,
                }
                .into());
            }

            let detail = OrderDetail {
                order_id: order.id.clone(),
                product_id: product.id,
                unit_price_cents: product.unit_price_cents,
                quantity: line.quantity,
            };

            total = Money::from_cents(detail.unit_price_cents)
                .checked_multiply_quantity(detail.quantity)
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or_else(|| {
                    ServiceError::InvalidRequest(format!(
                        "Total of order {} is out of range",
                        order.id
                    ))
                })?;

            OrderRepository::insert_detail_in(&mut tx, &detail).await?;
            ProductRepository::decrement_stock_in(&mut tx, product.id, line.quantity).await?;
            details.push(detail);
        }

        tx.commit().await.map_err(DbError::from)?;

        let placed = OrderWithDetails { order, details };
        info!(
            id = %placed.order.id,
            lines = placed.details.len(),
            total = %total,
            "Order placed"
        );

        Ok(placed)
    }

    /// Sets the shipping date (`YYYY-MM-DD`) of an order.
    ///
    /// ## Errors
    /// * `InvalidRequest` - bad date format, or a date before the order date
    /// * `ResourceNotFound` - no order with that id
    pub async fn update_order_with_shipping_date(
        &self,
        id: &str,
        shipping_date: &str,
    ) -> ServiceResult<Order> {
        validate_key("order_id", id)?;
        let shipping_date: NaiveDate = parse_date("shipping_date", shipping_date)?;

        let order = self
            .db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", id))?;

        if shipping_date < order.order_date {
            return Err(CoreError::ShippingBeforeOrder {
                order_id: order.id,
                order_date: order.order_date,
                shipping_date,
            }
            .into());
        }

        let updated = self.db.orders().update_shipping_date(id, shipping_date).await?;
        info!(id = %id, shipping_date = %shipping_date, "Shipping date set");
        Ok(updated)
    }

    /// Customer cities ranked by total ordered amount, largest first.
    pub async fn get_top_cities_by_total_order_amount(
        &self,
        limit: i64,
    ) -> ServiceResult<Vec<CityOrderTotal>> {
        validate_report_limit(limit, self.max_report_limit)?;
        Ok(self.db.orders().top_cities_by_amount(limit).await?)
    }

    /// Orders per year placed by customers in `city`.
    pub async fn get_order_count_by_year_for_city(
        &self,
        city: &str,
    ) -> ServiceResult<Vec<YearlyOrderCount>> {
        validate_text("city", city)?;
        Ok(self.db.orders().order_counts_by_year(city.trim()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductService;
    use crate::test_support::{date, seeded_db, FileDb};
    use orderdesk_core::OrderLineRequest;

    fn request(id: Option<&str>, customer_id: &str, lines: &[(i64, i64)]) -> OrderRequest {
        OrderRequest {
            order_id: id.map(str::to_string),
            customer_id: customer_id.to_string(),
            employee_id: "E01".to_string(),
            order_date: date("2024-03-01"),
            request_date: date("2024-03-15"),
            shipping_date: None,
            details: lines
                .iter()
                .map(|&(product_id, quantity)| OrderLineRequest {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    async fn setup() -> (OrderService, ProductService, i64, i64) {
        let db = seeded_db().await;
        let products = ProductService::new(db.clone());
        let chai = products.get_products_by_name("Chai").await.unwrap()[0].id;
        let chang = products.get_products_by_name("Chang").await.unwrap()[0].id;
        (OrderService::new(db, 50), products, chai, chang)
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let (orders, _, chai, _) = setup().await;

        let err = orders
            .save_order(request(Some("O1"), "NOBODY", &[(chai, 1)]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Customer"));

        let mut bad_employee = request(Some("O1"), "ALFKI", &[(chai, 1)]);
        bad_employee.employee_id = "E99".to_string();
        assert!(orders.save_order(bad_employee).await.unwrap_err().is_not_found());

        assert!(orders.get_all_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_over_stock_persists_nothing() {
        let (orders, products, chai, chang) = setup().await;

        // Chai has 39 units, Chang 17: the second line fails after the first was written.
        let err = orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 5), (chang, 18)]))
            .await
            .unwrap_err();
        assert!(err.is_invalid_request());
        assert!(err.to_string().contains("Chang"));

        assert!(orders.get_all_orders().await.unwrap().is_empty());
        assert_eq!(products.get_product_by_id(chai).await.unwrap().stock, 39);
        assert_eq!(products.get_product_by_id(chang).await.unwrap().stock, 17);
    }

    #[tokio::test]
    async fn test_successful_order_decrements_stock() {
        let (orders, products, chai, chang) = setup().await;

        let placed = orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 5), (chang, 17)]))
            .await
            .unwrap();
        assert_eq!(placed.order.id, "O1");
        assert_eq!(placed.details.len(), 2);
        assert_eq!(placed.total().cents(), 5 * 1800 + 17 * 1900);

        assert_eq!(products.get_product_by_id(chai).await.unwrap().stock, 34);
        assert_eq!(products.get_product_by_id(chang).await.unwrap().stock, 0);

        let stored = orders.get_order_by_id("O1").await.unwrap();
        assert_eq!(stored, placed);

        // Chang is now sold out.
        let err = orders
            .save_order(request(Some("O2"), "BONAP", &[(chang, 1)]))
            .await
            .unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[tokio::test]
    async fn test_price_is_snapshotted() {
        let (orders, products, chai, _) = setup().await;

        orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 1)]))
            .await
            .unwrap();

        let mut product = products.get_product_by_id(chai).await.unwrap();
        product.unit_price_cents = 9900;
        products.update_product(product).await.unwrap();

        let stored = orders.get_order_by_id("O1").await.unwrap();
        assert_eq!(stored.details[0].unit_price_cents, 1800);
    }

    #[tokio::test]
    async fn test_rejected_requests() {
        let (orders, _, chai, _) = setup().await;

        orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 1)]))
            .await
            .unwrap();

        let duplicate = orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 1)]))
            .await
            .unwrap_err();
        assert!(duplicate.is_invalid_request());
        assert_eq!(duplicate.to_string(), "Order O1 already exists");

        let unknown_product = orders
            .save_order(request(Some("O2"), "ALFKI", &[(4_242, 1)]))
            .await
            .unwrap_err();
        assert!(unknown_product.is_invalid_request());

        let no_lines = orders
            .save_order(request(Some("O3"), "ALFKI", &[]))
            .await
            .unwrap_err();
        assert!(no_lines.is_invalid_request());

        let repeated = orders
            .save_order(request(Some("O4"), "ALFKI", &[(chai, 1), (chai, 2)]))
            .await
            .unwrap_err();
        assert!(repeated.is_invalid_request());

        assert_eq!(orders.get_all_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generated_order_id() {
        let (orders, _, chai, _) = setup().await;

        let placed = orders
            .save_order(request(None, "BONAP", &[(chai, 2)]))
            .await
            .unwrap();
        assert!(Uuid::parse_str(&placed.order.id).is_ok());
        assert_eq!(orders.get_all_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_order_by_id_unknown_is_invalid_request() {
        let (orders, _, _, _) = setup().await;

        let err = orders.get_order_by_id("MISSING").await.unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[tokio::test]
    async fn test_orders_by_product_and_customer() {
        let (orders, _, chai, chang) = setup().await;

        orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 1)]))
            .await
            .unwrap();

        let found = orders
            .get_orders_by_product_and_customer(chai, "ALFKI")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let err = orders
            .get_orders_by_product_and_customer(chang, "ALFKI")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_shipping_date_update() {
        let (orders, _, chai, _) = setup().await;

        orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 1)]))
            .await
            .unwrap();

        let shipped = orders
            .update_order_with_shipping_date("O1", "2024-03-09")
            .await
            .unwrap();
        assert_eq!(shipped.shipping_date, Some(date("2024-03-09")));
        assert_eq!(
            orders.get_order_by_id("O1").await.unwrap().order.shipping_date,
            Some(date("2024-03-09"))
        );

        let bad_format = orders
            .update_order_with_shipping_date("O1", "09/03/2024")
            .await
            .unwrap_err();
        assert!(bad_format.is_invalid_request());

        let too_early = orders
            .update_order_with_shipping_date("O1", "2024-02-28")
            .await
            .unwrap_err();
        assert!(too_early.is_invalid_request());

        let missing = orders
            .update_order_with_shipping_date("O9", "2024-03-09")
            .await
            .unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_city_reports() {
        let (orders, _, chai, chang) = setup().await;

        orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 2)]))
            .await
            .unwrap();
        let mut next_year = request(Some("O2"), "ALFKI", &[(chang, 1)]);
        next_year.order_date = date("2025-01-10");
        next_year.request_date = date("2025-01-20");
        orders.save_order(next_year).await.unwrap();
        orders
            .save_order(request(Some("O3"), "BONAP", &[(chai, 10)]))
            .await
            .unwrap();

        let top = orders.get_top_cities_by_total_order_amount(5).await.unwrap();
        assert_eq!(top[0].city, "Marseille");
        assert_eq!(top[0].total_amount_cents, 18000);
        assert_eq!(top[1].city, "Berlin");
        assert_eq!(top[1].total_amount_cents, 3600 + 1900);

        assert!(orders
            .get_top_cities_by_total_order_amount(0)
            .await
            .unwrap_err()
            .is_invalid_request());
        assert!(orders
            .get_top_cities_by_total_order_amount(51)
            .await
            .unwrap_err()
            .is_invalid_request());

        let counts = orders.get_order_count_by_year_for_city("Berlin").await.unwrap();
        let years: Vec<_> = counts.iter().map(|c| (c.year, c.order_count)).collect();
        assert_eq!(years, vec![(2024, 1), (2025, 1)]);
    }

    #[tokio::test]
    async fn test_ordered_product_cannot_be_deleted() {
        let (orders, products, chai, _) = setup().await;

        orders
            .save_order(request(Some("O1"), "ALFKI", &[(chai, 1)]))
            .await
            .unwrap();

        let err = products.delete_product(chai).await.unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[tokio::test]
    async fn test_padded_or_non_ascii_ids_are_rejected() {
        let (orders, _, chai, _) = setup().await;

        for id in [" O1", "O1 ", "Ö1"] {
            let err = orders
                .save_order(request(Some(id), "ALFKI", &[(chai, 1)]))
                .await
                .unwrap_err();
            assert!(err.is_invalid_request(), "{:?} accepted", id);
        }

        let err = orders
            .save_order(request(Some("O1"), " ALFKI", &[(chai, 1)]))
            .await
            .unwrap_err();
        assert!(err.is_invalid_request());
        assert!(orders.get_all_orders().await.unwrap().is_empty());
    }

    async fn place_concurrently(
        orders: &OrderService,
        product_id: i64,
        count: usize,
    ) -> Vec<ServiceResult<OrderWithDetails>> {
        let handles: Vec<_> = (0..count)
            .map(|_| {
                let orders = orders.clone();
                tokio::spawn(async move {
                    orders
                        .save_order(request(None, "ALFKI", &[(product_id, 1)]))
                        .await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(count);
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_all_commit() {
        let file = FileDb::open(5).await;
        let orders = OrderService::new(file.db.clone(), 50);
        let chai = file.db.products().find_by_name_like("Chai").await.unwrap()[0].id;
        file.db.products().update_stock(chai, 1_000).await.unwrap();

        let results = place_concurrently(&orders, chai, 20).await;
        for result in &results {
            assert!(result.is_ok(), "{:?}", result);
        }

        let stock = file.db.products().get_by_id(chai).await.unwrap().unwrap().stock;
        assert_eq!(stock, 980);
        assert_eq!(orders.get_all_orders().await.unwrap().len(), 20);

        file.remove().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_never_oversell() {
        let file = FileDb::open(5).await;
        let orders = OrderService::new(file.db.clone(), 50);
        let chai = file.db.products().find_by_name_like("Chai").await.unwrap()[0].id;
        file.db.products().update_stock(chai, 10).await.unwrap();

        let results = place_concurrently(&orders, chai, 20).await;
        let placed = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_invalid_request()))
            .count();
        assert_eq!((placed, rejected), (10, 10));

        let stock = file.db.products().get_by_id(chai).await.unwrap().unwrap().stock;
        assert_eq!(stock, 0);
        assert_eq!(orders.get_all_orders().await.unwrap().len(), 10);

        file.remove().await;
    }
}
