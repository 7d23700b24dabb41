//! # Product Service
//!
//! Catalogue operations: lookups, saves, stock updates and the
//! stock-value listing.

use tracing::{debug, info, warn};

use orderdesk_core::validation::{
    validate_new_product, validate_product, validate_product_id, validate_search_term,
    validate_stock,
};
use orderdesk_core::{NewProduct, Product, ProductStockValue};
use orderdesk_db::{DbError, Database, ProductRepository};

use crate::error::{ServiceError, ServiceResult};

/// Product operations.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// All products ordered by id.
    pub async fn get_all_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().get_all().await?)
    }

    /// Gets one product.
    ///
    /// ## Errors
    /// * `InvalidRequest` - `id` is negative
    /// * `ResourceNotFound` - no product with that id
    pub async fn get_product_by_id(&self, id: i64) -> ServiceResult<Product> {
        validate_product_id(id)?;

        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Validates and inserts a product, returning it with its new id.
    pub async fn save_product(&self, product: NewProduct) -> ServiceResult<Product> {
        validate_new_product(&product)?;

        let saved = self.db.products().insert(&product).await?;
        info!(id = saved.id, name = %saved.name, "Product saved");
        Ok(saved)
    }

    /// Saves several products in one transaction.
    ///
    /// Every product is validated before anything is written; one failing
    /// insert leaves the catalogue untouched.
    pub async fn save_product_list(&self, products: Vec<NewProduct>) -> ServiceResult<Vec<Product>> {
        for product in &products {
            validate_new_product(product)?;
        }

        let mut tx = self.db.begin().await?;
        let mut saved = Vec::with_capacity(products.len());

        for product in &products {
            saved.push(ProductRepository::insert_in(&mut tx, product).await?);
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(count = saved.len(), "Product list saved");
        Ok(saved)
    }

    /// Replaces the writable fields of an existing product.
    pub async fn update_product(&self, product: Product) -> ServiceResult<Product> {
        validate_product(&product)?;

        let updated = self.db.products().update(&product).await?;
        debug!(id = updated.id, "Product updated");
        Ok(updated)
    }

    /// Deletes a product and returns its id.
    ///
    /// ## Errors
    /// * `ResourceNotFound` - no product with that id
    /// * `InvalidRequest` - order lines still reference the product
    pub async fn delete_product(&self, id: i64) -> ServiceResult<i64> {
        validate_product_id(id)?;

        match self.db.products().delete(id).await {
            Ok(()) => {
                info!(id = id, "Product deleted");
                Ok(id)
            }
            Err(DbError::ForeignKeyViolation { .. }) => {
                warn!(id = id, "Refusing to delete product referenced by orders");
                Err(ServiceError::InvalidRequest(format!(
                    "Product {} is referenced by existing orders",
                    id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sets the stock level of a product.
    pub async fn update_product_with_stock(&self, id: i64, stock: i64) -> ServiceResult<Product> {
        validate_product_id(id)?;
        validate_stock(stock)?;

        let updated = self.db.products().update_stock(id, stock).await?;
        debug!(id = id, stock = stock, "Stock updated");
        Ok(updated)
    }

    /// Products whose name contains `name`, ignoring ASCII case.
    pub async fn get_products_by_name(&self, name: &str) -> ServiceResult<Vec<Product>> {
        let term = validate_search_term(name)?;
        Ok(self.db.products().find_by_name_like(&term).await?)
    }

    /// Products priced strictly below `price_cents`.
    pub async fn get_products_below_price(&self, price_cents: i64) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().find_below_price(price_cents).await?)
    }

    /// Every product with the value of its stock, most valuable first.
    pub async fn get_products_by_stock_value(&self) -> ServiceResult<Vec<ProductStockValue>> {
        let products = self.db.products().get_all().await?;
        let mut rows = Vec::with_capacity(products.len());

        for product in products {
            if product
                .unit_price()
                .checked_multiply_quantity(product.stock)
                .is_none()
            {
                warn!(id = product.id, "Stock value overflows");
                return Err(ServiceError::InvalidRequest(format!(
                    "Stock value of product {} is out of range",
                    product.id
                )));
            }
            rows.push(ProductStockValue::from(product));
        }

        rows.sort_by(|a, b| {
            b.stock_value_cents
                .cmp(&a.stock_value_cents)
                .then(a.product_id.cmp(&b.product_id))
        });

        Ok(rows)
    }
}
