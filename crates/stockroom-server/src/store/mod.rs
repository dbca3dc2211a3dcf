//! Persistence seam for products and sales orders
//!
//! Handlers never talk to a database directly. They receive a [`Stores`]
//! handle built once in `main` and call through the [`ProductStore`] and
//! [`SalesOrderStore`] traits, so the same code runs against PostgreSQL in
//! production and against [`MemoryStore`] in tests.
//!
//! The one guarantee every implementation must give: `pid` is unique. A
//! write that would break that fails with [`StoreError::DuplicateKey`]
//! naming the offending SKUs, and leaves the store unchanged.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use stockroom_common::{NewProduct, NewSalesOrder, Product, ProductPatch, SalesOrder};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),

    /// Write rejected because these SKUs already exist
    #[error("Duplicate product SKUs: {}", .0.join(", "))]
    DuplicateKey(Vec<String>),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products whose `pid` is in `pids`
    async fn find(&self, pids: &[String]) -> StoreResult<Vec<Product>>;

    /// Every product, ordered by `pid`
    async fn find_all(&self) -> StoreResult<Vec<Product>>;

    async fn find_one(&self, pid: &str) -> StoreResult<Option<Product>>;

    async fn insert_one(&self, product: NewProduct) -> StoreResult<Product>;

    /// Insert the whole batch or nothing; returns the number of rows written
    async fn insert_many(&self, products: Vec<NewProduct>) -> StoreResult<u64>;

    /// `None` when no product has this `pid`
    async fn update_one(&self, pid: &str, patch: ProductPatch) -> StoreResult<Option<Product>>;

    /// Returns the removed product, `None` when it did not exist
    async fn delete_one(&self, pid: &str) -> StoreResult<Option<Product>>;

    /// Cheap round-trip used by the health check
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait SalesOrderStore: Send + Sync {
    async fn insert(&self, order: NewSalesOrder) -> StoreResult<SalesOrder>;

    /// Every order, oldest first
    async fn find_all(&self) -> StoreResult<Vec<SalesOrder>>;
}

/// Store handles injected into the feature routers
#[derive(Clone)]
pub struct Stores {
    pub products: Arc<dyn ProductStore>,
    pub sales_orders: Arc<dyn SalesOrderStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            products: store.clone(),
            sales_orders: store,
        }
    }

    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Share one in-memory store so callers can inspect it afterwards
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            products: store.clone(),
            sales_orders: store,
        }
    }
}

/// Keys that occur more than once, each reported once, in first-repeat order
pub fn repeated_keys<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut repeated = Vec::new();

    for key in keys {
        if !seen.insert(key) && reported.insert(key) {
            repeated.push(key.to_string());
        }
    }

    repeated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys() {
        let keys = ["A1", "B2", "A1", "C3", "B2", "A1"];
        assert_eq!(repeated_keys(keys), vec!["A1".to_string(), "B2".to_string()]);
        assert!(repeated_keys(["A1", "B2"]).is_empty());
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = StoreError::DuplicateKey(vec!["A1".to_string(), "B2".to_string()]);
        assert_eq!(err.to_string(), "Duplicate product SKUs: A1, B2");
    }
}
