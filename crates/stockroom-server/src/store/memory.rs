//! In-process store
//!
//! Backs the test suite and `STORE_BACKEND=memory`. Each write takes the
//! lock once, so a batch insert checks and commits atomically.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use stockroom_common::{NewProduct, NewSalesOrder, Product, ProductPatch, SalesOrder};
use tokio::sync::RwLock;

use super::{repeated_keys, ProductStore, SalesOrderStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<BTreeMap<String, Product>>,
    sales_orders: RwLock<Vec<SalesOrder>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `products`
    pub fn with_products(products: impl IntoIterator<Item = NewProduct>) -> Self {
        let now = Utc::now();
        let products = products
            .into_iter()
            .map(|p| (p.pid.clone(), p.into_product(now)))
            .collect();
        Self {
            products: RwLock::new(products),
            sales_orders: RwLock::default(),
        }
    }

    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find(&self, pids: &[String]) -> StoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut found: Vec<Product> = pids.iter().filter_map(|pid| products.get(pid).cloned()).collect();
        found.sort_by(|a, b| a.pid.cmp(&b.pid));
        found.dedup_by(|a, b| a.pid == b.pid);
        Ok(found)
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn find_one(&self, pid: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.get(pid).cloned())
    }

    async fn insert_one(&self, product: NewProduct) -> StoreResult<Product> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.pid) {
            return Err(StoreError::DuplicateKey(vec![product.pid]));
        }
        let product = product.into_product(Utc::now());
        products.insert(product.pid.clone(), product.clone());
        Ok(product)
    }

    async fn insert_many(&self, batch: Vec<NewProduct>) -> StoreResult<u64> {
        let mut products = self.products.write().await;

        let repeated = repeated_keys(batch.iter().map(|p| p.pid.as_str()));
        let mut conflicts: Vec<String> = Vec::new();
        for product in &batch {
            let clashes = products.contains_key(&product.pid) || repeated.contains(&product.pid);
            if clashes && !conflicts.contains(&product.pid) {
                conflicts.push(product.pid.clone());
            }
        }
        if !conflicts.is_empty() {
            return Err(StoreError::DuplicateKey(conflicts));
        }

        let now = Utc::now();
        let count = batch.len() as u64;
        for product in batch {
            products.insert(product.pid.clone(), product.into_product(now));
        }
        Ok(count)
    }

    async fn update_one(&self, pid: &str, patch: ProductPatch) -> StoreResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.get_mut(pid).map(|product| {
            patch.apply(product, Utc::now());
            product.clone()
        }))
    }

    async fn delete_one(&self, pid: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.write().await.remove(pid))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl SalesOrderStore for MemoryStore {
    async fn insert(&self, order: NewSalesOrder) -> StoreResult<SalesOrder> {
        let order = order.into_sales_order(Utc::now());
        self.sales_orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn find_all(&self) -> StoreResult<Vec<SalesOrder>> {
        let mut orders = self.sales_orders.read().await.clone();
        orders.sort_by_key(|o| o.date);
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(pid: &str) -> NewProduct {
        NewProduct::new(pid, "Widget", 5, 9.99)
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let store = MemoryStore::with_products([widget("A1")]);

        let result = store.insert_many(vec![widget("B2"), widget("A1"), widget("C3")]).await;

        match result {
            Err(StoreError::DuplicateKey(pids)) => assert_eq!(pids, vec!["A1".to_string()]),
            other => panic!("expected duplicate key, got {:?}", other),
        }
        assert_eq!(store.product_count().await, 1);
        assert!(store.find_one("B2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_many_rejects_repeats_within_batch() {
        let store = MemoryStore::new();
        let result = store.insert_many(vec![widget("A1"), widget("A1")]).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey(ref pids)) if pids == &["A1".to_string()]));
        assert_eq!(store.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_find_returns_only_existing() {
        let store = MemoryStore::with_products([widget("A1"), widget("B2")]);
        let found = store
            .find(&["B2".to_string(), "Z9".to_string(), "B2".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pid, "B2");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::with_products([widget("A1")]);

        let updated = store
            .update_one("A1", ProductPatch::quantity(42))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, 42);
        assert!(store.update_one("nope", ProductPatch::quantity(1)).await.unwrap().is_none());

        let deleted = store.delete_one("A1").await.unwrap();
        assert_eq!(deleted.map(|p| p.quantity), Some(42));
        assert!(store.delete_one("A1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_one_duplicate() {
        let store = MemoryStore::new();
        store.insert_one(widget("A1")).await.unwrap();
        assert!(matches!(
            store.insert_one(widget("A1")).await,
            Err(StoreError::DuplicateKey(_))
        ));
    }
}
