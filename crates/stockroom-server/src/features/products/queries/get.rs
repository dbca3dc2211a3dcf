//! Get product by SKU

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::Product;

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProductQuery {
    pub pid: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetProductError {
    #[error("Product not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<Product, GetProductError>> for GetProductQuery {}

#[tracing::instrument(skip(store, query), fields(pid = %query.pid))]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    query: GetProductQuery,
) -> Result<Product, GetProductError> {
    let found = store.find_one(&query.pid).await?;
    found.ok_or(GetProductError::NotFound(query.pid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use stockroom_common::NewProduct;

    #[tokio::test]
    async fn test_get_existing_and_missing() {
        let store = Arc::new(MemoryStore::with_products([NewProduct::new("A1", "Widget", 5, 9.99)]));

        let product = handle(store.clone(), GetProductQuery { pid: "A1".to_string() })
            .await
            .unwrap();
        assert_eq!(product.name, "Widget");

        let err = handle(store, GetProductQuery { pid: "a1".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, GetProductError::NotFound(_)));
    }
}
