//! Set a product's stock quantity

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::{Product, ProductPatch};

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityCommand {
    #[serde(skip)]
    pub pid: String,
    pub quantity: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateQuantityError {
    #[error("Product not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<Product, UpdateQuantityError>> for UpdateQuantityCommand {}

#[tracing::instrument(skip(store, command), fields(pid = %command.pid, quantity = command.quantity))]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    command: UpdateQuantityCommand,
) -> Result<Product, UpdateQuantityError> {
    let UpdateQuantityCommand { pid, quantity } = command;
    let updated = store.update_one(&pid, ProductPatch::quantity(quantity)).await?;
    let updated = updated.ok_or(UpdateQuantityError::NotFound(pid))?;

    tracing::info!("Product quantity updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use stockroom_common::NewProduct;

    #[tokio::test]
    async fn test_sets_quantity() {
        let store = Arc::new(MemoryStore::with_products([NewProduct::new("A1", "Widget", 5, 9.99)]));
        let command = UpdateQuantityCommand {
            pid: "A1".to_string(),
            quantity: 42,
        };

        let product = handle(store.clone(), command).await.unwrap();
        assert_eq!(product.quantity, 42);
        assert_eq!(store.find_one("A1").await.unwrap().unwrap().quantity, 42);
    }

    #[tokio::test]
    async fn test_unknown_pid() {
        let command = UpdateQuantityCommand {
            pid: "Z9".to_string(),
            quantity: 1,
        };
        let err = handle(Arc::new(MemoryStore::new()), command).await.unwrap_err();
        assert!(matches!(err, UpdateQuantityError::NotFound(ref pid) if pid == "Z9"));
    }
}
