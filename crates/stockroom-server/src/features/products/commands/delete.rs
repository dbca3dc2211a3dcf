//! Delete product command

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::Product;

use crate::store::{ProductStore, StoreError};

pub const DELETE_SUCCESS_MESSAGE: &str = "Product deleted successfully";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProductCommand {
    pub pid: String,
}

/// The removed product, echoed back to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProductResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteProductError {
    #[error("Product not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<DeleteProductResponse, DeleteProductError>> for DeleteProductCommand {}

#[tracing::instrument(skip(store, command), fields(pid = %command.pid))]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    command: DeleteProductCommand,
) -> Result<DeleteProductResponse, DeleteProductError> {
    let removed = store.delete_one(&command.pid).await?;
    let product = removed.ok_or(DeleteProductError::NotFound(command.pid))?;

    tracing::info!("Product deleted");
    Ok(DeleteProductResponse {
        message: DELETE_SUCCESS_MESSAGE.to_string(),
        product,
    })
}
