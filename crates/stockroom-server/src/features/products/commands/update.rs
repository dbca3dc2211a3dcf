//! Update product command
//!
//! Partial update: only the fields present in the body change.

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::{Product, ProductPatch, ValidationError};

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductCommand {
    /// Taken from the path, never from the body
    #[serde(skip)]
    pub pid: String,
    #[serde(flatten)]
    pub patch: ProductPatch,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProductError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("At least one of name, quantity or price must be provided")]
    NoFieldsToUpdate,

    #[error("Product not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<Product, UpdateProductError>> for UpdateProductCommand {}

impl UpdateProductCommand {
    pub fn validate(&self) -> Result<(), UpdateProductError> {
        if self.patch.is_empty() {
            return Err(UpdateProductError::NoFieldsToUpdate);
        }
        self.patch.validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(store, command), fields(pid = %command.pid))]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    command: UpdateProductCommand,
) -> Result<Product, UpdateProductError> {
    command.validate()?;

    let UpdateProductCommand { pid, patch } = command;
    let updated = store.update_one(&pid, patch).await?;
    let updated = updated.ok_or(UpdateProductError::NotFound(pid))?;

    tracing::info!("Product updated");
    Ok(updated)
}
