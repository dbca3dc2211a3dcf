//! Create product command

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::{NewProduct, Product, ValidationError};

use crate::store::{ProductStore, StoreError};

/// Command to create a single product
///
/// # Examples
///
/// ```rust,ignore
/// use stockroom_server::features::products::commands::CreateProductCommand;
///
/// let command = CreateProductCommand {
///     pid: "A1".to_string(),
///     name: "Widget".to_string(),
///     quantity: 5,
///     price: 9.99,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductCommand {
    /// SKU, unique across all products
    pub pid: String,
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateProductError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Product with this SKU already exists.")]
    DuplicateSku(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl Request<Result<Product, CreateProductError>> for CreateProductCommand {}

impl From<CreateProductCommand> for NewProduct {
    fn from(command: CreateProductCommand) -> Self {
        NewProduct::new(command.pid, command.name, command.quantity, command.price)
    }
}

#[tracing::instrument(skip(store, command), fields(pid = %command.pid))]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    command: CreateProductCommand,
) -> Result<Product, CreateProductError> {
    let product = NewProduct::from(command);
    product.validate()?;

    let pid = product.pid.clone();
    let created = store.insert_one(product).await.map_err(|e| match e {
        StoreError::DuplicateKey(_) => CreateProductError::DuplicateSku(pid),
        other => CreateProductError::Store(other),
    })?;

    tracing::info!("Product created");
    Ok(created)
}
