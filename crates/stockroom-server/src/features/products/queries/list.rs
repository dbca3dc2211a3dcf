//! List all products

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::Product;

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProductsQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListProductsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<Vec<Product>, ListProductsError>> for ListProductsQuery {}

#[tracing::instrument(skip_all)]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    _query: ListProductsQuery,
) -> Result<Vec<Product>, ListProductsError> {
    let products = store.find_all().await?;
    tracing::debug!(count = products.len(), "Listed products");
    Ok(products)
}
