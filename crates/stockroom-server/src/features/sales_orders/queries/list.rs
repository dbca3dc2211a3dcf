//! List recorded sales orders

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::SalesOrder;

use crate::store::{SalesOrderStore, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSalesOrdersQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListSalesOrdersError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<Vec<SalesOrder>, ListSalesOrdersError>> for ListSalesOrdersQuery {}

#[tracing::instrument(skip_all)]
pub async fn handle(
    store: Arc<dyn SalesOrderStore>,
    _query: ListSalesOrdersQuery,
) -> Result<Vec<SalesOrder>, ListSalesOrdersError> {
    Ok(store.find_all().await?)
}
