//! Record a sales order

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockroom_common::{NewSalesOrder, SalesOrder, ValidationError};

use crate::store::{SalesOrderStore, StoreError};

/// Command to record a sale
///
/// The referenced product is not looked up and its stock is not changed;
/// clients adjust quantity through the product routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSalesOrderCommand {
    #[serde(flatten)]
    pub order: NewSalesOrder,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateSalesOrderError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<SalesOrder, CreateSalesOrderError>> for CreateSalesOrderCommand {}

#[tracing::instrument(
    skip(store, command),
    fields(product_id = %command.order.product_id, quantity_sold = command.order.quantity_sold)
)]
pub async fn handle(
    store: Arc<dyn SalesOrderStore>,
    command: CreateSalesOrderCommand,
) -> Result<SalesOrder, CreateSalesOrderError> {
    command.order.validate()?;

    let order = store.insert(command.order).await?;
    tracing::info!(order_id = %order.id, "Sales order recorded");
    Ok(order)
}
