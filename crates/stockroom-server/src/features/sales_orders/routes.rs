//! Sales order API routes
//!
//! - `POST /api/v1/sales-orders` - Record a sale
//! - `GET /api/v1/sales-orders` - List every recorded sale, oldest first

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use super::{
    commands::{CreateSalesOrderCommand, CreateSalesOrderError},
    queries::{ListSalesOrdersError, ListSalesOrdersQuery},
};
use crate::api::response::ApiResponse;
use crate::error::{AppError, AppResult};
use crate::store::SalesOrderStore;

pub fn sales_orders_routes() -> Router<Arc<dyn SalesOrderStore>> {
    Router::new().route("/", get(list_sales_orders).post(create_sales_order))
}

#[tracing::instrument(skip(store, command))]
async fn create_sales_order(
    State(store): State<Arc<dyn SalesOrderStore>>,
    Json(command): Json<CreateSalesOrderCommand>,
) -> AppResult<Response> {
    let order = super::commands::create::handle(store, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))).into_response())
}

#[tracing::instrument(skip(store))]
async fn list_sales_orders(State(store): State<Arc<dyn SalesOrderStore>>) -> AppResult<Response> {
    let orders = super::queries::list::handle(store, ListSalesOrdersQuery).await?;
    let total = orders.len();
    Ok(ApiResponse::success_with_meta(orders, json!({ "total": total })).into_response())
}

impl From<CreateSalesOrderError> for AppError {
    fn from(err: CreateSalesOrderError) -> Self {
        match err {
            CreateSalesOrderError::Validation(e) => AppError::Validation(e),
            CreateSalesOrderError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<ListSalesOrdersError> for AppError {
    fn from(err: ListSalesOrdersError) -> Self {
        match err {
            ListSalesOrdersError::Store(e) => AppError::Store(e),
        }
    }
}
