//! Product API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/products` - Create a product
//! - `GET /api/v1/products` - List all products
//! - `GET /api/v1/products/:pid` - Get a product by SKU
//! - `PUT /api/v1/products/:pid` - Update name, quantity or price
//! - `PUT /api/v1/products/:pid/quantity` - Set the stock quantity
//! - `DELETE /api/v1/products/:pid` - Delete a product

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use super::{
    commands::{
        CreateProductCommand, CreateProductError, DeleteProductCommand, DeleteProductError,
        UpdateProductCommand, UpdateProductError, UpdateQuantityCommand, UpdateQuantityError,
    },
    queries::{GetProductError, GetProductQuery, ListProductsError, ListProductsQuery},
};
use crate::api::response::ApiResponse;
use crate::error::{AppError, AppResult};
use crate::store::ProductStore;

const NOT_FOUND_MESSAGE: &str = "Product not found";

pub fn products_routes() -> Router<Arc<dyn ProductStore>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:pid", get(get_product).put(update_product).delete(delete_product))
        .route("/:pid/quantity", put(update_quantity))
}

/// # Response
///
/// - `201 Created` - product stored
/// - `400 Bad Request` - blank pid or name, non-finite price
/// - `409 Conflict` - pid already taken
#[tracing::instrument(skip(store, command), fields(pid = %command.pid))]
async fn create_product(
    State(store): State<Arc<dyn ProductStore>>,
    Json(command): Json<CreateProductCommand>,
) -> AppResult<Response> {
    let product = super::commands::create::handle(store, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))).into_response())
}

#[tracing::instrument(skip(store))]
async fn list_products(State(store): State<Arc<dyn ProductStore>>) -> AppResult<Response> {
    let products = super::queries::list::handle(store, ListProductsQuery).await?;
    let total = products.len();
    Ok(ApiResponse::success_with_meta(products, json!({ "total": total })).into_response())
}

#[tracing::instrument(skip(store))]
async fn get_product(
    State(store): State<Arc<dyn ProductStore>>,
    Path(pid): Path<String>,
) -> AppResult<Response> {
    let product = super::queries::get::handle(store, GetProductQuery { pid }).await?;
    Ok(ApiResponse::success(product).into_response())
}

#[tracing::instrument(skip(store, command))]
async fn update_product(
    State(store): State<Arc<dyn ProductStore>>,
    Path(pid): Path<String>,
    Json(mut command): Json<UpdateProductCommand>,
) -> AppResult<Response> {
    command.pid = pid;
    let product = super::commands::update::handle(store, command).await?;
    Ok(ApiResponse::success(product).into_response())
}

#[tracing::instrument(skip(store, command))]
async fn update_quantity(
    State(store): State<Arc<dyn ProductStore>>,
    Path(pid): Path<String>,
    Json(mut command): Json<UpdateQuantityCommand>,
) -> AppResult<Response> {
    command.pid = pid;
    let product = super::commands::update_quantity::handle(store, command).await?;
    Ok(ApiResponse::success(product).into_response())
}

#[tracing::instrument(skip(store))]
async fn delete_product(
    State(store): State<Arc<dyn ProductStore>>,
    Path(pid): Path<String>,
) -> AppResult<Response> {
    let response = super::commands::delete::handle(store, DeleteProductCommand { pid }).await?;
    Ok(ApiResponse::success(response).into_response())
}

impl From<CreateProductError> for AppError {
    fn from(err: CreateProductError) -> Self {
        match err {
            CreateProductError::Validation(e) => AppError::Validation(e),
            CreateProductError::DuplicateSku(_) => AppError::Conflict(err.to_string()),
            CreateProductError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<UpdateProductError> for AppError {
    fn from(err: UpdateProductError) -> Self {
        match err {
            UpdateProductError::Validation(e) => AppError::Validation(e),
            UpdateProductError::NoFieldsToUpdate => AppError::BadRequest(err.to_string()),
            UpdateProductError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            UpdateProductError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<UpdateQuantityError> for AppError {
    fn from(err: UpdateQuantityError) -> Self {
        match err {
            UpdateQuantityError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            UpdateQuantityError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<DeleteProductError> for AppError {
    fn from(err: DeleteProductError) -> Self {
        match err {
            DeleteProductError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            DeleteProductError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<GetProductError> for AppError {
    fn from(err: GetProductError) -> Self {
        match err {
            GetProductError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            GetProductError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<ListProductsError> for AppError {
    fn from(err: ListProductsError) -> Self {
        match err {
            ListProductsError::Store(e) => AppError::Store(e),
        }
    }
}
