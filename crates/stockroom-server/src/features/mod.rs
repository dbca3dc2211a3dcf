//! Feature modules implementing the Stockroom API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes.
//!
//! # Features
//!
//! - **products**: single-product CRUD
//! - **uploads**: bulk product creation from a `.txt` file
//! - **sales_orders**: recording and listing sales
//!
//! Commands and queries implement `mediator::Request`; see [`crate::cqrs`].

pub mod products;
pub mod sales_orders;
pub mod uploads;

use axum::Router;

use crate::config::UploadConfig;
use crate::store::Stores;
use uploads::{staging::UploadStager, UploadState};

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub stores: Stores,
    pub upload: UploadConfig,
}

/// Creates the API router with every feature mounted
///
/// - `/products` - product CRUD and `/products/upload`
/// - `/sales-orders` - sales orders
pub fn router(state: FeatureState) -> Router<()> {
    let upload_state = UploadState {
        products: state.stores.products.clone(),
        stager: UploadStager::new(state.upload.dir.clone()),
    };

    let products = products::products_routes()
        .with_state(state.stores.products.clone())
        .merge(uploads::uploads_routes().with_state(upload_state));

    Router::new()
        .nest("/products", products)
        .nest(
            "/sales-orders",
            sales_orders::sales_orders_routes().with_state(state.stores.sales_orders.clone()),
        )
}
