//! In-process dispatch of commands and queries
//!
//! Every product and sales-order command or query implements
//! `mediator::Request`. [`build_mediator`] registers the matching handler
//! for each, bound to the given [`Stores`].

pub use mediator::DefaultAsyncMediator;

use crate::features::{products, sales_orders, uploads};
use crate::store::Stores;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(stores: Stores) -> AppMediator {
    let product_store = stores.products;
    let sales_order_store = stores.sales_orders;

    DefaultAsyncMediator::builder()
        // Products
        .add_handler({
            let store = product_store.clone();
            move |cmd| {
                let store = store.clone();
                async move { products::commands::create::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = product_store.clone();
            move |cmd| {
                let store = store.clone();
                async move { products::commands::update::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = product_store.clone();
            move |cmd| {
                let store = store.clone();
                async move { products::commands::update_quantity::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = product_store.clone();
            move |cmd| {
                let store = store.clone();
                async move { products::commands::delete::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = product_store.clone();
            move |query| {
                let store = store.clone();
                async move { products::queries::get::handle(store, query).await }
            }
        })
        .add_handler({
            let store = product_store.clone();
            move |query| {
                let store = store.clone();
                async move { products::queries::list::handle(store, query).await }
            }
        })
        // Uploads
        .add_handler({
            let store = product_store.clone();
            move |cmd| {
                let store = store.clone();
                async move { uploads::commands::ingest::handle(store, cmd).await }
            }
        })
        // Sales orders
        .add_handler({
            let store = sales_order_store.clone();
            move |cmd| {
                let store = store.clone();
                async move { sales_orders::commands::create::handle(store, cmd).await }
            }
        })
        .add_handler({
            let store = sales_order_store.clone();
            move |query| {
                let store = store.clone();
                async move { sales_orders::queries::list::handle(store, query).await }
            }
        })
        .build()
}
