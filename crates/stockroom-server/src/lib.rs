//! Stockroom Server Library
//!
//! HTTP backend for a small inventory: product CRUD, sales-order recording
//! and bulk product creation from uploaded text files.
//!
//! # Architecture
//!
//! Each feature is a vertical slice under [`features`] with its own
//! commands, queries and routes. Handlers reach storage only through the
//! [`store`] traits, so the same code runs against PostgreSQL and against
//! the in-memory store used by the tests.
//!
//! ## Bulk Upload
//!
//! `POST /api/v1/products/upload` stages the file on disk, then
//! parses, validates and duplicate-checks every entry before a single
//! all-or-nothing insert. See [`features::uploads`].
//!
//! # Example
//!
//! ```no_run
//! use stockroom_server::{api, config::Config, store::Stores};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let app = api::create_router(Stores::memory(), &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use error::{AppError, AppResult};
