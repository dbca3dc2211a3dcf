//! Stockroom Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, validation errors, and logging setup for the Stockroom workspace.
//!
//! # Overview
//!
//! - **Types**: products and sales orders as seen by every layer
//! - **Error Handling**: field-level validation errors for those types
//! - **Logging**: one place to configure `tracing` for all binaries
//!
//! # Example
//!
//! ```no_run
//! use stockroom_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{ValidationError, ValidationResult};
pub use types::{NewProduct, NewSalesOrder, Product, ProductPatch, SalesOrder};
