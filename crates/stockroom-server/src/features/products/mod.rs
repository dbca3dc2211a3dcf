//! Product management
//!
//! Single-product CRUD. Bulk creation from a file lives in
//! [`crate::features::uploads`].

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::products_routes;
