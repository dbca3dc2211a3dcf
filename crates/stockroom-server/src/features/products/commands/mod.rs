//! Product write operations

pub mod create;
pub mod delete;
pub mod update;
pub mod update_quantity;

pub use create::{CreateProductCommand, CreateProductError};
pub use delete::{DeleteProductCommand, DeleteProductError, DeleteProductResponse};
pub use update::{UpdateProductCommand, UpdateProductError};
pub use update_quantity::{UpdateQuantityCommand, UpdateQuantityError};
