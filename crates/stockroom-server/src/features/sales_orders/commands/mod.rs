//! Sales order write operations

pub mod create;

pub use create::{CreateSalesOrderCommand, CreateSalesOrderError};
