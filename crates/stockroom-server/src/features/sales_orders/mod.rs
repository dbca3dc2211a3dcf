//! Sales order recording

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::sales_orders_routes;
