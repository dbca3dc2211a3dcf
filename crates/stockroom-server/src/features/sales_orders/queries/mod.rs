//! Sales order read operations

pub mod list;

pub use list::{ListSalesOrdersError, ListSalesOrdersQuery};
