//! Bulk product upload
//!
//! A `.txt` upload goes through four steps, each in its own module:
//!
//! - [`parser`] splits the text into raw `key: value` entries
//! - [`validator`] turns every entry into a typed candidate or rejects the batch
//! - [`duplicates`] rejects SKUs that already exist or repeat in the file
//! - [`commands::ingest`] runs the steps in order and commits the batch atomically
//!
//! [`staging`] owns the temporary copy of the uploaded file.

pub mod commands;
pub mod duplicates;
pub mod parser;
pub mod routes;
pub mod staging;
pub mod validator;

pub use routes::{uploads_routes, UploadState};
