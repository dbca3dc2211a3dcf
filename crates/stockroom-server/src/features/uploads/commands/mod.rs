//! Upload commands

pub mod ingest;

pub use ingest::{
    IngestProductsCommand, IngestProductsError, IngestProductsResponse, IngestStage,
};
