//! Bulk product ingestion from an uploaded text file
//!
//! An upload moves through a fixed sequence of stages:
//!
//! ```text
//! Received -> TypeChecked -> Parsed -> Validated -> DuplicateChecked -> Committed
//! ```
//!
//! Any stage may reject the upload instead of advancing. Rejection before
//! `Committed` leaves the store untouched, and the staged file is deleted on
//! every outcome, exactly once.

use mediator::Request;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use stockroom_common::NewProduct;
use thiserror::Error;

use crate::features::uploads::{
    duplicates::{self, DuplicateCheckError},
    parser,
    staging::StagedUpload,
    validator::{self, InvalidEntry},
};
use crate::store::{ProductStore, StoreError};

pub const INGEST_SUCCESS_MESSAGE: &str = "Products uploaded and created successfully.";

const DUPLICATE_LOOKUP_FAILED: &str = "Error checking for duplicate products.";
const SAVE_FAILED: &str = "Error saving products to the database.";

/// Ingest every product in a staged upload, or none of them
#[derive(Debug)]
pub struct IngestProductsCommand {
    pub upload: StagedUpload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestProductsResponse {
    pub message: String,
    /// Number of products written
    pub created: u64,
}

#[derive(Debug, Error)]
pub enum IngestProductsError {
    #[error("Invalid file type. Only .txt files are allowed.")]
    InvalidFileType { content_type: Option<String> },

    #[error("{0}")]
    MalformedInput(#[from] InvalidEntry),

    #[error("The uploaded file does not contain any product entries.")]
    EmptyUpload,

    #[error("Duplicate product SKUs found: {}", .0.join(", "))]
    DuplicateSku(Vec<String>),

    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Error reading the file.")]
    Io(#[source] std::io::Error),
}

impl Request<Result<IngestProductsResponse, IngestProductsError>> for IngestProductsCommand {}

/// Progress of one upload through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    TypeChecked,
    Parsed,
    Validated,
    DuplicateChecked,
    Committed,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestStage::Received => "received",
            IngestStage::TypeChecked => "type_checked",
            IngestStage::Parsed => "parsed",
            IngestStage::Validated => "validated",
            IngestStage::DuplicateChecked => "duplicate_checked",
            IngestStage::Committed => "committed",
        };
        f.write_str(name)
    }
}

/// True for `text/plain`, with or without parameters such as `charset`
pub fn is_accepted_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|parsed| parsed.essence_str() == mime::TEXT_PLAIN.essence_str())
}

#[tracing::instrument(
    skip(store, command),
    fields(
        content_type = ?command.upload.content_type(),
        file_name = ?command.upload.file_name(),
        size = command.upload.size()
    )
)]
pub async fn handle(
    store: Arc<dyn ProductStore>,
    command: IngestProductsCommand,
) -> Result<IngestProductsResponse, IngestProductsError> {
    let IngestProductsCommand { upload } = command;
    let mut stage = IngestStage::Received;

    let outcome = run(store.as_ref(), &upload, &mut stage).await;

    let path = upload.path().to_path_buf();
    if let Err(e) = upload.close() {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
    }

    match &outcome {
        Ok(response) => {
            tracing::info!(created = response.created, "Product upload committed");
        },
        Err(e @ (IngestProductsError::Persistence { .. } | IngestProductsError::Io(_))) => {
            tracing::error!(stage = %stage, error = ?e, "Product upload failed");
        },
        Err(e) => {
            tracing::info!(stage = %stage, reason = %e, "Product upload rejected");
        },
    }

    outcome
}

async fn run(
    store: &dyn ProductStore,
    upload: &StagedUpload,
    stage: &mut IngestStage,
) -> Result<IngestProductsResponse, IngestProductsError> {
    if !is_accepted_content_type(upload.content_type()) {
        return Err(IngestProductsError::InvalidFileType {
            content_type: upload.content_type().map(str::to_string),
        });
    }
    *stage = IngestStage::TypeChecked;

    let text = tokio::fs::read_to_string(upload.path())
        .await
        .map_err(IngestProductsError::Io)?;
    let entries = parser::parse(&text);
    *stage = IngestStage::Parsed;
    tracing::debug!(entries = entries.len(), "Upload parsed");

    let candidates = validator::validate(&entries)?;
    if candidates.is_empty() {
        return Err(IngestProductsError::EmptyUpload);
    }
    *stage = IngestStage::Validated;

    duplicates::check(&candidates, store).await.map_err(|e| match e {
        DuplicateCheckError::Conflict(skus) => IngestProductsError::DuplicateSku(skus),
        DuplicateCheckError::Store(source) => IngestProductsError::Persistence {
            message: DUPLICATE_LOOKUP_FAILED,
            source,
        },
    })?;
    *stage = IngestStage::DuplicateChecked;

    let products: Vec<NewProduct> = candidates.into_iter().map(NewProduct::from).collect();
    let created = store.insert_many(products).await.map_err(|e| match e {
        // Lost a race with a concurrent writer between check and insert
        StoreError::DuplicateKey(skus) => IngestProductsError::DuplicateSku(skus),
        source => IngestProductsError::Persistence {
            message: SAVE_FAILED,
            source,
        },
    })?;
    *stage = IngestStage::Committed;

    Ok(IngestProductsResponse {
        message: INGEST_SUCCESS_MESSAGE.to_string(),
        created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};
    use async_trait::async_trait;
    use std::io::Write;
    use std::path::PathBuf;
    use stockroom_common::{Product, ProductPatch};
    use tempfile::{NamedTempFile, TempDir};

    const TWO_PRODUCTS: &str =
        "sku: A1\nname: Widget\nquantity: 5\nprice: 9.99;\nsku: B2\nname: Gadget\nquantity: 1\nprice: 24.50;";

    fn stage(dir: &TempDir, content: &[u8], content_type: Option<&str>) -> (StagedUpload, PathBuf) {
        let mut file = NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(content).unwrap();
        let upload = StagedUpload::new(file, content_type.map(str::to_string));
        let path = upload.path().to_path_buf();
        (upload, path)
    }

    /// Runs one upload; the flag says whether the staged file is gone afterwards
    async fn ingest(
        store: Arc<dyn ProductStore>,
        content: &str,
        content_type: Option<&str>,
    ) -> (Result<IngestProductsResponse, IngestProductsError>, bool) {
        let dir = tempfile::tempdir().unwrap();
        let (upload, path) = stage(&dir, content.as_bytes(), content_type);
        let result = handle(store, IngestProductsCommand { upload }).await;
        (result, !path.exists())
    }

    /// Fails every call, for exercising the persistence error paths
    struct FailingStore {
        fail_find: bool,
    }

    #[async_trait]
    impl ProductStore for FailingStore {
        async fn find(&self, _pids: &[String]) -> StoreResult<Vec<Product>> {
            if self.fail_find {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(Vec::new())
        }

        async fn find_all(&self) -> StoreResult<Vec<Product>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn find_one(&self, _pid: &str) -> StoreResult<Option<Product>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn insert_one(&self, _product: NewProduct) -> StoreResult<Product> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn insert_many(&self, _products: Vec<NewProduct>) -> StoreResult<u64> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }

        async fn update_one(&self, _pid: &str, _patch: ProductPatch) -> StoreResult<Option<Product>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn delete_one(&self, _pid: &str) -> StoreResult<Option<Product>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    /// Sees no stored SKUs, then loses the insert to a concurrent writer
    struct RacingStore {
        inner: MemoryStore,
        taken: Vec<String>,
    }

    #[async_trait]
    impl ProductStore for RacingStore {
        async fn find(&self, _pids: &[String]) -> StoreResult<Vec<Product>> {
            Ok(Vec::new())
        }

        async fn find_all(&self) -> StoreResult<Vec<Product>> {
            self.inner.find_all().await
        }

        async fn find_one(&self, pid: &str) -> StoreResult<Option<Product>> {
            self.inner.find_one(pid).await
        }

        async fn insert_one(&self, product: NewProduct) -> StoreResult<Product> {
            self.inner.insert_one(product).await
        }

        async fn insert_many(&self, _products: Vec<NewProduct>) -> StoreResult<u64> {
            Err(StoreError::DuplicateKey(self.taken.clone()))
        }

        async fn update_one(&self, pid: &str, patch: ProductPatch) -> StoreResult<Option<Product>> {
            self.inner.update_one(pid, patch).await
        }

        async fn delete_one(&self, pid: &str) -> StoreResult<Option<Product>> {
            self.inner.delete_one(pid).await
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_accepted_content_types() {
        assert!(is_accepted_content_type(Some("text/plain")));
        assert!(is_accepted_content_type(Some("text/plain; charset=utf-8")));
        assert!(!is_accepted_content_type(Some("application/json")));
        assert!(!is_accepted_content_type(Some("text/csv")));
        assert!(!is_accepted_content_type(Some("not a mime")));
        assert!(!is_accepted_content_type(None));
    }

    #[tokio::test]
    async fn test_commits_whole_batch() {
        let store = Arc::new(MemoryStore::new());
        let (result, removed) = ingest(store.clone(), TWO_PRODUCTS, Some("text/plain")).await;

        let response = result.unwrap();
        assert_eq!(response.message, "Products uploaded and created successfully.");
        assert_eq!(response.created, 2);
        assert!(removed);

        let widget = store.find_one("A1").await.unwrap().unwrap();
        assert_eq!(widget.name, "Widget");
        assert_eq!(widget.quantity, 5);
        assert_eq!(widget.price, 9.99);
        let gadget = store.find_one("B2").await.unwrap().unwrap();
        assert_eq!(gadget.price, 24.5);
    }

    #[tokio::test]
    async fn test_rejects_wrong_content_type() {
        let store = Arc::new(MemoryStore::new());
        let (result, removed) = ingest(store.clone(), TWO_PRODUCTS, Some("application/json")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IngestProductsError::InvalidFileType { .. }));
        assert_eq!(err.to_string(), "Invalid file type. Only .txt files are allowed.");
        assert_eq!(store.product_count().await, 0);
        assert!(removed);
    }

    #[tokio::test]
    async fn test_rejects_malformed_entry_without_writing() {
        let store = Arc::new(MemoryStore::new());
        let content = "sku: A1\nname: Widget\nquantity: 5\nprice: 9.99;\nsku: B2\nname: Gadget\nquantity: five\nprice: 1;";
        let (result, removed) = ingest(store.clone(), content, Some("text/plain")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IngestProductsError::MalformedInput(InvalidEntry { index: 2 })));
        assert_eq!(
            err.to_string(),
            "Invalid format in product entry at index 2. Each product must include sku, name, quantity, and price in the correct format."
        );
        assert_eq!(store.product_count().await, 0);
        assert!(removed);
    }

    #[tokio::test]
    async fn test_rejects_existing_sku() {
        let store = Arc::new(MemoryStore::with_products([NewProduct::new("B2", "Old", 3, 2.0)]));
        let (result, removed) = ingest(store.clone(), TWO_PRODUCTS, Some("text/plain")).await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Duplicate product SKUs found: B2");
        assert!(store.find_one("A1").await.unwrap().is_none());
        assert_eq!(store.find_one("B2").await.unwrap().unwrap().name, "Old");
        assert!(removed);
    }

    #[tokio::test]
    async fn test_rejects_sku_repeated_in_file() {
        let store = Arc::new(MemoryStore::new());
        let content = format!("{TWO_PRODUCTS}\nsku: A1\nname: Again\nquantity: 1\nprice: 1;");
        let (result, _) = ingest(store.clone(), &content, Some("text/plain")).await;

        assert!(matches!(result, Err(IngestProductsError::DuplicateSku(ref skus)) if skus == &["A1"]));
        assert_eq!(store.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_rejects_empty_upload() {
        let store = Arc::new(MemoryStore::new());
        let (result, removed) = ingest(store.clone(), " ;\n ; ", Some("text/plain")).await;

        assert!(matches!(result, Err(IngestProductsError::EmptyUpload)));
        assert!(removed);
    }

    #[tokio::test]
    async fn test_rejects_non_utf8_content() {
        let dir = tempfile::tempdir().unwrap();
        let (upload, path) = stage(&dir, &[0xff, 0xfe, 0x00, 0x41], Some("text/plain"));

        let result = handle(Arc::new(MemoryStore::new()), IngestProductsCommand { upload }).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IngestProductsError::Io(_)));
        assert_eq!(err.to_string(), "Error reading the file.");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_duplicate_lookup_failure() {
        let store = Arc::new(FailingStore { fail_find: true });
        let (result, removed) = ingest(store, TWO_PRODUCTS, Some("text/plain")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IngestProductsError::Persistence { .. }));
        assert_eq!(err.to_string(), "Error checking for duplicate products.");
        assert!(removed);
    }

    #[tokio::test]
    async fn test_insert_failure() {
        let store = Arc::new(FailingStore { fail_find: false });
        let (result, removed) = ingest(store, TWO_PRODUCTS, Some("text/plain")).await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Error saving products to the database.");
        assert!(removed);
    }

    #[tokio::test]
    async fn test_insert_conflict_after_clean_check() {
        let store = Arc::new(RacingStore {
            inner: MemoryStore::new(),
            taken: vec!["A1".to_string()],
        });
        let (result, removed) = ingest(store.clone(), TWO_PRODUCTS, Some("text/plain")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IngestProductsError::DuplicateSku(ref skus) if skus == &["A1"]));
        assert_eq!(err.to_string(), "Duplicate product SKUs found: A1");
        assert!(removed);
        assert_eq!(store.inner.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_same_rejection_twice() {
        let store = Arc::new(MemoryStore::new());
        let content = "sku: A1\nname: Widget\nquantity: 5\nprice: cheap;";

        let (first, _) = ingest(store.clone(), content, Some("text/plain")).await;
        let (second, _) = ingest(store.clone(), content, Some("text/plain")).await;
        assert_eq!(first.unwrap_err().to_string(), second.unwrap_err().to_string());
        assert_eq!(store.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_second_identical_upload_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let (first, _) = ingest(store.clone(), TWO_PRODUCTS, Some("text/plain")).await;
        assert_eq!(first.unwrap().created, 2);

        let (second, _) = ingest(store.clone(), TWO_PRODUCTS, Some("text/plain")).await;
        assert_eq!(second.unwrap_err().to_string(), "Duplicate product SKUs found: A1, B2");
        assert_eq!(store.product_count().await, 2);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(IngestStage::DuplicateChecked.to_string(), "duplicate_checked");
        assert_eq!(IngestStage::Received.to_string(), "received");
    }
}
