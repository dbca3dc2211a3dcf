//! Product upload route
//!
//! - `POST /api/v1/products/upload` - multipart form, file in field `file`

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use super::{
    commands::{IngestProductsCommand, IngestProductsError},
    staging::{StageError, UploadStager},
};
use crate::api::response::ErrorResponse;
use crate::store::ProductStore;

/// Multipart field that carries the product file
pub const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct UploadState {
    pub products: Arc<dyn ProductStore>,
    pub stager: UploadStager,
}

pub fn uploads_routes() -> Router<UploadState> {
    Router::new().route("/upload", post(upload_products))
}

/// Bulk-create products from a `.txt` upload
///
/// # Response
///
/// - `200 OK` - every product created
/// - `400 Bad Request` - wrong file type, malformed entry, empty file or no file
/// - `409 Conflict` - some SKUs already exist or repeat within the file
/// - `413 Payload Too Large` - body over the configured limit
/// - `500 Internal Server Error` - file or database failure
#[tracing::instrument(skip_all)]
async fn upload_products(
    State(state): State<UploadState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, UploadApiError> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(StageError::from)? {
        if field.name() == Some(UPLOAD_FIELD) {
            upload = Some(state.stager.stage(field).await?);
            break;
        }
    }
    let upload = upload.ok_or(UploadApiError::MissingFile)?;

    let response =
        super::commands::ingest::handle(state.products, IngestProductsCommand { upload }).await?;

    Ok((StatusCode::OK, Json(response)).into_response())
}

#[derive(Debug)]
pub enum UploadApiError {
    Rejected(MultipartRejection),
    Stage(StageError),
    MissingFile,
    Ingest(IngestProductsError),
}

impl From<MultipartRejection> for UploadApiError {
    fn from(err: MultipartRejection) -> Self {
        Self::Rejected(err)
    }
}

impl From<StageError> for UploadApiError {
    fn from(err: StageError) -> Self {
        Self::Stage(err)
    }
}

impl From<IngestProductsError> for UploadApiError {
    fn from(err: IngestProductsError) -> Self {
        Self::Ingest(err)
    }
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        match self {
            UploadApiError::Rejected(rejection) => {
                ErrorResponse::new("INVALID_REQUEST", rejection.body_text())
                    .into_response_with(rejection.status())
            },
            UploadApiError::Stage(StageError::Multipart(e)) => {
                let status = e.status();
                if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ErrorResponse::new("PAYLOAD_TOO_LARGE", "Uploaded file is too large.")
                        .into_response_with(status)
                } else {
                    ErrorResponse::new("INVALID_REQUEST", e.body_text()).into_response_with(status)
                }
            },
            UploadApiError::Stage(StageError::Io(e)) => {
                tracing::error!(error = ?e, "Failed to stage upload");
                ErrorResponse::new("IO_ERROR", "Error reading the file.")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
            UploadApiError::MissingFile => ErrorResponse::new("MISSING_FILE", "No file uploaded.")
                .into_response_with(StatusCode::BAD_REQUEST),
            UploadApiError::Ingest(e) => ingest_error_response(e),
        }
    }
}

fn ingest_error_response(err: IngestProductsError) -> Response {
    let message = err.to_string();
    match err {
        IngestProductsError::InvalidFileType { .. } => {
            ErrorResponse::new("INVALID_FILE_TYPE", message)
                .into_response_with(StatusCode::BAD_REQUEST)
        },
        IngestProductsError::MalformedInput(entry) => {
            ErrorResponse::with_details("MALFORMED_INPUT", message, json!({ "index": entry.index }))
                .into_response_with(StatusCode::BAD_REQUEST)
        },
        IngestProductsError::EmptyUpload => {
            ErrorResponse::new("EMPTY_UPLOAD", message).into_response_with(StatusCode::BAD_REQUEST)
        },
        IngestProductsError::DuplicateSku(skus) => {
            ErrorResponse::with_details("DUPLICATE_SKU", message, json!({ "skus": skus }))
                .into_response_with(StatusCode::CONFLICT)
        },
        IngestProductsError::Persistence { .. } => ErrorResponse::new("PERSISTENCE_ERROR", message)
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR),
        IngestProductsError::Io(_) => {
            ErrorResponse::new("IO_ERROR", message).into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::uploads::validator::InvalidEntry;
    use crate::store::StoreError;

    #[test]
    fn test_ingest_error_status_codes() {
        let cases = [
            (
                IngestProductsError::InvalidFileType { content_type: None },
                StatusCode::BAD_REQUEST,
            ),
            (
                IngestProductsError::MalformedInput(InvalidEntry { index: 3 }),
                StatusCode::BAD_REQUEST,
            ),
            (IngestProductsError::EmptyUpload, StatusCode::BAD_REQUEST),
            (
                IngestProductsError::DuplicateSku(vec!["A1".to_string()]),
                StatusCode::CONFLICT,
            ),
            (
                IngestProductsError::Persistence {
                    message: "Error saving products to the database.",
                    source: StoreError::Database(sqlx::Error::PoolTimedOut),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(UploadApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_missing_file_status() {
        assert_eq!(
            UploadApiError::MissingFile.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
