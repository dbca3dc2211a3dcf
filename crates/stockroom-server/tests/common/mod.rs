//! Shared helpers for the HTTP integration tests
//!
//! Every test builds the full application router over a [`MemoryStore`] and
//! drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use stockroom_server::{api, config::Config, store::MemoryStore, store::Stores};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "stockroom-test-boundary";

/// Router plus the pieces a test may want to inspect afterwards
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self::build(store, |_| {})
    }

    pub fn build(store: MemoryStore, configure: impl FnOnce(&mut Config)) -> Self {
        let store = Arc::new(store);
        let upload_dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.upload.dir = upload_dir.path().join("staging");
        configure(&mut config);

        let router = api::create_router(Stores::from_memory(store.clone()), &config);
        Self {
            router,
            store,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, body)).await
    }

    /// Upload `content` as the `file` field with the given MIME type
    pub async fn upload(&self, content: &str, content_type: &str) -> (StatusCode, Value) {
        self.send(multipart_request(
            "file",
            "products.txt",
            content_type,
            content.as_bytes(),
        ))
        .await
    }

    /// Files left behind in the staging directory
    pub fn staged_files(&self) -> usize {
        count_files(&self.upload_dir.path().join("staging"))
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn multipart_request(
    field: &str,
    file_name: &str,
    content_type: &str,
    content: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/products/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn count_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}
