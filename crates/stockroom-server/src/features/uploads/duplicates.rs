//! SKU conflict detection for a validated upload batch

use thiserror::Error;

use super::validator::CandidateProduct;
use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum DuplicateCheckError {
    /// SKUs already stored or repeated inside the batch, in batch order
    #[error("Duplicate product SKUs found: {}", .0.join(", "))]
    Conflict(Vec<String>),

    #[error("Duplicate lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Fail when any candidate SKU is taken or appears twice in the batch
///
/// Every offending SKU is reported once, in the order of its first
/// appearance among the candidates. The store is only read.
#[tracing::instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn check(
    candidates: &[CandidateProduct],
    store: &dyn ProductStore,
) -> Result<(), DuplicateCheckError> {
    if candidates.is_empty() {
        return Ok(());
    }

    let skus: Vec<String> = candidates.iter().map(|c| c.sku.clone()).collect();
    let existing = store.find(&skus).await?;

    let repeated = crate::store::repeated_keys(skus.iter().map(String::as_str));
    let conflicts = conflicting_skus(&skus, |sku| {
        existing.iter().any(|p| p.pid == sku) || repeated.iter().any(|r| r == sku)
    });

    if conflicts.is_empty() {
        tracing::debug!("No duplicate SKUs");
        return Ok(());
    }

    tracing::info!(
        existing = existing.len(),
        repeated = repeated.len(),
        skus = %conflicts.join(", "),
        "Duplicate SKUs in upload"
    );
    Err(DuplicateCheckError::Conflict(conflicts))
}

fn conflicting_skus(skus: &[String], is_conflict: impl Fn(&str) -> bool) -> Vec<String> {
    let mut conflicts: Vec<String> = Vec::new();
    for sku in skus {
        if is_conflict(sku) && !conflicts.contains(sku) {
            conflicts.push(sku.clone());
        }
    }
    conflicts
}
