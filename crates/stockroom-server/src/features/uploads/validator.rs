//! All-or-nothing validation of parsed upload entries

use serde::{Deserialize, Serialize};
use stockroom_common::NewProduct;
use thiserror::Error;

use super::parser::{ProductField, RawEntry};

/// A fully typed product taken from the upload, not stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl From<CandidateProduct> for NewProduct {
    fn from(candidate: CandidateProduct) -> Self {
        NewProduct::new(candidate.sku, candidate.name, candidate.quantity, candidate.price)
    }
}

/// The first entry that could not be turned into a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "Invalid format in product entry at index {index}. Each product must include sku, name, quantity, and price in the correct format."
)]
pub struct InvalidEntry {
    /// 1-based position among non-empty entries
    pub index: usize,
}

/// Turn every entry into a candidate, or stop at the first that fails
pub fn validate(entries: &[RawEntry]) -> Result<Vec<CandidateProduct>, InvalidEntry> {
    entries
        .iter()
        .map(|entry| {
            validate_entry(entry).ok_or_else(|| {
                tracing::debug!(
                    index = entry.index,
                    issues = ?entry.issues,
                    "Rejecting upload entry"
                );
                InvalidEntry { index: entry.index }
            })
        })
        .collect()
}

fn validate_entry(entry: &RawEntry) -> Option<CandidateProduct> {
    if entry.is_invalid() {
        return None;
    }

    let sku = entry.get(ProductField::Sku)?;
    let name = entry.get(ProductField::Name)?;
    let quantity = parse_quantity(entry.get(ProductField::Quantity)?)?;
    let price = parse_price(entry.get(ProductField::Price)?)?;

    Some(CandidateProduct {
        sku: sku.to_string(),
        name: name.to_string(),
        quantity,
        price,
    })
}

/// Whole decimal integer; `5.0` and `5abc` are rejected
fn parse_quantity(value: &str) -> Option<i64> {
    value.parse().ok()
}

/// Decimal number; `NaN` and infinities are rejected
fn parse_price(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|price| price.is_finite())
}
