//! Domain types shared across Stockroom crates

pub mod product;
pub mod sales_order;

pub use product::{NewProduct, Product, ProductPatch};
pub use sales_order::{NewSalesOrder, SalesOrder};

use crate::error::{ValidationError, ValidationResult};

pub(crate) fn require_text(value: &str, field: &'static str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

pub(crate) fn require_finite(value: f64, field: &'static str) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    Ok(())
}
