//! Product records
//!
//! `pid` is the stock-keeping unit and the unique key of a product. Every
//! other field can change over the product's life.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_finite, require_text};
use crate::error::ValidationResult;

/// A persisted product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub pid: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub pid: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl NewProduct {
    pub fn new(pid: impl Into<String>, name: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            pid: pid.into(),
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Check that the product can be stored as-is
    pub fn validate(&self) -> ValidationResult<()> {
        require_text(&self.pid, "pid")?;
        require_text(&self.name, "name")?;
        require_finite(self.price, "price")?;
        Ok(())
    }

    /// Stamp the product with creation time
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            pid: self.pid,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a product; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ProductPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none()
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(ref name) = self.name {
            require_text(name, "name")?;
        }
        if let Some(price) = self.price {
            require_finite(price, "price")?;
        }
        Ok(())
    }

    /// Apply the patch in place, bumping `updated_at`
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(ref name) = self.name {
            product.name = name.clone();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        product.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("A1", "Widget", 5, 9.99).validate().is_ok());
        assert_eq!(
            NewProduct::new("  ", "Widget", 5, 9.99).validate(),
            Err(ValidationError::Required { field: "pid" })
        );
        assert_eq!(
            NewProduct::new("A1", "", 5, 9.99).validate(),
            Err(ValidationError::Required { field: "name" })
        );
        assert_eq!(
            NewProduct::new("A1", "Widget", 5, f64::NAN).validate(),
            Err(ValidationError::NotFinite { field: "price" })
        );
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let created = Utc::now();
        let mut product = NewProduct::new("A1", "Widget", 5, 9.99).into_product(created);
        let later = created + chrono::Duration::seconds(5);

        ProductPatch::quantity(12).apply(&mut product, later);

        assert_eq!(product.quantity, 12);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
        assert_eq!(product.created_at, created);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn test_patch_deserializes_partial_body() {
        let patch: ProductPatch = serde_json::from_str(r#"{"price": 3.5}"#).unwrap();
        assert_eq!(patch.price, Some(3.5));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(ProductPatch::default().is_empty());
    }
}
