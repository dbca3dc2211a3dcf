//! Sales orders record what was sold, for how much, and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_finite, require_text};
use crate::error::{ValidationError, ValidationResult};

/// A recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: Uuid,
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity_sold: i64,
    pub selling_price: f64,
    pub date: DateTime<Utc>,
}

/// Sale as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSalesOrder {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity_sold: i64,
    pub selling_price: f64,
    /// Defaults to the time the order is recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl NewSalesOrder {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text(&self.product_id, "product_id")?;
        if self.quantity_sold < 1 {
            return Err(ValidationError::BelowMinimum {
                field: "quantity_sold",
                min: 1,
            });
        }
        require_finite(self.selling_price, "selling_price")?;
        if self.selling_price < 0.0 {
            return Err(ValidationError::Negative {
                field: "selling_price",
            });
        }
        Ok(())
    }

    pub fn into_sales_order(self, now: DateTime<Utc>) -> SalesOrder {
        SalesOrder {
            id: Uuid::new_v4(),
            product_id: self.product_id,
            product_name: self.product_name,
            quantity_sold: self.quantity_sold,
            selling_price: self.selling_price,
            date: self.date.unwrap_or(now),
        }
    }
}
