//! Validation errors for the shared domain types

use thiserror::Error;

/// Result type alias for field validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// A single field failed validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: i64 },
}
