//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, missing records). Transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was missing or malformed (caller's fault).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A discount would drive the derived net amount below zero.
    #[error("invalid discount: {0}")]
    InvalidDiscount(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced batch/invoice/supplier could not be resolved.
    #[error("not found")]
    NotFound,

    /// A persistence-layer failure, propagated to the caller unmodified.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_discount(msg: impl Into<String>) -> Self {
        Self::InvalidDiscount(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
