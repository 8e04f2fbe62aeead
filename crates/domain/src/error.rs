//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SubtrackError`]
//! via `#[from]`. Adapters decide how to surface a failure by matching on the
//! variant, never on the rendered message.

use std::fmt;

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum SubtrackError {
    /// Client input was malformed or violated a domain invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation would create a duplicate subscription.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The targeted record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Input rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("service_name must not be empty")]
    EmptyServiceName,

    #[error("price must be greater than or equal to 0, got {0}")]
    NegativePrice(i64),

    #[error("price must be at most {max}, got {price}")]
    PriceTooHigh { price: i64, max: i64 },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid {field}: {value:?} is not a valid UUID")]
    InvalidId { field: &'static str, value: String },

    #[error("invalid {field}: {value:?} is not a valid month (expected MM-YYYY or YYYY-MM)")]
    InvalidMonth { field: &'static str, value: String },

    #[error("invalid request body: {0}")]
    MalformedBody(String),
}

/// A subscription for the same user and service already exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a subscription to {service_name:?} already exists for user {user_id}")]
pub struct ConflictError {
    pub user_id: String,
    pub service_name: String,
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} not found", self.entity.to_lowercase(), self.id)
    }
}

impl std::error::Error for NotFoundError {}
