//! Error types for navigation, modal and preference operations.

use thiserror::Error;

/// Result type for velvet operations.
pub type VelvetResult<T> = Result<T, VelvetError>;

/// Errors raised while mutating the document.
///
/// These come from the platform side of a gated mutation and are never
/// swallowed by the transition gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// A required element is not present in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Cloning or inserting a template failed.
    #[error("Template mount failed: {0}")]
    Mount(String),

    /// Writing the location fragment failed.
    #[error("Location update failed: {0}")]
    Location(String),

    /// Any other DOM operation failed.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

/// Errors from a preference backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Storage is not available (disabled, private mode, quota).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write.
    #[error("Storage write failed: {0}")]
    Write(String),
}

/// Errors building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Path does not have the `/segment` form.
    #[error("Invalid route path: {0:?}")]
    InvalidPath(String),

    /// The fallback path has no template registered.
    #[error("Default path {0} has no template")]
    MissingDefault(String),
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum VelvetError {
    /// A document mutation failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Route table construction failed.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
