//! Permission error types.

use super::models::Permission;
use thiserror::Error;

/// Authorization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The caller's capability set does not include the grant
    #[error("Permission denied: {0} required")]
    Missing(Permission),

    /// Role name could not be resolved
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for permission checks
pub type PermissionResult<T> = Result<T, PermissionError>;
