use thiserror::Error;

use crate::remote::RemoteError;

/// Errors returned by [`crate::ProjectStore`] operations. Every write failure
/// has already been rolled back by the time the caller sees it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote write failed: {0}")]
    Remote(#[from] RemoteError),
    #[error("no projects to export")]
    NothingToExport,
    #[error("invalid remote configuration: {0}")]
    InvalidRemoteConfig(String),
}

/// A required field is missing or out of range. Raised before any store
/// operation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}
