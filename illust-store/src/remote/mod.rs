//! The remote record service: a generic table store reached over HTTP.
//!
//! [`RecordService`] is the seam the store talks to. [`SupabaseClient`] is the
//! production implementation, and [`InMemoryRecordService`] backs dev mode and tests.

mod memory;
pub mod rows;
mod supabase;

pub use memory::InMemoryRecordService;
pub use rows::{NewProjectRow, ProjectRow};
pub use supabase::SupabaseClient;

use async_trait::async_trait;
use strum::Display;
use thiserror::Error;

use crate::domain::Status;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Expected exactly one row, got {0}")]
    UnexpectedRowCount(usize),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// The calls a [`RecordService`] supports, for logging and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RecordOperation {
    FetchAll,
    Insert,
    Update,
    UpdateStatus,
    Delete,
}

/// Operations against the `projects` table.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// All rows, newest created first.
    async fn fetch_all(&self) -> Result<Vec<ProjectRow>>;

    /// Inserts a row and returns it as stored, including the assigned id.
    async fn insert(&self, row: &NewProjectRow) -> Result<ProjectRow>;

    /// Replaces every persisted field of the row with the given id.
    async fn update(&self, id: &str, row: &NewProjectRow) -> Result<()>;

    /// Patches only the status of the row with the given id.
    async fn update_status(&self, id: &str, status: Status) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
