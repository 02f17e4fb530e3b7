//! Local durable storage: a key-value blob store holding the whole project
//! collection under a single key.

mod file;
mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use thiserror::Error;

use crate::domain::{month_for, Project};

/// Key of the blob holding the serialized project list.
pub const PROJECTS_KEY: &str = "illustdash_projects";

#[derive(Debug, Error)]
pub enum LocalStorageError {
    #[error("Cannot determine data directory")]
    NoDataDir,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait BlobStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>, LocalStorageError>;

    /// Replaces whatever is stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), LocalStorageError>;
}

/// Best-effort read of the saved collection. Missing, unreadable or corrupt
/// data yields an empty list.
pub fn load_projects(blobs: &dyn BlobStore) -> Vec<Project> {
    let raw = match blobs.read(PROJECTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read local projects: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Project>>(&raw) {
        Ok(mut projects) => {
            for project in projects.iter_mut().filter(|p| p.month.is_empty()) {
                project.month = month_for(project.delivery_date);
            }
            projects
        }
        Err(e) => {
            tracing::warn!("Local projects are corrupt, starting empty: {}", e);
            Vec::new()
        }
    }
}

pub fn save_projects(blobs: &dyn BlobStore, projects: &[Project]) -> Result<(), LocalStorageError> {
    let raw = serde_json::to_string(projects)?;
    blobs.write(PROJECTS_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Status};
    use time::macros::date;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            title: format!("Project {id}"),
            category: Category::Background,
            price: 12000.0,
            hours: 6.0,
            delivery_date: Some(date!(2024 - 03 - 10)),
            status: Status::InProgress,
            month: "2024-03".to_string(),
        }
    }

    #[test]
    fn missing_blob_loads_empty() {
        let blobs = MemoryBlobStore::new();
        assert!(load_projects(&blobs).is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let blobs = MemoryBlobStore::new();
        blobs.write(PROJECTS_KEY, "{not json").unwrap();
        assert!(load_projects(&blobs).is_empty());

        blobs.write(PROJECTS_KEY, r#"{"id": "not-a-list"}"#).unwrap();
        assert!(load_projects(&blobs).is_empty());
    }

    #[test]
    fn saved_projects_load_back_in_order() {
        let blobs = MemoryBlobStore::new();
        let projects = vec![project("b"), project("a")];
        save_projects(&blobs, &projects).unwrap();
        assert_eq!(load_projects(&blobs), projects);
    }

    #[test]
    fn fills_in_missing_month() {
        let blobs = MemoryBlobStore::new();
        blobs
            .write(
                PROJECTS_KEY,
                r#"[{"id":"x","title":"Old","category":"その他","price":100,"hours":1,"deliveryDate":"2023-07-01","status":"制作中"}]"#,
            )
            .unwrap();
        let projects = load_projects(&blobs);
        assert_eq!(projects[0].month, "2023-07");
    }
}
