//! Project bookkeeping for freelance illustrators: the project collection,
//! its persistence (a hosted table store or a local blob) and the derived
//! dashboards built from it.

pub mod domain;
mod error;
pub mod export;
pub mod local;
pub mod remote;
pub mod settings;
mod store;
pub mod views;

pub use domain::{Category, Project, ProjectInput, Status};
pub use error::{StoreError, ValidationError};
pub use export::CsvExport;
pub use settings::{PersistenceMode, Settings};
pub use store::{ProjectStore, Snapshot};
