//! The project store: the in-memory collection, its persistence and the
//! optimistic write path.
//!
//! Every mutation is applied to the in-memory collection first and is visible
//! to readers right away. In remote mode the backend call follows. If it
//! fails, the change is rolled back through the [`Transaction`] captured
//! before it was applied.
//!
//! Rollback restores the captured snapshot when nothing else has touched the
//! collection since. Otherwise only the fields the failed change wrote are
//! reverted, and only where they still hold the written value, so a later
//! mutation that already landed is kept even on the same record.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{date, month_for, Project, ProjectInput, Status};
use crate::error::StoreError;
use crate::export::{self, CsvExport};
use crate::local::{self, BlobStore};
use crate::remote::rows::{project_from_row, row_from_input};
use crate::remote::{ProjectRow, RecordService, SupabaseClient};
use crate::settings::PersistenceMode;

/// Immutable view of the whole collection at one point in time.
pub type Snapshot = Arc<Vec<Project>>;

/// Shared handle to the project collection. Cloning is cheap and every clone
/// sees the same state.
#[derive(Clone)]
pub struct ProjectStore {
    inner: Arc<Inner>,
}

struct Inner {
    remote: Option<Arc<dyn RecordService>>,
    blobs: Arc<dyn BlobStore>,
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    projects: Snapshot,
    /// Bumped on every applied change.
    revision: u64,
    loaded: bool,
}

/// What an optimistic change needs in order to be undone.
struct Transaction {
    before: Snapshot,
    applied_at: u64,
    undo: Undo,
}

enum Undo {
    Remove { id: String },
    /// Put back `previous` wherever the record still holds `applied`.
    Revert { previous: Project, applied: Project },
    Reinsert { index: usize, project: Project },
    Nothing,
}

impl ProjectStore {
    /// Builds the store for a resolved mode. The mode stays fixed for the
    /// lifetime of the store.
    pub fn open(mode: PersistenceMode, blobs: Arc<dyn BlobStore>) -> Result<Self, StoreError> {
        match mode {
            PersistenceMode::Remote(config) => {
                let client = SupabaseClient::new(&config)
                    .map_err(|e| StoreError::InvalidRemoteConfig(e.to_string()))?;
                Ok(Self::remote(Arc::new(client), blobs))
            }
            PersistenceMode::Local => Ok(Self::local(blobs)),
        }
    }

    pub fn remote(service: Arc<dyn RecordService>, blobs: Arc<dyn BlobStore>) -> Self {
        Self::build(Some(service), blobs)
    }

    pub fn local(blobs: Arc<dyn BlobStore>) -> Self {
        Self::build(None, blobs)
    }

    fn build(remote: Option<Arc<dyn RecordService>>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                blobs,
                state: RwLock::new(StoreState::default()),
            }),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.inner.remote.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.read_state().loaded
    }

    /// The current collection, newest created first.
    pub fn projects(&self) -> Snapshot {
        Arc::clone(&self.read_state().projects)
    }

    pub fn get(&self, id: &str) -> Option<Project> {
        self.read_state()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Reads the initial collection. In remote mode a failed fetch falls back
    /// to the local copy. Never fails: unreadable data gives an empty list.
    pub async fn load(&self) {
        let projects = match &self.inner.remote {
            Some(remote) => match remote.fetch_all().await {
                Ok(rows) => rows.into_iter().map(project_from_row).collect(),
                Err(e) => {
                    warn!("Failed to fetch projects from remote, using local copy: {}", e);
                    local::load_projects(self.inner.blobs.as_ref())
                }
            },
            None => local::load_projects(self.inner.blobs.as_ref()),
        };

        let count = projects.len();
        {
            let mut state = self.write_state();
            state.projects = Arc::new(projects);
            state.revision += 1;
            state.loaded = true;
        }
        info!(count, remote = self.is_remote(), "Projects loaded");
    }

    /// Adds a project. It shows up at the front of the collection immediately
    /// under a temporary id, which is swapped for the backend id once the
    /// insert is confirmed.
    pub async fn create(&self, input: ProjectInput) -> Result<Project, StoreError> {
        let temp_id = temporary_id();
        let row = row_from_input(&input);
        let project = input.into_project(temp_id.clone());

        let txn = self.apply(|projects| {
            projects.insert(0, project.clone());
            Undo::Remove {
                id: temp_id.clone(),
            }
        });

        let Some(remote) = &self.inner.remote else {
            return Ok(project);
        };

        match remote.insert(&row).await {
            Ok(stored) => Ok(self.confirm_created(&temp_id, stored)),
            Err(e) => {
                warn!(title = %project.title, "Insert failed, removing project: {}", e);
                self.rollback(txn);
                Err(e.into())
            }
        }
    }

    /// Replaces every field of the project with the given id. Unknown ids
    /// leave the collection untouched.
    pub async fn edit(&self, id: &str, input: ProjectInput) -> Result<(), StoreError> {
        let row = row_from_input(&input);
        let updated = input.into_project(id.to_string());

        let txn = self.apply(|projects| match projects.iter_mut().find(|p| p.id == id) {
            Some(slot) => {
                let previous = std::mem::replace(slot, updated);
                Undo::Revert {
                    previous,
                    applied: slot.clone(),
                }
            }
            None => Undo::Nothing,
        });

        let Some(remote) = &self.inner.remote else {
            return Ok(());
        };

        if let Err(e) = remote.update(id, &row).await {
            warn!(id, "Update failed, rolling back: {}", e);
            self.rollback(txn);
            return Err(e.into());
        }
        debug!(id, "Update confirmed");
        Ok(())
    }

    /// Changes only the status. Failures roll back like any other write; the
    /// caller may choose not to report them.
    pub async fn update_status(&self, id: &str, status: Status) -> Result<(), StoreError> {
        let txn = self.apply(|projects| match projects.iter_mut().find(|p| p.id == id) {
            Some(slot) => {
                let previous = slot.clone();
                slot.status = status;
                Undo::Revert {
                    previous,
                    applied: slot.clone(),
                }
            }
            None => Undo::Nothing,
        });

        let Some(remote) = &self.inner.remote else {
            return Ok(());
        };

        if let Err(e) = remote.update_status(id, status).await {
            warn!(id, %status, "Status update failed, rolling back: {}", e);
            self.rollback(txn);
            return Err(e.into());
        }
        debug!(id, %status, "Status update confirmed");
        Ok(())
    }

    /// Hard delete. A failed remote delete puts the project back where it was.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let txn = self.apply(|projects| match projects.iter().position(|p| p.id == id) {
            Some(index) => Undo::Reinsert {
                index,
                project: projects.remove(index),
            },
            None => Undo::Nothing,
        });

        let Some(remote) = &self.inner.remote else {
            return Ok(());
        };

        if let Err(e) = remote.delete(id).await {
            warn!(id, "Delete failed, restoring project: {}", e);
            self.rollback(txn);
            return Err(e.into());
        }
        debug!(id, "Delete confirmed");
        Ok(())
    }

    /// CSV export of the current collection, in collection order.
    pub fn export_snapshot(&self) -> Result<CsvExport, StoreError> {
        let projects = self.projects();
        export::export_csv(&projects, date::today()).ok_or(StoreError::NothingToExport)
    }

    fn apply<F>(&self, change: F) -> Transaction
    where
        F: FnOnce(&mut Vec<Project>) -> Undo,
    {
        let mut state = self.write_state();
        let before = Arc::clone(&state.projects);
        let undo = change(Arc::make_mut(&mut state.projects));
        self.bump(&mut state);

        Transaction {
            before,
            applied_at: state.revision,
            undo,
        }
    }

    fn confirm_created(&self, temp_id: &str, stored: ProjectRow) -> Project {
        let mut state = self.write_state();
        let projects = Arc::make_mut(&mut state.projects);
        let confirmed = match projects.iter_mut().find(|p| p.id == temp_id) {
            Some(project) => {
                project.id = stored.id.clone();
                project.month = month_for(stored.delivery_date);
                project.clone()
            }
            // Removed locally while the insert was in flight.
            None => project_from_row(stored),
        };
        self.bump(&mut state);

        debug!(id = %confirmed.id, temp_id, "Insert confirmed");
        confirmed
    }

    fn rollback(&self, txn: Transaction) {
        let mut state = self.write_state();
        if state.revision == txn.applied_at {
            state.projects = txn.before;
        } else {
            let projects = Arc::make_mut(&mut state.projects);
            match txn.undo {
                Undo::Remove { id } => projects.retain(|p| p.id != id),
                Undo::Revert { previous, applied } => {
                    if let Some(slot) = projects.iter_mut().find(|p| p.id == previous.id) {
                        revert_fields(slot, &applied, previous);
                    }
                }
                Undo::Reinsert { index, project } => {
                    if !projects.iter().any(|p| p.id == project.id) {
                        let index = index.min(projects.len());
                        projects.insert(index, project);
                    }
                }
                Undo::Nothing => {}
            }
        }
        self.bump(&mut state);
    }

    /// Records a change and, in local mode once loading is done, writes the
    /// whole collection to the local blob.
    fn bump(&self, state: &mut StoreState) {
        state.revision += 1;
        if self.inner.remote.is_some() || !state.loaded {
            return;
        }
        if let Err(e) = local::save_projects(self.inner.blobs.as_ref(), &state.projects) {
            warn!("Failed to save projects locally: {}", e);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.state.read().expect("project store lock poisoned")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.state.write().expect("project store lock poisoned")
    }
}

fn revert_fields(current: &mut Project, applied: &Project, previous: Project) {
    if current.title == applied.title {
        current.title = previous.title;
    }
    if current.category == applied.category {
        current.category = previous.category;
    }
    if current.price == applied.price {
        current.price = previous.price;
    }
    if current.hours == applied.hours {
        current.hours = previous.hours;
    }
    // month follows the delivery date
    if current.delivery_date == applied.delivery_date {
        current.delivery_date = previous.delivery_date;
        current.month = previous.month;
    }
    if current.status == applied.status {
        current.status = previous.status;
    }
}

fn temporary_id() -> String {
    format!("tmp-{}", Uuid::new_v4().simple())
}
