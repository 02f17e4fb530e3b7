use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use time::Duration;

use super::rows::{NewProjectRow, ProjectRow};
use super::{RecordOperation, RecordService, RemoteError, Result};
use crate::domain::{date, Category, Status};

/// Record service kept in memory. Used by dev mode and as the injected fake
/// in tests, where individual operations can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordService {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Oldest first; reads reverse it.
    rows: Vec<ProjectRow>,
    last_id: u64,
    fail_next: Vec<RecordOperation>,
    fail_always: HashSet<RecordOperation>,
    calls: Vec<RecordOperation>,
}

impl MemoryState {
    fn insert(&mut self, row: &NewProjectRow) -> ProjectRow {
        self.last_id += 1;
        let stored = ProjectRow {
            id: self.last_id.to_string(),
            title: row.title.clone(),
            category: row.category,
            price: row.price,
            hours: row.hours,
            delivery_date: row.delivery_date,
            status: row.status,
            created_at: Some(format!("seq-{:08}", self.last_id)),
        };
        self.rows.push(stored.clone());
        stored
    }
}

impl InMemoryRecordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the table, oldest row first.
    pub fn with_rows(rows: Vec<NewProjectRow>) -> Self {
        let service = Self::new();
        {
            let mut state = service.lock();
            for row in &rows {
                state.insert(row);
            }
        }
        service
    }

    /// A handful of demo projects spread over the last few months.
    pub fn seeded() -> Self {
        let today = date::today();
        let row = |title: &str, category, price, hours, days_ago: i64, status| NewProjectRow {
            title: title.to_string(),
            category,
            price,
            hours,
            delivery_date: Some(today - Duration::days(days_ago)),
            status,
        };

        Self::with_rows(vec![
            row("VTuber model sheet", Category::CharacterDesign, 60000.0, 25.0, 95, Status::Delivered),
            row("Game NPC portraits", Category::StandingIllustration, 36000.0, 14.5, 62, Status::Delivered),
            row("Cafe interior", Category::Background, 28000.0, 12.0, 33, Status::Delivered),
            row("Channel logo", Category::LogoIcon, 15000.0, 6.0, 12, Status::AwaitingCheck),
            row("Live2D rigging", Category::Live2d, 80000.0, 40.0, -10, Status::InProgress),
        ])
    }

    /// Fails the next call of `operation` once.
    pub fn fail_next(&self, operation: RecordOperation) {
        self.lock().fail_next.push(operation);
    }

    /// Fails every call of `operation` until [`Self::recover`] is called.
    pub fn fail_always(&self, operation: RecordOperation) {
        self.lock().fail_always.insert(operation);
    }

    pub fn recover(&self) {
        let mut state = self.lock();
        state.fail_next.clear();
        state.fail_always.clear();
    }

    /// Current rows, newest first.
    pub fn rows(&self) -> Vec<ProjectRow> {
        let state = self.state.read().expect("record store lock poisoned");
        state.rows.iter().rev().cloned().collect()
    }

    /// Every call received so far, in order, including failed ones.
    pub fn calls(&self) -> Vec<RecordOperation> {
        self.state
            .read()
            .expect("record store lock poisoned")
            .calls
            .clone()
    }

    fn lock(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().expect("record store lock poisoned")
    }

    fn begin(&self, operation: RecordOperation) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(operation);

        let scheduled = state.fail_next.iter().position(|op| *op == operation);
        if let Some(index) = scheduled {
            state.fail_next.remove(index);
            return Err(RemoteError::Transport(format!("simulated {operation} failure")));
        }
        if state.fail_always.contains(&operation) {
            return Err(RemoteError::Transport(format!("simulated {operation} failure")));
        }
        Ok(state)
    }
}

#[async_trait]
impl RecordService for InMemoryRecordService {
    async fn fetch_all(&self) -> Result<Vec<ProjectRow>> {
        let state = self.begin(RecordOperation::FetchAll)?;
        Ok(state.rows.iter().rev().cloned().collect())
    }

    async fn insert(&self, row: &NewProjectRow) -> Result<ProjectRow> {
        let mut state = self.begin(RecordOperation::Insert)?;
        Ok(state.insert(row))
    }

    async fn update(&self, id: &str, row: &NewProjectRow) -> Result<()> {
        let mut state = self.begin(RecordOperation::Update)?;
        if let Some(stored) = state.rows.iter_mut().find(|r| r.id == id) {
            stored.title = row.title.clone();
            stored.category = row.category;
            stored.price = row.price;
            stored.hours = row.hours;
            stored.delivery_date = row.delivery_date;
            stored.status = row.status;
        }
        Ok(())
    }

    async fn update_status(&self, id: &str, status: Status) -> Result<()> {
        let mut state = self.begin(RecordOperation::UpdateStatus)?;
        if let Some(stored) = state.rows.iter_mut().find(|r| r.id == id) {
            stored.status = status;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.begin(RecordOperation::Delete)?;
        state.rows.retain(|r| r.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_row(title: &str) -> NewProjectRow {
        NewProjectRow {
            title: title.to_string(),
            category: Category::Other,
            price: 1000.0,
            hours: 1.0,
            delivery_date: None,
            status: Status::InProgress,
        }
    }

    #[tokio::test]
    async fn assigns_ids_and_lists_newest_first() {
        let service = InMemoryRecordService::new();
        let first = service.insert(&new_row("first")).await.unwrap();
        let second = service.insert(&new_row("second")).await.unwrap();
        assert_ne!(first.id, second.id);

        let titles: Vec<_> = service
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn fail_next_fails_exactly_once() {
        let service = InMemoryRecordService::new();
        service.fail_next(RecordOperation::Insert);

        assert!(service.insert(&new_row("a")).await.is_err());
        assert!(service.insert(&new_row("a")).await.is_ok());
        assert_eq!(service.rows().len(), 1);
        assert_eq!(
            service.calls(),
            vec![RecordOperation::Insert, RecordOperation::Insert]
        );
    }

    #[tokio::test]
    async fn fail_always_until_recovered() {
        let service = InMemoryRecordService::with_rows(vec![new_row("a")]);
        service.fail_always(RecordOperation::Delete);

        assert!(service.delete("1").await.is_err());
        assert!(service.delete("1").await.is_err());
        service.recover();
        service.delete("1").await.unwrap();
        assert!(service.rows().is_empty());
    }

    #[test]
    fn seeded_has_demo_rows() {
        assert_eq!(InMemoryRecordService::seeded().rows().len(), 5);
    }
}
