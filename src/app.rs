//! Everything the presentation layer can ask of the core, in one place.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::gateway::{Gateway, GatewayError, OpHandle};
use crate::io::data_io::{DataError, MockData};
use crate::model::config::AppConfig;
use crate::model::filter::FilterPatch;
use crate::model::project::{Project, ProjectDraft};
use crate::model::task::{Task, TaskDraft, TaskStatus};
use crate::ops::transition::{self, DropEvent, DropLocation, DropOutcome, IgnoreReason, TransitionError};
use crate::ops::views::{self, Board, DashboardStats, ViewCache};
use crate::store::{Action, AppState, Store, StoreEvent};

pub struct App {
    store: Arc<Store>,
    gateway: Gateway,
    views: Mutex<ViewCache>,
}

impl App {
    pub fn new(data: MockData, latency: Duration) -> Self {
        let store = Arc::new(Store::new());
        App {
            gateway: Gateway::new(Arc::clone(&store), data, latency),
            store,
            views: Mutex::new(ViewCache::new()),
        }
    }

    /// Build from the config file in `home`, loading any data overrides.
    pub fn from_config(config: &AppConfig, home: &Path) -> Result<Self, DataError> {
        let data = MockData::load(&config.data, home)?;
        Ok(Self::new(data, Duration::from_millis(config.gateway.latency_ms)))
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    /// Initial load: projects and all tasks, fetched concurrently.
    pub async fn bootstrap(&self) -> Result<(), GatewayError> {
        let (projects, tasks) = tokio::join!(self.fetch_projects(), self.fetch_tasks());
        projects?;
        tasks?;
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Gateway intents
    // ---------------------------------------------------------------------------

    pub fn fetch_projects(&self) -> OpHandle<Vec<Project>> {
        self.gateway.fetch_projects()
    }

    pub fn fetch_tasks(&self) -> OpHandle<Vec<Task>> {
        self.gateway.fetch_tasks()
    }

    pub fn fetch_tasks_by_project(&self, project_id: &str) -> OpHandle<Vec<Task>> {
        self.gateway.fetch_tasks_by_project(project_id)
    }

    pub fn add_project(&self, draft: ProjectDraft) -> OpHandle<Project> {
        self.gateway.add_project(draft)
    }

    pub fn update_project(&self, project: Project) -> OpHandle<Project> {
        self.gateway.update_project(project)
    }

    pub fn delete_project(&self, id: &str) -> OpHandle<String> {
        self.gateway.delete_project(id)
    }

    pub fn add_task(&self, draft: TaskDraft) -> OpHandle<Task> {
        self.gateway.add_task(draft)
    }

    pub fn update_task(&self, task: Task) -> OpHandle<Task> {
        self.gateway.update_task(task)
    }

    pub fn delete_task(&self, id: &str) -> OpHandle<String> {
        self.gateway.delete_task(id)
    }

    // ---------------------------------------------------------------------------
    // Synchronous intents
    // ---------------------------------------------------------------------------

    /// Move a task on the board as if its card had been dragged to the top
    /// of the `status` column.
    pub fn move_task(&self, task_id: &str, status: TaskStatus) -> Result<DropOutcome, TransitionError> {
        let state = self.store.snapshot();
        let Some(task) = state.tasks.scoped(task_id) else {
            return Ok(DropOutcome::Ignored(IgnoreReason::NotInScope));
        };
        if task.status == status {
            return Ok(DropOutcome::Ignored(IgnoreReason::SameColumn));
        }
        let index = views::tasks_by_status(state.tasks.project_tasks(), task.status)
            .iter()
            .position(|t| t.id == task_id)
            .unwrap_or(0);
        self.handle_drop(DropEvent {
            draggable_id: task_id.to_string(),
            source: DropLocation::new(task.status, index),
            destination: Some(DropLocation::new(status, 0)),
        })
    }

    pub fn handle_drop(&self, event: DropEvent) -> Result<DropOutcome, TransitionError> {
        transition::handle_drop(&self.store, event)
    }

    pub fn select_project(&self, id: Option<&str>) -> bool {
        self.store
            .dispatch(Action::SelectProject(id.map(str::to_string)))
            .changed
    }

    pub fn select_task(&self, id: Option<&str>) -> bool {
        self.store
            .dispatch(Action::SelectTask(id.map(str::to_string)))
            .changed
    }

    pub fn set_filter_criteria(&self, patch: FilterPatch) -> bool {
        self.store.dispatch(Action::SetFilterCriteria(patch)).changed
    }

    pub fn clear_filters(&self) -> bool {
        self.store.dispatch(Action::ClearFilters).changed
    }

    // ---------------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------------

    pub fn filtered_projects(&self) -> Arc<Vec<Project>> {
        let state = self.store.snapshot();
        self.cache().filtered_projects(&state)
    }

    pub fn board(&self) -> Arc<Board> {
        let state = self.store.snapshot();
        self.cache().board(&state)
    }

    pub fn stats(&self) -> DashboardStats {
        views::dashboard_stats(&self.store.snapshot())
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, ViewCache> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
