//! Asynchronous stand-in for a remote API.
//!
//! Each operation marks its collection as loading, waits out a simulated
//! round-trip, then applies exactly one settle action to the [`Store`].
//! Operations are independent: two in-flight updates to the same entity
//! are applied in the order their latencies elapse, last one wins.

pub mod handle;
pub mod ids;

pub use handle::{OpHandle, OpStatus};
pub use ids::IdGenerator;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::Instrument;

use crate::io::data_io::MockData;
use crate::model::project::{Project, ProjectDraft};
use crate::model::task::{Task, TaskDraft};
use crate::store::{Action, OpKind, Store};

/// Default simulated round-trip
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Why an operation was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{message}")]
    FetchFailure { kind: OpKind, message: String },
    #[error("{message}")]
    MutationFailure { kind: OpKind, message: String },
    #[error("{} (operation aborted)", .0.failure_message())]
    Aborted(OpKind),
}

impl GatewayError {
    fn new(kind: OpKind, detail: Option<String>) -> Self {
        let message = match detail.filter(|d| !d.is_empty()) {
            Some(detail) => format!("{}: {}", kind.failure_message(), detail),
            None => kind.failure_message().to_string(),
        };
        if kind.is_fetch() {
            GatewayError::FetchFailure { kind, message }
        } else {
            GatewayError::MutationFailure { kind, message }
        }
    }

    pub fn kind(&self) -> OpKind {
        match self {
            GatewayError::FetchFailure { kind, .. }
            | GatewayError::MutationFailure { kind, .. }
            | GatewayError::Aborted(kind) => *kind,
        }
    }
}

/// Issues operations against a shared [`Store`]. Cheap to clone; clones
/// share the store, the mock data, the id sequence and the fault table.
///
/// Every operation spawns onto the current tokio runtime, so calls must
/// happen inside one.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<Store>,
    data: Arc<MockData>,
    latency: Duration,
    ids: Arc<IdGenerator>,
    faults: Arc<Mutex<HashMap<OpKind, String>>>,
    op_seq: Arc<AtomicU64>,
}

impl Gateway {
    pub fn new(store: Arc<Store>, data: MockData, latency: Duration) -> Self {
        Gateway {
            store,
            data: Arc::new(data),
            latency,
            ids: Arc::new(IdGenerator::new()),
            faults: Arc::new(Mutex::new(HashMap::new())),
            op_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Same gateway, different simulated latency
    pub fn with_latency(&self, latency: Duration) -> Self {
        Gateway {
            latency,
            ..self.clone()
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Make the next operation of `kind` fail with the given detail.
    pub fn fail_next(&self, kind: OpKind, detail: impl Into<String>) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, detail.into());
    }

    // ---------------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------------

    pub fn fetch_projects(&self) -> OpHandle<Vec<Project>> {
        let data = Arc::clone(&self.data);
        self.launch(
            OpKind::FetchProjects,
            move || Ok(data.projects.clone()),
            Action::SetProjects,
        )
    }

    pub fn add_project(&self, draft: ProjectDraft) -> OpHandle<Project> {
        let ids = Arc::clone(&self.ids);
        self.launch(
            OpKind::AddProject,
            move || {
                draft.validate().map_err(|e| e.to_string())?;
                if let (Some(start), Some(end)) = (draft.start_date, draft.end_date)
                    && end < start
                {
                    tracing::debug!(%start, %end, "project ends before it starts");
                }
                Ok(draft.into_project(ids.next_id()))
            },
            Action::InsertProject,
        )
    }

    pub fn update_project(&self, project: Project) -> OpHandle<Project> {
        self.launch(
            OpKind::UpdateProject,
            move || {
                project.validate().map_err(|e| e.to_string())?;
                Ok(project)
            },
            Action::ReplaceProject,
        )
    }

    /// Deletes only the project; its tasks are left in place.
    pub fn delete_project(&self, id: impl Into<String>) -> OpHandle<String> {
        let id = id.into();
        self.launch(OpKind::DeleteProject, move || Ok(id), Action::RemoveProject)
    }

    // ---------------------------------------------------------------------------
    // Tasks
    // ---------------------------------------------------------------------------

    pub fn fetch_tasks(&self) -> OpHandle<Vec<Task>> {
        let data = Arc::clone(&self.data);
        self.launch(
            OpKind::FetchTasks,
            move || Ok(data.tasks.clone()),
            Action::SetTasks,
        )
    }

    /// Fetch one project's tasks and make it the project in view.
    pub fn fetch_tasks_by_project(&self, project_id: impl Into<String>) -> OpHandle<Vec<Task>> {
        let data = Arc::clone(&self.data);
        let project_id = project_id.into();
        let scope = project_id.clone();
        self.launch(
            OpKind::FetchTasksByProject,
            move || {
                Ok(data
                    .tasks
                    .iter()
                    .filter(|t| t.project_id == project_id)
                    .cloned()
                    .collect())
            },
            move |tasks| Action::SetProjectTasks {
                project_id: scope,
                tasks,
            },
        )
    }

    pub fn add_task(&self, draft: TaskDraft) -> OpHandle<Task> {
        let ids = Arc::clone(&self.ids);
        self.launch(
            OpKind::AddTask,
            move || {
                draft.validate().map_err(|e| e.to_string())?;
                Ok(draft.into_task(ids.next_id()))
            },
            Action::InsertTask,
        )
    }

    pub fn update_task(&self, task: Task) -> OpHandle<Task> {
        self.launch(
            OpKind::UpdateTask,
            move || {
                task.validate().map_err(|e| e.to_string())?;
                Ok(task)
            },
            Action::ReplaceTask,
        )
    }

    pub fn delete_task(&self, id: impl Into<String>) -> OpHandle<String> {
        let id = id.into();
        self.launch(OpKind::DeleteTask, move || Ok(id), Action::RemoveTask)
    }

    // ---------------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------------

    fn launch<T, R, S>(&self, kind: OpKind, resolve: R, settle: S) -> OpHandle<T>
    where
        T: Clone + Send + 'static,
        R: FnOnce() -> Result<T, String> + Send + 'static,
        S: FnOnce(T) -> Action + Send + 'static,
    {
        let id = self.op_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let fault = self
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
        let store = Arc::clone(&self.store);
        let latency = self.latency;
        let (status_tx, status_rx) = watch::channel(OpStatus::Pending);
        let span = tracing::info_span!("op", kind = %kind, op = id);

        tracing::debug!(parent: &span, latency_ms = latency.as_millis() as u64, "issued");
        store.dispatch(Action::Pending(kind));

        let join = tokio::spawn(
            async move {
                tokio::time::sleep(latency).await;
                let outcome = match fault {
                    Some(detail) => Err(detail),
                    None => resolve(),
                };
                match outcome {
                    Ok(value) => {
                        store.dispatch(settle(value.clone()));
                        let _ = status_tx.send(OpStatus::Fulfilled);
                        tracing::info!("fulfilled");
                        Ok(value)
                    }
                    Err(detail) => {
                        let err = GatewayError::new(kind, Some(detail));
                        store.dispatch(Action::Rejected {
                            kind,
                            message: err.to_string(),
                        });
                        let _ = status_tx.send(OpStatus::Rejected(err.to_string()));
                        tracing::warn!(error = %err, "rejected");
                        Err(err)
                    }
                }
            }
            .instrument(span),
        );

        OpHandle::new(id, kind, status_rx, join)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
