use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::model::filter::FilterCriteria;
use crate::model::project::Project;
use crate::model::task::Task;

/// In-flight/failed status of the last request against one collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Everything the store holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub projects: ProjectsState,
    pub tasks: TasksState,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectsState {
    pub(crate) items: IndexMap<String, Project>,
    pub(crate) selected: Option<String>,
    pub(crate) criteria: FilterCriteria,
    pub(crate) request: RequestState,
    pub(crate) revision: u64,
}

impl ProjectsState {
    /// Projects in collection order
    pub fn all(&self) -> impl Iterator<Item = &Project> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn selected(&self) -> Option<&Project> {
        self.selected.as_deref().and_then(|id| self.items.get(id))
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    /// Bumped on every change to the collection itself
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Tasks live in one authoritative collection. The per-project view is
/// derived from `by_project` on read, so there is no second copy to keep
/// in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksState {
    pub(crate) items: IndexMap<String, Task>,
    pub(crate) by_project: HashMap<String, IndexSet<String>>,
    pub(crate) scope: Option<String>,
    pub(crate) selected: Option<String>,
    pub(crate) request: RequestState,
    pub(crate) revision: u64,
}

impl TasksState {
    /// Every loaded task, in collection order
    pub fn all(&self) -> impl Iterator<Item = &Task> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.items.get(id)
    }

    /// Project currently being viewed, if a scoped fetch has completed
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Tasks belonging to `project_id`, in collection order
    pub fn for_project(&self, project_id: &str) -> Vec<&Task> {
        let Some(ids) = self.by_project.get(project_id) else {
            return Vec::new();
        };
        let mut found: Vec<(usize, &Task)> = ids
            .iter()
            .filter_map(|id| self.items.get_full(id.as_str()))
            .map(|(pos, _, task)| (pos, task))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, task)| task).collect()
    }

    /// The scoped collection: tasks of the project in view
    pub fn project_tasks(&self) -> Vec<&Task> {
        match &self.scope {
            Some(project_id) => self.for_project(project_id),
            None => Vec::new(),
        }
    }

    /// A task by id, only if it belongs to the project in view
    pub fn scoped(&self, id: &str) -> Option<&Task> {
        let scope = self.scope.as_deref()?;
        self.items.get(id).filter(|t| t.project_id == scope)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.items.get(id))
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- index maintenance (reducer only) ---

    pub(crate) fn index_insert(&mut self, task: &Task) {
        self.by_project
            .entry(task.project_id.clone())
            .or_default()
            .insert(task.id.clone());
    }

    pub(crate) fn index_remove(&mut self, project_id: &str, task_id: &str) {
        if let Some(ids) = self.by_project.get_mut(project_id) {
            ids.shift_remove(task_id);
            if ids.is_empty() {
                self.by_project.remove(project_id);
            }
        }
    }

    pub(crate) fn rebuild_index(&mut self) {
        let mut by_project: HashMap<String, IndexSet<String>> = HashMap::new();
        for task in self.items.values() {
            by_project
                .entry(task.project_id.clone())
                .or_default()
                .insert(task.id.clone());
        }
        self.by_project = by_project;
    }
}
