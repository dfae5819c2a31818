use indexmap::IndexMap;

use crate::model::filter::FilterCriteria;
use crate::model::project::Project;
use crate::model::task::Task;

use super::action::{Action, EntityKind, OpKind};
use super::state::{AppState, RequestState, TasksState};

/// Apply one action to the state. Returns whether anything changed.
///
/// Settled results either apply in full or not at all; a rejection only
/// touches the request status of its collection.
pub fn reduce(state: &mut AppState, action: Action) -> bool {
    let settled = action.settles();
    let mut changed = match action {
        Action::SelectProject(id) => select_project(state, id),
        Action::SetFilterCriteria(patch) => {
            let mut next = state.projects.criteria.clone();
            next.apply(patch);
            replace_if_different(&mut state.projects.criteria, next)
        }
        Action::ClearFilters => {
            replace_if_different(&mut state.projects.criteria, FilterCriteria::default())
        }
        Action::SelectTask(id) => select_task(state, id),
        Action::MoveTask { task_id, status } => {
            if state.tasks.scoped(&task_id).is_none() {
                return false;
            }
            match state.tasks.items.get_mut(&task_id) {
                Some(task) if task.status != status => {
                    task.status = status;
                    state.tasks.revision += 1;
                    true
                }
                _ => false,
            }
        }
        Action::Pending(kind) => replace_if_different(
            request_mut(state, kind),
            RequestState {
                loading: true,
                error: None,
            },
        ),
        Action::Rejected { kind, message } => replace_if_different(
            request_mut(state, kind),
            RequestState {
                loading: false,
                error: Some(message),
            },
        ),
        Action::SetProjects(list) => set_projects(state, list),
        Action::InsertProject(project) => {
            let id = project.id.clone();
            let previous = state.projects.items.insert(id, project.clone());
            bump_if(&mut state.projects.revision, previous.as_ref() != Some(&project))
        }
        Action::ReplaceProject(project) => match state.projects.items.get_mut(&project.id) {
            Some(slot) if *slot != project => {
                *slot = project;
                state.projects.revision += 1;
                true
            }
            _ => false,
        },
        Action::RemoveProject(id) => {
            let removed = state.projects.items.shift_remove(&id).is_some();
            if state.projects.selected.as_deref() == Some(id.as_str()) {
                state.projects.selected = None;
            }
            bump_if(&mut state.projects.revision, removed)
        }
        Action::SetTasks(list) => set_tasks(&mut state.tasks, list),
        Action::SetProjectTasks { project_id, tasks } => {
            set_project_tasks(&mut state.tasks, project_id, tasks)
        }
        Action::InsertTask(task) => upsert_task(&mut state.tasks, task),
        Action::ReplaceTask(task) => {
            if state.tasks.items.contains_key(&task.id) {
                upsert_task(&mut state.tasks, task)
            } else {
                false
            }
        }
        Action::RemoveTask(id) => {
            let removed = remove_task(&mut state.tasks, &id);
            if state.tasks.selected.as_deref() == Some(id.as_str()) {
                state.tasks.selected = None;
            }
            removed
        }
    };

    if let Some(kind) = settled {
        changed |= replace_if_different(request_mut(state, kind), RequestState::default());
    }
    changed
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn replace_if_different<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}

fn bump_if(revision: &mut u64, changed: bool) -> bool {
    if changed {
        *revision += 1;
    }
    changed
}

fn request_mut(state: &mut AppState, kind: OpKind) -> &mut RequestState {
    match kind.entity() {
        EntityKind::Projects => &mut state.projects.request,
        EntityKind::Tasks => &mut state.tasks.request,
    }
}

fn select_project(state: &mut AppState, id: Option<String>) -> bool {
    if let Some(id) = &id
        && !state.projects.items.contains_key(id)
    {
        tracing::debug!(%id, "ignoring selection of unknown project");
        return false;
    }
    replace_if_different(&mut state.projects.selected, id)
}

fn select_task(state: &mut AppState, id: Option<String>) -> bool {
    if let Some(id) = &id
        && !state.tasks.items.contains_key(id)
    {
        tracing::debug!(%id, "ignoring selection of unknown task");
        return false;
    }
    replace_if_different(&mut state.tasks.selected, id)
}

fn set_projects(state: &mut AppState, list: Vec<Project>) -> bool {
    let mut items = IndexMap::with_capacity(list.len());
    for project in list {
        if let Some(dup) = items.insert(project.id.clone(), project) {
            tracing::warn!(id = %dup.id, "duplicate project id in fetch result; keeping the later one");
        }
    }
    if let Some(selected) = &state.projects.selected
        && !items.contains_key(selected)
    {
        state.projects.selected = None;
    }
    if state.projects.items == items {
        return false;
    }
    state.projects.items = items;
    state.projects.revision += 1;
    true
}

fn set_tasks(tasks: &mut TasksState, list: Vec<Task>) -> bool {
    let mut items = IndexMap::with_capacity(list.len());
    for task in list {
        if let Some(dup) = items.insert(task.id.clone(), task) {
            tracing::warn!(id = %dup.id, "duplicate task id in fetch result; keeping the later one");
        }
    }
    if let Some(selected) = &tasks.selected
        && !items.contains_key(selected)
    {
        tasks.selected = None;
    }
    if tasks.items == items {
        return false;
    }
    tasks.items = items;
    tasks.rebuild_index();
    tasks.revision += 1;
    true
}

/// A scoped fetch sets the project in view and fills in tasks the global
/// collection has not seen yet. Entries already present were loaded or
/// changed by earlier operations and are left alone.
fn set_project_tasks(tasks: &mut TasksState, project_id: String, list: Vec<Task>) -> bool {
    let mut changed = replace_if_different(&mut tasks.scope, Some(project_id.clone()));

    for task in list {
        if task.project_id != project_id {
            tracing::warn!(
                id = %task.id,
                expected = %project_id,
                actual = %task.project_id,
                "scoped fetch returned a task from another project"
            );
        }
        if tasks.items.contains_key(&task.id) {
            continue;
        }
        changed |= upsert_task(tasks, task);
    }
    changed
}

fn upsert_task(tasks: &mut TasksState, task: Task) -> bool {
    if let Some(existing) = tasks.items.get(&task.id) {
        if *existing == task {
            return false;
        }
        if existing.project_id != task.project_id {
            let old_project = existing.project_id.clone();
            tasks.index_remove(&old_project, &task.id);
        }
    }
    tasks.index_insert(&task);
    tasks.items.insert(task.id.clone(), task);
    tasks.revision += 1;
    true
}

fn remove_task(tasks: &mut TasksState, id: &str) -> bool {
    match tasks.items.shift_remove(id) {
        Some(task) => {
            tasks.index_remove(&task.project_id, id);
            tasks.revision += 1;
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
