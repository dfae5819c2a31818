use std::fmt;

use crate::model::filter::FilterPatch;
use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};

/// Which collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Projects,
    Tasks,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Projects => "projects",
            EntityKind::Tasks => "tasks",
        }
    }
}

/// Asynchronous operations the gateway can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    FetchProjects,
    AddProject,
    UpdateProject,
    DeleteProject,
    FetchTasks,
    FetchTasksByProject,
    AddTask,
    UpdateTask,
    DeleteTask,
}

impl OpKind {
    pub fn entity(self) -> EntityKind {
        match self {
            OpKind::FetchProjects
            | OpKind::AddProject
            | OpKind::UpdateProject
            | OpKind::DeleteProject => EntityKind::Projects,
            OpKind::FetchTasks
            | OpKind::FetchTasksByProject
            | OpKind::AddTask
            | OpKind::UpdateTask
            | OpKind::DeleteTask => EntityKind::Tasks,
        }
    }

    pub fn is_fetch(self) -> bool {
        matches!(
            self,
            OpKind::FetchProjects | OpKind::FetchTasks | OpKind::FetchTasksByProject
        )
    }

    /// Operation name as `<slice>/<op>`
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::FetchProjects => "projects/fetchProjects",
            OpKind::AddProject => "projects/addProject",
            OpKind::UpdateProject => "projects/updateProject",
            OpKind::DeleteProject => "projects/deleteProject",
            OpKind::FetchTasks => "tasks/fetchTasks",
            OpKind::FetchTasksByProject => "tasks/fetchTasksByProject",
            OpKind::AddTask => "tasks/addTask",
            OpKind::UpdateTask => "tasks/updateTask",
            OpKind::DeleteTask => "tasks/deleteTask",
        }
    }

    /// Message recorded on the store when the operation is rejected
    pub fn failure_message(self) -> &'static str {
        match self {
            OpKind::FetchProjects => "Failed to fetch projects",
            OpKind::AddProject => "Failed to add project",
            OpKind::UpdateProject => "Failed to update project",
            OpKind::DeleteProject => "Failed to delete project",
            OpKind::FetchTasks => "Failed to fetch tasks",
            OpKind::FetchTasksByProject => "Failed to fetch tasks for project",
            OpKind::AddTask => "Failed to add task",
            OpKind::UpdateTask => "Failed to update task",
            OpKind::DeleteTask => "Failed to delete task",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every state transition the store accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // --- synchronous intents ---
    SelectProject(Option<String>),
    SetFilterCriteria(FilterPatch),
    ClearFilters,
    SelectTask(Option<String>),
    MoveTask { task_id: String, status: TaskStatus },

    // --- operation lifecycle ---
    Pending(OpKind),
    Rejected { kind: OpKind, message: String },

    // --- settled results ---
    SetProjects(Vec<Project>),
    InsertProject(Project),
    ReplaceProject(Project),
    RemoveProject(String),
    SetTasks(Vec<Task>),
    SetProjectTasks { project_id: String, tasks: Vec<Task> },
    InsertTask(Task),
    ReplaceTask(Task),
    RemoveTask(String),
}

impl Action {
    /// Event label, e.g. `tasks/updateTask/fulfilled`
    pub fn label(&self) -> String {
        let fulfilled = |kind: OpKind| format!("{}/fulfilled", kind);
        match self {
            Action::SelectProject(_) => "projects/selectProject".to_string(),
            Action::SetFilterCriteria(_) => "projects/setFilterCriteria".to_string(),
            Action::ClearFilters => "projects/clearFilters".to_string(),
            Action::SelectTask(_) => "tasks/selectTask".to_string(),
            Action::MoveTask { .. } => "tasks/moveTask".to_string(),
            Action::Pending(kind) => format!("{}/pending", kind),
            Action::Rejected { kind, .. } => format!("{}/rejected", kind),
            Action::SetProjects(_) => fulfilled(OpKind::FetchProjects),
            Action::InsertProject(_) => fulfilled(OpKind::AddProject),
            Action::ReplaceProject(_) => fulfilled(OpKind::UpdateProject),
            Action::RemoveProject(_) => fulfilled(OpKind::DeleteProject),
            Action::SetTasks(_) => fulfilled(OpKind::FetchTasks),
            Action::SetProjectTasks { .. } => fulfilled(OpKind::FetchTasksByProject),
            Action::InsertTask(_) => fulfilled(OpKind::AddTask),
            Action::ReplaceTask(_) => fulfilled(OpKind::UpdateTask),
            Action::RemoveTask(_) => fulfilled(OpKind::DeleteTask),
        }
    }

    /// The operation this action settles, if it is a fulfilled result
    pub fn settles(&self) -> Option<OpKind> {
        match self {
            Action::SetProjects(_) => Some(OpKind::FetchProjects),
            Action::InsertProject(_) => Some(OpKind::AddProject),
            Action::ReplaceProject(_) => Some(OpKind::UpdateProject),
            Action::RemoveProject(_) => Some(OpKind::DeleteProject),
            Action::SetTasks(_) => Some(OpKind::FetchTasks),
            Action::SetProjectTasks { .. } => Some(OpKind::FetchTasksByProject),
            Action::InsertTask(_) => Some(OpKind::AddTask),
            Action::ReplaceTask(_) => Some(OpKind::UpdateTask),
            Action::RemoveTask(_) => Some(OpKind::DeleteTask),
            _ => None,
        }
    }
}
