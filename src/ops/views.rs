use std::sync::Arc;

use serde::Serialize;

use crate::model::filter::FilterCriteria;
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};
use crate::store::AppState;

// ---------------------------------------------------------------------------
// Pure derivations
// ---------------------------------------------------------------------------

/// Projects matching every active criterion, in input order
pub fn filtered_projects<'a, I>(projects: I, criteria: &FilterCriteria) -> Vec<&'a Project>
where
    I: IntoIterator<Item = &'a Project>,
{
    projects.into_iter().filter(|p| criteria.matches(p)).collect()
}

/// Tasks with the given status, in input order
pub fn tasks_by_status<'a, I>(tasks: I, status: TaskStatus) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| t.status == status).collect()
}

/// Share of done tasks as a whole percentage; 0 for no tasks.
pub fn progress_percent<'a, I>(tasks: I) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    let (total, done) = tasks.into_iter().fold((0usize, 0usize), |(total, done), t| {
        (total + 1, done + usize::from(t.status == TaskStatus::Done))
    });
    if total == 0 {
        return 0;
    }
    // round half up on non-negative integers
    ((200 * done + total) / (2 * total)) as u8
}

/// Tasks whose project is not in the store
pub fn orphaned_tasks(state: &AppState) -> Vec<&Task> {
    state
        .tasks
        .all()
        .filter(|t| !state.projects.contains(&t.project_id))
        .collect()
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub orphaned_tasks: usize,
}

pub fn dashboard_stats(state: &AppState) -> DashboardStats {
    let count_projects =
        |status: ProjectStatus| state.projects.all().filter(|p| p.status == status).count();
    DashboardStats {
        total_projects: state.projects.len(),
        active_projects: count_projects(ProjectStatus::Active),
        completed_projects: count_projects(ProjectStatus::Completed),
        total_tasks: state.tasks.len(),
        completed_tasks: tasks_by_status(state.tasks.all(), TaskStatus::Done).len(),
        orphaned_tasks: orphaned_tasks(state).len(),
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Kanban columns for the project in view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    pub project_id: Option<String>,
    pub todo: Vec<Task>,
    pub doing: Vec<Task>,
    pub done: Vec<Task>,
    pub progress: u8,
}

impl Board {
    pub fn build(state: &AppState) -> Self {
        let tasks = state.tasks.project_tasks();
        let column = |status| -> Vec<Task> {
            tasks_by_status(tasks.iter().copied(), status)
                .into_iter()
                .cloned()
                .collect()
        };
        Board {
            project_id: state.tasks.scope().map(str::to_string),
            todo: column(TaskStatus::Todo),
            doing: column(TaskStatus::Doing),
            done: column(TaskStatus::Done),
            progress: progress_percent(tasks.iter().copied()),
        }
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::Doing => &self.doing,
            TaskStatus::Done => &self.done,
        }
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.doing.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Memoization
// ---------------------------------------------------------------------------

/// Remembers the last derived views and hands back the same `Arc` while
/// their inputs are unchanged.
#[derive(Debug, Default)]
pub struct ViewCache {
    filtered: Option<((u64, FilterCriteria), Arc<Vec<Project>>)>,
    board: Option<((u64, Option<String>), Arc<Board>)>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filtered_projects(&mut self, state: &AppState) -> Arc<Vec<Project>> {
        let key = (state.projects.revision(), state.projects.criteria().clone());
        if let Some((cached_key, view)) = &self.filtered
            && *cached_key == key
        {
            return Arc::clone(view);
        }
        tracing::trace!(revision = key.0, "recomputing filtered projects");
        let view: Arc<Vec<Project>> = Arc::new(
            filtered_projects(state.projects.all(), &key.1)
                .into_iter()
                .cloned()
                .collect(),
        );
        self.filtered = Some((key, Arc::clone(&view)));
        view
    }

    pub fn board(&mut self, state: &AppState) -> Arc<Board> {
        let key = (
            state.tasks.revision(),
            state.tasks.scope().map(str::to_string),
        );
        if let Some((cached_key, board)) = &self.board
            && *cached_key == key
        {
            return Arc::clone(board);
        }
        tracing::trace!(revision = key.0, "recomputing board");
        let board = Arc::new(Board::build(state));
        self.board = Some((key, Arc::clone(&board)));
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::FilterPatch;
    use crate::model::priority::Priority;
    use crate::model::project::ProjectDraft;
    use crate::model::task::TaskDraft;
    use crate::store::{reduce, Action};
    use pretty_assertions::assert_eq;

    fn project(id: &str, name: &str, status: ProjectStatus, priority: Priority) -> Project {
        let mut draft = ProjectDraft::new(name);
        draft.status = status;
        draft.priority = priority;
        draft.into_project(id.to_string())
    }

    fn task(id: &str, project_id: &str, status: TaskStatus) -> Task {
        let mut draft = TaskDraft::new(project_id, format!("task {id}"));
        draft.status = status;
        draft.into_task(id.to_string())
    }

    fn state_with(projects: Vec<Project>, tasks: Vec<Task>) -> AppState {
        let mut state = AppState::default();
        reduce(&mut state, Action::SetProjects(projects));
        reduce(&mut state, Action::SetTasks(tasks));
        state
    }

    // ---------------------------------------------------------------------------
    // filtered_projects
    // ---------------------------------------------------------------------------

    fn sample_projects() -> Vec<Project> {
        let mut p = vec![
            project("1", "Website Redesign", ProjectStatus::Active, Priority::High),
            project("2", "Mobile App", ProjectStatus::Planned, Priority::High),
            project("3", "Portal", ProjectStatus::Active, Priority::Medium),
        ];
        p[2].description = "customer-facing WEBSITE".into();
        p
    }

    #[test]
    fn test_default_criteria_keeps_everything_in_order() {
        let projects = sample_projects();
        let ids: Vec<_> = filtered_projects(&projects, &FilterCriteria::default())
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filter_combines_predicates() {
        let projects = sample_projects();
        let mut criteria = FilterCriteria::default();
        criteria.apply(FilterPatch::default().status(Some(ProjectStatus::Active)));
        let ids: Vec<_> = filtered_projects(&projects, &criteria)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        criteria.apply(FilterPatch::default().priority(Some(Priority::High)));
        let ids: Vec<_> = filtered_projects(&projects, &criteria)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let projects = sample_projects();
        let mut criteria = FilterCriteria::default();
        criteria.apply(FilterPatch::default().search("website"));
        let ids: Vec<_> = filtered_projects(&projects, &criteria)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_filtered_is_subsequence_satisfying_criteria() {
        let projects = sample_projects();
        for status in [None, Some(ProjectStatus::Active), Some(ProjectStatus::Completed)] {
            for priority in [None, Some(Priority::High), Some(Priority::Low)] {
                let mut criteria = FilterCriteria::default();
                criteria.apply(FilterPatch::default().status(status).priority(priority));
                let out = filtered_projects(&projects, &criteria);
                let mut positions = out
                    .iter()
                    .map(|p| projects.iter().position(|q| q.id == p.id).unwrap());
                let mut last = None;
                for pos in positions.by_ref() {
                    assert!(last.is_none_or(|l| l < pos));
                    last = Some(pos);
                }
                assert!(out.iter().all(|p| criteria.matches(p)));
            }
        }
    }

    // ---------------------------------------------------------------------------
    // tasks_by_status / progress
    // ---------------------------------------------------------------------------

    #[test]
    fn test_tasks_by_status_preserves_order() {
        let tasks = vec![
            task("a", "1", TaskStatus::Done),
            task("b", "1", TaskStatus::Todo),
            task("c", "1", TaskStatus::Done),
        ];
        let ids: Vec<_> = tasks_by_status(&tasks, TaskStatus::Done)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(tasks_by_status(&tasks, TaskStatus::Doing).is_empty());
    }

    #[test]
    fn test_progress_percent() {
        let empty: Vec<Task> = Vec::new();
        assert_eq!(progress_percent(&empty), 0);

        let all_done = vec![task("a", "1", TaskStatus::Done), task("b", "1", TaskStatus::Done)];
        assert_eq!(progress_percent(&all_done), 100);

        let third = vec![
            task("a", "1", TaskStatus::Done),
            task("b", "1", TaskStatus::Todo),
            task("c", "1", TaskStatus::Doing),
        ];
        assert_eq!(progress_percent(&third), 33);

        let two_thirds = vec![
            task("a", "1", TaskStatus::Done),
            task("b", "1", TaskStatus::Done),
            task("c", "1", TaskStatus::Doing),
        ];
        assert_eq!(progress_percent(&two_thirds), 67);
    }

    #[test]
    fn test_progress_rounds_half_up() {
        let tasks: Vec<Task> = (0..8)
            .map(|i| {
                let status = if i < 1 { TaskStatus::Done } else { TaskStatus::Todo };
                task(&i.to_string(), "1", status)
            })
            .collect();
        // 12.5% -> 13
        assert_eq!(progress_percent(&tasks), 13);
    }

    // ---------------------------------------------------------------------------
    // stats / orphans
    // ---------------------------------------------------------------------------

    #[test]
    fn test_dashboard_stats() {
        let state = state_with(
            sample_projects(),
            vec![
                task("a", "1", TaskStatus::Done),
                task("b", "2", TaskStatus::Todo),
                task("c", "gone", TaskStatus::Done),
            ],
        );
        assert_eq!(
            dashboard_stats(&state),
            DashboardStats {
                total_projects: 3,
                active_projects: 2,
                completed_projects: 0,
                total_tasks: 3,
                completed_tasks: 2,
                orphaned_tasks: 1,
            }
        );
    }

    #[test]
    fn test_orphans_after_project_removal() {
        let mut state = state_with(
            sample_projects(),
            vec![task("a", "1", TaskStatus::Done), task("b", "2", TaskStatus::Todo)],
        );
        assert!(orphaned_tasks(&state).is_empty());
        reduce(&mut state, Action::RemoveProject("1".into()));
        let orphans: Vec<_> = orphaned_tasks(&state).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(orphans, vec!["a"]);
    }

    // ---------------------------------------------------------------------------
    // Board / cache
    // ---------------------------------------------------------------------------

    fn scoped_state() -> AppState {
        let mut state = state_with(sample_projects(), Vec::new());
        reduce(
            &mut state,
            Action::SetProjectTasks {
                project_id: "1".into(),
                tasks: vec![
                    task("a", "1", TaskStatus::Todo),
                    task("b", "1", TaskStatus::Done),
                    task("c", "1", TaskStatus::Todo),
                ],
            },
        );
        state
    }

    #[test]
    fn test_board_columns_follow_status() {
        let board = Board::build(&scoped_state());
        assert_eq!(board.project_id.as_deref(), Some("1"));
        let ids = |status| -> Vec<String> {
            board.column(status).iter().map(|t| t.id.clone()).collect()
        };
        assert_eq!(ids(TaskStatus::Todo), vec!["a", "c"]);
        assert!(ids(TaskStatus::Doing).is_empty());
        assert_eq!(ids(TaskStatus::Done), vec!["b"]);
        assert_eq!(board.len(), 3);
        assert_eq!(board.progress, 33);
    }

    #[test]
    fn test_board_without_scope_is_empty() {
        let state = state_with(sample_projects(), vec![task("a", "1", TaskStatus::Todo)]);
        let board = Board::build(&state);
        assert!(board.is_empty());
        assert_eq!(board.progress, 0);
    }

    #[test]
    fn test_cache_reuses_until_inputs_change() {
        let mut cache = ViewCache::new();
        let mut state = scoped_state();

        let first = cache.filtered_projects(&state);
        let again = cache.filtered_projects(&state);
        assert!(Arc::ptr_eq(&first, &again));

        reduce(
            &mut state,
            Action::SetFilterCriteria(FilterPatch::default().search("portal")),
        );
        let narrowed = cache.filtered_projects(&state);
        assert!(!Arc::ptr_eq(&first, &narrowed));
        assert_eq!(narrowed.len(), 1);

        let board = cache.board(&state);
        reduce(&mut state, Action::SelectTask(Some("a".into())));
        assert!(Arc::ptr_eq(&board, &cache.board(&state)));

        reduce(
            &mut state,
            Action::MoveTask {
                task_id: "a".into(),
                status: TaskStatus::Done,
            },
        );
        let moved = cache.board(&state);
        assert!(!Arc::ptr_eq(&board, &moved));
        assert_eq!(moved.progress, 67);
    }
}
