//! End-to-end behavior of the store, gateway and views working together,
//! on virtual time.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use taskdeck::app::App;
use taskdeck::gateway::{GatewayError, OpStatus};
use taskdeck::io::data_io::MockData;
use taskdeck::model::{FilterPatch, Priority, ProjectDraft, ProjectStatus, TaskDraft, TaskStatus};
use taskdeck::ops::transition::{DropEvent, DropLocation, DropOutcome, IgnoreReason};
use taskdeck::ops::views::{filtered_projects, orphaned_tasks};
use taskdeck::store::OpKind;

const LATENCY: Duration = Duration::from_millis(500);

async fn booted() -> App {
    let app = App::new(MockData::bundled().unwrap(), LATENCY);
    app.bootstrap().await.unwrap();
    app
}

#[tokio::test(start_paused = true)]
async fn test_clear_filters_restores_full_list() {
    let app = booted().await;
    app.set_filter_criteria(
        FilterPatch::default()
            .status(Some(ProjectStatus::Planned))
            .priority(Some(Priority::Low)),
    );
    assert_eq!(app.filtered_projects().len(), 1);

    app.clear_filters();
    let state = app.snapshot();
    let all: Vec<_> = state.projects.all().cloned().collect();
    assert_eq!(*app.filtered_projects(), all);
}

#[tokio::test(start_paused = true)]
async fn test_created_project_shows_in_default_view() {
    let app = booted().await;
    let draft = ProjectDraft {
        name: "X".into(),
        description: "d".into(),
        status: ProjectStatus::Active,
        priority: Priority::Low,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 2, 1),
    };
    let created = app.add_project(draft).await.unwrap();
    assert!(!created.id.is_empty());

    let state = app.snapshot();
    let view = filtered_projects(state.projects.all(), &Default::default());
    assert!(view.iter().any(|p| p.id == created.id && p.name == "X"));
}

#[tokio::test(start_paused = true)]
async fn test_delete_project_clears_selection_and_orphans_tasks() {
    let app = booted().await;
    app.select_project(Some("1"));
    app.delete_project("1").await.unwrap();

    let state = app.snapshot();
    assert!(state.projects.get("1").is_none());
    assert!(state.projects.selected().is_none());
    assert!(app.filtered_projects().iter().all(|p| p.id != "1"));
    assert_eq!(orphaned_tasks(&state).len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_delete_task_removes_from_all_views() {
    let app = booted().await;
    app.fetch_tasks_by_project("1").await.unwrap();
    app.select_task(Some("2"));
    app.delete_task("2").await.unwrap();

    let state = app.snapshot();
    assert!(state.tasks.get("2").is_none());
    assert!(state.tasks.project_tasks().iter().all(|t| t.id != "2"));
    assert!(state.tasks.selected().is_none());
    assert_eq!(app.board().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_added_task_appears_on_board_in_scope() {
    let app = booted().await;
    app.fetch_tasks_by_project("3").await.unwrap();
    let task = app.add_task(TaskDraft::new("3", "Load test")).await.unwrap();
    let board = app.board();
    assert_eq!(board.column(TaskStatus::Todo).last(), Some(&task));
    assert_eq!(app.snapshot().tasks.len(), 13);
}

#[tokio::test(start_paused = true)]
async fn test_opening_project_keeps_earlier_changes() {
    let app = booted().await;
    let created = app.add_task(TaskDraft::new("1", "new work")).await.unwrap();
    let mut edited = app.snapshot().tasks.get("5").cloned().unwrap();
    edited.title = "edited".into();
    app.update_task(edited.clone()).await.unwrap();
    assert_eq!(app.stats().total_tasks, 13);

    app.fetch_tasks_by_project("1").await.unwrap();
    app.fetch_tasks_by_project(&edited.project_id).await.unwrap();

    let state = app.snapshot();
    assert_eq!(state.tasks.get(&created.id), Some(&created));
    assert_eq!(state.tasks.get("5"), Some(&edited));
    assert_eq!(app.stats().total_tasks, 13);
    assert!(state.tasks.project_tasks().iter().any(|t| t.id == "5"));
}

#[tokio::test(start_paused = true)]
async fn test_drop_updates_status_everywhere() {
    let app = booted().await;
    app.fetch_tasks_by_project("1").await.unwrap();
    let before = app.snapshot();

    let outcome = app
        .handle_drop(DropEvent {
            draggable_id: "3".into(),
            source: DropLocation::new(TaskStatus::Todo, 0),
            destination: Some(DropLocation::new(TaskStatus::Done, 1)),
        })
        .unwrap();
    assert_eq!(
        outcome,
        DropOutcome::Moved {
            task_id: "3".into(),
            from: TaskStatus::Todo,
            to: TaskStatus::Done
        }
    );

    let after = app.snapshot();
    for task in before.tasks.all() {
        let now = after.tasks.get(&task.id).unwrap();
        if task.id == "3" {
            assert_eq!(now.status, TaskStatus::Done);
            let mut expected = task.clone();
            expected.status = TaskStatus::Done;
            assert_eq!(now, &expected);
        } else {
            assert_eq!(now, task);
        }
    }
    assert_eq!(after.tasks.scoped("3").map(|t| t.status), Some(TaskStatus::Done));
}

#[tokio::test(start_paused = true)]
async fn test_noop_drop_leaves_state_untouched() {
    let app = booted().await;
    app.fetch_tasks_by_project("1").await.unwrap();
    let before = app.snapshot();
    let outcome = app
        .handle_drop(DropEvent {
            draggable_id: "3".into(),
            source: DropLocation::new(TaskStatus::Todo, 0),
            destination: Some(DropLocation::new(TaskStatus::Todo, 0)),
        })
        .unwrap();
    assert_eq!(outcome, DropOutcome::Ignored(IgnoreReason::SamePosition));
    assert!(Arc::ptr_eq(&before, &app.snapshot()));
    assert_eq!(*before, *app.snapshot());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_updates_last_resolved_wins() {
    let app = booted().await;
    let base = app.snapshot().tasks.get("5").cloned().unwrap();

    let mut first = base.clone();
    first.title = "first".into();
    first.priority = Priority::Low;
    let mut second = base.clone();
    second.title = "second".into();
    second.assignee = None;

    let slow = app
        .gateway()
        .with_latency(Duration::from_millis(800))
        .update_task(first.clone());
    let fast = app
        .gateway()
        .with_latency(Duration::from_millis(200))
        .update_task(second);

    fast.await.unwrap();
    assert_eq!(app.snapshot().tasks.get("5").unwrap().title, "second");
    slow.await.unwrap();
    assert_eq!(app.snapshot().tasks.get("5"), Some(&first));
}

#[tokio::test(start_paused = true)]
async fn test_failed_mutation_leaves_collection_and_records_error() {
    let app = booted().await;
    let before = app.snapshot();
    app.gateway()
        .fail_next(OpKind::DeleteProject, "permission denied");

    let op = app.delete_project("2");
    assert!(app.snapshot().projects.request().loading);
    let err = op.await.unwrap_err();
    assert!(matches!(err, GatewayError::MutationFailure { .. }));

    let after = app.snapshot();
    assert!(!after.projects.request().loading);
    assert_eq!(
        after.projects.request().error.as_deref(),
        Some("Failed to delete project: permission denied")
    );
    assert_eq!(
        after.projects.all().collect::<Vec<_>>(),
        before.projects.all().collect::<Vec<_>>()
    );
}

#[tokio::test(start_paused = true)]
async fn test_op_status_and_subscribers() {
    let app = booted().await;
    let mut events = app.subscribe();
    let op = app.fetch_tasks_by_project("2");
    assert_eq!(op.status(), OpStatus::Pending);
    assert_eq!(events.recv().await.unwrap().label, "tasks/fetchTasksByProject/pending");

    tokio::time::sleep(LATENCY * 2).await;
    assert_eq!(op.status(), OpStatus::Fulfilled);
    let settled = events.recv().await.unwrap();
    assert_eq!(settled.label, "tasks/fetchTasksByProject/fulfilled");
    assert_eq!(settled.state.tasks.scope(), Some("2"));
}
