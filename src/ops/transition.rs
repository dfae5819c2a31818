use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::task::TaskStatus;
use crate::store::{Action, Store};

/// One end of a drag: the column (a status name) and the position in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(status: TaskStatus, index: usize) -> Self {
        DropLocation {
            droppable_id: status.as_str().to_string(),
            index,
        }
    }
}

/// A completed drag gesture on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub draggable_id: String,
    pub source: DropLocation,
    /// None when the card was dropped outside any column
    pub destination: Option<DropLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoDestination,
    SamePosition,
    SameColumn,
    NotInScope,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IgnoreReason::NoDestination => "dropped outside the board",
            IgnoreReason::SamePosition => "dropped where it started",
            IgnoreReason::SameColumn => "already in that column",
            IgnoreReason::NotInScope => "task is not on the board",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("unknown board column: {0:?}")]
    UnknownColumn(String),
}

fn column(location: &DropLocation) -> Result<TaskStatus, TransitionError> {
    location
        .droppable_id
        .parse()
        .map_err(|_| TransitionError::UnknownColumn(location.droppable_id.clone()))
}

/// Turn a drop into a status change on the project in view.
///
/// Every status may move to every other. Only the status field changes;
/// the task keeps its place in the collection and its column follows from
/// the new status. Ignored drops leave the store untouched.
pub fn handle_drop(store: &Store, event: DropEvent) -> Result<DropOutcome, TransitionError> {
    let Some(destination) = &event.destination else {
        return Ok(DropOutcome::Ignored(IgnoreReason::NoDestination));
    };
    let source_status = column(&event.source)?;
    let to = column(destination)?;
    if source_status == to && event.source.index == destination.index {
        return Ok(DropOutcome::Ignored(IgnoreReason::SamePosition));
    }

    let state = store.snapshot();
    let Some(task) = state.tasks.scoped(&event.draggable_id) else {
        tracing::debug!(task = %event.draggable_id, "drop on task outside the board");
        return Ok(DropOutcome::Ignored(IgnoreReason::NotInScope));
    };
    let from = task.status;
    if from == to {
        return Ok(DropOutcome::Ignored(IgnoreReason::SameColumn));
    }

    store.dispatch(Action::MoveTask {
        task_id: event.draggable_id.clone(),
        status: to,
    });
    tracing::info!(task = %event.draggable_id, %from, %to, "task moved");
    Ok(DropOutcome::Moved {
        task_id: event.draggable_id,
        from,
        to,
    })
}
