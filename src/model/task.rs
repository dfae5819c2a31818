use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::priority::Priority;
use super::{ParseEnumError, ValidationError};

/// Kanban column a task sits in. Every transition between states is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    /// Board column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ParseEnumError::new("task status", s, "todo, doing, done")),
        }
    }
}

/// A task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque id, immutable
    pub id: String,
    /// Owning project; not checked against the project collection
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Payload for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(project_id: impl Into<String>, title: impl Into<String>) -> Self {
        TaskDraft {
            project_id: project_id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::MissingField("projectId"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        Ok(())
    }

    /// Attach an id, producing the stored record
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee: normalize_assignee(self.assignee),
            due_date: self.due_date,
        }
    }
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        Ok(())
    }
}

/// Blank assignees mean "unassigned"
pub fn normalize_assignee(assignee: Option<String>) -> Option<String> {
    assignee.filter(|a| !a.trim().is_empty())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_assignee(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_task() {
        let json = r#"{
            "id": "t1",
            "projectId": "p1",
            "title": "Write copy",
            "description": "",
            "status": "doing",
            "priority": "low",
            "assignee": "Mia",
            "dueDate": "2024-05-10"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.project_id, "p1");
        assert_eq!(t.status, TaskStatus::Doing);
        assert_eq!(t.assignee.as_deref(), Some("Mia"));
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2024, 5, 10));
    }

    #[test]
    fn test_blank_assignee_is_none() {
        let json = r#"{"id":"t1","projectId":"p1","title":"x","assignee":"  ","dueDate":null}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.assignee, None);
        assert_eq!(t.status, TaskStatus::Todo);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let t = TaskDraft::new("p1", "x").into_task("t9".into());
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["projectId"], "p1");
        assert_eq!(v["status"], "todo");
        assert_eq!(v["priority"], "medium");
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(
            TaskDraft::new("p1", " ").validate(),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            TaskDraft::new("", "x").validate(),
            Err(ValidationError::MissingField("projectId"))
        );
        assert!(TaskDraft::new("p1", "x").validate().is_ok());
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("blocked".parse::<TaskStatus>().is_err());
    }
}
