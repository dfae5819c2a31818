use serde::Serialize;

use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::model::user::{Language, Theme, User};
use crate::ops::views::{Board, DashboardStats};
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

const NAME_MAX: usize = 40;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ShowJson<'a> {
    pub project: &'a Project,
    pub board: &'a Board,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveJson {
    pub task_id: String,
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedJson<'a> {
    pub deleted: &'a str,
}

#[derive(Serialize)]
pub struct SessionJson<'a> {
    pub user: Option<&'a User>,
    pub theme: Theme,
    pub language: Language,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per project with aligned columns
pub fn format_project_table(projects: &[Project]) -> Vec<String> {
    let id_w = projects
        .iter()
        .map(|p| display_width(&p.id))
        .max()
        .unwrap_or(0);
    let name_w = projects
        .iter()
        .map(|p| display_width(&p.name).min(NAME_MAX))
        .max()
        .unwrap_or(0);
    projects
        .iter()
        .map(|p| {
            let line = format!(
                "{}  {}  {:<9}  {:<6}  {}",
                pad_to_width(&p.id, id_w),
                pad_to_width(&p.name, name_w),
                p.status.as_str(),
                p.priority.as_str(),
                format_date_range(p),
            );
            line.trim_end().to_string()
        })
        .collect()
}

fn format_date_range(p: &Project) -> String {
    match (p.start_date, p.end_date) {
        (None, None) => String::new(),
        (start, end) => format!(
            "{} .. {}",
            start.map(|d| d.to_string()).unwrap_or_default(),
            end.map(|d| d.to_string()).unwrap_or_default()
        )
        .trim()
        .to_string(),
    }
}

pub fn format_project_detail(p: &Project) -> Vec<String> {
    let mut lines = vec![format!("{} {}", p.id, p.name)];
    lines.push(format!("status: {}", p.status));
    lines.push(format!("priority: {}", p.priority));
    if let Some(d) = p.start_date {
        lines.push(format!("start: {}", d));
    }
    if let Some(d) = p.end_date {
        lines.push(format!("end: {}", d));
    }
    if !p.description.is_empty() {
        lines.push(String::new());
        lines.extend(p.description.lines().map(|l| format!("  {}", l)));
    }
    lines
}

pub fn format_task_line(task: &Task) -> String {
    let mut line = format!(
        "{} {} ({})",
        task.id,
        truncate_to_width(&task.title, NAME_MAX),
        task.priority
    );
    if let Some(who) = &task.assignee {
        line.push_str(&format!(" @{}", who));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due));
    }
    line
}

pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format!("[{}] {}", task.status, format_task_line(task))];
    lines.push(format!("project: {}", task.project_id));
    if !task.description.is_empty() {
        lines.extend(task.description.lines().map(|l| format!("  {}", l)));
    }
    lines
}

pub fn format_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for status in TaskStatus::ALL {
        let column = board.column(status);
        lines.push(format!("== {} ({}) ==", status, column.len()));
        lines.extend(column.iter().map(|t| format!("  {}", format_task_line(t))));
    }
    lines.push(format!("progress: {}%", board.progress));
    lines
}

pub fn format_stats(stats: &DashboardStats) -> Vec<String> {
    let rows = [
        ("Total projects", stats.total_projects),
        ("Active projects", stats.active_projects),
        ("Completed projects", stats.completed_projects),
        ("Total tasks", stats.total_tasks),
        ("Completed tasks", stats.completed_tasks),
        ("Orphaned tasks", stats.orphaned_tasks),
    ];
    let label_w = rows.iter().map(|(l, _)| display_width(l)).max().unwrap_or(0);
    rows.iter()
        .map(|(label, n)| format!("{}  {:>4}", pad_to_width(label, label_w), n))
        .collect()
}

pub fn format_session(user: Option<&User>, theme: Theme, language: Language) -> Vec<String> {
    let who = match user {
        Some(u) => format!("{} ({}, {})", u.name, u.username, u.role),
        None => "not signed in".to_string(),
    };
    vec![who, format!("theme: {}", theme), format!("language: {}", language)]
}
