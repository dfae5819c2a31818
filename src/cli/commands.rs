use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - projects and their boards"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding taskdeck.toml and state.json
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Override the simulated round-trip of every operation
    #[arg(long, global = true, value_name = "MS")]
    pub latency_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects, optionally filtered
    Projects(ProjectsArgs),
    /// Show a project with its board
    Show(ShowArgs),
    /// Show dashboard statistics
    Stats,
    /// Create, edit or delete a project
    #[command(subcommand)]
    Project(ProjectCmd),
    /// Create, edit or delete a task
    #[command(subcommand)]
    Task(TaskCmd),
    /// Move a task to another board column
    Mv(MvArgs),
    /// Sign in (any non-empty credentials)
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or change UI preferences
    Settings(SettingsArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsArgs {
    /// Filter by status (planned, active, completed, all)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (low, medium, high, all)
    #[arg(long)]
    pub priority: Option<String>,
    /// Case-insensitive text in name or description
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project ID to show
    pub id: String,
}

// ---------------------------------------------------------------------------
// Project args
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ProjectCmd {
    /// Create a project
    Add(ProjectAddArgs),
    /// Change fields of a project
    Edit(ProjectEditArgs),
    /// Delete a project (its tasks are kept)
    Rm(RmArgs),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// planned, active or completed (default: active)
    #[arg(long)]
    pub status: Option<String>,
    /// low, medium or high (default: medium)
    #[arg(long)]
    pub priority: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ProjectEditArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Args)]
pub struct RmArgs {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum TaskCmd {
    /// Create a task in a project
    Add(TaskAddArgs),
    /// Change fields of a task
    Edit(TaskEditArgs),
    /// Delete a task
    Rm(RmArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Project the task belongs to
    pub project_id: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// todo, doing or done (default: todo)
    #[arg(long)]
    pub status: Option<String>,
    /// low, medium or high (default: medium)
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub assignee: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args)]
pub struct TaskEditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// New assignee; an empty string unassigns
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID to move
    pub id: String,
    /// Target column (todo, doing, done)
    pub status: String,
}

// ---------------------------------------------------------------------------
// Session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    pub username: String,
    pub password: String,
}

#[derive(Args)]
pub struct SettingsArgs {
    /// light or dark
    #[arg(long)]
    pub theme: Option<String>,
    /// en or ru
    #[arg(long)]
    pub language: Option<String>,
}
