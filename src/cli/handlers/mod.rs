mod session;

use std::error::Error;
use std::path::PathBuf;

use crate::app::App;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::model::config::AppConfig;
use crate::model::filter::{parse_filter_value, FilterPatch};
use crate::model::project::{Project, ProjectDraft};
use crate::model::task::{normalize_assignee, Task, TaskDraft, TaskStatus};
use crate::ops::transition::DropOutcome;

type CmdResult = Result<(), Box<dyn Error>>;

/// Everything a command needs besides its own args
pub(crate) struct Context {
    pub home: PathBuf,
    pub config: AppConfig,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn dispatch(cli: Cli) -> CmdResult {
    let home = config_io::resolve_home(cli.home.as_deref());
    let mut config = config_io::read_config(&home)?;
    if let Some(ms) = cli.latency_ms {
        config.gateway.latency_ms = ms;
        config.gateway.auth_latency_ms = ms;
    }
    tracing::debug!(home = %home.display(), "resolved home");
    let ctx = Context {
        home,
        config,
        json: cli.json,
    };

    // Session commands never touch the entity store
    let command = match cli.command {
        Commands::Login(args) => return session::cmd_login(&ctx, args).await,
        Commands::Logout => return session::cmd_logout(&ctx),
        Commands::Whoami => return session::cmd_whoami(&ctx),
        Commands::Settings(args) => return session::cmd_settings(&ctx, args),
        other => other,
    };

    let app = App::from_config(&ctx.config, &ctx.home)?;
    app.bootstrap().await?;

    match command {
        Commands::Projects(args) => cmd_projects(&app, &ctx, args),
        Commands::Show(args) => cmd_show(&app, &ctx, args).await,
        Commands::Stats => cmd_stats(&app, &ctx),
        Commands::Project(ProjectCmd::Add(args)) => cmd_project_add(&app, &ctx, args).await,
        Commands::Project(ProjectCmd::Edit(args)) => cmd_project_edit(&app, &ctx, args).await,
        Commands::Project(ProjectCmd::Rm(args)) => cmd_project_rm(&app, &ctx, args).await,
        Commands::Task(TaskCmd::Add(args)) => cmd_task_add(&app, &ctx, args).await,
        Commands::Task(TaskCmd::Edit(args)) => cmd_task_edit(&app, &ctx, args).await,
        Commands::Task(TaskCmd::Rm(args)) => cmd_task_rm(&app, &ctx, args).await,
        Commands::Mv(args) => cmd_mv(&app, &ctx, args).await,
        Commands::Login(_) | Commands::Logout | Commands::Whoami | Commands::Settings(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn find_project(app: &App, id: &str) -> Result<Project, Box<dyn Error>> {
    app.snapshot()
        .projects
        .get(id)
        .cloned()
        .ok_or_else(|| format!("project not found: {}", id).into())
}

fn find_task(app: &App, id: &str) -> Result<Task, Box<dyn Error>> {
    app.snapshot()
        .tasks
        .get(id)
        .cloned()
        .ok_or_else(|| format!("task not found: {}", id).into())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_projects(app: &App, ctx: &Context, args: ProjectsArgs) -> CmdResult {
    let mut patch = FilterPatch::default();
    if let Some(s) = &args.status {
        patch = patch.status(parse_filter_value(s)?);
    }
    if let Some(p) = &args.priority {
        patch = patch.priority(parse_filter_value(p)?);
    }
    if let Some(q) = args.search {
        patch = patch.search(q);
    }
    app.set_filter_criteria(patch);

    let projects = app.filtered_projects();
    if ctx.json {
        return print_json(projects.as_slice());
    }
    if projects.is_empty() {
        println!("no matching projects");
    } else {
        print_lines(format_project_table(&projects));
    }
    Ok(())
}

async fn cmd_show(app: &App, ctx: &Context, args: ShowArgs) -> CmdResult {
    let project = find_project(app, &args.id)?;
    app.fetch_tasks_by_project(&project.id).await?;
    let board = app.board();
    if ctx.json {
        return print_json(&ShowJson {
            project: &project,
            board: &board,
        });
    }
    print_lines(format_project_detail(&project));
    println!();
    print_lines(format_board(&board));
    Ok(())
}

fn cmd_stats(app: &App, ctx: &Context) -> CmdResult {
    let stats = app.stats();
    if ctx.json {
        return print_json(&stats);
    }
    print_lines(format_stats(&stats));
    Ok(())
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

async fn cmd_project_add(app: &App, ctx: &Context, args: ProjectAddArgs) -> CmdResult {
    let mut draft = ProjectDraft::new(args.name);
    if let Some(d) = args.description {
        draft.description = d;
    }
    if let Some(s) = &args.status {
        draft.status = s.parse()?;
    }
    if let Some(p) = &args.priority {
        draft.priority = p.parse()?;
    }
    draft.start_date = args.start;
    draft.end_date = args.end;

    let project = app.add_project(draft).await?;
    print_project(ctx, &project)
}

async fn cmd_project_edit(app: &App, ctx: &Context, args: ProjectEditArgs) -> CmdResult {
    let mut project = find_project(app, &args.id)?;
    if let Some(n) = args.name {
        project.name = n;
    }
    if let Some(d) = args.description {
        project.description = d;
    }
    if let Some(s) = &args.status {
        project.status = s.parse()?;
    }
    if let Some(p) = &args.priority {
        project.priority = p.parse()?;
    }
    if args.start.is_some() {
        project.start_date = args.start;
    }
    if args.end.is_some() {
        project.end_date = args.end;
    }

    let project = app.update_project(project).await?;
    print_project(ctx, &project)
}

async fn cmd_project_rm(app: &App, ctx: &Context, args: RmArgs) -> CmdResult {
    let project = find_project(app, &args.id)?;
    let id = app.delete_project(&project.id).await?;
    if ctx.json {
        return print_json(&DeletedJson { deleted: &id });
    }
    println!("deleted project {} {}", id, project.name);
    let orphans = app.stats().orphaned_tasks;
    if orphans > 0 {
        println!("{} task(s) no longer belong to any project", orphans);
    }
    Ok(())
}

fn print_project(ctx: &Context, project: &Project) -> CmdResult {
    if ctx.json {
        return print_json(project);
    }
    print_lines(format_project_detail(project));
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

async fn cmd_task_add(app: &App, ctx: &Context, args: TaskAddArgs) -> CmdResult {
    let project = find_project(app, &args.project_id)?;
    let mut draft = TaskDraft::new(project.id, args.title);
    if let Some(d) = args.description {
        draft.description = d;
    }
    if let Some(s) = &args.status {
        draft.status = s.parse()?;
    }
    if let Some(p) = &args.priority {
        draft.priority = p.parse()?;
    }
    draft.assignee = normalize_assignee(args.assignee);
    draft.due_date = args.due;

    let task = app.add_task(draft).await?;
    print_task(ctx, &task)
}

async fn cmd_task_edit(app: &App, ctx: &Context, args: TaskEditArgs) -> CmdResult {
    let mut task = find_task(app, &args.id)?;
    if let Some(t) = args.title {
        task.title = t;
    }
    if let Some(d) = args.description {
        task.description = d;
    }
    if let Some(s) = &args.status {
        task.status = s.parse()?;
    }
    if let Some(p) = &args.priority {
        task.priority = p.parse()?;
    }
    if args.assignee.is_some() {
        task.assignee = normalize_assignee(args.assignee);
    }
    if args.due.is_some() {
        task.due_date = args.due;
    }

    let task = app.update_task(task).await?;
    print_task(ctx, &task)
}

async fn cmd_task_rm(app: &App, ctx: &Context, args: RmArgs) -> CmdResult {
    let task = find_task(app, &args.id)?;
    let id = app.delete_task(&task.id).await?;
    if ctx.json {
        return print_json(&DeletedJson { deleted: &id });
    }
    println!("deleted task {} {}", id, task.title);
    Ok(())
}

fn print_task(ctx: &Context, task: &Task) -> CmdResult {
    if ctx.json {
        return print_json(task);
    }
    print_lines(format_task_detail(task));
    Ok(())
}

async fn cmd_mv(app: &App, ctx: &Context, args: MvArgs) -> CmdResult {
    let to: TaskStatus = args.status.parse()?;
    let task = find_task(app, &args.id)?;
    app.fetch_tasks_by_project(&task.project_id).await?;

    let outcome = app.move_task(&task.id, to)?;
    if ctx.json {
        let out = match outcome {
            DropOutcome::Moved { task_id, from, to } => MoveJson {
                task_id,
                moved: true,
                from: Some(from),
                to: Some(to),
                reason: None,
            },
            DropOutcome::Ignored(reason) => MoveJson {
                task_id: task.id,
                moved: false,
                from: None,
                to: None,
                reason: Some(reason.to_string()),
            },
        };
        return print_json(&out);
    }
    match outcome {
        DropOutcome::Moved { task_id, from, to } => {
            println!("{}: {} -> {}", task_id, from, to);
            print_lines(format_board(&app.board()));
        }
        DropOutcome::Ignored(reason) => println!("{}: not moved ({})", task.id, reason),
    }
    Ok(())
}
