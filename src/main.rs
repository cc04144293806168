mod api;
mod cli;
mod error;
mod models;
mod shell;
mod store;
mod ui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

use api::{HttpTodoApi, TodoApi, DEFAULT_BASE_URL};
use models::{StatusFilter, StatusLabel, Task, TaskId};
use shell::Shell;
use ui::run_tui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var_os("TASKLIST_LOG_FILE").map(PathBuf::from));
    init_logging(log_file, interactive)?;

    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("TASKLIST_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let api = HttpTodoApi::new(base_url);
    log::debug!("using todo API at {}", api.base_url());

    let rt = tokio::runtime::Runtime::new()?;
    let mut shell = Shell::new(api);

    match cli.command {
        Some(Commands::List { filter }) => {
            rt.block_on(shell.list(filter))?;
            print_tasks(shell.store().tasks());
        }
        Some(Commands::Add {
            name,
            description,
            due_date,
        }) => {
            shell.begin_create();
            let draft = shell.store_mut().draft_mut();
            draft.name = name;
            draft.description = description;
            draft.due_date = due_date;
            rt.block_on(shell.submit())?;
            println!("Task created.");
        }
        Some(Commands::Edit {
            id,
            name,
            description,
            due_date,
        }) => {
            let task = rt.block_on(find_task(&mut shell, &id))?;
            shell.begin_edit(&task);
            let draft = shell.store_mut().draft_mut();
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(due_date) = due_date {
                draft.due_date = due_date;
            }
            rt.block_on(shell.submit())?;
            println!("Task {id} updated.");
        }
        Some(Commands::Status { id, label }) => {
            let task = rt.block_on(find_task(&mut shell, &id))?;
            rt.block_on(shell.toggle_status(&task, label))?;
            println!("Task {id} marked {label}.");
        }
        Some(Commands::Delete { id }) => {
            let task = rt.block_on(find_task(&mut shell, &id))?;
            rt.block_on(shell.delete(&task))?;
            println!("Task {id} deleted.");
        }
        Some(Commands::Completions { shell: target }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(target, &mut cmd, "tasklist", &mut std::io::stdout());
        }
        Some(Commands::Tui) | None => {
            run_tui(&rt, shell)?;
        }
    }

    Ok(())
}

/// Route `log` records through a tracing subscriber. The TUI owns the
/// terminal, so without a log file it logs nothing.
fn init_logging(log_file: Option<PathBuf>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

async fn find_task<A: TodoApi>(shell: &mut Shell<A>, id: &str) -> Result<Task> {
    shell.list(StatusFilter::All).await?;
    find_by_id(shell.store().tasks(), id)
        .cloned()
        .with_context(|| format!("No task with id {id}"))
}

/// Match the id exactly as typed; `007` and `7` are different ids.
fn find_by_id<'t>(tasks: &'t [Task], id: &str) -> Option<&'t Task> {
    tasks.iter().find(|task| match &task.id {
        TaskId::Text(text) => text == id,
        TaskId::Number(n) => n.to_string() == id,
    })
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        println!(
            "- [{}] [{}] {} | {} (due {})",
            task.id,
            StatusLabel::from_status(task.status),
            task.name,
            task.description,
            task.due_date
        );
    }
}
