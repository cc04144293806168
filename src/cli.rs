use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use crate::models::{StatusFilter, StatusLabel};

#[derive(Parser)]
#[command(author, version, about = "Terminal client for a remote todo list", long_about = None)]
pub struct Cli {
    /// Base URL of the todo API [env: TASKLIST_API_URL] [default: http://localhost:3333]
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
    /// Append logs to this file [env: TASKLIST_LOG_FILE]
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    List {
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
    },
    /// Create a task
    Add {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "DESCRIPTION")]
        description: String,
        #[arg(value_name = "DUE_DATE")]
        due_date: String,
    },
    /// Edit a task's name, description or due date
    Edit {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        due_date: Option<String>,
    },
    /// Set a task's status ("Completed" or "Not Completed")
    Status {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "LABEL")]
        label: StatusLabel,
    },
    /// Delete a task
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Launch TUI interface
    Tui,
    /// Print a shell completion script
    Completions {
        #[arg(value_name = "SHELL")]
        shell: CompletionShell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_status_label_with_space() {
        let cli = Cli::parse_from(["tasklist", "status", "42", "Not Completed"]);
        match cli.command {
            Some(Commands::Status { id, label }) => {
                assert_eq!(id, "42");
                assert_eq!(label, StatusLabel::NotCompleted);
            }
            _ => panic!("expected status command"),
        }
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::parse_from(["tasklist", "list", "--filter", "pending", "--base-url", "http://api"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://api"));
        assert!(matches!(
            cli.command,
            Some(Commands::List { filter: StatusFilter::Pending })
        ));
    }
}
