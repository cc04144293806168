use thiserror::Error;

use crate::models::SubmitMode;

/// Failures surfaced by the application shell.
///
/// The `Display` text of each variant is the message shown to the user in the
/// error line, so it stays short and static. The transport error (if any) is
/// kept as the source for logs and the CLI.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Please fill in all fields.")]
    Validation,
    #[error("{}", .mode.failure_message())]
    Submit {
        mode: SubmitMode,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to load tasks.")]
    Refresh(#[source] anyhow::Error),
    #[error("Failed to update the task status.")]
    StatusUpdate(#[source] anyhow::Error),
    #[error("Failed to delete the task.")]
    Delete(#[source] anyhow::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid due date `{0}`, expected YYYY-MM-DD or an ISO-8601 date-time")]
    DueDate(String),
    #[error("invalid status `{0}`, expected \"Completed\" or \"Not Completed\"")]
    StatusLabel(String),
}
