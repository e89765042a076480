use std::io;

use thiserror::Error;

use crate::config::KeySource;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("Jira issue key not found in {searched}")]
    IssueKeyNotFound { searched: KeySource },
    #[error("source control error: {0}")]
    SourceControl(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("workflow event error: {0}")]
    Event(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
