//! GitHub Actions runner plumbing: the triggering event and step outputs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::domain::pull_request::{PullRequest, PullRequestRef};
use crate::error::{AppError, AppResult};
use crate::infra::github::GitHubPullRequest;

const PULL_REQUEST_EVENTS: [&str; 2] = ["pull_request", "pull_request_target"];

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<GitHubPullRequest>,
    #[serde(default)]
    pub repository: Option<EventRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub name: String,
    pub owner: EventOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventOwner {
    pub login: String,
}

/// The event that triggered the workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowEvent {
    pub name: String,
    pub payload: EventPayload,
}

impl WorkflowEvent {
    pub fn load<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = lookup("GITHUB_EVENT_NAME")
            .ok_or_else(|| AppError::Event("GITHUB_EVENT_NAME is not set".to_string()))?;
        let path = lookup("GITHUB_EVENT_PATH")
            .ok_or_else(|| AppError::Event("GITHUB_EVENT_PATH is not set".to_string()))?;

        debug!(event = %name, path = %path, "loading workflow event payload");
        let contents = fs::read_to_string(&path)?;
        let payload = serde_json::from_str(&contents)?;

        Ok(Self { name, payload })
    }

    pub fn is_pull_request(&self) -> bool {
        PULL_REQUEST_EVENTS.contains(&self.name.as_str())
    }

    /// Coordinates and snapshot of the pull request carried by the payload.
    pub fn pull_request(&self) -> AppResult<(PullRequestRef, PullRequest)> {
        let pull_request = self.payload.pull_request.clone().ok_or_else(|| {
            AppError::Event(format!("'{}' payload has no pull_request", self.name))
        })?;
        let repository = self.payload.repository.as_ref().ok_or_else(|| {
            AppError::Event(format!("'{}' payload has no repository", self.name))
        })?;

        let target = PullRequestRef {
            owner: repository.owner.login.clone(),
            repo: repository.name.clone(),
            number: pull_request.number,
        };
        Ok((target, pull_request.into()))
    }
}

/// Named step outputs consumed by later workflow steps.
pub struct StepOutputs {
    file: Option<PathBuf>,
}

impl StepOutputs {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            lookup("GITHUB_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        )
    }

    pub fn set(&self, name: &str, value: &str) -> AppResult<()> {
        debug!(name, value, "setting step output");
        match &self.file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{name}={value}")?;
            }
            None => println!("::set-output name={name}::{}", escape_data(value)),
        }
        Ok(())
    }
}

/// Prints an error annotation for the job summary.
pub fn error_annotation(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
