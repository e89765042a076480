//! In-memory service fakes shared by workflow and command tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::issue_key::IssueKey;
use crate::domain::pull_request::{PullRequest, PullRequestRef};
use crate::domain::ticket::{IssueType, ProjectRef, TicketDetails};
use crate::error::{AppError, AppResult};
use crate::infra::actions::{EventOwner, EventPayload, EventRepository, WorkflowEvent};
use crate::infra::github::{GitHubPullRequest, GitHubRef};
use crate::services::{IssueTrackerService, PullRequestService};

pub struct FakeJira {
    pub requested: Mutex<Vec<String>>,
    pub missing: bool,
}

#[async_trait]
impl IssueTrackerService for FakeJira {
    async fn ticket_details(&self, key: &IssueKey) -> AppResult<TicketDetails> {
        self.requested.lock().unwrap().push(key.to_string());
        if self.missing {
            return Err(AppError::IssueTracker(
                "Jira responded with 404 Not Found: {\"errorMessages\": []}".to_string(),
            ));
        }
        Ok(TicketDetails {
            key: key.clone(),
            summary: "Fix login protocol".to_string(),
            url: format!("https://jira.example.com/browse/{key}"),
            issue_type: IssueType {
                name: "Bug".to_string(),
                icon: "bug.svg".to_string(),
            },
            project: ProjectRef {
                name: "Engineering".to_string(),
                url: "https://jira.example.com/browse/ES".to_string(),
                key: "ES".to_string(),
            },
        })
    }
}

/// Holds the "remote" description; updates replace it.
pub struct FakeGitHub {
    pub body: Mutex<String>,
    pub updates: Mutex<Vec<String>>,
}

#[async_trait]
impl PullRequestService for FakeGitHub {
    async fn pull_request(&self, pr: &PullRequestRef) -> AppResult<PullRequest> {
        Ok(PullRequest {
            number: pr.number,
            title: String::new(),
            body: self.body.lock().unwrap().clone(),
            head: BranchName("unused".to_string()),
        })
    }

    async fn update_body(&self, _pr: &PullRequestRef, body: &str) -> AppResult<()> {
        *self.body.lock().unwrap() = body.to_string();
        self.updates.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub ctx: AppContext,
    pub jira: Arc<FakeJira>,
    pub github: Arc<FakeGitHub>,
}

/// Context built from the required inputs plus `inputs`.
pub fn harness(inputs: &[(&str, &str)], remote_body: &str, jira_missing: bool) -> Harness {
    let mut vars: Vec<(String, String)> = vec![
        ("INPUT_JIRA-BASE-URL".into(), "https://jira.example.com".into()),
        ("INPUT_GITHUB-TOKEN".into(), "gh".into()),
    ];
    vars.extend(inputs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    let config = AppConfig::from_lookup(|key: &str| {
        vars.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    })
    .unwrap();

    let jira = Arc::new(FakeJira {
        requested: Mutex::new(Vec::new()),
        missing: jira_missing,
    });
    let github = Arc::new(FakeGitHub {
        body: Mutex::new(remote_body.to_string()),
        updates: Mutex::new(Vec::new()),
    });
    let ctx = AppContext::new(config, github.clone(), jira.clone());
    Harness { ctx, jira, github }
}

pub fn event(name: &str, title: &str, branch: &str) -> WorkflowEvent {
    WorkflowEvent {
        name: name.to_string(),
        payload: EventPayload {
            pull_request: Some(GitHubPullRequest {
                number: 5,
                title: Some(title.to_string()),
                body: Some("stale payload body".to_string()),
                head: GitHubRef {
                    ref_name: branch.to_string(),
                },
            }),
            repository: Some(EventRepository {
                name: "web".to_string(),
                owner: EventOwner {
                    login: "acme".to_string(),
                },
            }),
        },
    }
}
