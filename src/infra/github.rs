use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::branch::BranchName;
use crate::domain::pull_request::{PullRequest, PullRequestRef};
use crate::error::{AppError, AppResult};
use crate::services::PullRequestService;

const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: String, token: String) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn pull_endpoint(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, pr.owner, pr.repo, pr.number
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, env!("CARGO_PKG_NAME"))
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> AppResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| AppError::SourceControl(format!("failed to {action}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::SourceControl(format!(
                "GitHub responded with {status} while trying to {action}: {body}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl PullRequestService for GitHubClient {
    async fn pull_request(&self, pr: &PullRequestRef) -> AppResult<PullRequest> {
        debug!(owner = %pr.owner, repo = %pr.repo, number = pr.number, "fetching pull request");
        let response = self
            .send(
                self.http.get(self.pull_endpoint(pr)),
                "fetch the pull request",
            )
            .await?;

        let payload: GitHubPullRequest = response.json().await.map_err(|err| {
            AppError::SourceControl(format!("failed to parse pull request: {err}"))
        })?;
        Ok(payload.into())
    }

    async fn update_body(&self, pr: &PullRequestRef, body: &str) -> AppResult<()> {
        info!(owner = %pr.owner, repo = %pr.repo, number = pr.number, "updating pull request description");
        self.send(
            self.http
                .patch(self.pull_endpoint(pr))
                .json(&UpdatePullRequest { body }),
            "update the pull request",
        )
        .await?;
        Ok(())
    }
}

/// Pull request as found in the REST API and in `pull_request` event payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub head: GitHubRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

impl From<GitHubPullRequest> for PullRequest {
    fn from(value: GitHubPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            body: value.body.unwrap_or_default(),
            head: BranchName(value.head.ref_name),
        }
    }
}

#[derive(Serialize)]
struct UpdatePullRequest<'a> {
    body: &'a str,
}
