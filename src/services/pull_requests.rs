use async_trait::async_trait;

use crate::domain::pull_request::{PullRequest, PullRequestRef};
use crate::error::AppResult;

#[async_trait]
pub trait PullRequestService: Send + Sync {
    async fn pull_request(&self, pr: &PullRequestRef) -> AppResult<PullRequest>;
    async fn update_body(&self, pr: &PullRequestRef, body: &str) -> AppResult<()>;
}
