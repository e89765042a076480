use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, PullRequestService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub pull_requests: Arc<dyn PullRequestService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        pull_requests: Arc<dyn PullRequestService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            config,
            pull_requests,
            issue_tracker,
        }
    }
}
