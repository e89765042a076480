use async_trait::async_trait;

use crate::domain::issue_key::IssueKey;
use crate::domain::ticket::TicketDetails;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn ticket_details(&self, key: &IssueKey) -> AppResult<TicketDetails>;
}
