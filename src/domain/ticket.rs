use crate::domain::issue_key::IssueKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueType {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub name: String,
    pub url: String,
    pub key: String,
}

/// Read-only projection of a Jira issue used to render the PR summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    pub key: IssueKey,
    pub summary: String,
    pub url: String,
    pub issue_type: IssueType,
    pub project: ProjectRef,
}
