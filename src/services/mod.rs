pub mod issue_tracker;
pub mod pull_requests;

pub use issue_tracker::IssueTrackerService;
pub use pull_requests::PullRequestService;
